// ABOUTME: Start and stop commands.
// ABOUTME: EKS apps scale their deployment; stack apps deploy or delete their stack.

use std::sync::Arc;

use harmonia::output::Output;
use harmonia::status::{ReplicaScaler, ReplicaSnapshot, ReplicaTarget, StackAction, UNSTAGED};
use harmonia::task::CancelToken;
use snafu::{OptionExt, ResultExt};

use super::watch::print_snapshot;
use super::{
    CommandError, NoDeploymentSnafu, NoTemplateSnafu, OpsSnafu, Session, StatusSnafu,
    cancel_on_interrupt, settle,
};
use crate::cli::ScaleArgs;

pub async fn start(session: &Session, args: &ScaleArgs, output: &Output) -> Result<(), CommandError> {
    if session.app.is_eks() {
        scale_replicas(session, args, ReplicaTarget::Start, output).await
    } else {
        deploy_stack(session, &args.env, output).await
    }
}

pub async fn stop(session: &Session, args: &ScaleArgs, output: &Output) -> Result<(), CommandError> {
    if session.app.is_eks() {
        scale_replicas(session, args, ReplicaTarget::Stop, output).await
    } else {
        run_stack_action(session, &args.env, Some(StackAction::Delete), output).await
    }
}

async fn deploy_stack(session: &Session, env_name: &str, output: &Output) -> Result<(), CommandError> {
    run_stack_action(session, env_name, None, output).await
}

/// `None` picks create or update from the stack's current status.
async fn run_stack_action(
    session: &Session,
    env_name: &str,
    action: Option<StackAction>,
    output: &Output,
) -> Result<(), CommandError> {
    let env = session.environment(env_name)?;
    let poller = session.stack_poller(env)?;

    let action = match action {
        Some(action) => action,
        None => {
            let template = env.template.clone().context(NoTemplateSnafu {
                env: env.name.clone(),
            })?;
            let snapshot = poller.snapshot().await.context(OpsSnafu {
                action: "stack events",
            })?;
            let current = snapshot
                .latest
                .as_ref()
                .map_or(UNSTAGED, |event| event.resource_status.as_str());
            StackAction::for_start(current, template)
        }
    };
    output.progress(&format!(
        "Requesting stack {} for {}...",
        action.verb(),
        poller.stack().stack_name
    ));

    let token = CancelToken::new();
    let interrupt = cancel_on_interrupt(&token);
    let printer = output.clone();
    let outcome = poller
        .launch(action, &token, move |snapshot| print_snapshot(&printer, snapshot))
        .await;
    interrupt.abort();

    if let Some(snapshot) = settle(&env.name, outcome.context(StatusSnafu)?, output)? {
        output.success(&format!("Stack settled: {}", snapshot.status()));
    }
    Ok(())
}

async fn scale_replicas(
    session: &Session,
    args: &ScaleArgs,
    target: ReplicaTarget,
    output: &Output,
) -> Result<(), CommandError> {
    let env = session.environment(&args.env)?;
    let poller = session.replica_poller(env).await?;

    let states = poller.app_states().await.context(OpsSnafu {
        action: "deployment listing",
    })?;
    let wanted = args.deployment.as_deref();
    let deployment = states
        .into_iter()
        .find(|state| wanted.is_none_or(|name| state.name == name))
        .context(NoDeploymentSnafu {
            env: env.name.clone(),
            wanted: wanted.unwrap_or("deployment").to_string(),
        })?;

    let scaler = ReplicaScaler::new(
        Arc::clone(&session.ops.repositories),
        session.app.manifest_source(env),
    );
    output.progress(&format!("{} {} in {}...", target.verb(), deployment.name, env.name));

    let token = CancelToken::new();
    let interrupt = cancel_on_interrupt(&token);
    let printer = output.clone();
    let outcome = poller
        .scale(
            &scaler,
            deployment.uid,
            target,
            args.replicas,
            &token,
            move |snapshot: &ReplicaSnapshot| {
                if let Some(state) = snapshot.app_state() {
                    printer.update(
                        &format!("  → {}: {}/{} running", state.name, state.running, state.desired),
                        &state,
                    );
                }
            },
        )
        .await;
    interrupt.abort();

    if let Some(snapshot) = settle(&env.name, outcome.context(StatusSnafu)?, output)?
        && let Some(state) = snapshot.app_state()
    {
        output.success(&format!("{} is {}", state.name, state.state));
    }
    Ok(())
}
