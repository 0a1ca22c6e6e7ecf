// ABOUTME: Status command: one-shot normalised status of an environment.
// ABOUTME: Shows the stack status and, for EKS apps, each deployment's replicas.

use harmonia::config::ProvisioningState;
use harmonia::output::Output;
use snafu::ResultExt;

use super::{CommandError, OpsSnafu, Session};

pub async fn status(session: &Session, env_name: &str, output: &Output) -> Result<(), CommandError> {
    let env = session.environment(env_name)?;
    let app = session.app.as_ref();

    if app.provisioning == ProvisioningState::CloudFormation {
        let poller = session.stack_poller(env)?;
        let snapshot = poller.snapshot().await.context(OpsSnafu {
            action: "stack events",
        })?;
        let mut message = format!("{} in {}: {}", app.name, env.name, snapshot.status());
        if let Some(event) = &snapshot.latest {
            message.push_str(&format!(
                " (latest: {} {})",
                event.logical_id, event.resource_status
            ));
        }
        output.update(&message, &snapshot);
    } else {
        output.progress(&format!(
            "{} in {} is provisioned by {}; no stack events to show",
            app.name,
            env.name,
            String::from(app.provisioning.clone())
        ));
    }

    if app.is_eks() {
        let poller = session.replica_poller(env).await?;
        let states = poller.app_states().await.context(OpsSnafu {
            action: "deployment listing",
        })?;
        if states.is_empty() {
            output.progress("  no deployments found");
        }
        for state in &states {
            output.update(
                &format!(
                    "  {}: {} ({}/{} running, {} pending)",
                    state.name, state.state, state.running, state.desired, state.pending
                ),
                state,
            );
        }
    }

    Ok(())
}
