// ABOUTME: Watch command: follow a stack's events until it settles.
// ABOUTME: Ctrl-C cancels the poll session.

use harmonia::output::Output;
use harmonia::status::StackSnapshot;
use harmonia::task::CancelToken;
use snafu::ResultExt;

use super::{CommandError, PollSnafu, Session, cancel_on_interrupt, settle};

pub async fn watch(session: &Session, env_name: &str, output: &Output) -> Result<(), CommandError> {
    let env = session.environment(env_name)?;
    let poller = session.stack_poller(env)?;
    output.progress(&format!("Watching stack {}...", poller.stack().stack_name));

    let token = CancelToken::new();
    let interrupt = cancel_on_interrupt(&token);
    let printer = output.clone();
    let outcome = poller
        .poll(&token, move |snapshot| print_snapshot(&printer, snapshot))
        .await;
    interrupt.abort();

    if let Some(snapshot) = settle(&env.name, outcome.context(PollSnafu)?, output)? {
        output.success(&format!("Stack settled: {}", snapshot.status()));
    }
    Ok(())
}

pub(crate) fn print_snapshot(output: &Output, snapshot: &StackSnapshot) {
    let message = match &snapshot.latest {
        Some(event) => format!(
            "  → {} {} {}",
            event.logical_id, event.resource_type, event.resource_status
        ),
        None => "  → no stack events".to_string(),
    };
    output.update(&message, snapshot);
}
