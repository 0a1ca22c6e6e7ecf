// ABOUTME: Delete command: tear the app down in one environment or all of them.
// ABOUTME: Prints the per-step report and fails when a required step failed.

use std::sync::Arc;

use harmonia::output::Output;
use harmonia::teardown::{AppTeardown, TeardownOrchestrator};
use snafu::ResultExt;

use super::{CommandError, PlanSnafu, Session, TeardownIncompleteSnafu};
use crate::cli::DeleteArgs;

pub async fn delete(session: &Session, args: &DeleteArgs, output: &Output) -> Result<(), CommandError> {
    let teardown = AppTeardown::new(Arc::clone(&session.app), session.ops.clone());
    let app = &session.app.name;

    let plan = match &args.env {
        Some(env) if !args.all => {
            output.progress(&format!("Deleting {app} from {env}..."));
            teardown.environment_plan(env).context(PlanSnafu)?
        }
        _ => {
            output.progress(&format!("Deleting {app} from all environments..."));
            teardown.all_environments_plan()
        }
    };

    let report = TeardownOrchestrator::new().execute(plan).await;
    output.report(&report);

    if !report.overall_succeeded {
        return TeardownIncompleteSnafu {
            summary: report.summary(),
        }
        .fail();
    }
    if let Some(env) = args.env.as_deref().filter(|_| !args.all) {
        output.progress(&format!(
            "Infrastructure deletion requested; run `harmonia watch --env {env}` to follow it"
        ));
    }
    Ok(())
}
