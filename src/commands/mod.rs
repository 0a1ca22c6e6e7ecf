// ABOUTME: Command handlers for the harmonia CLI.
// ABOUTME: Wires the portal adapters into collaborators and maps outcomes to exit status.

mod delete;
mod scale;
mod status;
mod watch;

pub use delete::delete;
pub use scale::{start, stop};
pub use status::status;
pub use watch::watch;

use std::sync::Arc;

use harmonia::config::{AppConfig, Config, EnvironmentConfig};
use harmonia::kubectl::{KubectlCluster, resolve_cluster_name};
use harmonia::ops::{Collaborators, OpsError};
use harmonia::output::Output;
use harmonia::poll::{PollError, PollOutcome};
use harmonia::portal::{CatalogClient, PortalClient};
use harmonia::status::{ReplicaStatusPoller, StackStatusPoller, StatusError};
use harmonia::task::CancelToken;
use harmonia::teardown::TeardownError;
use snafu::{OptionExt, ResultExt, Snafu};
use tokio::task::JoinHandle;
use tracing::info;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CommandError {
    #[snafu(display("{source}"))]
    Config { source: harmonia::error::Error },

    #[snafu(display("could not build HTTP client: {source}"))]
    HttpClient { source: reqwest::Error },

    #[snafu(display("{action} failed: {source}"))]
    Ops { action: String, source: OpsError },

    #[snafu(display("{source}"))]
    Status { source: StatusError },

    #[snafu(display("invalid poll settings: {source}"))]
    Poll { source: PollError },

    #[snafu(display("{source}"))]
    Plan { source: TeardownError },

    #[snafu(display("environment {env} has no CloudFormation stack"))]
    NoStack { env: String },

    #[snafu(display("environment {env} has no stack template to deploy"))]
    NoTemplate { env: String },

    #[snafu(display("environment {env} has no eks section"))]
    NotEks { env: String },

    #[snafu(display("no deployment {wanted} found in environment {env}"))]
    NoDeployment { env: String, wanted: String },

    #[snafu(display("environment {env} did not settle: {detail}"))]
    Unsettled { env: String, detail: String },

    #[snafu(display("teardown incomplete: {summary}"))]
    TeardownIncomplete { summary: String },
}

/// Loaded config plus the collaborators built from it.
pub struct Session {
    pub config: Config,
    pub app: Arc<AppConfig>,
    pub ops: Collaborators,
}

impl Session {
    pub fn connect(config: Config) -> Result<Self, CommandError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("harmonia/", env!("CARGO_PKG_VERSION")))
            .build()
            .context(HttpClientSnafu)?;

        let backend = &config.backend;
        let base_url = backend.resolve_base_url().context(ConfigSnafu)?;
        let catalog_url = backend.resolve_catalog_url().context(ConfigSnafu)?;

        let portal = PortalClient::new(
            http.clone(),
            &base_url,
            backend.platform_app_name.clone(),
            backend.platform_region.clone(),
        );
        let portal = Arc::new(portal);
        let ops = Collaborators {
            stacks: portal.clone(),
            pipelines: portal.clone(),
            platform_stacks: portal.clone(),
            cluster: Arc::new(KubectlCluster::new(PortalClient::clone(&portal))),
            parameters: portal.clone(),
            secrets: portal.clone(),
            repositories: portal,
            catalog: Arc::new(CatalogClient::new(http, &catalog_url)),
        };

        Ok(Self {
            app: Arc::new(config.app.clone()),
            config,
            ops,
        })
    }

    pub fn environment(&self, name: &str) -> Result<&EnvironmentConfig, CommandError> {
        self.config.environment(name).context(ConfigSnafu)
    }

    pub fn stack_poller(&self, env: &EnvironmentConfig) -> Result<StackStatusPoller, CommandError> {
        let stack = self.app.stack_ref(env).context(NoStackSnafu {
            env: env.name.clone(),
        })?;
        Ok(StackStatusPoller::new(Arc::clone(&self.ops.stacks), stack)
            .with_settings(self.config.polling.stack_settings()))
    }

    pub async fn replica_poller(
        &self,
        env: &EnvironmentConfig,
    ) -> Result<ReplicaStatusPoller, CommandError> {
        let eks = env.eks.as_ref().context(NotEksSnafu {
            env: env.name.clone(),
        })?;
        let backend = self.app.backend_params(env);
        let cluster_name =
            resolve_cluster_name(self.ops.parameters.as_ref(), &backend, &eks.cluster_parameter)
                .await
                .context(OpsSnafu {
                    action: "cluster lookup",
                })?;
        let query = self.app.deployment_query(env, eks, cluster_name);
        Ok(ReplicaStatusPoller::new(Arc::clone(&self.ops.cluster), query)
            .with_settings(self.config.polling.replica_settings()))
    }
}

/// Cancel `token` on Ctrl-C. Abort the handle once the work is done.
pub fn cancel_on_interrupt(token: &CancelToken) -> JoinHandle<()> {
    let token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, cancelling");
            token.cancel();
        }
    })
}

/// `Some(status)` when completed, `None` when cancelled, an error otherwise.
pub fn settle<S>(
    env: &str,
    outcome: PollOutcome<S, OpsError>,
    output: &Output,
) -> Result<Option<S>, CommandError> {
    match outcome {
        PollOutcome::Completed(status) => Ok(Some(status)),
        PollOutcome::Cancelled => {
            output.warning("cancelled before the status settled");
            Ok(None)
        }
        PollOutcome::Exhausted(_) => UnsettledSnafu {
            env,
            detail: "gave up after the iteration budget",
        }
        .fail(),
        PollOutcome::Failed(source) => Err(CommandError::Ops {
            action: "status fetch".to_string(),
            source,
        }),
    }
}
