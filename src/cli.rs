// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "harmonia")]
#[command(about = "Track deployment status and tear down portal-managed AWS applications")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print only final results
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file to use instead of discovering harmonia.yml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new harmonia.yml configuration file
    Init {
        /// App name to put in the template
        #[arg(long)]
        app: Option<String>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show the current deployment status of an environment
    Status(EnvArgs),

    /// Follow stack events until the stack settles (Ctrl-C stops)
    Watch(EnvArgs),

    /// Start the app in an environment and wait until it runs
    Start(ScaleArgs),

    /// Stop the app in an environment and wait until it stops
    Stop(ScaleArgs),

    /// Delete the app from one environment, or from all of them
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct EnvArgs {
    /// Environment name (defined in config)
    #[arg(short, long)]
    pub env: String,
}

#[derive(Args)]
pub struct ScaleArgs {
    /// Environment name (defined in config)
    #[arg(short, long)]
    pub env: String,

    /// Deployment to track; defaults to the first one found
    #[arg(short, long)]
    pub deployment: Option<String>,

    /// Replica count when starting an EKS app
    #[arg(long, default_value_t = 1)]
    pub replicas: u32,
}

#[derive(Args)]
#[command(group(ArgGroup::new("scope").required(true).args(["env", "all"])))]
pub struct DeleteArgs {
    /// Environment to delete the app from
    #[arg(short, long)]
    pub env: Option<String>,

    /// Delete the app from every environment and deregister it
    #[arg(long)]
    pub all: bool,
}
