//! policyctl
//!
//! Applies or removes network policies on a directory-service
//! controller.
//!
//! # Usage
//!
//! ```bash
//! policyctl --credentials-file creds.yaml --add-policy --policy-file policy.yaml
//! policyctl --credentials-file creds.yaml --delete-policy \
//!     --policy-id web-tier-ingress --enterprise acme --domain production
//! ```

use clap::Parser;
use policyctl::{Action, Error, Orchestrator, RestClient};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "policyctl")]
#[command(version)]
#[command(about = "Network policy lifecycle management for a directory service", long_about = None)]
struct Cli {
    /// YAML file with directory-service credentials
    #[arg(long, value_name = "FILE")]
    credentials_file: PathBuf,

    /// Apply the policy described by --policy-file
    #[arg(long)]
    add_policy: bool,

    /// Delete the policy addressed by --policy-id/--enterprise/--domain
    #[arg(long)]
    delete_policy: bool,

    /// Policy document to apply
    #[arg(long, value_name = "FILE")]
    policy_file: Option<PathBuf>,

    /// ID of the policy to delete
    #[arg(long)]
    policy_id: Option<String>,

    /// Enterprise the policy is scoped to
    #[arg(long)]
    enterprise: Option<String>,

    /// Domain the policy is scoped to
    #[arg(long)]
    domain: Option<String>,

    /// Fail instead of succeeding when deleting a policy the service
    /// does not have
    #[arg(long)]
    keep_missing_delete_errors: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "POLICYCTL_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let action = match Action::from_flags(
        cli.add_policy,
        cli.delete_policy,
        cli.policy_file,
        cli.policy_id,
        cli.enterprise,
        cli.domain,
    ) {
        Ok(action) => action,
        Err(err) => fail(err.into()),
    };

    let orchestrator = Orchestrator::new(RestClient::new())
        .treat_missing_as_deleted(!cli.keep_missing_delete_errors);

    if let Err(err) = orchestrator.run(&cli.credentials_file, &action).await {
        fail(err);
    }
}

fn fail(err: Error) -> ! {
    eprintln!("Error: {err}");
    std::process::exit(err.exit_code());
}

fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
