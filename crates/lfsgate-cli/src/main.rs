//! git-lfs-authenticate
//!
//! Invoked over SSH by Git LFS clients as
//! `git-lfs-authenticate <namespace>/<repo> <upload|download> [oid]`.
//! Prints the LFS endpoint and credentials as JSON when the calling user
//! belongs to an allowed LDAP group; otherwise prints the reason on stderr
//! and exits with status 1.

mod args;
mod user;

use anyhow::Context;
use args::{Cli, LogFormat};
use clap::Parser;
use lfsgate_core::types::SshAuthResponse;
use lfsgate_core::LfsGateConfig;
use std::io::Write;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    init_logging(&cli.log_level, cli.log_format);

    match run(&cli).await.and_then(|response| write_response(&response)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_failure(&e);
            ExitCode::FAILURE
        }
    }
}

/// Log the failure category and print the message for the SSH client
fn report_failure(err: &anyhow::Error) {
    // at the default level only the message below reaches stderr
    match err.downcast_ref::<lfsgate_core::Error>() {
        Some(e) if e.is_denial() => info!(code = e.code(), "Request refused"),
        Some(e) => debug!(code = e.code(), "Request failed"),
        None => debug!("Request failed"),
    }
    eprintln!("{:#}", err);
}

fn init_logging(level: &str, format: LogFormat) {
    // stdout carries the JSON response, logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

async fn run(cli: &Cli) -> anyhow::Result<SshAuthResponse> {
    let request = cli.request()?;

    let config_path = LfsGateConfig::resolve_path(cli.config.as_deref());
    debug!("Loading configuration from {:?}", config_path);
    let config = LfsGateConfig::from_file(&config_path)?;
    config.validate()?;

    let principal = user::current_username()?;
    info!(
        "{} requested {} on {}",
        principal, request.operation, request.path
    );

    lfsgate_ldap::check_membership(&config.ldap, &principal)
        .await
        .into_result()?;

    Ok(SshAuthResponse::new(&config.lfs, &request.path)?)
}

fn write_response(response: &SshAuthResponse) -> anyhow::Result<()> {
    let json = response.to_json()?;
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(json.as_bytes())
        .and_then(|()| stdout.flush())
        .context("Failed to write response")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_keeps_core_error() {
        let err = anyhow::Error::from(lfsgate_core::Error::NotAuthorized);
        let core = err.downcast_ref::<lfsgate_core::Error>().unwrap();
        assert!(core.is_denial());
        assert_eq!(core.code(), "AccessDenied");
        assert_eq!(format!("{:#}", err), "You're not authorised for this operation");
    }

    #[test]
    fn test_write_failure_is_not_core_error() {
        let err = anyhow::anyhow!("broken pipe").context("Failed to write response");
        assert!(err.downcast_ref::<lfsgate_core::Error>().is_none());
    }
}
