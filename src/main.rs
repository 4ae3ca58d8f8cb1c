// ABOUTME: Entry point for the lxd-provision CLI application.
// ABOUTME: Parses arguments, connects to LXD, and runs the provisioning workflow.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use lxd_provision::config::{self, Config, HostConfig};
use lxd_provision::diagnostics::{Diagnostics, Warning};
use lxd_provision::error::{Error, Result};
use lxd_provision::lxd::{ConnectError, LxdClient, connect_local, connect_via_session};
use lxd_provision::output::{Output, OutputMode};
use lxd_provision::provision::{Failure, InstanceSpec, ProvisionResult, Provisioner};
use lxd_provision::ssh::{self, Session, SessionConfig};
use lxd_provision::types::InstanceKind;
use std::env;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let mut output = Output::new(mode);

    if let Err(e) = run(cli.command, &mut output).await {
        // The result line already reported the failure.
        if !matches!(e, Error::Provision(_)) {
            output.error(&e.to_string());
        }
        std::process::exit(1);
    }
}

async fn run(command: Commands, output: &mut Output) -> Result<()> {
    let cwd = env::current_dir()?;

    match command {
        Commands::Init { host, force } => {
            config::init_config(&cwd, host.as_deref(), force)?;
            output.progress(&format!("Wrote {}", config::CONFIG_FILENAME));
            Ok(())
        }
        Commands::Create {
            name,
            fingerprint,
            memory,
            disk,
            cpu,
            address,
            kind,
        } => {
            output.start_timer();
            let spec = InstanceSpec::new(&name, &fingerprint, memory, disk, cpu, address, kind);
            let result = match spec {
                Ok(spec) => {
                    let config = Config::discover_or_default(&cwd)?;
                    create(&config, &spec, output).await
                }
                Err(e) => Err(Failure::from(e)),
            };

            output.result(&result);
            result.map(|_| ()).map_err(Error::Provision)
        }
    }
}

/// Provision one instance on the configured hypervisor.
///
/// Every failure, including an unreachable hypervisor, is reported as a
/// provisioning result.
async fn create(config: &Config, spec: &InstanceSpec, output: &Output) -> ProvisionResult {
    let mut diagnostics = Diagnostics::default();
    let result = connect_and_provision(config, spec, output, &mut diagnostics).await;

    for warning in diagnostics.warnings() {
        output.warning(&warning.message);
    }
    result
}

async fn connect_and_provision(
    config: &Config,
    spec: &InstanceSpec,
    output: &Output,
    diagnostics: &mut Diagnostics,
) -> ProvisionResult {
    let session = match &config.host {
        Some(host) => {
            output.progress(&format!("  → Connecting to {}...", host.host));
            Some(open_session(host).await.map_err(ConnectError::from)?)
        }
        None => None,
    };

    let client = match &session {
        Some(session) => connect_via_session(session, config.socket.as_deref()).await,
        None => connect_local(config.socket.as_deref()).await,
    };

    let result = match client {
        Ok(client) => provision(client, config, spec, output, diagnostics).await,
        Err(e) => Err(e.into()),
    };

    if let Some(session) = session
        && let Err(e) = session.disconnect().await
    {
        diagnostics.warn(Warning::ssh_disconnect(e.to_string()));
    }
    result
}

async fn provision(
    client: LxdClient,
    config: &Config,
    spec: &InstanceSpec,
    output: &Output,
    diagnostics: &mut Diagnostics,
) -> ProvisionResult {
    let kind = match spec.kind {
        InstanceKind::Container => "container",
        InstanceKind::VirtualMachine => "virtual machine",
    };
    output.progress(&format!(
        "  → Provisioning {} {} from {}...",
        kind, spec.name, spec.fingerprint
    ));

    // Dropped at the end of this call, closing any SSH tunnel before disconnect.
    let client = Arc::new(client);
    Provisioner::new(client, config)
        .provision_with_diagnostics(spec, diagnostics)
        .await
}

async fn open_session(host: &HostConfig) -> std::result::Result<Session, ssh::Error> {
    let ssh_config = SessionConfig::new(&host.host, host.user_or_default())
        .port(host.port)
        .key_path(host.key_path.clone())
        .trust_on_first_use(host.trust_first_connection);

    Session::connect(ssh_config).await
}
