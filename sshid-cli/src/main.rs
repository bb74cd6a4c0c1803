//! Application for converting public keys and discovering SSH host keys.

use std::{
    fs::read_to_string,
    io::{read_to_string as read_stream, stdin},
    path::PathBuf,
    process::ExitCode,
    time::Duration,
};

use clap::Parser;
use log::warn;
use sshid_cli::{
    Error,
    cli::{CheckCommand, Cli, Command, FromSpkiCommand, HostCommand, ProbeArgs},
    config::Config,
    state::TrustState,
};
use sshid_common::logging::setup_logging;
use sshid_probe::{
    HostKeyRecord,
    known_hosts::{is_server_known, read_known_hosts},
    probe_host_key,
};
use sshid_spki::from_spki;
use tokio_util::sync::CancellationToken;

/// Returns a token that is cancelled after `timeout` or when the process is interrupted.
fn cancellation(timeout: Duration) -> CancellationToken {
    let token = CancellationToken::new();
    let cancel = token.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(timeout) => warn!("Cancelling after {}s", timeout.as_secs()),
            _ = tokio::signal::ctrl_c() => warn!("Cancelling on interrupt"),
        }
        cancel.cancel();
    });
    token
}

/// Probes the SSH server described by `args`.
///
/// # Errors
///
/// Returns an error if the probe fails or is cancelled.
async fn probe(args: &ProbeArgs, config: &Config) -> Result<HostKeyRecord, sshid_probe::Error> {
    let timeout = args.timeout(config);
    let cancel = cancellation(timeout);
    let _guard = cancel.clone().drop_guard();
    probe_host_key(&args.endpoint(config), &args.options(config), &cancel).await
}

/// Converts a public key read from a file or stdin.
fn from_spki_command(command: FromSpkiCommand) -> Result<(), Error> {
    let input = match command.input {
        Some(path) => read_to_string(&path).map_err(|source| Error::Io { file: path, source })?,
        None => read_stream(stdin()).map_err(|source| Error::Io {
            file: PathBuf::new(),
            source,
        })?,
    };
    println!("{}", from_spki(&input)?);
    Ok(())
}

/// Discovers (and optionally pins) the host key of an SSH server.
async fn host_command(command: HostCommand, config: &Config) -> Result<(), Error> {
    let record = if let Some(path) = command.state {
        TrustState::new(path)
            .resolve(
                &command.probe.endpoint(config),
                probe(&command.probe, config),
            )
            .await?
    } else {
        probe(&command.probe, config).await?
    };
    println!("{}", command.format.render(&record)?);
    Ok(())
}

/// Discovers the host key of an SSH server and checks it against a `known_hosts` file.
async fn check_command(command: CheckCommand, config: &Config) -> Result<(), Error> {
    let entries = read_known_hosts(&command.known_hosts)?;
    let record = probe(&command.probe, config).await?;
    if !is_server_known(&entries, &record) {
        return Err(Error::UnknownHostKey {
            entry: record.known_hosts_entry(),
            file: command.known_hosts,
        });
    }
    println!("{}", record.known_hosts_entry());
    Ok(())
}

async fn run_command(args: Cli) -> Result<(), Error> {
    match args.command {
        Command::FromSpki(command) => from_spki_command(command)?,
        Command::Host(command) => {
            let config = Config::new(args.config.as_deref())?;
            host_command(command, &config).await?
        }
        Command::Check(command) => {
            let config = Config::new(args.config.as_deref())?;
            check_command(command, &config).await?
        }
    }
    Ok(())
}

/// Converts public keys and discovers SSH host keys.
///
/// # Errors
///
/// Returns an error if
/// - setting up logging fails,
/// - loading the configuration fails,
/// - converting a public key fails,
/// - probing an SSH server fails,
/// - or a captured host key is not listed in a `known_hosts` file.
#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    if let Err(error) = setup_logging(args.verbosity) {
        eprintln!("{error}");
        return ExitCode::FAILURE;
    }

    let result = run_command(args).await;

    if let Err(error) = result {
        log::error!(error:err; "Running command failed: {error}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
