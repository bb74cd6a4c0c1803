//! Command line interface.

use std::{path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use sshid_probe::{HostEndpoint, HostKeyRecord, ProbeOptions};

use crate::{Error, config::Config};

/// Converts public keys to the SSH format and discovers the host keys of SSH servers.
#[derive(Debug, Parser)]
#[command(name = "sshid", version)]
pub struct Cli {
    /// The path to a configuration file.
    ///
    /// If not provided, `~/.config/sshid/config.toml` (on Linux) is used.
    #[arg(env = "SSHID_CONFIG", global = true, long, short)]
    pub config: Option<PathBuf>,

    /// Global processing log verbosity.
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// The command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands of the `sshid` command line interface.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Converts a PEM encoded X.509 SubjectPublicKeyInfo public key to an SSH public key.
    #[command(name = "fromspki")]
    FromSpki(FromSpkiCommand),

    /// Discovers the host key of an SSH server.
    Host(HostCommand),

    /// Discovers the host key of an SSH server and checks it against a `known_hosts` file.
    Check(CheckCommand),
}

/// Public key conversion parameters.
#[derive(Debug, Parser)]
pub struct FromSpkiCommand {
    /// The path to a file containing a PEM encoded public key.
    ///
    /// If not provided, the public key is read from stdin.
    pub input: Option<PathBuf>,
}

/// Parameters for probing an SSH server.
#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// The host name or IP address of the SSH server.
    #[arg(long)]
    pub host: String,

    /// The TCP port of the SSH server.
    #[arg(long)]
    pub port: Option<u16>,

    /// An acceptable host key algorithm.
    ///
    /// This option can be provided multiple times, in order of preference.
    #[arg(long = "host-key-algorithm", value_name = "ALGORITHM")]
    pub host_key_algorithms: Vec<String>,

    /// The number of seconds after which probing is cancelled.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

impl ProbeArgs {
    /// Returns the endpoint to probe, using the port from `config` if none is provided.
    pub fn endpoint(&self, config: &Config) -> HostEndpoint {
        HostEndpoint::new(self.host.clone(), self.port.unwrap_or(config.port))
    }

    /// Returns the timeout, using the one from `config` if none is provided.
    pub fn timeout(&self, config: &Config) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(config.timeout))
    }

    /// Returns the probe options, using the host key algorithms from `config` if none are
    /// provided.
    pub fn options(&self, config: &Config) -> ProbeOptions {
        let algorithms = if self.host_key_algorithms.is_empty() {
            &config.host_key_algorithms
        } else {
            &self.host_key_algorithms
        };
        ProbeOptions::default()
            .host_key_algorithms(algorithms.iter().cloned())
            .inactivity_timeout(self.timeout(config))
    }
}

/// The output format of a captured host key.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// The SSH public key line (`"<algorithm> <base64>"`).
    #[default]
    Line,

    /// A JSON object with host, port and public key.
    Json,

    /// A line in the SSH `known_hosts` file format.
    KnownHosts,
}

impl OutputFormat {
    /// Renders `record` in the output format.
    ///
    /// # Errors
    ///
    /// Returns an error if `record` can not be serialized to JSON.
    pub fn render(self, record: &HostKeyRecord) -> Result<String, Error> {
        Ok(match self {
            Self::Line => record.public_key().to_string(),
            Self::Json => serde_json::to_string_pretty(record)?,
            Self::KnownHosts => record.known_hosts_entry(),
        })
    }
}

/// Host key discovery parameters.
#[derive(Debug, Parser)]
pub struct HostCommand {
    /// The SSH server to probe.
    #[command(flatten)]
    pub probe: ProbeArgs,

    /// The output format.
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// The path to a trust state file pinning the host key.
    ///
    /// If the file exists and pins the host key of the same endpoint, the pinned host key is
    /// returned without contacting the server.
    /// If the file pins the host key of another endpoint, an error is returned.
    /// If the file does not exist, it is created with the captured host key.
    #[arg(long)]
    pub state: Option<PathBuf>,
}

/// Host key verification parameters.
#[derive(Debug, Parser)]
pub struct CheckCommand {
    /// The SSH server to probe.
    #[command(flatten)]
    pub probe: ProbeArgs,

    /// The path to a file in the SSH `known_hosts` file format.
    #[arg(long)]
    pub known_hosts: PathBuf,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use rstest::rstest;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn host_command() -> TestResult {
        let cli = Cli::try_parse_from([
            "sshid",
            "host",
            "--host",
            "example.org",
            "--host-key-algorithm",
            "ecdsa-sha2-nistp256",
            "--host-key-algorithm",
            "ssh-ed25519",
            "--format",
            "known-hosts",
        ])?;
        let Command::Host(command) = cli.command else {
            panic!("expected the host command");
        };
        assert_eq!(command.format, OutputFormat::KnownHosts);
        assert_eq!(
            command.probe.host_key_algorithms,
            ["ecdsa-sha2-nistp256", "ssh-ed25519"]
        );
        assert_eq!(command.state, None);
        Ok(())
    }

    #[rstest]
    #[case::defaults_from_config(&["--host", "example.org"], 2222, 5)]
    #[case::overrides(&["--host", "example.org", "--port", "22", "--timeout", "1"], 22, 1)]
    fn probe_args_fall_back_to_config(
        #[case] args: &[&str],
        #[case] port: u16,
        #[case] timeout: u64,
    ) -> TestResult {
        let config = Config {
            host_key_algorithms: vec!["ssh-ed25519".into()],
            port: 2222,
            timeout: 5,
        };
        let cli = Cli::try_parse_from(
            ["sshid", "check", "--known-hosts", "/dev/null"]
                .iter()
                .chain(args),
        )?;
        let Command::Check(command) = cli.command else {
            panic!("expected the check command");
        };

        assert_eq!(
            command.probe.endpoint(&config),
            HostEndpoint::new("example.org", port)
        );
        assert_eq!(command.probe.timeout(&config), Duration::from_secs(timeout));
        Ok(())
    }

    #[test]
    fn fromspki_reads_stdin_by_default() -> TestResult {
        let cli = Cli::try_parse_from(["sshid", "fromspki"])?;
        assert!(matches!(
            cli.command,
            Command::FromSpki(FromSpkiCommand { input: None })
        ));
        Ok(())
    }

    #[rstest]
    #[case::line(
        OutputFormat::Line,
        "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIPu1TqZTnE2574YCR5bNiw03wd0vbsaribTbz+LM4pdd"
    )]
    #[case::known_hosts(
        OutputFormat::KnownHosts,
        "[127.0.0.1]:2222 ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIPu1TqZTnE2574YCR5bNiw03wd0vbsaribTbz+LM4pdd"
    )]
    fn render(#[case] format: OutputFormat, #[case] expected: &str) -> TestResult {
        let record = HostKeyRecord::new(
            HostEndpoint::new("127.0.0.1", 2222),
            "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIPu1TqZTnE2574YCR5bNiw03wd0vbsaribTbz+LM4pdd"
                .parse()?,
        );
        assert_eq!(format.render(&record)?, expected);
        Ok(())
    }
}
