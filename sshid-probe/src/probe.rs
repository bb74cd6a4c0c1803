//! Discovery of SSH host keys by a deliberately aborted handshake.
//!
//! The probe connects to an SSH server and runs the transport layer handshake only until the
//! server has presented its host key. The key is taken from the host key verification callback,
//! which then fails on purpose so that the handshake ends before any user authentication.
//!
//! # Examples
//!
//! ```no_run
//! # async fn probe() -> testresult::TestResult {
//! use sshid_probe::{HostEndpoint, ProbeOptions, probe_host_key};
//! use tokio_util::sync::CancellationToken;
//!
//! let options = ProbeOptions::default().host_key_algorithms(["ssh-ed25519"]);
//! let record = probe_host_key(
//!     &HostEndpoint::new("example.org", 22),
//!     &options,
//!     &CancellationToken::new(),
//! )
//! .await?;
//! println!("{}", record.known_hosts_entry());
//! # Ok(()) }
//! ```

use std::{borrow::Cow, sync::Arc, time::Duration};

use log::{debug, warn};
use russh::{
    Preferred,
    client,
    keys::{Algorithm, PublicKey},
};
use sshid_common::SshKeyLine;
use tokio::{net::TcpStream, sync::oneshot};
use tokio_util::sync::CancellationToken;

use crate::{Error, HostEndpoint, HostKeyRecord, stream::CancellableStream};

/// Options for a host key probe.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use sshid_probe::ProbeOptions;
///
/// let options = ProbeOptions::default()
///     .host_key_algorithms(["ssh-ed25519", "ecdsa-sha2-nistp256"])
///     .inactivity_timeout(Duration::from_secs(10));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ProbeOptions {
    host_key_algorithms: Vec<String>,
    inactivity_timeout: Option<Duration>,
}

impl ProbeOptions {
    /// Sets the acceptable host key algorithms in order of preference.
    ///
    /// The server's key for the first algorithm both sides support is captured.
    /// If no algorithms are set, the default order of the SSH library is used.
    pub fn host_key_algorithms(
        mut self,
        algorithms: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.host_key_algorithms = algorithms.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the time after which an idle connection is dropped by the SSH library.
    pub fn inactivity_timeout(mut self, timeout: Duration) -> Self {
        self.inactivity_timeout = Some(timeout);
        self
    }

    /// Returns the parsed host key algorithms.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the names is not a known, plain (non-certificate) SSH host key
    /// algorithm.
    fn algorithms(&self) -> Result<Vec<Algorithm>, Error> {
        self.host_key_algorithms
            .iter()
            .map(|name| match Algorithm::new(name) {
                Ok(Algorithm::Other(_)) | Err(_) => Err(Error::InvalidOptions(format!(
                    "Unknown host key algorithm {name:?}"
                ))),
                Ok(algorithm) => Ok(algorithm),
            })
            .collect()
    }

    /// Creates the SSH client configuration for a probe.
    fn client_config(&self) -> Result<client::Config, Error> {
        let algorithms = self.algorithms()?;
        let preferred = if algorithms.is_empty() {
            Preferred::default()
        } else {
            Preferred {
                key: Cow::Owned(algorithms),
                ..Preferred::default()
            }
        };
        Ok(client::Config {
            preferred,
            inactivity_timeout: self.inactivity_timeout,
            ..Default::default()
        })
    }
}

/// The error used to end the handshake from within the SSH session.
#[derive(Debug, thiserror::Error)]
enum Abort {
    /// The host key has been captured and the handshake is aborted on purpose.
    #[error("Host key captured, aborting handshake")]
    HostKeyCaptured,

    /// The SSH transport failed.
    #[error(transparent)]
    Ssh(#[from] russh::Error),
}

/// A client handler that captures the host key offered by the server and rejects it.
#[derive(Debug)]
struct KeyCapture {
    sender: Option<oneshot::Sender<PublicKey>>,
}

impl client::Handler for KeyCapture {
    type Error = Abort;

    async fn check_server_key(&mut self, server_public_key: &PublicKey) -> Result<bool, Abort> {
        if let Some(sender) = self.sender.take() {
            // the receiver only goes away if the probe itself is gone
            let _ = sender.send(server_public_key.clone());
        }
        Err(Abort::HostKeyCaptured)
    }
}

/// Discovers the host key of the SSH server at `endpoint`.
///
/// Connects to `endpoint`, runs the SSH handshake up to the host key verification and aborts it
/// there. No authentication is attempted. Only the host key for the first host key algorithm
/// negotiated with the server is captured.
///
/// The TCP connection is closed on all exit paths, including when the returned future is dropped.
///
/// # Errors
///
/// Returns an error if
/// - `options` contain unknown host key algorithms,
/// - the TCP connection can not be established,
/// - the SSH handshake fails before the server presents a host key (e.g. because there is no
///   common host key algorithm or the peer does not speak SSH),
/// - the handshake ends in an unexpected state,
/// - the captured key can not be encoded,
/// - or `cancel` is cancelled before the probe completes.
pub async fn probe_host_key(
    endpoint: &HostEndpoint,
    options: &ProbeOptions,
    cancel: &CancellationToken,
) -> Result<HostKeyRecord, Error> {
    let config = Arc::new(options.client_config()?);
    let connection = cancel.child_token();
    let _guard = connection.clone().drop_guard();

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!("Probing {endpoint} has been cancelled");
            Err(Error::Cancelled)
        }
        result = run_probe(endpoint, config, connection) => result,
    }
}

/// Connects to `endpoint` and captures its host key.
async fn run_probe(
    endpoint: &HostEndpoint,
    config: Arc<client::Config>,
    connection: CancellationToken,
) -> Result<HostKeyRecord, Error> {
    debug!("Connecting to {endpoint}");
    let stream = TcpStream::connect((endpoint.host(), endpoint.port()))
        .await
        .map_err(|source| Error::Dial {
            endpoint: endpoint.clone(),
            source,
        })?;
    let stream = CancellableStream::new(stream, connection);

    let (sender, mut receiver) = oneshot::channel();
    let result = client::connect_stream(
        config,
        stream,
        KeyCapture {
            sender: Some(sender),
        },
    )
    .await;

    if let Ok(key) = receiver.try_recv() {
        let public_key = SshKeyLine::new(key.algorithm().as_str(), key.to_bytes()?);
        warn!(
            host = endpoint.host(),
            port = endpoint.port(),
            key:% = public_key;
            "Captured a new SSH host key"
        );
        return Ok(HostKeyRecord::new(endpoint.clone(), public_key));
    }

    match result {
        Err(Abort::Ssh(error)) => Err(Error::Handshake(error)),
        Err(Abort::HostKeyCaptured) => Err(Error::InternalInvariant {
            reason: "the handshake was aborted but no host key has been captured",
        }),
        Ok(_) => Err(Error::InternalInvariant {
            reason: "the handshake completed without host key verification",
        }),
    }
}
