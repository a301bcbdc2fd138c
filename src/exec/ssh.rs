// src/exec/ssh.rs

//! `russh`-backed implementation of [`RemoteShell`].
//!
//! Authentication material, including the agent's identity list, is
//! prepared once by [`SshAuth::prepare`] before any job starts. Every job
//! then opens its own connection and session, and its own agent connection
//! for signing.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use russh::client;
use russh::{ChannelMsg, Disconnect};
use russh_keys::key;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::config::SshSettings;
use crate::errors::{MultiError, Result};
use crate::exec::remote::{RemoteShell, SessionEvent, ShellError, ShellFuture};
use crate::hosts::HostAddr;

const EVENT_BUFFER: usize = 64;

/// Identities the ssh-agent offered at startup.
#[derive(Debug, Clone)]
pub struct AgentIdentities {
    pub socket: PathBuf,
    pub identities: Vec<key::PublicKey>,
}

/// Credentials resolved at startup and shared read-only by every job.
#[derive(Clone)]
pub struct SshAuth {
    pub username: String,
    password: Option<String>,
    key: Option<Arc<key::KeyPair>>,
    agent: Option<AgentIdentities>,
}

impl std::fmt::Debug for SshAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SshAuth")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("key", &self.key.as_ref().map(|_| "<loaded>"))
            .field("agent", &self.agent.as_ref().map(|a| &a.socket))
            .finish()
    }
}

/// Decide which agent socket, if any, a run authenticates with.
///
/// The agent is required when neither a password nor an identity was
/// given, and then `no_agent` is ignored. Otherwise it is used when a
/// socket is known and the agent was not disabled.
pub fn select_agent_socket(
    settings: &SshSettings,
    agent_socket: Option<PathBuf>,
) -> Result<Option<PathBuf>> {
    if settings.identity.is_none() && settings.password.is_none() {
        return agent_socket.map(Some).ok_or_else(|| {
            MultiError::Credentials(
                "no password or identity given and SSH_AUTH_SOCK is not set".to_string(),
            )
        });
    }
    if settings.no_agent {
        return Ok(None);
    }
    Ok(agent_socket)
}

impl SshAuth {
    /// Load the identity key and query the agent, once, before any job runs.
    ///
    /// An unreadable key or an agent that cannot be reached is a
    /// [`MultiError::Credentials`] error.
    pub async fn prepare(settings: &SshSettings, agent_socket: Option<PathBuf>) -> Result<Self> {
        let socket = select_agent_socket(settings, agent_socket)?;

        let key = match &settings.identity {
            Some(path) => {
                let pair = russh_keys::load_secret_key(path, None).map_err(|e| {
                    MultiError::Credentials(format!(
                        "unable to read private key {}: {e}",
                        path.display()
                    ))
                })?;
                Some(Arc::new(pair))
            }
            None => None,
        };

        let agent = match socket {
            Some(socket) => {
                let identities = request_agent_identities(&socket).await?;
                debug!(socket = %socket.display(), count = identities.len(), "ssh agent identities loaded");
                Some(AgentIdentities { socket, identities })
            }
            None => None,
        };

        Ok(Self {
            username: settings.username.clone(),
            password: settings.password.clone(),
            key,
            agent,
        })
    }

    pub fn uses_agent(&self) -> bool {
        self.agent.is_some()
    }

    async fn authenticate(&self, session: &mut client::Handle<AcceptAnyHostKey>) -> std::result::Result<(), ShellError> {
        if let Some(key) = &self.key {
            let ok = session
                .authenticate_publickey(&self.username, Arc::clone(key))
                .await
                .map_err(|e| ShellError::Auth(Box::new(e)))?;
            if ok {
                return Ok(());
            }
            debug!(user = %self.username, "identity key rejected");
        }

        if let Some(password) = &self.password {
            let ok = session
                .authenticate_password(&self.username, password)
                .await
                .map_err(|e| ShellError::Auth(Box::new(e)))?;
            if ok {
                return Ok(());
            }
            debug!(user = %self.username, "password rejected");
        }

        if let Some(agent) = &self.agent {
            if self.authenticate_with_agent(session, agent).await? {
                return Ok(());
            }
        }

        Err(ShellError::Auth(
            format!("no authentication method accepted for user '{}'", self.username).into(),
        ))
    }

    /// Sign with the identities fetched at startup over a fresh agent
    /// connection.
    #[cfg(unix)]
    async fn authenticate_with_agent(
        &self,
        session: &mut client::Handle<AcceptAnyHostKey>,
        agent: &AgentIdentities,
    ) -> std::result::Result<bool, ShellError> {
        use russh_keys::agent::client::AgentClient;

        let mut signer = AgentClient::connect_uds(&agent.socket)
            .await
            .map_err(|e| ShellError::Auth(Box::new(e)))?;

        for identity in &agent.identities {
            let (returned, result) = session
                .authenticate_future(&self.username, identity.clone(), signer)
                .await;
            signer = returned;
            match result {
                Ok(true) => return Ok(true),
                Ok(false) => trace!(user = %self.username, "agent identity rejected"),
                Err(e) => warn!(user = %self.username, error = %e, "agent signing failed"),
            }
        }
        Ok(false)
    }

    #[cfg(not(unix))]
    async fn authenticate_with_agent(
        &self,
        _session: &mut client::Handle<AcceptAnyHostKey>,
        _agent: &AgentIdentities,
    ) -> std::result::Result<bool, ShellError> {
        Ok(false)
    }
}

#[cfg(unix)]
async fn request_agent_identities(socket: &Path) -> Result<Vec<key::PublicKey>> {
    use russh_keys::agent::client::AgentClient;

    let mut agent = AgentClient::connect_uds(socket).await.map_err(|e| {
        MultiError::Credentials(format!(
            "connecting to ssh agent at {}: {e}",
            socket.display()
        ))
    })?;
    agent
        .request_identities()
        .await
        .map_err(|e| MultiError::Credentials(format!("listing ssh agent identities: {e}")))
}

#[cfg(not(unix))]
async fn request_agent_identities(socket: &Path) -> Result<Vec<key::PublicKey>> {
    Err(MultiError::Credentials(format!(
        "ssh agent at {} is not supported on this platform",
        socket.display()
    )))
}

/// Client handler that accepts every server key.
pub struct AcceptAnyHostKey;

#[async_trait]
impl client::Handler for AcceptAnyHostKey {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &key::PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        Ok(true)
    }
}

/// Opens one ssh connection and session per executed command.
pub struct SshShell {
    config: Arc<client::Config>,
    auth: Arc<SshAuth>,
    connect_timeout: Duration,
}

impl SshShell {
    pub fn new(auth: Arc<SshAuth>, connect_timeout: Duration) -> Self {
        Self {
            config: Arc::new(client::Config::default()),
            auth,
            connect_timeout,
        }
    }

    async fn connect(&self, host: &HostAddr) -> std::result::Result<client::Handle<AcceptAnyHostKey>, ShellError> {
        let addr = (host.host.as_str(), host.port);
        let connecting = client::connect(Arc::clone(&self.config), addr, AcceptAnyHostKey);

        let mut session = tokio::time::timeout(self.connect_timeout, connecting)
            .await
            .map_err(|_| {
                ShellError::Connect(
                    format!("timed out after {:?}", self.connect_timeout).into(),
                )
            })?
            .map_err(|e| ShellError::Connect(Box::new(e)))?;

        self.auth.authenticate(&mut session).await?;
        Ok(session)
    }

    async fn start(
        &self,
        host: &HostAddr,
        command: &str,
    ) -> std::result::Result<mpsc::Receiver<SessionEvent>, ShellError> {
        let session = self.connect(host).await?;

        let mut channel = session
            .channel_open_session()
            .await
            .map_err(|e| ShellError::Session(Box::new(e)))?;

        channel
            .exec(true, command)
            .await
            .map_err(|e| ShellError::Exec(Box::new(e)))?;

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let host_label = host.to_string();

        tokio::spawn(async move {
            while let Some(msg) = channel.wait().await {
                let event = match msg {
                    ChannelMsg::Data { ref data } => SessionEvent::Stdout(data.to_vec()),
                    ChannelMsg::ExtendedData { ref data, ext: 1 } => {
                        SessionEvent::Stderr(data.to_vec())
                    }
                    ChannelMsg::ExitStatus { exit_status } => SessionEvent::Exit(exit_status),
                    _ => continue,
                };
                if tx.send(event).await.is_err() {
                    break;
                }
            }

            if let Err(e) = session
                .disconnect(Disconnect::ByApplication, "", "en")
                .await
            {
                debug!(host = %host_label, error = %e, "disconnect failed");
            }
        });

        Ok(rx)
    }
}

impl RemoteShell for SshShell {
    fn exec<'a>(&'a self, host: &'a HostAddr, command: &'a str) -> ShellFuture<'a> {
        Box::pin(self.start(host, command))
    }
}

/// Read the agent socket location from the environment, once, at startup.
pub fn agent_socket_from_env() -> Option<PathBuf> {
    std::env::var_os("SSH_AUTH_SOCK")
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}
