use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use multi::exec::remote::{RemoteShell, SessionEvent, ShellError, ShellFuture};
use multi::hosts::HostAddr;

/// What the fake does when asked to run a command on a host.
#[derive(Debug, Clone)]
pub enum Script {
    /// Print the command itself as one stdout line, then exit 0.
    Echo,
    /// Replay these events verbatim.
    Events(Vec<SessionEvent>),
    /// Fail to connect with this message.
    ConnectError(String),
    /// Connect, then fail to open a session with this message.
    SessionError(String),
}

/// A scripted `RemoteShell` that:
/// - records every `(host, command)` it was asked to run
/// - answers per host label (`"h1:22"`), falling back to a default script.
#[derive(Clone)]
pub struct FakeShell {
    scripts: HashMap<String, Script>,
    default: Script,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeShell {
    pub fn new(default: Script) -> Self {
        Self {
            scripts: HashMap::new(),
            default,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn echo() -> Self {
        Self::new(Script::Echo)
    }

    pub fn with_host(mut self, host_label: &str, script: Script) -> Self {
        self.scripts.insert(host_label.to_string(), script);
        self
    }

    /// Every `(host, command)` executed so far, in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    fn script_for(&self, host_label: &str) -> Script {
        self.scripts
            .get(host_label)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }
}

impl RemoteShell for FakeShell {
    fn exec<'a>(&'a self, host: &'a HostAddr, command: &'a str) -> ShellFuture<'a> {
        Box::pin(async move {
            let label = host.to_string();
            self.calls
                .lock()
                .unwrap()
                .push((label.clone(), command.to_string()));

            let events = match self.script_for(&label) {
                Script::Echo => vec![
                    SessionEvent::Stdout(format!("{command}\n").into_bytes()),
                    SessionEvent::Exit(0),
                ],
                Script::Events(events) => events,
                Script::ConnectError(msg) => return Err(ShellError::Connect(msg.into())),
                Script::SessionError(msg) => return Err(ShellError::Session(msg.into())),
            };

            let (tx, rx) = mpsc::channel(events.len().max(1));
            for event in events {
                tx.try_send(event).expect("fake shell channel sized for all events");
            }
            Ok(rx)
        })
    }
}
