// tests/ssh_auth.rs

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::{tempdir, NamedTempFile};

use multi::config::SshSettings;
use multi::errors::MultiError;
use multi::exec::{select_agent_socket, SshAuth};

fn settings() -> SshSettings {
    SshSettings {
        username: "deploy".to_string(),
        password: None,
        identity: None,
        no_agent: false,
        no_prefix: false,
        timeout: Duration::from_secs(60),
    }
}

fn socket() -> Option<PathBuf> {
    Some(PathBuf::from("/run/user/1000/agent.sock"))
}

#[test]
fn test_no_credentials_and_no_socket_is_rejected() {
    match select_agent_socket(&settings(), None) {
        Err(MultiError::Credentials(msg)) => assert!(msg.contains("SSH_AUTH_SOCK")),
        other => panic!("Expected Credentials error, got: {:?}", other),
    }
}

#[test]
fn test_agent_required_without_explicit_auth_even_when_disabled() {
    let mut s = settings();
    s.no_agent = true;
    assert_eq!(select_agent_socket(&s, socket()).unwrap(), socket());
}

#[test]
fn test_password_with_socket_uses_agent_unless_disabled() {
    let mut s = settings();
    s.password = Some("hunter2".to_string());
    assert_eq!(select_agent_socket(&s, socket()).unwrap(), socket());
    assert_eq!(select_agent_socket(&s, None).unwrap(), None);

    s.no_agent = true;
    assert_eq!(select_agent_socket(&s, socket()).unwrap(), None);
}

#[tokio::test]
async fn test_password_without_agent_prepares_offline() {
    let mut s = settings();
    s.password = Some("hunter2".to_string());
    s.no_agent = true;

    let auth = SshAuth::prepare(&s, socket()).await.unwrap();
    assert!(!auth.uses_agent());
    assert_eq!(auth.username, "deploy");
}

#[tokio::test]
async fn test_missing_identity_file_is_rejected() {
    let dir = tempdir().unwrap();
    let mut s = settings();
    s.identity = Some(dir.path().join("id_missing"));
    s.no_agent = true;

    match SshAuth::prepare(&s, None).await {
        Err(MultiError::Credentials(msg)) => assert!(msg.contains("id_missing")),
        other => panic!("Expected Credentials error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_garbage_identity_file_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "this is not a private key").unwrap();
    let mut s = settings();
    s.identity = Some(file.path().to_path_buf());
    s.no_agent = true;

    assert!(matches!(
        SshAuth::prepare(&s, None).await,
        Err(MultiError::Credentials(_))
    ));
}

#[cfg(unix)]
#[tokio::test]
async fn test_unreachable_agent_fails_before_any_job() {
    let dir = tempdir().unwrap();
    let dead = dir.path().join("agent.sock");

    match SshAuth::prepare(&settings(), Some(dead)).await {
        Err(MultiError::Credentials(msg)) => assert!(msg.contains("connecting to ssh agent")),
        other => panic!("Expected Credentials error, got: {:?}", other),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_agent_that_hangs_up_fails_before_any_job() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("agent.sock");
    let listener = tokio::net::UnixListener::bind(&path).unwrap();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            drop(stream);
        }
    });

    match SshAuth::prepare(&settings(), Some(path)).await {
        Err(MultiError::Credentials(msg)) => assert!(msg.contains("ssh agent")),
        other => panic!("Expected Credentials error, got: {:?}", other),
    }
}
