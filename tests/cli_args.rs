// tests/cli_args.rs

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use multi::cli::{CliArgs, Command, LogLevel};
use multi::logging::resolve_level;

#[test]
fn test_exec_parses_trailing_command() {
    let args = CliArgs::try_parse_from(["multi", "exec", "-i", "-c", "4", "--", "echo", "-n", "%i"]).unwrap();
    match args.command {
        Command::Exec(exec) => {
            assert!(exec.common.input);
            assert_eq!(exec.common.count, Some(4));
            assert!(!exec.common.quiet);
            assert_eq!(exec.command, vec!["echo", "-n", "%i"]);
        }
        other => panic!("Expected exec, got: {:?}", other),
    }
}

#[test]
fn test_exec_alias_and_default_count() {
    let args = CliArgs::try_parse_from(["multi", "e", "-q", "--", "true"]).unwrap();
    match args.command {
        Command::Exec(exec) => {
            assert!(exec.common.quiet);
            assert_eq!(exec.common.count, None);
        }
        other => panic!("Expected exec, got: {:?}", other),
    }
}

#[test]
fn test_exec_requires_command() {
    assert!(CliArgs::try_parse_from(["multi", "exec"]).is_err());
}

#[test]
fn test_ssh_parses_host_file_and_command() {
    let args = CliArgs::try_parse_from([
        "multi", "s", "-t", "30s", "-u", "root", "-p", "secret", "-n", "-c", "2", "--", "hosts.txt",
        "uname", "-a",
    ])
    .unwrap();
    match args.command {
        Command::Ssh(ssh) => {
            assert_eq!(ssh.timeout, Some(Duration::from_secs(30)));
            assert_eq!(ssh.username.as_deref(), Some("root"));
            assert_eq!(ssh.password.as_deref(), Some("secret"));
            assert!(ssh.no_agent);
            assert!(!ssh.no_prefix);
            assert_eq!(ssh.common.count, Some(2));
            assert_eq!(ssh.host_list_file(), Some(PathBuf::from("hosts.txt")));
            assert_eq!(ssh.command(), ["uname".to_string(), "-a".to_string()]);
        }
        other => panic!("Expected ssh, got: {:?}", other),
    }
}

#[test]
fn test_ssh_with_host_file_only_has_no_command() {
    let args = CliArgs::try_parse_from(["multi", "ssh", "--", "hosts.txt"]).unwrap();
    match args.command {
        Command::Ssh(ssh) => assert!(ssh.command().is_empty()),
        other => panic!("Expected ssh, got: {:?}", other),
    }
}

#[test]
fn test_ssh_rejects_bad_timeout() {
    assert!(CliArgs::try_parse_from(["multi", "ssh", "-t", "soon", "--", "h", "ls"]).is_err());
}

#[test]
fn test_global_flags() {
    let args = CliArgs::try_parse_from([
        "multi", "--log-level", "debug", "--config", "/etc/multi.toml", "exec", "--", "true",
    ])
    .unwrap();
    assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    assert_eq!(args.config, Some(PathBuf::from("/etc/multi.toml")));
}

#[test]
fn test_log_level_priority() {
    assert_eq!(resolve_level(Some(LogLevel::Trace), Some("error")), tracing::Level::TRACE);
    assert_eq!(resolve_level(None, Some("debug")), tracing::Level::DEBUG);
    assert_eq!(resolve_level(None, Some("warning")), tracing::Level::WARN);
    assert_eq!(resolve_level(None, Some("bogus")), tracing::Level::WARN);
    assert_eq!(resolve_level(None, None), tracing::Level::WARN);
}
