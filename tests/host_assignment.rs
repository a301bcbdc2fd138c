// tests/host_assignment.rs

use std::path::Path;

use multi::errors::MultiError;
use multi::fs::mock::MockFileSystem;
use multi::hosts::{reconcile_remote, HostAddr, HostAssignment, HostList, DEFAULT_SSH_PORT};

mod common;
use crate::common::strings;

#[test]
fn test_bare_host_gets_default_port() {
    let addr: HostAddr = "h1".parse().unwrap();
    assert_eq!(addr, HostAddr::new("h1", DEFAULT_SSH_PORT));
    assert_eq!(addr.to_string(), "h1:22");
}

#[test]
fn test_explicit_port_is_kept() {
    let addr: HostAddr = "10.0.0.5:2222".parse().unwrap();
    assert_eq!(addr, HostAddr::new("10.0.0.5", 2222));
}

#[test]
fn test_ipv6_forms() {
    let bracketed: HostAddr = "[::1]:2200".parse().unwrap();
    assert_eq!(bracketed, HostAddr::new("::1", 2200));
    assert_eq!(bracketed.to_string(), "[::1]:2200");

    let bare: HostAddr = "fe80::1".parse().unwrap();
    assert_eq!(bare, HostAddr::new("fe80::1", 22));

    let bracketed_no_port: HostAddr = "[::1]".parse().unwrap();
    assert_eq!(bracketed_no_port.port, 22);
}

#[test]
fn test_bad_port_is_config_error() {
    match "h1:notaport".parse::<HostAddr>() {
        Err(MultiError::InvalidHost { entry, reason }) => {
            assert_eq!(entry, "h1:notaport");
            assert!(reason.contains("bad port"));
        }
        other => panic!("Expected InvalidHost, got: {:?}", other),
    }
    assert!(":22".parse::<HostAddr>().is_err());
}

#[test]
fn test_host_list_parse_skips_blank_lines() {
    let list = HostList::parse("h1\n\n  h2:2022  \nh3").unwrap();
    let hosts: Vec<String> = list.iter().map(|h| h.to_string()).collect();
    assert_eq!(hosts, vec!["h1:22", "h2:2022", "h3:22"]);
}

#[test]
fn test_jobs_are_grouped_contiguously_by_host() {
    let list = HostList::parse("h1\nh2\n").unwrap();
    let assignment = HostAssignment::new(list, 2).unwrap();

    assert_eq!(assignment.job_count(), 4);
    let hosts: Vec<&str> = (0..4)
        .map(|i| assignment.host_for(i).unwrap().host.as_str())
        .collect();
    assert_eq!(hosts, vec!["h1", "h1", "h2", "h2"]);
    assert!(assignment.host_for(4).is_none());
}

#[test]
fn test_empty_host_list_is_config_error() {
    let result = HostAssignment::new(HostList::default(), 1);
    assert!(matches!(result, Err(MultiError::ConfigError(_))));
}

#[test]
fn test_remote_reconcile_uses_count_times_hosts() {
    let list = HostList::parse("h1\nh2\nh3\n").unwrap();
    let (jobs, assignment) = reconcile_remote(Some(2), None, list).unwrap();
    assert_eq!(jobs.len(), 6);
    assert_eq!(assignment.per_host(), 2);
    assert!(jobs.iter().all(|j| j.item.is_empty()));
}

#[test]
fn test_remote_reconcile_defaults_to_one_job_per_host() {
    let list = HostList::parse("h1\nh2\n").unwrap();
    let (jobs, _) = reconcile_remote(None, None, list).unwrap();
    assert_eq!(jobs.len(), 2);
}

#[test]
fn test_remote_reconcile_fills_items_from_input() {
    let list = HostList::parse("h1\nh2\n").unwrap();
    let (jobs, _) = reconcile_remote(Some(2), Some(strings(&["a", "b", "c"])), list).unwrap();
    assert_eq!(jobs.items(), vec!["a", "b", "c", ""]);
}

#[test]
fn test_remote_reconcile_rejects_more_lines_than_jobs() {
    let list = HostList::parse("h1\n").unwrap();
    let result = reconcile_remote(Some(1), Some(strings(&["a", "b"])), list);
    match result {
        Err(MultiError::ConfigError(msg)) => assert!(msg.contains("raise --count")),
        other => panic!("Expected ConfigError, got: {:?}", other.map(|(j, _)| j)),
    }
}

#[test]
fn test_load_host_list_through_filesystem() {
    let fs = MockFileSystem::new();
    fs.add_file("hosts.txt", "web1\nweb2:2200\n");

    let list = HostList::load(&fs, Path::new("hosts.txt")).unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list.get(1), Some(&HostAddr::new("web2", 2200)));
}

#[test]
fn test_missing_host_list_file_is_config_error() {
    let fs = MockFileSystem::new();
    match HostList::load(&fs, Path::new("nope.txt")) {
        Err(MultiError::HostList { path, .. }) => assert_eq!(path, Path::new("nope.txt")),
        other => panic!("Expected HostList error, got: {:?}", other),
    }
}

#[test]
fn test_blank_host_list_file_is_config_error() {
    let fs = MockFileSystem::new();
    fs.add_file("hosts.txt", "\n  \n");
    assert!(matches!(
        HostList::load(&fs, Path::new("hosts.txt")),
        Err(MultiError::NoHosts(_))
    ));
}
