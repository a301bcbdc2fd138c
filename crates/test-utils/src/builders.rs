#![allow(dead_code)]

use multi::engine::{LocalRun, RemoteRun};
use multi::exec::RemoteOptions;
use multi::hosts::HostList;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Builder for `LocalRun` to simplify test setup.
pub struct LocalRunBuilder {
    run: LocalRun,
}

impl LocalRunBuilder {
    pub fn new(argv: &[&str]) -> Self {
        Self {
            run: LocalRun {
                argv: strings(argv),
                ..LocalRun::default()
            },
        }
    }

    pub fn count(mut self, count: usize) -> Self {
        self.run.count = Some(count);
        self
    }

    pub fn input(mut self, lines: &[&str]) -> Self {
        self.run.input = Some(strings(lines));
        self
    }

    pub fn quiet(mut self, val: bool) -> Self {
        self.run.quiet = val;
        self
    }

    pub fn build(self) -> LocalRun {
        self.run
    }
}

/// Builder for `RemoteRun`.
pub struct RemoteRunBuilder {
    run: RemoteRun,
}

impl RemoteRunBuilder {
    /// `hosts` is host list file text, e.g. `"h1\nh2:2222\n"`.
    pub fn new(hosts: &str, args: &[&str]) -> Self {
        Self {
            run: RemoteRun {
                hosts: HostList::parse(hosts).expect("valid host list in test"),
                args: strings(args),
                count: None,
                input: None,
                options: RemoteOptions {
                    quiet: false,
                    prefix: true,
                },
            },
        }
    }

    pub fn count(mut self, count: usize) -> Self {
        self.run.count = Some(count);
        self
    }

    pub fn input(mut self, lines: &[&str]) -> Self {
        self.run.input = Some(strings(lines));
        self
    }

    pub fn quiet(mut self, val: bool) -> Self {
        self.run.options.quiet = val;
        self
    }

    pub fn prefix(mut self, val: bool) -> Self {
        self.run.options.prefix = val;
        self
    }

    pub fn build(self) -> RemoteRun {
        self.run
    }
}
