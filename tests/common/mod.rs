#![allow(dead_code)]

pub use multi_test_utils::builders;
pub use multi_test_utils::fake_shell;
pub use multi_test_utils::{init_tracing, with_timeout};

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
