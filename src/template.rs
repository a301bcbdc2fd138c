// src/template.rs

//! Per-job command template substitution.
//!
//! Supported tokens:
//!
//! - `%t`: the job's thread id in decimal
//! - `%i`: the job's input item, verbatim
//! - `%%`: a literal `%`
//!
//! A `%` followed by anything else is dropped together with that character,
//! and a lone `%` at the very end is dropped. The scanner never errors.

#[derive(Clone, Copy)]
enum ScanState {
    Plain,
    PendingEscape,
}

/// Substitute `%t`, `%i` and `%%` in `template`.
///
/// Operates on `char`s, so multi-byte input passes through intact.
pub fn format(template: &str, thread_id: usize, item: &str) -> String {
    let mut out = String::with_capacity(template.len() + item.len());
    let mut state = ScanState::Plain;

    for c in template.chars() {
        state = match (state, c) {
            (ScanState::Plain, '%') => ScanState::PendingEscape,
            (ScanState::Plain, other) => {
                out.push(other);
                ScanState::Plain
            }
            (ScanState::PendingEscape, token) => {
                match token {
                    't' => out.push_str(&thread_id.to_string()),
                    'i' => out.push_str(item),
                    '%' => out.push('%'),
                    _ => {}
                }
                ScanState::Plain
            }
        };
    }

    out
}

/// Format each argument of an argv template independently.
pub fn format_all(args: &[String], thread_id: usize, item: &str) -> Vec<String> {
    args.iter().map(|a| format(a, thread_id, item)).collect()
}
