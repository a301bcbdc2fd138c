// tests/property_format.rs

use proptest::prelude::*;
use multi::input::reconcile;
use multi::template::format;

proptest! {
    #[test]
    fn test_templates_without_percent_are_unchanged(s in "[^%]*", tid in any::<usize>(), item in ".*") {
        prop_assert_eq!(format(&s, tid, &item), s);
    }

    #[test]
    fn test_item_token_yields_item(item in ".*", tid in 0usize..10_000) {
        prop_assert_eq!(format("%i", tid, &item), item);
    }

    #[test]
    fn test_output_never_longer_than_expansion(s in ".*", tid in 0usize..1000, item in "[a-z]{0,8}") {
        // Every char of the template produces at most itself, a digit run, or the item.
        let bound = s.chars().count() * (item.chars().count() + 4);
        prop_assert!(format(&s, tid, &item).chars().count() <= bound);
    }

    #[test]
    fn test_reconciled_count_is_max_of_count_and_lines(
        count in 0usize..20,
        lines in proptest::collection::vec("[a-z]{0,3}", 0..20),
    ) {
        let expected = count.max(1).max(lines.len());
        let jobs = reconcile(Some(count), Some(lines.clone()));
        prop_assert_eq!(jobs.len(), expected);

        for (i, job) in jobs.iter().enumerate() {
            prop_assert_eq!(job.thread_id, i);
            let want = lines.get(i).map(String::as_str).unwrap_or("");
            prop_assert_eq!(job.item.as_str(), want);
        }
    }
}
