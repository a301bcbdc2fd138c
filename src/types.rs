// src/types.rs

//! Job model shared by the reconciler, dispatcher and executors.

/// One scheduled unit of work.
///
/// `thread_id` is a dense zero-based index into the run. It is not stable
/// across invocations: the same input line may get a different id next time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub thread_id: usize,
    /// Input line for this index, or `""` when there is none.
    pub item: String,
}

impl Job {
    pub fn new(thread_id: usize, item: impl Into<String>) -> Self {
        Self {
            thread_id,
            item: item.into(),
        }
    }
}

/// Ordered, immutable set of jobs for one run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobSet {
    jobs: Vec<Job>,
}

impl JobSet {
    /// Build a job set of `count` jobs, taking items from `items` by index
    /// and padding with empty items past its end.
    ///
    /// Items beyond `count` are ignored; callers that must not lose input
    /// check the length first.
    pub fn from_items(count: usize, items: &[String]) -> Self {
        let jobs = (0..count)
            .map(|tid| Job::new(tid, items.get(tid).cloned().unwrap_or_default()))
            .collect();
        Self { jobs }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    /// Items in thread id order.
    pub fn items(&self) -> Vec<&str> {
        self.jobs.iter().map(|j| j.item.as_str()).collect()
    }
}

impl IntoIterator for JobSet {
    type Item = Job;
    type IntoIter = std::vec::IntoIter<Job>;

    fn into_iter(self) -> Self::IntoIter {
        self.jobs.into_iter()
    }
}
