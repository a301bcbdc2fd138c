// tests/dispatcher.rs

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Barrier;

use multi::dispatch::{executor_fn, Dispatcher};
use multi::errors::JobError;
use multi::input::reconcile;
use multi::types::Job;

mod common;
use crate::common::{init_tracing, strings, with_timeout};

fn failure(job: &Job) -> JobError {
    JobError::NoHost {
        thread_id: job.thread_id,
    }
}

#[tokio::test]
async fn test_all_jobs_succeed_returns_no_errors() {
    init_tracing();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);

    let executor = Arc::new(executor_fn(move |job: Job| {
        let recorder = Arc::clone(&recorder);
        async move {
            recorder.lock().unwrap().push((job.thread_id, job.item));
            Ok(())
        }
    }));

    let jobs = reconcile(None, Some(strings(&["a", "b", "c"])));
    let errors = with_timeout(Dispatcher::new().run_all(jobs, executor)).await;

    assert!(errors.is_empty());
    let mut seen = seen.lock().unwrap().clone();
    seen.sort();
    assert_eq!(
        seen,
        vec![(0, "a".to_string()), (1, "b".to_string()), (2, "c".to_string())]
    );
}

#[tokio::test]
async fn test_exactly_failed_jobs_are_reported() {
    init_tracing();
    // Odd thread ids fail; completion order is scrambled by sleeping.
    let executor = Arc::new(executor_fn(|job: Job| async move {
        tokio::time::sleep(Duration::from_millis(((10 - job.thread_id) * 5) as u64)).await;
        if job.thread_id % 2 == 1 {
            Err(failure(&job))
        } else {
            Ok(())
        }
    }));

    let errors = with_timeout(Dispatcher::new().run_all(reconcile(Some(10), None), executor)).await;

    assert_eq!(errors.len(), 5);
    let failed: HashSet<usize> = errors
        .iter()
        .map(|e| match e {
            JobError::NoHost { thread_id } => *thread_id,
            other => panic!("unexpected error: {other}"),
        })
        .collect();
    assert_eq!(failed, HashSet::from([1, 3, 5, 7, 9]));
}

#[tokio::test]
async fn test_waits_for_every_job_to_complete() {
    let completed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&completed);

    let executor = Arc::new(executor_fn(move |job: Job| {
        let counter = Arc::clone(&counter);
        async move {
            tokio::time::sleep(Duration::from_millis(20 + job.thread_id as u64)).await;
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }));

    let errors = with_timeout(Dispatcher::new().run_all(reconcile(Some(25), None), executor)).await;

    assert!(errors.is_empty());
    assert_eq!(completed.load(Ordering::SeqCst), 25);
}

#[tokio::test]
async fn test_jobs_run_concurrently() {
    // Every job waits on a barrier sized to the whole run; this only
    // completes if all jobs are in flight at the same time.
    let barrier = Arc::new(Barrier::new(8));
    let shared = Arc::clone(&barrier);

    let executor = Arc::new(executor_fn(move |_job: Job| {
        let barrier = Arc::clone(&shared);
        async move {
            barrier.wait().await;
            Ok(())
        }
    }));

    let errors = with_timeout(Dispatcher::new().run_all(reconcile(Some(8), None), executor)).await;
    assert!(errors.is_empty());
}

#[tokio::test]
async fn test_panicking_job_becomes_error() {
    let executor = Arc::new(executor_fn(|job: Job| async move {
        if job.thread_id == 2 {
            panic!("boom in job");
        }
        Ok(())
    }));

    let errors = with_timeout(Dispatcher::new().run_all(reconcile(Some(4), None), executor)).await;

    assert_eq!(errors.len(), 1);
    match &errors[0] {
        JobError::Panicked { thread_id, message } => {
            assert_eq!(*thread_id, 2);
            assert!(message.contains("boom in job"));
        }
        other => panic!("Expected Panicked, got: {other}"),
    }
}

#[tokio::test]
async fn test_empty_job_set_returns_immediately() {
    let executor = Arc::new(executor_fn(|_job: Job| async { Ok(()) }));
    let errors = Dispatcher::new()
        .run_all(multi::types::JobSet::default(), executor)
        .await;
    assert!(errors.is_empty());
}
