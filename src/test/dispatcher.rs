use crate::dispatch::{Dispatcher, chunk_size, dispatch};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Barrier, Mutex};
use std::thread;
use std::time::Duration;

#[test]
fn chunk_size_splits_evenly_only_when_targets_exceed_concurrency() {
    assert_eq!(chunk_size(100, 32), 4);
    assert_eq!(chunk_size(64, 32), 2);
    assert_eq!(chunk_size(65, 32), 3);
    assert_eq!(chunk_size(32, 32), 1);
    assert_eq!(chunk_size(5, 32), 1);
    assert_eq!(chunk_size(0, 8), 1);
    // zero concurrency is clamped to one worker
    assert_eq!(chunk_size(10, 0), 10);
}

#[test]
fn output_order_matches_input_order_regardless_of_completion_order() {
    let targets: Vec<u32> = (0..40).rev().collect();
    for concurrency in [1, 3, 7, 64] {
        let results = dispatch(
            &targets,
            |t| {
                // later chunks finish first
                thread::sleep(Duration::from_millis(u64::from(*t % 5)));
                Some(t * 10)
            },
            concurrency,
        );
        let seen: Vec<(u32, u32)> = results
            .iter()
            .map(|(t, r)| (*t, *r.expect("worker always succeeds")))
            .collect();
        let expected: Vec<(u32, u32)> = targets.iter().map(|t| (*t, t * 10)).collect();
        assert_eq!(seen, expected, "concurrency={concurrency}");
    }
}

#[test]
fn every_target_is_processed_exactly_once() {
    let targets: Vec<u32> = (1..=57).collect();
    let calls: Mutex<HashMap<u32, usize>> = Mutex::new(HashMap::new());

    let results = Dispatcher::new(8).run(&targets, |t| {
        *calls.lock().unwrap().entry(*t).or_default() += 1;
        Some(*t)
    });

    let calls = calls.into_inner().unwrap();
    assert_eq!(calls.len(), targets.len());
    assert!(calls.values().all(|&n| n == 1), "calls: {calls:?}");
    assert_eq!(results.len(), targets.len());
    for t in &targets {
        assert_eq!(results.get(t), Some(t));
    }
}

#[test]
fn failing_targets_do_not_abort_the_batch() {
    let targets: Vec<u32> = (0..20).collect();
    let results = dispatch(
        &targets,
        |t| if t % 2 == 1 { None } else { Some(t.to_string()) },
        3,
    );

    for t in &targets {
        assert!(results.contains(t), "target {t} was never processed");
        if t % 2 == 1 {
            assert!(results.get(t).is_none());
        } else {
            assert_eq!(results.get(t).map(String::as_str), Some(t.to_string().as_str()));
        }
    }
}

#[test]
fn in_flight_workers_never_exceed_concurrency() {
    let targets: Vec<u32> = (0..12).collect();
    let in_flight = AtomicUsize::new(0);
    let peak = AtomicUsize::new(0);

    dispatch(
        &targets,
        |_| {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(5));
            in_flight.fetch_sub(1, Ordering::SeqCst);
            Some(())
        },
        3,
    );

    let peak = peak.load(Ordering::SeqCst);
    assert!(peak >= 1 && peak <= 3, "peak in-flight workers: {peak}");
}

#[test]
fn workers_run_concurrently_while_blocked() {
    // Both workers must be inside their call at the same time for the barrier to release.
    let targets = vec![1_u32, 2];
    let barrier = Barrier::new(2);
    let results = dispatch(
        &targets,
        |t| {
            barrier.wait();
            Some(*t)
        },
        2,
    );
    assert_eq!(results.get(&1), Some(&1));
    assert_eq!(results.get(&2), Some(&2));
}

#[test]
fn duplicate_targets_collapse_in_ordered_output() {
    let targets = vec![5_u32, 3, 5, 9];
    let results = dispatch(&targets, |t| Some(t + 1), 4);
    assert_eq!(results.iter().count(), 4);

    let ordered = results.into_ordered();
    assert_eq!(
        ordered,
        vec![(5, Some(6)), (3, Some(4)), (9, Some(10))],
        "first-occurrence order expected"
    );
}

#[test]
fn empty_target_list_yields_empty_results() {
    let targets: Vec<u32> = Vec::new();
    let results = dispatch(&targets, |t| Some(*t), 4);
    assert!(results.is_empty());
    assert!(results.into_ordered().is_empty());
}
