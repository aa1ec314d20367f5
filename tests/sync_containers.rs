/*!
 * Synchronized Container Integration Tests
 *
 * Cross-thread blocking/wakeup behavior of the queue and map wrappers:
 * shutdown liveness, producer/consumer handoff, and keyed updates under
 * contention.
 */

use analysis_core::{SyncMap, SyncQueue};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn blocked_pop_returns_promptly_after_invalidate() {
    let queue: Arc<SyncQueue<u32>> = Arc::new(SyncQueue::new());
    let consumer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            let start = Instant::now();
            (queue.pop(), start.elapsed())
        })
    };

    // Give the consumer time to park on the condvar.
    thread::sleep(Duration::from_millis(50));
    queue.invalidate();

    let (result, elapsed) = consumer.join().unwrap();
    assert_eq!(result, None);
    // Woken by the invalidation, not a timeout.
    assert!(elapsed < Duration::from_millis(150), "took {elapsed:?}");
}

#[test]
fn pop_blocks_until_an_element_arrives() {
    let queue = Arc::new(SyncQueue::new());
    let consumer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || queue.pop())
    };

    thread::sleep(Duration::from_millis(20));
    queue.push(99);

    assert_eq!(consumer.join().unwrap(), Some(99));
}

#[test]
fn pop_timeout_sees_elements_pushed_mid_wait() {
    let queue = Arc::new(SyncQueue::new());
    let producer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            queue.push(7);
        })
    };

    assert_eq!(queue.pop_timeout(Duration::from_secs(2)), Some(7));
    producer.join().unwrap();
}

#[test]
fn concurrent_producers_deliver_everything() {
    let queue = Arc::new(SyncQueue::new());
    let producers: Vec<_> = (0..4)
        .map(|p| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for n in 0..100 {
                    queue.push(p * 100 + n);
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    let mut drained = Vec::new();
    while let Some(item) = queue.try_pop() {
        drained.push(item);
    }
    drained.sort_unstable();
    assert_eq!(drained, (0..400).collect::<Vec<_>>());
}

#[test]
fn clear_empties_without_invalidating() {
    let queue = SyncQueue::new();
    queue.push(1);
    queue.push(2);
    queue.clear();

    assert!(queue.is_empty());
    assert!(queue.is_valid());
    queue.push(3);
    assert_eq!(queue.pop(), Some(3));
}

#[test]
fn push_if_valid_refuses_after_invalidate() {
    let queue = SyncQueue::new();
    assert_eq!(queue.push_if_valid(1), Ok(()));
    queue.invalidate();
    assert_eq!(queue.push_if_valid(2), Err(2));
    assert_eq!(queue.len(), 1);
}

#[test]
fn for_each_mutates_under_the_lock() {
    let queue = SyncQueue::new();
    for n in 0..4 {
        queue.push(n);
    }
    queue.for_each(|item| *item *= 10);

    assert_eq!(queue.pop(), Some(0));
    assert_eq!(queue.pop(), Some(10));
    assert_eq!(queue.pop(), Some(20));
    assert_eq!(queue.pop(), Some(30));
}

#[test]
fn map_updates_are_atomic_under_contention() {
    let map: Arc<SyncMap<&str, u64>> = Arc::new(SyncMap::new());
    let writers: Vec<_> = (0..8)
        .map(|_| {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                for _ in 0..1000 {
                    map.with_value("hits", |value| *value += 1);
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    assert_eq!(map.get(&"hits"), Some(8000));
}

#[test]
fn map_for_each_visits_every_entry() {
    let map = SyncMap::new();
    map.insert("a", 1);
    map.insert("b", 2);

    let mut total = 0;
    map.for_each(|_, value| total += *value);
    assert_eq!(total, 3);
}
