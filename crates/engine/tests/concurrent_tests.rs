//! Concurrent/multi-threaded tests for the autocomplete index
//!
//! These verify correct behavior under actual concurrent execution:
//!
//! 1. **Linearizable score updates** - increments from many threads all
//!    land
//! 2. **Readers during churn** - queries never see duplicates, torn
//!    sizes, or panics while writers add/remove/rescore
//! 3. **Cache coherence after quiescence** - a churned, cache-enabled
//!    index agrees with a fresh uncached rebuild of its final state
//! 4. **Snapshot independence** - `entries()` results are unaffected by
//!    later mutations
//!
//! ## Running These Tests
//!
//! ```bash
//! cargo test --test concurrent_tests
//! ```

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

use typeahead_engine::{AutocompleteIndex, CacheConfig};

// ============================================================================
// Test Helpers
// ============================================================================

const NAMES: [&str; 8] = [
    "Chicago",
    "Charleston",
    "Cleveland",
    "Minneapolis",
    "Milwaukee",
    "Boston",
    "St. Paul",
    "San Antonio",
];

fn name_for(key: u32) -> String {
    NAMES[(key as usize) % NAMES.len()].to_string()
}

fn seeded_index(entries: u32) -> Arc<AutocompleteIndex<u32, String>> {
    let index: AutocompleteIndex<u32, String> = AutocompleteIndex::new();
    for key in 0..entries {
        index.add(key, name_for(key));
    }
    Arc::new(index)
}

// ============================================================================
// SECTION 1: Linearizable score updates
// ============================================================================

#[test]
fn test_concurrent_increments_all_land() {
    const THREADS: usize = 8;
    const INCREMENTS: usize = 500;

    let index = seeded_index(4);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let index = Arc::clone(&index);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..INCREMENTS {
                    index.increment(&0).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(
        index.get(&0).unwrap().score_as_int(),
        (THREADS * INCREMENTS) as i64
    );
}

#[test]
fn test_concurrent_mixed_score_updates_balance_out() {
    const THREADS: usize = 4;
    const ROUNDS: usize = 400;

    let index = seeded_index(2);
    let barrier = Arc::new(Barrier::new(THREADS * 2));

    let mut handles = Vec::new();
    for _ in 0..THREADS {
        let inc_index = Arc::clone(&index);
        let inc_barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            inc_barrier.wait();
            for _ in 0..ROUNDS {
                inc_index.increment(&1).unwrap();
            }
        }));
        let dec_index = Arc::clone(&index);
        let dec_barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            dec_barrier.wait();
            for _ in 0..ROUNDS {
                dec_index.decrement(&1).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(index.get(&1).unwrap().score_as_int(), 0);
}

// ============================================================================
// SECTION 2: Readers during churn
// ============================================================================

#[test]
fn test_readers_never_observe_torn_results() {
    const WRITERS: usize = 3;
    const READERS: usize = 4;
    const OPS: usize = 300;

    let index = seeded_index(32);
    let barrier = Arc::new(Barrier::new(WRITERS + READERS));
    let mut handles = Vec::new();

    // Writers churn disjoint key ranges: add/remove/rescore
    for writer in 0..WRITERS {
        let index = Arc::clone(&index);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            let base = 1000 + (writer as u32) * 1000;
            for op in 0..OPS {
                let key = base + (op as u32 % 50);
                index.add(key, name_for(key));
                let _ = index.set_score(&key, (op % 7) as f64);
                if op % 3 == 0 {
                    index.remove(&key);
                }
            }
        }));
    }

    // Readers assert structural sanity on every answer
    for reader in 0..READERS {
        let index = Arc::clone(&index);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            let queries = ["c", "ch", "m", "b", "s", "st", "paul"];
            for op in 0..OPS {
                let query = queries[(op + reader) % queries.len()];
                let max_results = 1 + (op % 10);
                let results = index.autocomplete(query, max_results);
                assert!(results.len() <= max_results);

                let mut seen = HashSet::new();
                for entry in &results {
                    assert!(
                        seen.insert(*entry.key()),
                        "duplicate key {:?} for query {query:?}",
                        entry.key()
                    );
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}

// ============================================================================
// SECTION 3: Cache coherence after quiescence
// ============================================================================

#[test]
fn test_cache_coherent_after_concurrent_churn() {
    const THREADS: usize = 6;
    const OPS: usize = 250;

    let index = seeded_index(48);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|worker| {
            let index = Arc::clone(&index);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for op in 0..OPS {
                    let key = ((worker * 31 + op * 7) % 96) as u32;
                    match op % 5 {
                        0 => index.add(key, name_for(key)),
                        1 => index.remove(&key),
                        2 => {
                            let _ = index.set_score(&key, (op % 9) as f64 - 4.0);
                        }
                        3 => {
                            let _ = index.increment(&key);
                        }
                        _ => {
                            // Keep the cache hot while writers run
                            let _ = index.autocomplete("c", 5);
                            let _ = index.autocomplete("m", 5);
                        }
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Rebuild the final state into an uncached index; every cached
    // answer must match it exactly
    let reference = AutocompleteIndex::with_config(CacheConfig::disabled()).unwrap();
    for entry in index.entries() {
        reference.add_with_score(*entry.key(), entry.value().clone(), entry.score());
    }

    for query in ["c", "ch", "cl", "m", "mi", "b", "bo", "s", "st", "sa", "paul", "z"] {
        for max_results in [1, 3, 10, 20] {
            let got: Vec<u32> = index
                .autocomplete(query, max_results)
                .iter()
                .map(|e| *e.key())
                .collect();
            let want: Vec<u32> = reference
                .autocomplete(query, max_results)
                .iter()
                .map(|e| *e.key())
                .collect();
            assert_eq!(got, want, "query {query:?}, max_results {max_results}");
        }
    }
}

// ============================================================================
// SECTION 4: Snapshot independence
// ============================================================================

#[test]
fn test_entries_snapshot_survives_concurrent_clear() {
    let index = seeded_index(64);
    let snapshot = index.entries();

    let clearer = {
        let index = Arc::clone(&index);
        thread::spawn(move || {
            index.clear();
            for key in 0..8 {
                index.add(key + 500, name_for(key));
            }
        })
    };
    clearer.join().unwrap();

    assert_eq!(snapshot.len(), 64);
    let keys: HashSet<u32> = snapshot.iter().map(|e| *e.key()).collect();
    assert!(keys.contains(&0));
    assert!(!keys.contains(&500));
}

#[test]
fn test_clear_under_contention_leaves_consistent_state() {
    const THREADS: usize = 4;

    let index = seeded_index(16);
    let barrier = Arc::new(Barrier::new(THREADS + 1));

    let mut handles: Vec<_> = (0..THREADS)
        .map(|worker| {
            let index = Arc::clone(&index);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for op in 0..200 {
                    let key = (worker * 200 + op) as u32;
                    index.add(key, name_for(key));
                    let _ = index.autocomplete("c", 5);
                }
            })
        })
        .collect();

    let index_for_clear = Arc::clone(&index);
    let barrier_for_clear = Arc::clone(&barrier);
    handles.push(thread::spawn(move || {
        barrier_for_clear.wait();
        for _ in 0..20 {
            index_for_clear.clear();
        }
    }));

    for handle in handles {
        handle.join().unwrap();
    }

    // Whatever survived, queries and the store agree with each other
    let live: HashSet<u32> = index.entries().iter().map(|e| *e.key()).collect();
    for entry in index.autocomplete("c", 1000) {
        assert!(live.contains(entry.key()));
    }
    assert_eq!(index.len(), live.len());
}
