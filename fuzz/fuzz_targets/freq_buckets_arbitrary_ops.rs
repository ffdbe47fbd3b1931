#![no_main]

use freqcache::ds::FrequencyBuckets;
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on FrequencyBuckets
//
// Exercises insert, touch, reset, remove, peek_min, pop_min, and clear on
// the raw tracker, checking the min-frequency oracle and the full
// structural walk after every operation.
fuzz_target!(|data: &[u8]| {
    let mut freq: FrequencyBuckets<u8> = FrequencyBuckets::new();

    let mut idx = 0;
    while idx + 1 < data.len() {
        let op = data[idx] % 7;
        let key = data[idx + 1] % 24;

        match op {
            0 | 1 => {
                let before = freq.frequency(&key);
                let inserted = freq.insert(key);
                match before {
                    // Insert over a tracked key is a no-op that keeps the
                    // old frequency.
                    Some(f) => {
                        assert!(!inserted);
                        assert_eq!(freq.frequency(&key), Some(f));
                    }
                    None => {
                        assert!(inserted);
                        assert_eq!(freq.frequency(&key), Some(1));
                    }
                }
            }
            2 => {
                let before = freq.frequency(&key);
                let after = freq.touch(&key);
                match before {
                    Some(f) => assert_eq!(after, Some(f.saturating_add(1))),
                    None => assert!(after.is_none()),
                }
            }
            3 => {
                if freq.reset(&key).is_some() {
                    assert_eq!(freq.frequency(&key), Some(1));
                }
            }
            4 => {
                let was_tracked = freq.contains(&key);
                assert_eq!(freq.remove(&key).is_some(), was_tracked);
                assert!(!freq.contains(&key));
            }
            5 => {
                // peek_min and pop_min must agree on the victim.
                let peeked = freq.peek_min().map(|(k, f)| (*k, f));
                let popped = freq.pop_min();
                assert_eq!(peeked, popped);
                if let Some((victim, f)) = popped {
                    assert!(f >= 1);
                    assert!(!freq.contains(&victim));
                }
            }
            6 => {
                if data[idx + 1] % 16 == 0 {
                    freq.clear();
                    assert!(freq.is_empty());
                    assert_eq!(freq.pop_min(), None);
                } else {
                    let _ = freq.frequency(&key);
                }
            }
            _ => unreachable!(),
        }

        freq.debug_validate_invariants();

        idx += 2;
    }
});
