#![no_main]

use std::sync::Arc;

use freqcache::policy::lfu::LfuCache;
use freqcache::traits::{CoreCache, LfuCacheTrait, MutableCache};
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on LfuCache
//
// Drives random sequences of insert, get, remove, pop_lfu, peek_lfu,
// frequency probes, and clear against a small key space, validating the
// structural walk and the capacity bound after every step.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte picks a capacity (0-16); zero-capacity is a valid and
    // interesting configuration.
    let capacity = usize::from(data[0] % 17);
    let mut cache: LfuCache<u8, u64> = LfuCache::new(capacity);

    let mut idx = 1;
    while idx + 1 < data.len() {
        let op = data[idx] % 8;
        let key = data[idx + 1] % 32;

        match op {
            0 | 1 => {
                cache.insert(key, Arc::new(u64::from(key)));
                if capacity > 0 {
                    assert!(cache.contains(&key));
                    // Frequency starts at one and only grows from there.
                    assert!(cache.frequency(&key).unwrap() >= 1);
                } else {
                    assert!(cache.is_empty());
                }
            }
            2 | 3 => {
                let before = cache.frequency(&key);
                let hit = cache.get(&key);
                match before {
                    Some(freq) => {
                        assert_eq!(**hit.unwrap(), u64::from(key));
                        assert_eq!(cache.frequency(&key), Some(freq.saturating_add(1)));
                    }
                    None => assert!(hit.is_none()),
                }
            }
            4 => {
                let was_present = cache.contains(&key);
                let removed = cache.remove(&key);
                assert_eq!(removed.is_some(), was_present);
                assert!(!cache.contains(&key));
            }
            5 => {
                let len_before = cache.len();
                match cache.pop_lfu() {
                    Some((victim, _)) => {
                        assert_eq!(cache.len(), len_before - 1);
                        assert!(!cache.contains(&victim));
                    }
                    None => assert!(cache.is_empty()),
                }
            }
            6 => {
                // Peeking must not disturb length or frequencies.
                let len_before = cache.len();
                let peeked = cache.peek_lfu().map(|(k, _)| *k);
                assert_eq!(cache.len(), len_before);
                assert_eq!(peeked.is_none(), cache.is_empty());
            }
            7 => {
                if data[idx + 1] % 16 == 0 {
                    cache.clear();
                    assert!(cache.is_empty());
                } else {
                    let _ = cache.increment_frequency(&key);
                }
            }
            _ => unreachable!(),
        }

        assert!(cache.len() <= capacity);
        cache.debug_validate_invariants();

        idx += 2;
    }
});
