#![no_main]

use libfuzzer_sys::fuzz_target;
use lrukit::policy::lru::LruCache;

// Fuzz arbitrary get/set sequences on LruCache
//
// First byte picks the capacity; every following pair is (op, key). The
// index and the list must agree after every step and size must stay within
// capacity.
fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(first % 16) + 1;
    let mut cache: LruCache<u8, u32> = LruCache::new(capacity);

    for (step, chunk) in rest.chunks_exact(2).enumerate() {
        let key = chunk[1] % 32;
        match chunk[0] % 3 {
            0 => {
                let was_present = cache.contains(&key);
                let old_len = cache.size();
                cache.set(key, step as u32);
                if was_present {
                    assert_eq!(cache.size(), old_len);
                }
                assert_eq!(cache.keys().last(), Some(&key));
            }
            1 => {
                if cache.get(&key).is_some() {
                    assert_eq!(cache.keys().last(), Some(&key));
                }
            }
            _ => {
                let before: Vec<u8> = cache.keys().copied().collect();
                let _ = cache.peek(&key);
                let after: Vec<u8> = cache.keys().copied().collect();
                assert_eq!(before, after);
            }
        }

        assert!(cache.size() <= capacity);
        assert!(cache.check_invariants().is_ok());
    }
});
