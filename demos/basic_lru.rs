use lrukit::policy::lru::LruCache;

fn main() {
    env_logger::init();

    let mut cache: LruCache<&str, &str> = LruCache::new(3);

    cache.set("item1", "a");
    cache.set("item2", "b");
    cache.set("item3", "c");

    cache.get(&"item1");
    println!("least recently used: {:?}", cache.peek_lru());

    cache.set("item4", "d");

    let order: Vec<_> = cache.iter().collect();
    println!("order (lru -> mru): {:?}", order);
    println!("contains item2? {}", cache.contains(&"item2"));
}

// Expected output:
// least recently used: Some(("item2", "b"))
// order (lru -> mru): [("item3", "c"), ("item1", "a"), ("item4", "d")]
// contains item2? false
//
// Explanation: capacity=3; after get("item1"), item2 is the LRU entry.
// Setting item4 evicts item2.
