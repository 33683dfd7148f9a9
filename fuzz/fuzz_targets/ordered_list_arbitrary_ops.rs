#![no_main]

use libfuzzer_sys::fuzz_target;
use lrukit::ds::OrderedList;

// Fuzz arbitrary operation sequences on OrderedList
//
// Random add/remove/move operations, including ones that use handles of
// nodes already removed. Stale handles must be rejected and the structure
// must stay consistent after every step.
fuzz_target!(|data: &[u8]| {
    let mut list: OrderedList<u32> = OrderedList::new();
    let mut all_ids = Vec::new();

    for chunk in data.chunks_exact(2) {
        let op = chunk[0] % 8;
        let value = u32::from(chunk[1]);

        match op {
            0 => {
                let id = list.add_to_head(value);
                all_ids.push(id);
                assert_eq!(list.head_id(), Some(id));
                assert_eq!(list.get(id), Some(&value));
            }
            1 => {
                let id = list.add_to_tail(value);
                all_ids.push(id);
                assert_eq!(list.tail_id(), Some(id));
                assert_eq!(list.get(id), Some(&value));
            }
            2 => {
                let old_len = list.size();
                match list.remove_from_head() {
                    Some(_) => assert_eq!(list.size(), old_len - 1),
                    None => assert_eq!(old_len, 0),
                }
            }
            3 => {
                let old_len = list.size();
                match list.remove_from_tail() {
                    Some(_) => assert_eq!(list.size(), old_len - 1),
                    None => assert_eq!(old_len, 0),
                }
            }
            4 | 5 | 6 => {
                if all_ids.is_empty() {
                    continue;
                }
                let id = all_ids[(value as usize) % all_ids.len()];
                let live = list.contains(id);
                let old_len = list.size();
                let before = list.get(id).copied();

                let ok = match op {
                    4 => list.move_to_head(id),
                    5 => list.move_to_tail(id),
                    _ => list.remove(id).is_some(),
                };
                assert_eq!(ok, live);

                if live {
                    match op {
                        4 => assert_eq!(list.head_id(), Some(id)),
                        5 => assert_eq!(list.tail_id(), Some(id)),
                        _ => assert_eq!(list.size(), old_len - 1),
                    }
                    if op != 6 {
                        assert_eq!(list.get(id).copied(), before);
                    }
                } else {
                    assert_eq!(list.size(), old_len);
                }
            }
            7 => {
                list.clear();
                assert!(list.is_empty());
            }
            _ => unreachable!(),
        }

        assert!(list.check_invariants().is_ok());
    }
});
