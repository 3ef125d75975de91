#![no_main]

use libfuzzer_sys::fuzz_target;
use lfukit::ds::{BucketChain, FrequencyIndex, ItemId, ItemMeta};

// Fuzz arbitrary operation sequences on BucketChain
//
// Tests random sequences of insert, promote, detach, evict and clear with a
// FrequencyIndex listening, auditing the chain and the mirror after each
// operation.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let mut chain = BucketChain::new();
    let mut index = FrequencyIndex::new();
    let mut live: Vec<ItemId> = Vec::new();

    for (step, chunk) in data.chunks_exact(2).enumerate() {
        let op = chunk[0] % 6;
        let arg = chunk[1];

        match op {
            0 | 1 => {
                // Insert at an arbitrary frequency
                let frequency = u32::from(arg % 20) + 1;
                let splice = index.splice_for(frequency);
                let meta = ItemMeta {
                    key: step as u64,
                    size: u32::from(arg % 4) + 1,
                    frequency,
                };
                let id = chain.insert(meta, splice, &mut index).unwrap();
                live.push(id);
            },
            2 => {
                // Promote
                if !live.is_empty() {
                    let id = live[usize::from(arg) % live.len()];
                    let before = chain.item(id).unwrap().frequency;
                    let after = chain.promote(id, &mut index).unwrap();
                    assert_eq!(after, before.saturating_add(1));
                }
            },
            3 => {
                // Detach
                if !live.is_empty() {
                    let id = live.swap_remove(usize::from(arg) % live.len());
                    assert!(chain.detach(id, &mut index).is_some());
                    assert!(chain.item(id).is_none());
                }
            },
            4 => {
                // Evict oldest of lowest
                let expected = chain.peek_victim();
                let victim = chain.evict_one(&mut index);
                assert_eq!(victim, expected);
                if let Some(victim) = victim {
                    live.retain(|&id| chain.item(id).is_some());
                    assert!(live.iter().all(|&id| chain.item(id) != Some(victim)));
                }
            },
            5 => {
                if arg % 8 == 0 {
                    chain.clear(&mut index);
                    live.clear();
                }
            },
            _ => unreachable!(),
        }

        let audit = chain.audit().unwrap();
        assert_eq!(audit.items, live.len());
        index.check_mirrors(&chain).unwrap();
    }
});
