#![no_main]

use libfuzzer_sys::fuzz_target;
use lfukit::ds::{SlotArena, SlotId};

// Fuzz arbitrary operation sequences on SlotArena
//
// Tests random sequences of insert, remove, get and clear, checking that
// live ids stay valid and that length tracking matches.
fuzz_target!(|data: &[u8]| {
    let mut arena: SlotArena<u32> = SlotArena::new();
    let mut live: Vec<(SlotId, u32)> = Vec::new();

    for chunk in data.chunks_exact(2) {
        let op = chunk[0] % 4;
        let value = u32::from(chunk[1]);

        match op {
            0 | 1 => {
                let id = arena.insert(value);
                live.push((id, value));
            },
            2 => {
                if !live.is_empty() {
                    let (id, value) = live.swap_remove(usize::from(chunk[1]) % live.len());
                    assert_eq!(arena.remove(id), Some(value));
                    assert!(!arena.contains(id));
                }
            },
            3 => {
                if chunk[1] % 16 == 0 {
                    arena.clear();
                    live.clear();
                }
            },
            _ => unreachable!(),
        }

        assert_eq!(arena.len(), live.len());
        for &(id, value) in &live {
            assert_eq!(arena.get(id), Some(&value));
        }
    }
});
