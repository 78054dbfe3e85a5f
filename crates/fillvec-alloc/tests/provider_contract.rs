//! Integration test: every built-in provider honours the block contract.
//!
//! For arbitrary sizes and alignments, a block must be aligned, writable
//! across its whole usable size, and releasable with any size between the
//! request and the usable size.

#![allow(unsafe_code)]

use std::alloc::Layout;

use fillvec_alloc::{AnyProvider, MemoryProvider, ProviderConfig};
use proptest::prelude::*;

fn all_providers() -> Vec<AnyProvider> {
    vec![
        ProviderConfig::heap().build().unwrap(),
        ProviderConfig::mapped().build().unwrap(),
        ProviderConfig::tiered().build().unwrap(),
    ]
}

fn exercise<P: MemoryProvider>(provider: &P, layout: Layout) {
    let block = provider.acquire(layout).unwrap();
    assert_eq!(
        block.as_ptr() as usize % layout.align(),
        0,
        "{} block misaligned",
        provider.name()
    );
    let usable = provider.usable_size(layout);
    assert!(usable >= layout.size());
    // SAFETY: the contract makes `usable` bytes writable; we release once,
    // with a size inside [requested, usable].
    unsafe {
        block.as_ptr().write_bytes(0xC3, usable);
        assert_eq!(*block.as_ptr().add(usable - 1), 0xC3);
        let release = Layout::from_size_align(usable, layout.align()).unwrap();
        provider.release(block, release);
    }
}

#[test]
fn one_mebibyte_block_on_every_provider() {
    let layout = Layout::array::<u64>(128 * 1024).unwrap();
    for provider in all_providers() {
        exercise(&provider, layout);
    }
}

#[test]
fn shared_reference_is_a_provider() {
    let provider = ProviderConfig::mapped().build().unwrap();
    let shared: &AnyProvider = &provider;
    exercise(&shared, Layout::array::<u16>(3).unwrap());
    assert_eq!(MemoryProvider::name(&shared), "mapped");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn arbitrary_layouts_roundtrip(
        size in 1usize..(1 << 18),
        align_shift in 0u32..7,
        which in 0usize..3,
    ) {
        let layout = Layout::from_size_align(size, 1 << align_shift).unwrap();
        let provider = all_providers()[which];
        exercise(&provider, layout);
    }

    #[test]
    fn usable_size_never_below_request(size in 1usize..(1 << 24)) {
        let layout = Layout::array::<u8>(size).unwrap();
        for provider in all_providers() {
            prop_assert!(provider.usable_size(layout) >= size);
        }
    }
}
