//! Integration test: every provider yields the same observable array.
//!
//! The same workload runs against the heap, mapped, tiered, and
//! runtime-configured providers; contents and lengths must match, and only
//! capacity may differ (page rounding on mapped blocks).

use fillvec_alloc::{
    AnyProvider, HeapProvider, HugePages, MappedConfig, MappedProvider, MemoryProvider,
    ProviderConfig, TieredProvider,
};
use fillvec_array::DynArray;

const N: usize = 1 << 20;

fn push_workload<P: MemoryProvider>(provider: P) -> DynArray<i32, P> {
    let mut v = DynArray::new(provider);
    for i in 0..N as i32 {
        v.push_back(i).unwrap();
    }
    v
}

fn overwrite_workload<P: MemoryProvider>(provider: P) -> DynArray<i32, P> {
    let mut v = DynArray::new(provider);
    // SAFETY: every slot is written before returning the full count.
    unsafe {
        v.resize_and_overwrite(N, |slots| {
            for (i, slot) in slots.iter_mut().enumerate() {
                slot.write(i as i32);
            }
            slots.len()
        })
        .unwrap();
    }
    v
}

fn providers() -> Vec<AnyProvider> {
    vec![
        HeapProvider::new().into(),
        MappedProvider::new().into(),
        MappedProvider::with_config(MappedConfig {
            huge_pages: HugePages::Never,
            populate: true,
        })
        .into(),
        TieredProvider::new(ProviderConfig::DEFAULT_TIERED_THRESHOLD).into(),
        ProviderConfig::tiered().build().unwrap(),
    ]
}

#[test]
fn push_back_contents_match_across_providers() {
    let reference = push_workload(HeapProvider::new());
    for provider in providers() {
        let v = push_workload(provider);
        assert_eq!(v.len(), N, "{}", provider.name());
        assert!(v.capacity() >= N, "{}", provider.name());
        assert_eq!(v, reference, "{}", provider.name());
    }
}

#[test]
fn overwrite_contents_match_across_providers() {
    let reference = push_workload(HeapProvider::new());
    for provider in providers() {
        let v = overwrite_workload(provider);
        assert_eq!(v, reference, "{}", provider.name());
        assert_eq!(v.metrics().acquisitions, 1, "{}", provider.name());
    }
}

#[test]
fn fill_contents_match_across_providers() {
    let reference = overwrite_workload(HeapProvider::new());
    for provider in providers() {
        let mut v = DynArray::new(provider);
        v.resize_and_fill(N, |cursor| cursor.fill_with(|i| i as i32))
            .unwrap();
        assert_eq!(v, reference, "{}", provider.name());
    }
}

#[test]
fn resize_contents_match_across_providers() {
    for provider in providers() {
        let mut v = DynArray::<u64, _>::new(provider);
        v.resize(N).unwrap();
        assert!(v.iter().all(|&x| x == 0), "{}", provider.name());
        v.resize(10).unwrap();
        v.resize(20).unwrap();
        assert_eq!(v.len(), 20);
        assert!(v.capacity() >= N);
    }
}

#[test]
fn concrete_and_dynamic_providers_agree() {
    let concrete = push_workload(MappedProvider::new());
    let dynamic = push_workload(ProviderConfig::mapped().build().unwrap());
    assert_eq!(concrete, dynamic);
    assert_eq!(concrete.capacity(), dynamic.capacity());
}

#[test]
fn mapped_capacity_is_page_rounded() {
    let page = fillvec_alloc::page_size();
    let v = overwrite_workload(MappedProvider::new());
    assert_eq!((v.capacity() * 4) % page, 0);
    let h = overwrite_workload(HeapProvider::new());
    assert_eq!(h.capacity(), N);
}
