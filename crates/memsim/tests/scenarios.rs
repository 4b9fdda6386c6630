#![cfg(test)]

use std::num::NonZeroUsize;

use memsim::{AllocError, ContiguousAllocator, FitPolicy, PagingAllocator, ProcessId};

fn pid(id: usize) -> ProcessId {
    ProcessId::new(id)
}

fn free_list(mem: &ContiguousAllocator) -> Vec<(usize, usize)> {
    mem.free_intervals().map(|i| (i.base, i.size)).collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn check_contiguous(mem: &ContiguousAllocator) {
    let free: Vec<_> = mem.free_intervals().collect();
    for pair in free.windows(2) {
        assert!(pair[0].end() < pair[1].base, "free list not coalesced");
    }
    let mut used: Vec<_> = mem.processes().map(|p| p.range()).collect();
    used.extend(free.iter().map(|i| i.base..i.end()));
    used.sort_by_key(|r| r.start);
    let mut cursor = 0;
    for range in used {
        assert_eq!(range.start, cursor, "gap or overlap at {cursor}");
        cursor = range.end;
    }
    assert_eq!(cursor, mem.total_size());
}

fn check_paging(mem: &PagingAllocator) {
    let snapshot = mem.snapshot();
    let owned = snapshot.iter().filter(|c| c.is_some()).count();
    assert_eq!(owned + mem.free_frame_count(), mem.total_frames());
    for info in mem.processes() {
        for (page, pte) in mem.page_table_for(info.pid).iter().enumerate() {
            assert_eq!(pte.page_number, page);
            let owner = snapshot[pte.frame_number].expect("mapped frame has owner");
            assert_eq!((owner.pid, owner.page_number), (info.pid, page));
        }
    }
}

#[test]
fn scenario_a_single_first_fit() {
    let mut mem = ContiguousAllocator::new(1024);
    mem.create_process(pid(1), 300, FitPolicy::First).unwrap();
    assert_eq!(free_list(&mem), [(300, 724)]);
    assert_close(mem.external_fragmentation(), 0.0);
}

#[test]
fn scenario_b_hole_after_removal() {
    let mut mem = ContiguousAllocator::new(1000);
    mem.create_process(pid(1), 400, FitPolicy::First).unwrap();
    mem.create_process(pid(2), 300, FitPolicy::First).unwrap();
    mem.remove_process(pid(1)).unwrap();
    assert_eq!(free_list(&mem), [(0, 400), (700, 300)]);
    assert_close(mem.external_fragmentation(), 30.0);
}

#[test]
fn scenario_c_internal_fragmentation() {
    let mut mem = PagingAllocator::new(10, 100).unwrap();
    mem.create_process(pid(1), 250).unwrap();
    assert_eq!(mem.page_table_for(pid(1)).len(), 3);
    assert_close(mem.internal_fragmentation(), 5.0);
}

#[test]
fn scenario_d_oversized_requests_change_nothing() {
    let mut mem = ContiguousAllocator::new(1000);
    mem.create_process(pid(1), 400, FitPolicy::First).unwrap();
    mem.create_process(pid(2), 300, FitPolicy::First).unwrap();
    mem.remove_process(pid(1)).unwrap();
    let before = free_list(&mem);
    // 700 bytes are free in total, but not in one piece
    let err = mem.create_process(pid(3), 500, FitPolicy::Best).unwrap_err();
    assert!(matches!(err, AllocError::NoFit { .. }));
    assert_eq!(free_list(&mem), before);
    assert!(mem.process(pid(3)).is_none());

    let mut paging = PagingAllocator::new(10, 100).unwrap();
    paging.create_process(pid(1), 800).unwrap();
    let frames_before: Vec<_> = paging.free_frames().collect();
    let err = paging.create_process(pid(2), 201).unwrap_err();
    assert!(matches!(err, AllocError::InsufficientFrames { .. }));
    assert_eq!(paging.free_frames().collect::<Vec<_>>(), frames_before);
    assert!(paging.page_table_for(pid(2)).is_empty());
}

#[test]
fn scenario_e_circular_uses_different_intervals() {
    let mut mem = ContiguousAllocator::new(1000);
    mem.create_process(pid(1), 300, FitPolicy::First).unwrap();
    mem.create_process(pid(2), 200, FitPolicy::First).unwrap();
    mem.remove_process(pid(1)).unwrap();
    assert_eq!(free_list(&mem), [(0, 300), (500, 500)]);

    mem.create_process(pid(3), 100, FitPolicy::Circular).unwrap();
    mem.create_process(pid(4), 100, FitPolicy::Circular).unwrap();
    assert_eq!(mem.process(pid(3)).unwrap().base, 0);
    assert_eq!(mem.process(pid(4)).unwrap().base, 500);
    check_contiguous(&mem);
}

#[test]
fn round_trip_restores_free_space() {
    let mut mem = ContiguousAllocator::new(1000);
    mem.create_process(pid(1), 100, FitPolicy::First).unwrap();
    mem.create_process(pid(2), 100, FitPolicy::First).unwrap();
    mem.remove_process(pid(1)).unwrap();
    for (id, policy) in (10..).zip(FitPolicy::ALL) {
        let before = free_list(&mem);
        mem.create_process(pid(id), 60, policy).unwrap();
        mem.remove_process(pid(id)).unwrap();
        assert_eq!(free_list(&mem), before, "{policy} round trip");
    }

    let mut paging = PagingAllocator::new(10, 100).unwrap();
    paging.create_process(pid(1), 300).unwrap();
    let before: Vec<_> = paging.free_frames().collect();
    paging.create_process(pid(2), 450).unwrap();
    paging.remove_process(pid(2)).unwrap();
    assert_eq!(paging.free_frames().collect::<Vec<_>>(), before);
}

#[test]
fn fragmentation_queries_are_pure() {
    let mut mem = ContiguousAllocator::new(1000);
    mem.create_process(pid(1), 400, FitPolicy::First).unwrap();
    mem.create_process(pid(2), 300, FitPolicy::First).unwrap();
    mem.remove_process(pid(1)).unwrap();
    let before = free_list(&mem);
    let first = mem.external_fragmentation();
    let second = mem.external_fragmentation();
    assert!((first - second).abs() < f64::EPSILON);
    let _ = mem.snapshot(NonZeroUsize::new(100).unwrap());
    assert_eq!(free_list(&mem), before);

    let mut paging = PagingAllocator::new(10, 100).unwrap();
    paging.create_process(pid(1), 250).unwrap();
    let first = paging.internal_fragmentation();
    let second = paging.internal_fragmentation();
    assert!((first - second).abs() < f64::EPSILON);
}

/// Small xorshift generator so the walk is reproducible without extra
/// dependencies.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, bound: usize) -> usize {
        usize::try_from(self.next() % bound as u64).unwrap()
    }
}

#[test]
fn random_walk_keeps_invariants() {
    let mut rng = XorShift(0x9E37_79B9_7F4A_7C15);
    let mut mem = ContiguousAllocator::new(4096);
    let mut paging = PagingAllocator::new(32, 128).unwrap();
    let mut live = Vec::new();
    for step in 1..=2000 {
        if live.is_empty() || rng.below(3) != 0 {
            let id = pid(step);
            let size = 1 + rng.below(600);
            let policy = FitPolicy::ALL[rng.below(FitPolicy::ALL.len())];
            let contiguous = mem.create_process(id, size, policy).is_ok();
            let paged = paging.create_process(id, size).is_ok();
            if contiguous || paged {
                live.push(id);
            }
        } else {
            let id = live.swap_remove(rng.below(live.len()));
            let contiguous = mem.remove_process(id).is_ok();
            let paged = paging.remove_process(id).is_ok();
            assert!(contiguous || paged);
        }
        check_contiguous(&mem);
        check_paging(&paging);
    }
}
