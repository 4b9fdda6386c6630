//! Dynamic contiguous partitioning.
//!
//! Every process occupies one run of bytes. Free space is kept in a
//! [`RangeSet`], which stays sorted by base address and merges adjacent runs,
//! so a released block is coalesced with its free neighbours immediately.
//!
//! # Fit policies
//!
//! | policy     | chosen interval                                          |
//! |------------|----------------------------------------------------------|
//! | `first`    | lowest base that is large enough                         |
//! | `best`     | smallest large-enough interval, lowest base on ties      |
//! | `worst`    | largest large-enough interval, lowest base on ties       |
//! | `circular` | first large-enough interval after the previous choice    |
//!
//! The circular cursor is the free-list index where the next circular search
//! starts: the interval after the previous choice, or the same index when the
//! chosen interval was used up and left the list. It is reduced modulo the
//! current number of free intervals, so it stays valid when intervals
//! disappear or merge between calls.

use std::{collections::BTreeMap, num::NonZeroUsize, ops::Range, str::FromStr};

use log::{debug, trace};
use range_set::RangeSet;
use snafu::{Snafu, ensure};
use snafu_utils::Location;

use crate::{
    AllocError, alloc_error,
    process::{FreeInterval, Process, ProcessId},
};

/// Rule used to pick a free interval for a new process.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum FitPolicy {
    #[default]
    #[display("first")]
    First,
    #[display("best")]
    Best,
    #[display("worst")]
    Worst,
    #[display("circular")]
    Circular,
}

impl FitPolicy {
    pub const ALL: [Self; 4] = [Self::First, Self::Best, Self::Worst, Self::Circular];
}

#[derive(Debug, Snafu)]
#[snafu(display("unknown fit policy {name:?}, expected one of first/best/worst/circular"))]
pub struct ParsePolicyError {
    name: String,
    #[snafu(implicit)]
    location: Location,
}

impl FromStr for FitPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let policy = match s.trim().to_ascii_lowercase().as_str() {
            "first" | "first-fit" => Self::First,
            "best" | "best-fit" => Self::Best,
            "worst" | "worst-fit" => Self::Worst,
            "circular" | "next" | "next-fit" => Self::Circular,
            _ => return ParsePolicySnafu { name: s }.fail(),
        };
        Ok(policy)
    }
}

/// Bookkeeping for a contiguously partitioned address space.
///
/// ```
/// use memsim::{ContiguousAllocator, FitPolicy, ProcessId};
///
/// let mut mem = ContiguousAllocator::new(1024);
/// mem.create_process(ProcessId::new(1), 300, FitPolicy::First).unwrap();
///
/// let free: Vec<_> = mem.free_intervals().map(|i| (i.base, i.size)).collect();
/// assert_eq!(free, [(300, 724)]);
/// assert_eq!(mem.external_fragmentation(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct ContiguousAllocator {
    total_size: usize,
    free: RangeSet,
    allocated: BTreeMap<ProcessId, Process>,
    circular_cursor: usize,
}

impl ContiguousAllocator {
    /// Creates an allocator whose whole address space is free.
    #[must_use]
    pub fn new(total_size: usize) -> Self {
        Self {
            total_size,
            free: RangeSet::from_range(0..total_size),
            allocated: BTreeMap::new(),
            circular_cursor: 0,
        }
    }

    #[must_use]
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Reserves `size` bytes for `pid` in the interval chosen by `policy`.
    ///
    /// On failure nothing changes, including the circular cursor.
    pub fn create_process(
        &mut self,
        pid: ProcessId,
        size: usize,
        policy: FitPolicy,
    ) -> Result<(), AllocError> {
        #[cfg_attr(not(test), expect(clippy::wildcard_imports))]
        use alloc_error::*;

        ensure!(size > 0, EmptyRequestSnafu);
        ensure!(
            !self.allocated.contains_key(&pid),
            DuplicateProcessSnafu { pid }
        );

        let Some((index, hole)) = self.select(size, policy) else {
            trace!("no {policy}-fit interval for pid={pid} size={size}");
            return NoFitSnafu {
                requested: size,
                largest: self.free.max_len(),
            }
            .fail();
        };
        trace!("{policy}-fit chose interval #{index} {hole:?} for pid={pid} size={size}");

        if policy == FitPolicy::Circular {
            self.circular_cursor = if hole.len() == size { index } else { index + 1 };
        }
        let block = Process {
            pid,
            size,
            base: hole.start,
            limit: size,
        };
        self.free.remove(block.range());
        self.allocated.insert(pid, block);
        debug!(
            "contiguous: created pid={pid} base={} limit={}",
            block.base, block.limit
        );
        Ok(())
    }

    /// Releases the block owned by `pid` and merges it into the free list.
    pub fn remove_process(&mut self, pid: ProcessId) -> Result<Process, AllocError> {
        let Some(block) = self.allocated.remove(&pid) else {
            return alloc_error::UnknownProcessSnafu { pid }.fail();
        };
        self.free.insert(block.range());
        debug!(
            "contiguous: removed pid={pid} base={} limit={}",
            block.base, block.limit
        );
        Ok(block)
    }

    fn select(&self, size: usize, policy: FitPolicy) -> Option<(usize, Range<usize>)> {
        let chosen = match policy {
            FitPolicy::First => self.candidates(size).next(),
            FitPolicy::Best => self.extremal(size, |len, chosen| len < chosen),
            FitPolicy::Worst => self.extremal(size, |len, chosen| len > chosen),
            FitPolicy::Circular => self.next_fit(size),
        };
        chosen.map(|(index, range)| (index, range.clone()))
    }

    fn candidates(&self, size: usize) -> impl Iterator<Item = (usize, &Range<usize>)> {
        self.free
            .iter()
            .enumerate()
            .filter(move |(_, range)| range.len() >= size)
    }

    // Scans in base order and only replaces the choice on a strict
    // improvement, so the lowest base wins among equal sizes.
    fn extremal(
        &self,
        size: usize,
        improves: impl Fn(usize, usize) -> bool,
    ) -> Option<(usize, &Range<usize>)> {
        let mut chosen: Option<(usize, &Range<usize>)> = None;
        for (index, range) in self.candidates(size) {
            if chosen.is_none_or(|(_, c)| improves(range.len(), c.len())) {
                chosen = Some((index, range));
            }
        }
        chosen
    }

    fn next_fit(&self, size: usize) -> Option<(usize, &Range<usize>)> {
        let n = self.free.len();
        if n == 0 {
            return None;
        }
        let start = self.circular_cursor % n;
        (0..n)
            .map(|offset| (start + offset) % n)
            .filter_map(|index| self.free.get(index).map(|range| (index, range)))
            .find(|(_, range)| range.len() >= size)
    }

    /// Percentage of the address space that is free but not part of the
    /// largest free interval.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn external_fragmentation(&self) -> f64 {
        let total_free = self.free.total_len();
        if total_free == 0 {
            return 0.0;
        }
        (total_free - self.free.max_len()) as f64 / self.total_size as f64 * 100.0
    }

    /// Splits the address space into `total_size / granularity` cells.
    ///
    /// A cell reports its owner only when one block covers it completely.
    #[must_use]
    pub fn snapshot(&self, granularity: NonZeroUsize) -> Vec<Option<ProcessId>> {
        let g = granularity.get();
        let mut cells = vec![None; self.total_size / g];
        for block in self.allocated.values() {
            let start = block.base.div_ceil(g);
            let end = (block.base + block.limit) / g;
            for cell in cells.iter_mut().take(end).skip(start) {
                *cell = Some(block.pid);
            }
        }
        cells
    }

    /// Free intervals in ascending base order.
    pub fn free_intervals(&self) -> impl Iterator<Item = FreeInterval> + '_ {
        self.free.iter().map(FreeInterval::from)
    }

    #[must_use]
    pub fn total_free(&self) -> usize {
        self.free.total_len()
    }

    #[must_use]
    pub fn largest_free(&self) -> usize {
        self.free.max_len()
    }

    /// Allocated blocks in ascending id order.
    pub fn processes(&self) -> impl Iterator<Item = &Process> {
        self.allocated.values()
    }

    #[must_use]
    pub fn process(&self, pid: ProcessId) -> Option<&Process> {
        self.allocated.get(&pid)
    }
}
