//! Pure paging with a single-level page table per process.
//!
//! The free-frame pool is an ordered set, so allocation always hands out the
//! lowest free frames and a released frame is immediately back in order.
//! A process is created with all of its pages or not at all.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, trace};
use snafu::ensure;

use crate::{
    AllocError, ConfigError, alloc_error,
    config::MemoryConfig,
    config_error,
    process::{FrameOwner, PageTableEntry, ProcessId},
};

#[derive(Debug, Clone)]
struct PagedProcess {
    size: usize,
    page_table: Vec<PageTableEntry>,
}

/// Summary of a paged process, as listed by [`PagingAllocator::processes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagedProcessInfo {
    pub pid: ProcessId,
    pub size: usize,
    pub pages: usize,
}

/// Bookkeeping for a paged address space.
///
/// ```
/// use memsim::{PagingAllocator, ProcessId};
///
/// let mut mem = PagingAllocator::new(10, 100).unwrap();
/// mem.create_process(ProcessId::new(1), 250).unwrap();
///
/// let frames: Vec<_> = mem
///     .page_table_for(ProcessId::new(1))
///     .iter()
///     .map(|pte| pte.frame_number)
///     .collect();
/// assert_eq!(frames, [0, 1, 2]);
/// assert!((mem.internal_fragmentation() - 5.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct PagingAllocator {
    page_size: usize,
    free_frames: BTreeSet<usize>,
    frame_owners: Vec<Option<FrameOwner>>,
    processes: BTreeMap<ProcessId, PagedProcess>,
}

impl PagingAllocator {
    /// Creates an allocator with `total_frames` free frames of `page_size`
    /// bytes each.
    ///
    /// Fails with [`ConfigError::ZeroPageSize`] when `page_size` is zero.
    pub fn new(total_frames: usize, page_size: usize) -> Result<Self, ConfigError> {
        ensure!(page_size > 0, config_error::ZeroPageSizeSnafu);
        Ok(Self::with_frames(total_frames, page_size))
    }

    /// Creates an allocator over the frames of an already validated config.
    #[must_use]
    pub fn from_config(config: &MemoryConfig) -> Self {
        Self::with_frames(config.total_frames(), config.page_size())
    }

    fn with_frames(total_frames: usize, page_size: usize) -> Self {
        Self {
            page_size,
            free_frames: (0..total_frames).collect(),
            frame_owners: vec![None; total_frames],
            processes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn total_frames(&self) -> usize {
        self.frame_owners.len()
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages needed to hold `size` bytes.
    #[must_use]
    pub fn pages_for(&self, size: usize) -> usize {
        size.div_ceil(self.page_size)
    }

    /// Maps `ceil(size / page_size)` pages of `pid` onto the lowest free
    /// frames.
    pub fn create_process(&mut self, pid: ProcessId, size: usize) -> Result<(), AllocError> {
        #[cfg_attr(not(test), expect(clippy::wildcard_imports))]
        use alloc_error::*;

        ensure!(size > 0, EmptyRequestSnafu);
        ensure!(
            !self.processes.contains_key(&pid),
            DuplicateProcessSnafu { pid }
        );
        let needed = self.pages_for(size);
        let free = self.free_frames.len();
        if needed > free {
            trace!("paging: pid={pid} needs {needed} frames, {free} free");
            return InsufficientFramesSnafu { needed, free }.fail();
        }

        let frames: Vec<usize> = self.free_frames.iter().take(needed).copied().collect();
        let mut page_table = Vec::with_capacity(needed);
        for (page_number, frame_number) in frames.into_iter().enumerate() {
            self.free_frames.remove(&frame_number);
            self.frame_owners[frame_number] = Some(FrameOwner { pid, page_number });
            page_table.push(PageTableEntry {
                page_number,
                frame_number,
            });
        }
        debug!("paging: created pid={pid} size={size} pages={needed}");
        self.processes
            .insert(pid, PagedProcess { size, page_table });
        Ok(())
    }

    /// Releases every frame mapped by `pid`.
    pub fn remove_process(&mut self, pid: ProcessId) -> Result<(), AllocError> {
        let Some(process) = self.processes.remove(&pid) else {
            return alloc_error::UnknownProcessSnafu { pid }.fail();
        };
        for pte in &process.page_table {
            self.frame_owners[pte.frame_number] = None;
            self.free_frames.insert(pte.frame_number);
        }
        debug!(
            "paging: removed pid={pid} released {} frames",
            process.page_table.len()
        );
        Ok(())
    }

    /// Unused bytes in the last page of every process, as a percentage of
    /// all addressable bytes.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn internal_fragmentation(&self) -> f64 {
        let capacity = self.total_frames() * self.page_size;
        if capacity == 0 {
            return 0.0;
        }
        let wasted: usize = self
            .processes
            .values()
            .map(|p| p.page_table.len() * self.page_size - p.size)
            .sum();
        wasted as f64 / capacity as f64 * 100.0
    }

    /// Paging never leaves unusable holes between processes.
    #[must_use]
    pub fn external_fragmentation(&self) -> f64 {
        0.0
    }

    /// One cell per frame, holding the page mapped into it.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Option<FrameOwner>> {
        self.frame_owners.clone()
    }

    /// Page table of `pid`, or an empty slice for an unknown process.
    #[must_use]
    pub fn page_table_for(&self, pid: ProcessId) -> &[PageTableEntry] {
        self.processes
            .get(&pid)
            .map(|p| p.page_table.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn free_frame_count(&self) -> usize {
        self.free_frames.len()
    }

    /// Free frames in ascending order.
    pub fn free_frames(&self) -> impl Iterator<Item = usize> + '_ {
        self.free_frames.iter().copied()
    }

    /// Paged processes in ascending id order.
    pub fn processes(&self) -> impl Iterator<Item = PagedProcessInfo> + '_ {
        self.processes.iter().map(|(&pid, p)| PagedProcessInfo {
            pid,
            size: p.size,
            pages: p.page_table.len(),
        })
    }
}
