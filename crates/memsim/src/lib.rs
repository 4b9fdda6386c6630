//! Bookkeeping models of two memory-management strategies.
//!
//! The crate simulates how an operating system hands out memory to processes.
//! It never touches real memory; every allocator only records who owns which
//! part of an abstract address space.
//!
//! # Models
//!
//! ## [`ContiguousAllocator`]
//!
//! Dynamic partitioning: each process receives one contiguous block picked
//! from a coalescing free list by a [`FitPolicy`]. Holes left behind by
//! removed processes cause *external fragmentation*.
//!
//! ## [`PagingAllocator`]
//!
//! Pure paging: each process receives `ceil(size / page_size)` fixed-size
//! frames, always the lowest free ones, described by a page table. Unused
//! bytes in the last page of a process cause *internal fragmentation*.
//!
//! # Coordination
//!
//! [`Simulator`] owns one allocator of each kind, hands out process ids and
//! remembers the selected fit policy.
//!
//! ```
//! use memsim::{FitPolicy, MemoryConfig, Simulator};
//!
//! let mut sim = Simulator::new(MemoryConfig::new(1000, 100).unwrap());
//! let a = sim.create_contiguous(400).unwrap();
//! let _b = sim.create_contiguous(300).unwrap();
//! sim.remove_contiguous(a).unwrap();
//! assert!((sim.contiguous().external_fragmentation() - 30.0).abs() < 1e-9);
//!
//! sim.set_policy(FitPolicy::Best);
//! let paged = sim.create_paged(250).unwrap();
//! assert_eq!(sim.paging().page_table_for(paged).len(), 3);
//! ```
//!
//! # Failure model
//!
//! Mutating operations return [`AllocError`]. A failed call leaves the
//! allocator exactly as it was.

use snafu::Snafu;
use snafu_utils::Location;

pub use self::{
    config::{DEFAULT_PAGE_SIZE, DEFAULT_TOTAL_MEMORY, MemoryConfig},
    contiguous::{ContiguousAllocator, FitPolicy, ParsePolicyError},
    paging::{PagedProcessInfo, PagingAllocator},
    process::{FrameOwner, FreeInterval, PageTableEntry, Process, ProcessId},
    simulator::Simulator,
};

mod config;
mod contiguous;
mod paging;
mod process;
mod simulator;

/// Errors returned by the allocators' mutating operations.
///
/// A failed call never changes allocator state.
#[derive(Debug, Snafu)]
#[snafu(module)]
pub enum AllocError {
    #[snafu(display("no free interval can hold {requested} bytes (largest is {largest} bytes)"))]
    NoFit {
        requested: usize,
        largest: usize,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("{needed} frames required but only {free} are free"))]
    InsufficientFrames {
        needed: usize,
        free: usize,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("process {pid} is not allocated"))]
    UnknownProcess {
        pid: ProcessId,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("process {pid} is already allocated"))]
    DuplicateProcess {
        pid: ProcessId,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("cannot allocate an empty process"))]
    EmptyRequest {
        #[snafu(implicit)]
        location: Location,
    },
}

impl AllocError {
    /// Returns `true` when the request failed for lack of free space.
    #[must_use]
    pub fn is_out_of_memory(&self) -> bool {
        matches!(self, Self::NoFit { .. } | Self::InsufficientFrames { .. })
    }
}

/// Errors returned when validating a [`MemoryConfig`].
#[derive(Debug, Snafu)]
#[snafu(module)]
pub enum ConfigError {
    #[snafu(display("total memory size must be greater than zero"))]
    ZeroMemory {
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("page size must be greater than zero"))]
    ZeroPageSize {
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("page size {page_size} exceeds total memory size {total_memory_bytes}"))]
    PageLargerThanMemory {
        page_size: usize,
        total_memory_bytes: usize,
        #[snafu(implicit)]
        location: Location,
    },
}
