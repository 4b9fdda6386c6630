//! Plain records shared by both allocators.

use std::{fmt, ops::Range};

/// Identifier of a simulated process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessId(usize);

impl ProcessId {
    #[must_use]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(self) -> usize {
        self.0
    }

    /// Returns the identifier following `self`.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A run of unallocated bytes in the contiguous model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeInterval {
    pub base: usize,
    pub size: usize,
}

impl FreeInterval {
    #[must_use]
    pub fn end(&self) -> usize {
        self.base + self.size
    }
}

impl From<&Range<usize>> for FreeInterval {
    fn from(range: &Range<usize>) -> Self {
        Self {
            base: range.start,
            size: range.len(),
        }
    }
}

/// A block reserved for a process by the contiguous allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Process {
    pub pid: ProcessId,
    pub size: usize,
    pub base: usize,
    pub limit: usize,
}

impl Process {
    /// Byte range `[base, base + limit)` covered by the block.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.base..self.base + self.limit
    }
}

/// Owner of an assigned frame in the paging model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOwner {
    pub pid: ProcessId,
    pub page_number: usize,
}

impl fmt::Display for FrameOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.pid, self.page_number)
    }
}

/// Mapping of one page of a process to the frame backing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTableEntry {
    pub page_number: usize,
    pub frame_number: usize,
}
