use snafu::ensure;

use crate::{ConfigError, config_error};

pub const DEFAULT_TOTAL_MEMORY: usize = 256 * 1024;
pub const DEFAULT_PAGE_SIZE: usize = 4 * 1024;

/// Size of the simulated address space.
///
/// The contiguous model spans `total_memory_bytes`; the paging model splits
/// the same space into `total_memory_bytes / page_size` frames. A trailing
/// remainder smaller than a page is not addressable by the paging model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryConfig {
    total_memory_bytes: usize,
    page_size: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            total_memory_bytes: DEFAULT_TOTAL_MEMORY,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl MemoryConfig {
    /// Validates and builds a configuration.
    ///
    /// ```
    /// use memsim::MemoryConfig;
    ///
    /// let config = MemoryConfig::new(1000, 100).unwrap();
    /// assert_eq!(config.total_frames(), 10);
    /// assert!(MemoryConfig::new(1000, 0).is_err());
    /// ```
    pub fn new(total_memory_bytes: usize, page_size: usize) -> Result<Self, ConfigError> {
        #[cfg_attr(not(test), expect(clippy::wildcard_imports))]
        use config_error::*;

        ensure!(total_memory_bytes > 0, ZeroMemorySnafu);
        ensure!(page_size > 0, ZeroPageSizeSnafu);
        ensure!(
            page_size <= total_memory_bytes,
            PageLargerThanMemorySnafu {
                page_size,
                total_memory_bytes,
            }
        );
        Ok(Self {
            total_memory_bytes,
            page_size,
        })
    }

    #[must_use]
    pub fn total_memory_bytes(&self) -> usize {
        self.total_memory_bytes
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn total_frames(&self) -> usize {
        self.total_memory_bytes / self.page_size
    }
}
