use crate::{
    AllocError,
    config::MemoryConfig,
    contiguous::{ContiguousAllocator, FitPolicy},
    paging::PagingAllocator,
    process::ProcessId,
};

/// Coordinator owning one allocator of each kind.
///
/// Process ids come from a single counter shared by both models and only
/// advance when a creation succeeds.
#[derive(Debug, Clone)]
pub struct Simulator {
    config: MemoryConfig,
    contiguous: ContiguousAllocator,
    paging: PagingAllocator,
    next_pid: ProcessId,
    policy: FitPolicy,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(MemoryConfig::default())
    }
}

impl Simulator {
    #[must_use]
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            config,
            contiguous: ContiguousAllocator::new(config.total_memory_bytes()),
            paging: PagingAllocator::from_config(&config),
            next_pid: ProcessId::new(1),
            policy: FitPolicy::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    #[must_use]
    pub fn contiguous(&self) -> &ContiguousAllocator {
        &self.contiguous
    }

    #[must_use]
    pub fn paging(&self) -> &PagingAllocator {
        &self.paging
    }

    /// Id the next successful creation will receive.
    #[must_use]
    pub fn next_pid(&self) -> ProcessId {
        self.next_pid
    }

    #[must_use]
    pub fn policy(&self) -> FitPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: FitPolicy) {
        self.policy = policy;
    }

    /// Creates a contiguous process with the current fit policy.
    pub fn create_contiguous(&mut self, size: usize) -> Result<ProcessId, AllocError> {
        let pid = self.next_pid;
        self.contiguous.create_process(pid, size, self.policy)?;
        self.next_pid = pid.next();
        Ok(pid)
    }

    pub fn remove_contiguous(&mut self, pid: ProcessId) -> Result<(), AllocError> {
        self.contiguous.remove_process(pid).map(drop)
    }

    pub fn create_paged(&mut self, size: usize) -> Result<ProcessId, AllocError> {
        let pid = self.next_pid;
        self.paging.create_process(pid, size)?;
        self.next_pid = pid.next();
        Ok(pid)
    }

    pub fn remove_paged(&mut self, pid: ProcessId) -> Result<(), AllocError> {
        self.paging.remove_process(pid)
    }
}
