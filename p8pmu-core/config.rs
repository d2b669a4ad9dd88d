use p8pmu_raw::current_arch::mmcr::mmcra;

/// Which execution the events are attached to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CountingScope {
    /// Counts everything on a CPU, idle included
    #[default]
    Cpu,
    /// Counts only while a task runs, so the run latch is always set
    Task,
}

/// SDAR update policy written into MMCRA
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SdarMode {
    #[value(name = "none")]
    NoUpdates,
    /// Update SDAR on TLB miss, the continuous sampling default
    #[default]
    TlbMiss,
    DcacheMiss,
}

impl SdarMode {
    /// Two-bit MMCRA[SDAR_MODE] encoding
    pub fn field_value(&self) -> u8 {
        match self {
            SdarMode::NoUpdates => 0,
            SdarMode::TlbMiss => (mmcra::SDAR_MODE_TLB >> mmcra::SDAR_MODE_SHIFT) as u8,
            SdarMode::DcacheMiss => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PmuConfig {
    pub scope: CountingScope,
    pub sdar_mode: SdarMode,
}

impl PmuConfig {
    pub fn new(scope: CountingScope, sdar_mode: SdarMode) -> Self {
        Self { scope, sdar_mode }
    }

    /// Configuration for events attached to a single task
    pub fn for_task() -> Self {
        Self {
            scope: CountingScope::Task,
            ..Default::default()
        }
    }

    /// Whether counting only happens in run state
    ///
    /// When it does, PM_CYC and PM_RUN_CYC (and PM_INST_CMPL and
    /// PM_RUN_INST_CMPL) count the same thing.
    pub fn only_count_run(&self) -> bool {
        self.scope == CountingScope::Task
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PmuConfig::default();
        assert!(!config.only_count_run());
        assert_eq!(config.sdar_mode.field_value(), 1);
    }

    #[test]
    fn test_task_config() {
        let config = PmuConfig::for_task();
        assert!(config.only_count_run());
        assert_eq!(config.sdar_mode, SdarMode::TlbMiss);
        assert_eq!(
            PmuConfig::new(CountingScope::Cpu, SdarMode::NoUpdates)
                .sdar_mode
                .field_value(),
            0
        );
    }

    #[test]
    fn test_sdar_mode_names() {
        use clap::ValueEnum;

        assert_eq!(SdarMode::from_str("none", false), Ok(SdarMode::NoUpdates));
        assert_eq!(SdarMode::from_str("tlb-miss", false), Ok(SdarMode::TlbMiss));
        assert_eq!(SdarMode::from_str("dcache-miss", false), Ok(SdarMode::DcacheMiss));
        assert!(SdarMode::from_str("always", false).is_err());
    }
}
