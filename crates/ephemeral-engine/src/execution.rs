//! Chain execution options and outcomes.

use stats_protocol::StageLog;

/// Toggles for one chain execution.
///
/// Import chains run before the region is aligned and therefore skip the
/// engine's region size check; analysis chains keep it enforced. All
/// statistic chains skip the per-module permission check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecuteOptions {
    pub skip_region_check: bool,
    pub skip_permission_check: bool,
}

impl ExecuteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region_check_skipped(mut self) -> Self {
        self.skip_region_check = true;
        self
    }

    pub fn with_permission_check_skipped(mut self) -> Self {
        self.skip_permission_check = true;
        self
    }
}

/// Per-stage record of one executed chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainExecution {
    stage_logs: Vec<StageLog>,
}

impl ChainExecution {
    pub fn new(stage_logs: Vec<StageLog>) -> Self {
        Self { stage_logs }
    }

    pub fn stage_logs(&self) -> &[StageLog] {
        &self.stage_logs
    }

    pub fn into_stage_logs(self) -> Vec<StageLog> {
        self.stage_logs
    }

    pub fn len(&self) -> usize {
        self.stage_logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stage_logs.is_empty()
    }

    /// Standard output of the stage with the given id.
    pub fn stdout_of(&self, stage_id: &str) -> Option<&str> {
        self.stage_logs
            .iter()
            .find(|log| log.id == stage_id)
            .map(|log| log.stdout.as_str())
    }
}
