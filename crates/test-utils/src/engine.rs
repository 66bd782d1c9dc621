//! In-process stand-ins for the external processing engine.
//!
//! [`StubRunner`] replays configured stage outputs instead of invoking
//! geoprocessing tools; [`StubEngine`] drives operations through it
//! inline, so endpoint tests cover the full submit/wait path without a
//! queue or a spatial database.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tempfile::TempDir;

use ephemeral_engine::{
    ChainExecution, ChainRunner, EphemeralOperation, ExecuteOptions, JobContext, JobHandle,
    ProcessingEngine, RequestDescriptor, RouteParams, SubmittedJob, Workspace,
};
use geostat_common::{GeostatError, GeostatResult};
use process_chain::Chain;
use stats_protocol::{ProcessingResponse, StageLog};

use crate::fixtures::names;

/// Chain runner that replays canned outputs instead of running modules.
///
/// Stage stdout and result file contents are configured per stage id;
/// unconfigured stages succeed silently. Declared output files are only
/// written for stages with configured contents, since output values may
/// also name maps rather than files.
#[derive(Default)]
pub struct StubRunner {
    stdout_by_stage: HashMap<String, String>,
    file_by_stage: HashMap<String, String>,
    failing_stage: Option<String>,
    executed: Mutex<Vec<Chain>>,
}

impl StubRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record stdout for the stage with the given id.
    pub fn with_stdout(mut self, stage_id: impl Into<String>, stdout: impl Into<String>) -> Self {
        self.stdout_by_stage.insert(stage_id.into(), stdout.into());
        self
    }

    /// Write `contents` to the stage's declared output file when it runs.
    pub fn with_output_file(
        mut self,
        stage_id: impl Into<String>,
        contents: impl Into<String>,
    ) -> Self {
        self.file_by_stage.insert(stage_id.into(), contents.into());
        self
    }

    /// Make the stage with the given id fail with a non-zero exit.
    pub fn with_failure(mut self, stage_id: impl Into<String>) -> Self {
        self.failing_stage = Some(stage_id.into());
        self
    }

    /// Chains executed so far, in submission order.
    pub fn executed_chains(&self) -> Vec<Chain> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainRunner for StubRunner {
    async fn run_chain(
        &self,
        _workspace: &Workspace,
        chain: &Chain,
        _options: ExecuteOptions,
    ) -> GeostatResult<ChainExecution> {
        let mut logs = Vec::new();
        for stage in chain.stages() {
            if self.failing_stage.as_deref() == Some(stage.id.as_str()) {
                return Err(GeostatError::StageFailed {
                    stage: stage.id.clone(),
                    code: 1,
                    stderr: "stub stage failure".to_string(),
                });
            }

            if let Some(contents) = self.file_by_stage.get(&stage.id) {
                let path = stage
                    .output_value("output")
                    .or_else(|| stage.output_value("file"))
                    .ok_or_else(|| {
                        GeostatError::Engine(format!(
                            "stage '{}' has no file output to write",
                            stage.id
                        ))
                    })?;
                tokio::fs::write(path, contents).await?;
            }

            let parameter = stage
                .inputs
                .iter()
                .map(|p| format!("{}={}", p.param, p.value))
                .collect();
            let mut log = StageLog::new(&stage.id, &stage.module)
                .with_parameter(parameter)
                .with_run_time(0.01);
            if let Some(stdout) = self.stdout_by_stage.get(&stage.id) {
                log = log.with_stdout(stdout.clone());
            }
            logs.push(log);
        }

        self.executed.lock().unwrap().push(chain.clone());
        Ok(ChainExecution::new(logs))
    }
}

/// Engine that executes operations inline at enqueue time.
///
/// Terminal envelopes are stored per resource id; `wait_until_finished`
/// returns them immediately. Workspaces stay alive until the engine is
/// dropped so result files remain readable.
pub struct StubEngine {
    runner: Arc<StubRunner>,
    responses: Mutex<HashMap<String, ProcessingResponse>>,
    workspaces: Mutex<Vec<TempDir>>,
}

impl StubEngine {
    pub fn new(runner: StubRunner) -> Self {
        Self {
            runner: Arc::new(runner),
            responses: Mutex::new(HashMap::new()),
            workspaces: Mutex::new(Vec::new()),
        }
    }

    pub fn runner(&self) -> &StubRunner {
        &self.runner
    }
}

#[async_trait]
impl ProcessingEngine for StubEngine {
    async fn preprocess(
        &self,
        params: RouteParams,
        body: Option<Value>,
    ) -> GeostatResult<RequestDescriptor> {
        let mut descriptor = RequestDescriptor::new(params, names::USER);
        if let Some(body) = body {
            descriptor = descriptor.with_body(body);
        }
        Ok(descriptor)
    }

    async fn enqueue(
        &self,
        descriptor: RequestDescriptor,
        operation: Box<dyn EphemeralOperation>,
        _timeout: Duration,
    ) -> GeostatResult<SubmittedJob> {
        let accepted = ProcessingResponse::accepted(&descriptor.resource_id, &descriptor.user_id);
        let handle = JobHandle::from(&descriptor);

        let dir = tempfile::tempdir()?;
        let ctx = JobContext::new(
            descriptor,
            Workspace::new(dir.path()),
            self.runner.clone(),
        );
        let outcome = operation.execute(&ctx).await;
        let process_log = ctx.process_log().await;

        let terminal = match outcome {
            Ok(results) => accepted.clone().finish(results),
            Err(ref err) => accepted.clone().fail(err),
        }
        .with_process_log(process_log);

        self.workspaces.lock().unwrap().push(dir);
        self.responses
            .lock()
            .unwrap()
            .insert(handle.resource_id.clone(), terminal);

        Ok(SubmittedJob::new(handle, accepted))
    }

    async fn wait_until_finished(&self, handle: &JobHandle) -> GeostatResult<ProcessingResponse> {
        self.responses
            .lock()
            .unwrap()
            .get(&handle.resource_id)
            .cloned()
            .ok_or_else(|| {
                GeostatError::Engine(format!("unknown resource '{}'", handle.resource_id))
            })
    }
}
