//! Interface to the external ephemeral-processing engine.
//!
//! The engine itself (the job queue, sandboxed mapset provisioning,
//! geoprocessing module execution and the status store) lives outside this
//! workspace. This crate describes exactly what the statistic operations
//! consume from it: request preprocessing, chain execution inside a
//! request-scoped workspace, job submission and the blocking wait used by
//! the synchronous endpoints.

pub mod descriptor;
pub mod execution;
pub mod job;
pub mod workspace;

pub use descriptor::{RequestDescriptor, RouteParams};
pub use execution::{ChainExecution, ExecuteOptions};
pub use job::{JobHandle, SubmittedJob};
pub use workspace::Workspace;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use geostat_common::GeostatResult;
use process_chain::Chain;
use stats_protocol::{ProcessResults, ProcessingResponse, StageLog};

/// Executes process chains inside a request workspace.
///
/// A stage exiting non-zero aborts the run with a fatal error; on success
/// the execution carries one log record per stage and any declared output
/// files exist on disk.
#[async_trait]
pub trait ChainRunner: Send + Sync {
    async fn run_chain(
        &self,
        workspace: &Workspace,
        chain: &Chain,
        options: ExecuteOptions,
    ) -> GeostatResult<ChainExecution>;
}

/// Per-job state the engine hands to an operation worker.
///
/// Collects the stage logs of every chain run through it, so the engine
/// can attach the full process log to the terminal response envelope.
pub struct JobContext {
    descriptor: RequestDescriptor,
    workspace: Workspace,
    runner: Arc<dyn ChainRunner>,
    logs: Mutex<Vec<StageLog>>,
}

impl JobContext {
    pub fn new(
        descriptor: RequestDescriptor,
        workspace: Workspace,
        runner: Arc<dyn ChainRunner>,
    ) -> Self {
        Self {
            descriptor,
            workspace,
            runner,
            logs: Mutex::new(Vec::new()),
        }
    }

    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.descriptor
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Run a chain and record its stage logs.
    pub async fn run_chain(
        &self,
        chain: &Chain,
        options: ExecuteOptions,
    ) -> GeostatResult<ChainExecution> {
        let execution = self
            .runner
            .run_chain(&self.workspace, chain, options)
            .await?;
        self.logs
            .lock()
            .await
            .extend(execution.stage_logs().iter().cloned());
        Ok(execution)
    }

    /// All stage logs collected so far, in execution order.
    pub async fn process_log(&self) -> Vec<StageLog> {
        self.logs.lock().await.clone()
    }
}

/// One statistic or sampling computation, executed by an engine worker.
#[async_trait]
pub trait EphemeralOperation: Send + Sync {
    /// Stable name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Build chains, run them through the context and parse the output.
    async fn execute(&self, ctx: &JobContext) -> GeostatResult<ProcessResults>;
}

/// The engine calls consumed by the HTTP handlers.
#[async_trait]
pub trait ProcessingEngine: Send + Sync {
    /// Validate and normalize request parameters into a descriptor.
    async fn preprocess(
        &self,
        params: RouteParams,
        body: Option<Value>,
    ) -> GeostatResult<RequestDescriptor>;

    /// Queue an operation for execution; returns immediately with a
    /// pollable handle and the accepted response envelope.
    async fn enqueue(
        &self,
        descriptor: RequestDescriptor,
        operation: Box<dyn EphemeralOperation>,
        timeout: Duration,
    ) -> GeostatResult<SubmittedJob>;

    /// Block until the job reaches a terminal state and return its final
    /// envelope.
    async fn wait_until_finished(&self, handle: &JobHandle) -> GeostatResult<ProcessingResponse>;
}
