//! Processing response envelopes shared by every statistic endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use geostat_common::GeostatError;

use crate::results::ProcessResults;

/// Lifecycle states of an ephemeral processing job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Accepted,
    Running,
    Finished,
    Error,
    Terminated,
}

impl JobStatus {
    /// Whether the job reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Finished | JobStatus::Error | JobStatus::Terminated
        )
    }
}

/// Log record of one executed chain stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageLog {
    /// Stage id from the process chain.
    pub id: String,

    /// Executable the engine invoked.
    pub executable: String,

    /// Command line parameters as passed to the executable.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameter: Vec<String>,

    pub return_code: i32,

    /// Wall time of the invocation in seconds.
    pub run_time: f64,

    #[serde(default)]
    pub stdout: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stderr: Vec<String>,
}

impl StageLog {
    /// Create a log record for a successful invocation.
    pub fn new(id: impl Into<String>, executable: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            executable: executable.into(),
            parameter: Vec::new(),
            return_code: 0,
            run_time: 0.0,
            stdout: String::new(),
            stderr: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, parameter: Vec<String>) -> Self {
        self.parameter = parameter;
        self
    }

    pub fn with_return_code(mut self, return_code: i32) -> Self {
        self.return_code = return_code;
        self
    }

    pub fn with_run_time(mut self, run_time: f64) -> Self {
        self.run_time = run_time;
        self
    }

    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }

    pub fn with_stderr(mut self, stderr: Vec<String>) -> Self {
        self.stderr = stderr;
        self
    }
}

/// Progress through the stages of a submitted chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub step: u32,
    pub num_of_steps: u32,
}

/// URLs a client uses to follow a submitted job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUrls {
    /// Files produced by the job, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,

    /// Polling endpoint owned by the engine.
    pub status: String,
}

impl StatusUrls {
    /// Standard polling URL for a resource.
    pub fn polling(user_id: &str, resource_id: &str) -> Self {
        Self {
            resources: Vec::new(),
            status: format!("/resources/{}/{}", user_id, resource_id),
        }
    }
}

/// Envelope returned by every statistic endpoint and by status polling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResponse {
    pub status: JobStatus,

    pub resource_id: String,

    pub user_id: String,

    pub message: String,

    /// When the engine accepted the request.
    pub accept_datetime: DateTime<Utc>,

    /// When the job reached its current status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<DateTime<Utc>>,

    /// Seconds between acceptance and the terminal status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_delta: Option<f64>,

    pub urls: StatusUrls,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub process_log: Vec<StageLog>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_results: Option<ProcessResults>,

    /// HTTP status the envelope should be served with.
    pub http_code: u16,
}

impl ProcessingResponse {
    /// Envelope for a job the engine just accepted.
    pub fn accepted(resource_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        let resource_id = resource_id.into();
        let user_id = user_id.into();
        let urls = StatusUrls::polling(&user_id, &resource_id);
        Self {
            status: JobStatus::Accepted,
            resource_id,
            user_id,
            message: "Resource accepted".to_string(),
            accept_datetime: Utc::now(),
            datetime: None,
            time_delta: None,
            urls,
            progress: None,
            process_log: Vec::new(),
            process_results: None,
            http_code: 200,
        }
    }

    /// Mark the job finished and attach its results.
    pub fn finish(mut self, results: ProcessResults) -> Self {
        let now = Utc::now();
        self.status = JobStatus::Finished;
        self.message = "Processing successfully finished".to_string();
        self.time_delta = Some((now - self.accept_datetime).num_milliseconds() as f64 / 1000.0);
        self.datetime = Some(now);
        self.process_results = Some(results);
        self.http_code = 200;
        self
    }

    /// Mark the job failed with the error's message and status code.
    pub fn fail(mut self, error: &GeostatError) -> Self {
        let now = Utc::now();
        self.status = JobStatus::Error;
        self.message = error.to_string();
        self.time_delta = Some((now - self.accept_datetime).num_milliseconds() as f64 / 1000.0);
        self.datetime = Some(now);
        self.process_results = None;
        self.http_code = error.http_status_code();
        self
    }

    pub fn with_process_log(mut self, process_log: Vec<StageLog>) -> Self {
        self.process_log = process_log;
        self
    }

    pub fn with_progress(mut self, step: u32, num_of_steps: u32) -> Self {
        self.progress = Some(Progress { step, num_of_steps });
        self
    }
}

/// Error envelope for requests rejected before reaching the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always "error".
    pub status: String,

    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

impl From<&GeostatError> for ErrorResponse {
    fn from(err: &GeostatError) -> Self {
        Self::new(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::CategoricalStatistics;

    #[test]
    fn test_job_status_wire_names() {
        assert_eq!(
            serde_json::to_value(JobStatus::Accepted).unwrap(),
            serde_json::json!("accepted")
        );
        assert_eq!(
            serde_json::to_value(JobStatus::Finished).unwrap(),
            serde_json::json!("finished")
        );
        assert!(JobStatus::Error.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
    }

    #[test]
    fn test_accepted_envelope() {
        let response = ProcessingResponse::accepted("resource_id-abc", "tester");

        assert_eq!(response.status, JobStatus::Accepted);
        assert_eq!(response.http_code, 200);
        assert_eq!(response.urls.status, "/resources/tester/resource_id-abc");
        assert!(response.process_results.is_none());
        assert!(response.datetime.is_none());
    }

    #[test]
    fn test_finished_envelope_carries_results() {
        let results = ProcessResults::CategoricalStats(vec![CategoricalStatistics {
            cat: "1".to_string(),
            name: "developed".to_string(),
            area: 2609.75,
            cell_count: 4,
            percent: 0.1,
        }]);

        let response = ProcessingResponse::accepted("resource_id-abc", "tester")
            .with_progress(4, 4)
            .finish(results);

        assert_eq!(response.status, JobStatus::Finished);
        assert_eq!(response.message, "Processing successfully finished");
        assert!(response.datetime.is_some());
        assert!(response.time_delta.is_some());
        assert_eq!(response.progress, Some(Progress { step: 4, num_of_steps: 4 }));
        assert_eq!(response.process_results.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_envelope_maps_error_status() {
        let err = GeostatError::NoRasterForTimestamp {
            timestamp: "2016-01-01T00:00:00".to_string(),
        };
        let response = ProcessingResponse::accepted("resource_id-abc", "tester").fail(&err);

        assert_eq!(response.status, JobStatus::Error);
        assert_eq!(response.http_code, 400);
        assert_eq!(
            response.message,
            "No raster maps found for timestamp: 2016-01-01T00:00:00"
        );

        let timeout = ProcessingResponse::accepted("resource_id-def", "tester")
            .fail(&GeostatError::Timeout);
        assert_eq!(timeout.http_code, 504);
    }

    #[test]
    fn test_envelope_serialization_skips_unset_fields() {
        let response = ProcessingResponse::accepted("resource_id-abc", "tester");
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["status"], "accepted");
        assert!(value.get("datetime").is_none());
        assert!(value.get("process_log").is_none());
        assert!(value.get("process_results").is_none());
        assert!(value["accept_datetime"].is_string());
    }

    #[test]
    fn test_error_response_from_error() {
        let err = GeostatError::EmptyPointList;
        let body = ErrorResponse::from(&err);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"status": "error", "message": "Empty coordinate list"})
        );
    }

    #[test]
    fn test_stage_log_builders() {
        let log = StageLog::new("r_stats_4", "r.stats")
            .with_parameter(vec!["input=landuse96_28m@PERMANENT".to_string()])
            .with_stdout("")
            .with_run_time(0.05);

        assert_eq!(log.return_code, 0);
        let value = serde_json::to_value(&log).unwrap();
        assert!(value.get("stderr").is_none());
        assert_eq!(value["parameter"][0], "input=landuse96_28m@PERMANENT");
    }
}
