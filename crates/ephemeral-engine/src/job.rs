//! Job handles and submission results.

use serde::{Deserialize, Serialize};

use stats_protocol::ProcessingResponse;

use crate::descriptor::RequestDescriptor;

/// Identity of an enqueued job, used for status polling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    pub resource_id: String,
    pub user_id: String,
}

impl JobHandle {
    pub fn new(resource_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            user_id: user_id.into(),
        }
    }
}

impl From<&RequestDescriptor> for JobHandle {
    fn from(descriptor: &RequestDescriptor) -> Self {
        Self::new(descriptor.resource_id.clone(), descriptor.user_id.clone())
    }
}

/// Result of enqueueing an operation: the pollable handle plus the
/// accepted envelope the asynchronous endpoints hand straight back.
#[derive(Debug, Clone)]
pub struct SubmittedJob {
    pub handle: JobHandle,
    pub accepted: ProcessingResponse,
}

impl SubmittedJob {
    pub fn new(handle: JobHandle, accepted: ProcessingResponse) -> Self {
        Self { handle, accepted }
    }
}
