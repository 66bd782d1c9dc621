//! Request descriptors handed across the engine boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use geostat_common::{GeostatError, GeostatResult, MapRef};

/// Path parameters of a statistic route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteParams {
    /// Project (historically "location") holding the mapset.
    pub project: String,

    pub mapset: String,

    /// Target raster, vector or STRDS name.
    pub map_name: String,
}

impl RouteParams {
    pub fn new(
        project: impl Into<String>,
        mapset: impl Into<String>,
        map_name: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            mapset: mapset.into(),
            map_name: map_name.into(),
        }
    }
}

/// Everything the engine captured about one accepted request.
///
/// Owned by the engine; operations only read from it, and the handlers
/// attach at most one user datum (the STRDS selection timestamp).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    pub resource_id: String,

    pub user_id: String,

    pub project: String,

    pub mapset: String,

    pub map_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
}

impl RequestDescriptor {
    /// Create a descriptor with a fresh resource id.
    pub fn new(params: RouteParams, user_id: impl Into<String>) -> Self {
        Self {
            resource_id: format!("resource_id-{}", Uuid::new_v4()),
            user_id: user_id.into(),
            project: params.project,
            mapset: params.mapset,
            map_name: params.map_name,
            request_body: None,
            user_data: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.request_body = Some(body);
        self
    }

    /// Attach the single user datum threaded through to the operation.
    pub fn with_user_data(mut self, data: impl Into<String>) -> Self {
        self.user_data = Some(data.into());
        self
    }

    /// The target map qualified by its mapset.
    pub fn qualified_map(&self) -> String {
        MapRef::new(self.map_name.as_str(), self.mapset.as_str()).qualified()
    }

    /// Request body, or a descriptive missing-input error.
    pub fn body(&self, expects: &str) -> GeostatResult<&Value> {
        self.request_body
            .as_ref()
            .ok_or_else(|| GeostatError::MissingInput(expects.to_string()))
    }

    /// User datum, or a descriptive missing-input error.
    pub fn user_datum(&self, expects: &str) -> GeostatResult<&str> {
        self.user_data
            .as_deref()
            .ok_or_else(|| GeostatError::MissingInput(expects.to_string()))
    }
}
