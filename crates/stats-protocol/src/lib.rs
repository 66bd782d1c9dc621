//! Wire types for the statistic and sampling endpoints.
//!
//! This crate holds the request bodies clients send, the typed result
//! records the operations produce, and the processing response envelope
//! every endpoint returns.

pub mod requests;
pub mod responses;
pub mod results;

pub use requests::{validate_geojson, PointListBody};
pub use responses::{
    ErrorResponse, JobStatus, ProcessingResponse, Progress, StageLog, StatusUrls,
};
pub use results::{AreaUnivarStatistics, CategoricalStatistics, PointSample, ProcessResults};
