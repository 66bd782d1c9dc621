//! Common types and utilities shared across the geostat statistic services.

pub mod error;
pub mod map;
pub mod point;
pub mod time;

pub use error::{GeostatError, GeostatResult};
pub use map::MapRef;
pub use point::{sample_points_from_triples, SamplePoint};
pub use time::{parse_strds_timestamp, STRDS_TIMESTAMP_FORMAT};
