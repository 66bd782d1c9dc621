//! Statistic and sampling operations.
//!
//! One module per endpoint family. Each family contributes pure chain
//! builders, a parser for the text artifacts the final stage produces and
//! an [`EphemeralOperation`](ephemeral_engine::EphemeralOperation) that
//! ties both together inside an engine worker.
//!
//! The builders are deterministic: the same request input always yields
//! the same stage sequence, with only workspace file names varying.

pub mod area_stats;
pub mod area_stats_univar;
pub mod points;
pub mod polygon;
pub mod raster_sampling;
pub mod strds_sampling;
pub mod temporal;
pub mod vector_sampling;

pub use area_stats::{RasterAreaStats, StrdsAreaStats};
pub use area_stats_univar::{RasterAreaStatsUnivar, StrdsAreaStatsUnivar};
pub use raster_sampling::RasterSampling;
pub use strds_sampling::{StrdsGeojsonSampling, StrdsSampling};
pub use vector_sampling::VectorSampling;
