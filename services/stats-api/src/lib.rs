//! Statistic and sampling endpoints for rasters, vectors and space-time
//! raster datasets.
//!
//! This crate is the HTTP-facing plugin of the geostat services: it
//! validates requests, builds the matching [`geostat_ops`] operation and
//! drives it through the injected processing engine. Mount it from the
//! host server:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use stats_api::{create_endpoints, ApiConfig, AppState};
//! # fn engine() -> Arc<dyn ephemeral_engine::ProcessingEngine> { unimplemented!() }
//!
//! let state = Arc::new(AppState::new(engine(), ApiConfig::from_env()));
//! let router = create_endpoints(state);
//! ```

pub mod config;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod submit;

pub use config::ApiConfig;
pub use routes::create_endpoints;
pub use state::AppState;
pub use submit::ExecutionMode;
