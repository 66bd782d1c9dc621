//! Typed process-chain construction for geoprocessing pipelines.
//!
//! A process chain is an ordered list of external tool invocations
//! ("stages") with explicit parameter wiring between them. This crate
//! provides a fluent builder API so chains are assembled with named fields
//! instead of ad hoc string maps, plus the wire serialization the
//! processing engine consumes.
//!
//! # Examples
//!
//! ```rust
//! use process_chain::{Chain, Stage};
//!
//! let chain = Chain::new()
//!     .stage(
//!         Stage::new("v_import_1", "v.import")
//!             .input("input", "/tmp/polygon.geojson")
//!             .output("output", "polygon")
//!             .superquiet(),
//!     )
//!     .stage(
//!         Stage::new("g_region_2", "g.region")
//!             .input("vector", "polygon")
//!             .flags("p"),
//!     );
//!
//! assert_eq!(chain.stage_ids(), vec!["v_import_1", "g_region_2"]);
//! ```

pub mod chain;
pub mod stage;

pub use chain::{Chain, CHAIN_VERSION};
pub use stage::{Parameter, Stage, StdoutCapture};
