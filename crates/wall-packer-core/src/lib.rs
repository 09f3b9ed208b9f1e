//! Core library for packing prefabricated blocks into wall layouts.
//!
//! - Variants: bidirectional greedy (alternating rows, running bond) and the
//!   small residential variant (pinned direction, moraletti grid, piedini).
//! - Pipeline: `pack_wall` takes a wall polygon, apertures and a catalog,
//!   and returns a labeled placement of standard blocks and custom pieces.
//! - Data model is serde-serializable; the CLI crate drives the JSON
//!   boundary.
//!
//! Quick example:
//! ```ignore
//! use wall_packer_core::prelude::*;
//!
//! let wall = geom::rect(0.0, 0.0, 5000.0, 2475.0);
//! let req = PackRequest::builder(wall).build();
//! let placement = pack_wall(&req)?;
//! println!("{}", placement.metrics.summary());
//! ```

pub mod config;
pub mod debug;
pub mod error;
pub mod geom;
pub mod labeling;
pub mod model;
pub mod packer;
pub mod pipeline;
pub mod postprocess;
pub mod rows;

pub use config::*;
pub use error::*;
pub use model::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `wall_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{
        Algorithm, BlockCatalog, EngineConfig, MoralettiConfig, PackRequest, PackRequestBuilder,
        StartingDirection,
    };
    pub use crate::debug::{CollectingSink, DebugEvent, DebugSink, NullSink};
    pub use crate::error::{PackError, Result};
    pub use crate::geom;
    pub use crate::model::{
        CategoryKind, CategorySummary, CustomKind, CustomPiece, PieceGeometry, Placement,
        PlacementMetrics, StandardBlock,
    };
    pub use crate::pipeline::{pack_wall, pack_wall_with_sink};
    pub use crate::rows::{RowBand, RowIter};
}
