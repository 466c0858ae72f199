//! Merge the building footprints (`fgd:BldA`) of the Japanese Fundamental Geospatial Data into a
//! single shapefile and GeoJSON, optionally clipped to a region of interest.

pub mod archive;
pub mod boundary;
pub mod config;
mod error;
pub mod export;
pub mod filter;
pub mod gml;
pub mod merge;
pub mod pipeline;
pub mod progress;
pub mod table;
pub mod walker;

pub use boundary::Boundary;
pub use config::{Config, PosListPolicy};
pub use error::{Error, SkipReason};
pub use filter::{FootprintIndex, Filtered, filter_with_boundary};
pub use pipeline::{RunReport, run};
pub use table::{BuildingRecord, Crs, FeatureTable, RowId};

pub type Result<O, E = Error> = std::result::Result<O, E>;
