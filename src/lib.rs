//! Carries camera EXIF metadata from an original capture onto its processed copy, optionally
//! geotagging it with the best location fix available at capture time.

pub mod config;
pub mod coordinate;
pub mod error;
pub mod location;
pub mod metadata;
pub mod orientation;
pub mod processor;
pub mod store;
pub mod tags;

pub use crate::error::AppError;
pub use crate::location::{Location, LocationTracker, PositioningService, Provider};
pub use crate::metadata::MetadataRecord;
pub use crate::store::AttributeStore;
pub use crate::tags::ExifTag;
