use std::path::Path;

use crate::config::{AppConfig, DatestampZone};
use crate::error::AppError;
use crate::location::Location;
use crate::metadata::MetadataRecord;
use crate::store::{sidecar_path, AttributeStore, ExifFileStore, SidecarStore};

#[derive(Debug, Clone, Default)]
pub struct CaptureOptions {
    /// The processed image was already rotated upright.
    pub reset_orientation: bool,
    pub location: Option<Location>,
    pub datestamp_zone: DatestampZone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureReport {
    pub tags_written: usize,
    pub gps_applied: bool,
    /// Rotation the original asked viewers to apply, if its orientation tag was readable.
    pub rotation: Option<u16>,
}

/// Carries the metadata of one capture from `source` to `destination`.
///
/// A fix that cannot be encoded is logged and skipped; the remaining tags are still written.
pub fn process_capture(
    source: &dyn AttributeStore,
    destination: Option<&mut dyn AttributeStore>,
    options: &CaptureOptions,
) -> Result<CaptureReport, AppError> {
    let mut record = MetadataRecord::read_from(source)?;
    log::trace!("Extracted metadata: {:?}", record);

    let rotation = match record.rotation() {
        Ok(degrees) => Some(degrees),
        Err(e) => {
            log::debug!("Original rotation unknown: {}", e);
            None
        }
    };

    if options.reset_orientation {
        log::debug!("Resetting orientation (was {:?})", record.orientation);
        record.reset_orientation();
    }

    let mut gps_applied = false;
    if let Some(location) = &options.location {
        match record.set_gps(location, options.datestamp_zone) {
            Ok(()) => {
                log::debug!(
                    "Geotagged with {} fix {},{}",
                    location.provider,
                    location.latitude,
                    location.longitude
                );
                gps_applied = true;
            }
            Err(e) => log::warn!("Could not geotag capture: {}", e),
        }
    }

    let tags_written = record.write_to(destination)?;
    Ok(CaptureReport {
        tags_written,
        gps_applied,
        rotation,
    })
}

/// Reads the original image's EXIF and writes it to the processed image's sidecar.
pub fn process_files(
    config: &AppConfig,
    original: &Path,
    processed: &Path,
    options: &CaptureOptions,
) -> Result<CaptureReport, AppError> {
    log::info!("Processing capture started for: {:?}", original);
    let source = ExifFileStore::open(original)?;
    let mut destination = SidecarStore::open(sidecar_path(processed, &config.sidecar_extension))?;

    let report = process_capture(&source, Some(&mut destination), options)?;
    log::info!(
        "Processing capture finished for: {:?} ({} tags to {:?})",
        original,
        report.tags_written,
        destination.path()
    );
    Ok(report)
}
