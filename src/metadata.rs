// src/metadata.rs

use crate::config::DatestampZone;
use crate::coordinate::{convert_coordinate, format_datestamp, latitude_ref, longitude_ref};
use crate::error::AppError;
use crate::location::Location;
use crate::orientation::{rotation_for_tag_value, Orientation};
use crate::store::AttributeStore;
use crate::tags::ExifTag;

/// Camera metadata captured from one original image.
///
/// A `None` field was absent in the source and is never written to a destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
    pub aperture: Option<String>,
    pub datetime: Option<String>,
    pub exposure_time: Option<String>,
    pub flash: Option<String>,
    pub focal_length: Option<String>,
    pub iso: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub orientation: Option<String>,
    pub white_balance: Option<String>,
    pub gps_altitude: Option<String>,
    pub gps_altitude_ref: Option<String>,
    pub gps_date_stamp: Option<String>,
    pub gps_latitude: Option<String>,
    pub gps_latitude_ref: Option<String>,
    pub gps_longitude: Option<String>,
    pub gps_longitude_ref: Option<String>,
    pub gps_processing_method: Option<String>,
    pub gps_timestamp: Option<String>,
}

impl MetadataRecord {
    pub fn field(&self, tag: ExifTag) -> Option<&str> {
        let value = match tag {
            ExifTag::Aperture => &self.aperture,
            ExifTag::DateTime => &self.datetime,
            ExifTag::ExposureTime => &self.exposure_time,
            ExifTag::Flash => &self.flash,
            ExifTag::FocalLength => &self.focal_length,
            ExifTag::GpsAltitude => &self.gps_altitude,
            ExifTag::GpsAltitudeRef => &self.gps_altitude_ref,
            ExifTag::GpsDateStamp => &self.gps_date_stamp,
            ExifTag::GpsLatitude => &self.gps_latitude,
            ExifTag::GpsLatitudeRef => &self.gps_latitude_ref,
            ExifTag::GpsLongitude => &self.gps_longitude,
            ExifTag::GpsLongitudeRef => &self.gps_longitude_ref,
            ExifTag::GpsProcessingMethod => &self.gps_processing_method,
            ExifTag::GpsTimestamp => &self.gps_timestamp,
            ExifTag::Iso => &self.iso,
            ExifTag::Make => &self.make,
            ExifTag::Model => &self.model,
            ExifTag::Orientation => &self.orientation,
            ExifTag::WhiteBalance => &self.white_balance,
        };
        value.as_deref()
    }

    pub fn field_mut(&mut self, tag: ExifTag) -> &mut Option<String> {
        match tag {
            ExifTag::Aperture => &mut self.aperture,
            ExifTag::DateTime => &mut self.datetime,
            ExifTag::ExposureTime => &mut self.exposure_time,
            ExifTag::Flash => &mut self.flash,
            ExifTag::FocalLength => &mut self.focal_length,
            ExifTag::GpsAltitude => &mut self.gps_altitude,
            ExifTag::GpsAltitudeRef => &mut self.gps_altitude_ref,
            ExifTag::GpsDateStamp => &mut self.gps_date_stamp,
            ExifTag::GpsLatitude => &mut self.gps_latitude,
            ExifTag::GpsLatitudeRef => &mut self.gps_latitude_ref,
            ExifTag::GpsLongitude => &mut self.gps_longitude,
            ExifTag::GpsLongitudeRef => &mut self.gps_longitude_ref,
            ExifTag::GpsProcessingMethod => &mut self.gps_processing_method,
            ExifTag::GpsTimestamp => &mut self.gps_timestamp,
            ExifTag::Iso => &mut self.iso,
            ExifTag::Make => &mut self.make,
            ExifTag::Model => &mut self.model,
            ExifTag::Orientation => &mut self.orientation,
            ExifTag::WhiteBalance => &mut self.white_balance,
        }
    }

    /// Reads every known tag from `source`. Values are kept as opaque strings.
    pub fn read_from(source: &dyn AttributeStore) -> Result<Self, AppError> {
        let mut record = MetadataRecord::default();
        for tag in ExifTag::ALL {
            let value = source.get(tag)?;
            log::trace!("Read {}: {:?}", tag, value);
            *record.field_mut(tag) = value;
        }
        Ok(record)
    }

    /// Writes the present fields to `destination` and commits it.
    ///
    /// Without a destination this does nothing. A failing `set` aborts the remaining writes
    /// and the commit; whatever already reached the store stays there.
    pub fn write_to(
        &self,
        destination: Option<&mut dyn AttributeStore>,
    ) -> Result<usize, AppError> {
        let destination = match destination {
            Some(d) => d,
            None => {
                log::debug!("No destination bound, skipping EXIF write");
                return Ok(0);
            }
        };

        let mut written = 0;
        for tag in ExifTag::ALL {
            if let Some(value) = self.field(tag) {
                log::trace!("Writing {} = {:?}", tag, value);
                destination.set(tag, value)?;
                written += 1;
            }
        }

        destination.commit()?;
        log::debug!("Committed {} tags", written);
        Ok(written)
    }

    /// Clockwise rotation in degrees encoded by the orientation tag.
    ///
    /// The tag must have been read and must hold an integer; integers other than the four
    /// rotations decode to 0.
    pub fn rotation(&self) -> Result<u16, AppError> {
        let raw = self.orientation.as_deref().ok_or_else(|| AppError::Parse {
            tag: ExifTag::Orientation.name(),
            value: String::new(),
        })?;
        let value: i64 = raw.parse().map_err(|_| AppError::Parse {
            tag: ExifTag::Orientation.name(),
            value: raw.to_string(),
        })?;
        Ok(rotation_for_tag_value(value))
    }

    /// Marks the image as upright, for pixels that were already rotated.
    pub fn reset_orientation(&mut self) {
        self.set_orientation(Orientation::Normal);
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = Some(orientation.tag_value().to_string());
    }

    /// Overwrites the position and datestamp tags from a fix.
    ///
    /// Every value is computed before any field changes, so on error the record is untouched.
    pub fn set_gps(&mut self, location: &Location, zone: DatestampZone) -> Result<(), AppError> {
        let latitude = convert_coordinate(location.latitude)?;
        let longitude = convert_coordinate(location.longitude)?;
        let date_stamp = format_datestamp(location.timestamp_ms, zone)?;

        self.gps_latitude = Some(latitude);
        self.gps_latitude_ref = Some(latitude_ref(location.latitude).to_string());
        self.gps_longitude = Some(longitude);
        self.gps_longitude_ref = Some(longitude_ref(location.longitude).to_string());
        self.gps_date_stamp = Some(date_stamp);
        Ok(())
    }

    pub fn has_gps(&self) -> bool {
        self.gps_latitude.is_some() && self.gps_longitude.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Provider;
    use crate::store::MemoryStore;

    fn full_source() -> MemoryStore {
        MemoryStore::with_values(
            ExifTag::ALL
                .iter()
                .map(|tag| (*tag, format!("value-{}", tag.name()))),
        )
    }

    fn fix(latitude: f64, longitude: f64) -> Location {
        Location {
            provider: Provider::Gps,
            latitude,
            longitude,
            timestamp_ms: 1_614_834_367_890,
        }
    }

    #[test]
    fn reads_every_tag() {
        let record = MetadataRecord::read_from(&full_source()).unwrap();
        for tag in ExifTag::ALL {
            assert_eq!(record.field(tag), Some(format!("value-{}", tag.name()).as_str()));
        }
    }

    #[test]
    fn absent_source_tags_stay_unset() {
        let source = MemoryStore::with_values([(ExifTag::Make, "Acme")]);
        let record = MetadataRecord::read_from(&source).unwrap();
        assert_eq!(record.make.as_deref(), Some("Acme"));
        assert_eq!(record.model, None);
        assert_eq!(record.orientation, None);
    }

    #[test]
    fn make_and_model_only_produces_two_sets_and_one_commit() {
        let source = MemoryStore::with_values([(ExifTag::Make, "Acme"), (ExifTag::Model, "X100")]);
        let record = MetadataRecord::read_from(&source).unwrap();

        let mut destination = MemoryStore::new();
        let written = record.write_to(Some(&mut destination)).unwrap();

        assert_eq!(written, 2);
        assert_eq!(
            destination.sets,
            vec![
                (ExifTag::Make, "Acme".to_string()),
                (ExifTag::Model, "X100".to_string())
            ]
        );
        assert_eq!(destination.commits, 1);
    }

    #[test]
    fn null_field_is_never_written_for_any_tag() {
        let full = MetadataRecord::read_from(&full_source()).unwrap();
        for missing in ExifTag::ALL {
            let mut record = full.clone();
            *record.field_mut(missing) = None;

            let mut destination = MemoryStore::new();
            let written = record.write_to(Some(&mut destination)).unwrap();

            assert_eq!(written, 18, "{}", missing);
            assert!(
                destination.sets.iter().all(|(tag, _)| *tag != missing),
                "{} was written",
                missing
            );
            assert_eq!(destination.commits, 1);
        }
    }

    #[test]
    fn writes_follow_table_order() {
        let record = MetadataRecord::read_from(&full_source()).unwrap();
        let mut destination = MemoryStore::new();
        record.write_to(Some(&mut destination)).unwrap();

        let order: Vec<ExifTag> = destination.sets.iter().map(|(t, _)| *t).collect();
        assert_eq!(order, ExifTag::ALL.to_vec());
    }

    #[test]
    fn empty_record_still_commits() {
        let mut destination = MemoryStore::new();
        assert_eq!(MetadataRecord::default().write_to(Some(&mut destination)).unwrap(), 0);
        assert!(destination.sets.is_empty());
        assert_eq!(destination.commits, 1);
    }

    #[test]
    fn unbound_destination_is_a_no_op() {
        let record = MetadataRecord::read_from(&full_source()).unwrap();
        assert_eq!(record.write_to(None).unwrap(), 0);
    }

    #[test]
    fn failing_set_aborts_remaining_writes_and_commit() {
        let record = MetadataRecord::read_from(&full_source()).unwrap();
        let mut destination = MemoryStore::new().failing_on_set(ExifTag::Flash);

        let err = record.write_to(Some(&mut destination)).unwrap_err();
        assert!(err.is_io());
        let order: Vec<ExifTag> = destination.sets.iter().map(|(t, _)| *t).collect();
        assert_eq!(
            order,
            vec![ExifTag::Aperture, ExifTag::DateTime, ExifTag::ExposureTime]
        );
        assert_eq!(destination.commits, 0);
    }

    #[test]
    fn failing_commit_is_surfaced() {
        let record = MetadataRecord {
            make: Some("Acme".into()),
            ..Default::default()
        };
        let mut destination = MemoryStore::new().failing_on_commit();
        assert!(record.write_to(Some(&mut destination)).unwrap_err().is_io());
    }

    #[test]
    fn rotation_decodes_known_values() {
        let mut record = MetadataRecord::default();
        for (raw, degrees) in [("1", 0), ("6", 90), ("3", 180), ("8", 270), ("2", 0), ("0", 0)] {
            record.orientation = Some(raw.to_string());
            assert_eq!(record.rotation().unwrap(), degrees, "{}", raw);
        }
    }

    #[test]
    fn rotation_round_trips_through_record() {
        let mut record = MetadataRecord::default();
        for orientation in Orientation::ALL {
            record.set_orientation(orientation);
            assert_eq!(record.rotation().unwrap(), orientation.degrees());
        }
    }

    #[test]
    fn rotation_rejects_non_integer_and_missing() {
        let mut record = MetadataRecord::default();
        assert!(matches!(record.rotation(), Err(AppError::Parse { .. })));

        record.orientation = Some(" 6 ".into());
        assert!(matches!(record.rotation(), Err(AppError::Parse { .. })));

        record.orientation = Some("sideways".into());
        match record.rotation() {
            Err(AppError::Parse { tag, value }) => {
                assert_eq!(tag, "Orientation");
                assert_eq!(value, "sideways");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn reset_orientation_writes_normal() {
        let mut record = MetadataRecord {
            orientation: Some("6".into()),
            ..Default::default()
        };
        record.reset_orientation();
        assert_eq!(record.orientation.as_deref(), Some("1"));
        assert_eq!(record.rotation().unwrap(), 0);
    }

    #[test]
    fn set_gps_fills_position_tags() {
        let mut record = MetadataRecord::default();
        record.set_gps(&fix(-33.8688, 151.2093), DatestampZone::Utc).unwrap();

        assert_eq!(record.gps_latitude.as_deref(), Some("33/1,52/1,7680/1000,"));
        assert_eq!(record.gps_latitude_ref.as_deref(), Some("S"));
        assert_eq!(record.gps_longitude.as_deref(), Some("151/1,12/1,33480/1000,"));
        assert_eq!(record.gps_longitude_ref.as_deref(), Some("E"));
        assert_eq!(record.gps_date_stamp.as_deref(), Some("2021:03:04 05:06:07"));
        assert!(record.has_gps());
        assert_eq!(record.gps_altitude, None);
    }

    #[test]
    fn set_gps_failure_leaves_record_untouched() {
        let mut record = MetadataRecord {
            gps_latitude: Some("1/1,0/1,0/1000,".into()),
            ..Default::default()
        };
        let before = record.clone();

        let mut bad_time = fix(10.0, 20.0);
        bad_time.timestamp_ms = i64::MAX;
        assert!(matches!(
            record.set_gps(&bad_time, DatestampZone::Utc),
            Err(AppError::Conversion(_))
        ));
        assert!(record.set_gps(&fix(f64::NAN, 20.0), DatestampZone::Utc).is_err());
        assert_eq!(record, before);
    }

    #[test]
    fn has_gps_needs_both_coordinates() {
        let mut record = MetadataRecord::default();
        assert!(!record.has_gps());
        record.gps_latitude = Some("1/1,0/1,0/1000,".into());
        assert!(!record.has_gps());
        record.gps_longitude = Some("2/1,0/1,0/1000,".into());
        assert!(record.has_gps());
        record.gps_latitude = None;
        assert!(!record.has_gps());
    }
}
