use std::fmt;

/// The fixed set of EXIF attributes carried from an original capture to its processed copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExifTag {
    Aperture,
    DateTime,
    ExposureTime,
    Flash,
    FocalLength,
    GpsAltitude,
    GpsAltitudeRef,
    GpsDateStamp,
    GpsLatitude,
    GpsLatitudeRef,
    GpsLongitude,
    GpsLongitudeRef,
    GpsProcessingMethod,
    GpsTimestamp,
    Iso,
    Make,
    Model,
    Orientation,
    WhiteBalance,
}

impl ExifTag {
    /// All known tags, in the order they are written to a destination store.
    pub const ALL: [ExifTag; 19] = [
        ExifTag::Aperture,
        ExifTag::DateTime,
        ExifTag::ExposureTime,
        ExifTag::Flash,
        ExifTag::FocalLength,
        ExifTag::GpsAltitude,
        ExifTag::GpsAltitudeRef,
        ExifTag::GpsDateStamp,
        ExifTag::GpsLatitude,
        ExifTag::GpsLatitudeRef,
        ExifTag::GpsLongitude,
        ExifTag::GpsLongitudeRef,
        ExifTag::GpsProcessingMethod,
        ExifTag::GpsTimestamp,
        ExifTag::Iso,
        ExifTag::Make,
        ExifTag::Model,
        ExifTag::Orientation,
        ExifTag::WhiteBalance,
    ];

    /// Attribute name as understood by the tag store. Case-sensitive.
    pub fn name(self) -> &'static str {
        match self {
            ExifTag::Aperture => "FNumber",
            ExifTag::DateTime => "DateTime",
            ExifTag::ExposureTime => "ExposureTime",
            ExifTag::Flash => "Flash",
            ExifTag::FocalLength => "FocalLength",
            ExifTag::GpsAltitude => "GPSAltitude",
            ExifTag::GpsAltitudeRef => "GPSAltitudeRef",
            ExifTag::GpsDateStamp => "GPSDateStamp",
            ExifTag::GpsLatitude => "GPSLatitude",
            ExifTag::GpsLatitudeRef => "GPSLatitudeRef",
            ExifTag::GpsLongitude => "GPSLongitude",
            ExifTag::GpsLongitudeRef => "GPSLongitudeRef",
            ExifTag::GpsProcessingMethod => "GPSProcessingMethod",
            ExifTag::GpsTimestamp => "GPSTimeStamp",
            ExifTag::Iso => "ISOSpeedRatings",
            ExifTag::Make => "Make",
            ExifTag::Model => "Model",
            ExifTag::Orientation => "Orientation",
            ExifTag::WhiteBalance => "WhiteBalance",
        }
    }

    pub fn from_name(name: &str) -> Option<ExifTag> {
        ExifTag::ALL.iter().copied().find(|tag| tag.name() == name)
    }

    /// The matching tag in the decoded EXIF segment of an image file.
    pub fn to_exif_tag(self) -> exif::Tag {
        match self {
            ExifTag::Aperture => exif::Tag::FNumber,
            ExifTag::DateTime => exif::Tag::DateTime,
            ExifTag::ExposureTime => exif::Tag::ExposureTime,
            ExifTag::Flash => exif::Tag::Flash,
            ExifTag::FocalLength => exif::Tag::FocalLength,
            ExifTag::GpsAltitude => exif::Tag::GPSAltitude,
            ExifTag::GpsAltitudeRef => exif::Tag::GPSAltitudeRef,
            ExifTag::GpsDateStamp => exif::Tag::GPSDateStamp,
            ExifTag::GpsLatitude => exif::Tag::GPSLatitude,
            ExifTag::GpsLatitudeRef => exif::Tag::GPSLatitudeRef,
            ExifTag::GpsLongitude => exif::Tag::GPSLongitude,
            ExifTag::GpsLongitudeRef => exif::Tag::GPSLongitudeRef,
            ExifTag::GpsProcessingMethod => exif::Tag::GPSProcessingMethod,
            ExifTag::GpsTimestamp => exif::Tag::GPSTimeStamp,
            ExifTag::Iso => exif::Tag::PhotographicSensitivity,
            ExifTag::Make => exif::Tag::Make,
            ExifTag::Model => exif::Tag::Model,
            ExifTag::Orientation => exif::Tag::Orientation,
            ExifTag::WhiteBalance => exif::Tag::WhiteBalance,
        }
    }
}

impl fmt::Display for ExifTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
