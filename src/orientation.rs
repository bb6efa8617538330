/// EXIF orientations the transfer knows how to express as a clockwise rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Normal,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Normal,
        Orientation::Rotate90,
        Orientation::Rotate180,
        Orientation::Rotate270,
    ];

    /// Raw value stored in the `Orientation` tag.
    pub fn tag_value(self) -> i64 {
        match self {
            Orientation::Normal => 1,
            Orientation::Rotate90 => 6,
            Orientation::Rotate180 => 3,
            Orientation::Rotate270 => 8,
        }
    }

    /// Mirrored and unknown values are `None`.
    pub fn from_tag_value(value: i64) -> Option<Orientation> {
        Orientation::ALL.iter().copied().find(|o| o.tag_value() == value)
    }

    pub fn degrees(self) -> u16 {
        match self {
            Orientation::Normal => 0,
            Orientation::Rotate90 => 90,
            Orientation::Rotate180 => 180,
            Orientation::Rotate270 => 270,
        }
    }

    pub fn from_degrees(degrees: u16) -> Option<Orientation> {
        Orientation::ALL.iter().copied().find(|o| o.degrees() == degrees)
    }
}

/// Clockwise rotation for a raw tag value; anything outside the four rotations maps to 0.
pub fn rotation_for_tag_value(value: i64) -> u16 {
    Orientation::from_tag_value(value).map_or(0, Orientation::degrees)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_round_trips_through_tag_value() {
        for degrees in [0u16, 90, 180, 270] {
            let orientation = Orientation::from_degrees(degrees).unwrap();
            assert_eq!(rotation_for_tag_value(orientation.tag_value()), degrees);
        }
    }

    #[test]
    fn unknown_values_decode_to_zero() {
        for value in [0, 2, 4, 5, 7, 9, -1, 1000] {
            assert_eq!(rotation_for_tag_value(value), 0);
        }
    }

    #[test]
    fn only_right_angles_have_an_orientation() {
        assert_eq!(Orientation::from_degrees(45), None);
        assert_eq!(Orientation::from_degrees(360), None);
    }
}
