//! Attribute stores: named string attributes over an image's metadata.
//!
//! The transfer only ever talks to [`AttributeStore`]; how values reach the file is up to the
//! implementation.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use exif::{In, Reader, Value};

use crate::error::AppError;
use crate::tags::ExifTag;

pub trait AttributeStore {
    fn get(&self, tag: ExifTag) -> Result<Option<String>, AppError>;
    fn set(&mut self, tag: ExifTag, value: &str) -> Result<(), AppError>;
    /// Persists every attribute set so far.
    fn commit(&mut self) -> Result<(), AppError>;
}

/// In-memory store that records each call it receives.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<ExifTag, String>,
    pub sets: Vec<(ExifTag, String)>,
    pub commits: usize,
    fail_on_set: Option<ExifTag>,
    fail_on_commit: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = (ExifTag, S)>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(|(t, v)| (t, v.into())).collect(),
            ..Self::default()
        }
    }

    /// Makes `set` fail with an I/O error when it reaches `tag`.
    pub fn failing_on_set(mut self, tag: ExifTag) -> Self {
        self.fail_on_set = Some(tag);
        self
    }

    pub fn failing_on_commit(mut self) -> Self {
        self.fail_on_commit = true;
        self
    }

    pub fn value(&self, tag: ExifTag) -> Option<&str> {
        self.values.get(&tag).map(String::as_str)
    }
}

impl AttributeStore for MemoryStore {
    fn get(&self, tag: ExifTag) -> Result<Option<String>, AppError> {
        Ok(self.values.get(&tag).cloned())
    }

    fn set(&mut self, tag: ExifTag, value: &str) -> Result<(), AppError> {
        if self.fail_on_set == Some(tag) {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("cannot write {}", tag),
            )));
        }
        self.sets.push((tag, value.to_string()));
        self.values.insert(tag, value.to_string());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), AppError> {
        if self.fail_on_commit {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "commit failed",
            )));
        }
        self.commits += 1;
        Ok(())
    }
}

/// Read-only view over the EXIF segment embedded in an image file.
#[derive(Debug)]
pub struct ExifFileStore {
    values: HashMap<ExifTag, String>,
}

impl ExifFileStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        log::trace!("Extracting EXIF data for image: {:?}", path);
        let file = File::open(path)?;
        let mut buf_reader = BufReader::new(file);

        let exif = match Reader::new().read_from_container(&mut buf_reader) {
            Ok(exif) => Some(exif),
            Err(exif::Error::NotFound(_)) => {
                log::debug!("No EXIF data found for {:?}", path);
                None
            }
            Err(exif::Error::Io(e)) => return Err(AppError::Io(e)),
            Err(e) => return Err(AppError::Exif(e)),
        };

        let mut values = HashMap::new();
        if let Some(exif) = exif {
            for tag in ExifTag::ALL {
                if let Some(field) = exif.get_field(tag.to_exif_tag(), In::PRIMARY) {
                    let text = render_value(&field.value)
                        .unwrap_or_else(|| field.display_value().to_string());
                    log::trace!("{} = {:?}", tag, text);
                    values.insert(tag, text);
                }
            }
        }
        log::debug!("Read {} known tags from {:?}", values.len(), path);

        Ok(Self { values })
    }
}

impl AttributeStore for ExifFileStore {
    fn get(&self, tag: ExifTag) -> Result<Option<String>, AppError> {
        Ok(self.values.get(&tag).cloned())
    }

    fn set(&mut self, _tag: ExifTag, _value: &str) -> Result<(), AppError> {
        Err(AppError::ReadOnly)
    }

    fn commit(&mut self) -> Result<(), AppError> {
        Err(AppError::ReadOnly)
    }
}

const UNDEFINED_CHARSET_LEN: usize = 8;

/// Text form of a decoded EXIF value, in the same shape the store accepts back.
fn render_value(value: &Value) -> Option<String> {
    fn join<T: ToString>(items: &[T]) -> String {
        items.iter().map(T::to_string).collect::<Vec<_>>().join(",")
    }

    match value {
        Value::Ascii(parts) => parts
            .first()
            .map(|p| String::from_utf8_lossy(p).trim_end_matches('\0').to_string()),
        Value::Rational(rs) => Some(
            rs.iter()
                .map(|r| format!("{}/{}", r.num, r.denom))
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::SRational(rs) => Some(
            rs.iter()
                .map(|r| format!("{}/{}", r.num, r.denom))
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Byte(v) => Some(join(v)),
        Value::Short(v) => Some(join(v)),
        Value::Long(v) => Some(join(v)),
        Value::SShort(v) => Some(join(v)),
        Value::SLong(v) => Some(join(v)),
        Value::Undefined(bytes, _) => {
            // GPSProcessingMethod and friends start with an 8-byte character code.
            let body = if bytes.len() >= UNDEFINED_CHARSET_LEN
                && bytes.starts_with(b"ASCII\0\0\0")
            {
                &bytes[UNDEFINED_CHARSET_LEN..]
            } else {
                &bytes[..]
            };
            Some(String::from_utf8_lossy(body).trim_end_matches('\0').to_string())
        }
        _ => None,
    }
}

/// Path of the sidecar holding attributes for `image`.
pub fn sidecar_path<P: AsRef<Path>>(image: P, extension: &str) -> PathBuf {
    let mut name = image.as_ref().as_os_str().to_os_string();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Writable attribute store persisted as a JSON object next to the image.
///
/// Attributes the store does not know about are kept untouched across a commit.
#[derive(Debug)]
pub struct SidecarStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl SidecarStore {
    /// Opens the sidecar at `path`; a missing file opens as an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let text = fs::read_to_string(&path)?;
            serde_json::from_str(&text)?
        } else {
            log::debug!("Sidecar {:?} does not exist yet, starting empty", path);
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AttributeStore for SidecarStore {
    fn get(&self, tag: ExifTag) -> Result<Option<String>, AppError> {
        Ok(self.values.get(tag.name()).cloned())
    }

    fn set(&mut self, tag: ExifTag, value: &str) -> Result<(), AppError> {
        self.values.insert(tag.name().to_string(), value.to_string());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), AppError> {
        let text = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, text)?;
        log::debug!("Saved {} attributes to {:?}", self.values.len(), self.path);
        Ok(())
    }
}
