//! EXIF metadata extraction for images
//!
//! The extractor works on a bounded prefix of the file bytes rather than the
//! whole file. Tags located beyond the prefix are reported as absent, never
//! as an error.

use exif::{In, Reader, Tag};
use std::io::Cursor;
use tracing::trace;

/// Maximum number of bytes handed to the EXIF reader per file.
pub const METADATA_PREFIX_BYTES: usize = 64 * 1024;

/// Candidate timestamps and camera info extracted from one file.
///
/// All string fields hold raw tag text as found in the file; absence is
/// `None`, never an empty string or sentinel date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
    /// EXIF DateTimeOriginal - when the picture was taken
    pub date_taken: Option<String>,
    /// EXIF DateTime - generic modification date/time
    pub date_time: Option<String>,
    /// EXIF DateTimeDigitized
    pub date_digitized: Option<String>,
    /// GPS date stamp; only meaningful together with `gps_time_stamp`
    pub gps_date_stamp: Option<String>,
    /// GPS time stamp; only meaningful together with `gps_date_stamp`
    pub gps_time_stamp: Option<String>,
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Whether any tag was found at all
    pub has_metadata: bool,
}

impl MetadataRecord {
    /// A record with every field absent, used when extraction fails.
    pub fn absent() -> Self {
        Self::default()
    }
}

/// Source of metadata records, injected into the batch processor.
pub trait MetadataSource {
    /// Extract a metadata record from a prefix of the file bytes.
    ///
    /// Never fails: unreadable or tag-free input yields an all-absent record.
    fn extract(&self, bytes: &[u8]) -> MetadataRecord;
}

/// Production metadata source backed by the kamadak-exif reader.
#[derive(Debug, Default)]
pub struct ExifMetadataSource;

impl MetadataSource for ExifMetadataSource {
    fn extract(&self, bytes: &[u8]) -> MetadataRecord {
        let capped = &bytes[..bytes.len().min(METADATA_PREFIX_BYTES)];

        let exif = match Reader::new().read_from_container(&mut Cursor::new(capped)) {
            Ok(exif) => exif,
            Err(e) => {
                trace!(error = %e, "No readable EXIF data in prefix");
                return MetadataRecord::absent();
            }
        };

        let mut record = MetadataRecord {
            date_taken: tag_string(&exif, Tag::DateTimeOriginal),
            date_time: tag_string(&exif, Tag::DateTime),
            date_digitized: tag_string(&exif, Tag::DateTimeDigitized),
            gps_date_stamp: tag_string(&exif, Tag::GPSDateStamp),
            gps_time_stamp: tag_string(&exif, Tag::GPSTimeStamp),
            camera_make: tag_string(&exif, Tag::Make),
            camera_model: tag_string(&exif, Tag::Model),
            width: tag_uint(&exif, Tag::PixelXDimension),
            height: tag_uint(&exif, Tag::PixelYDimension),
            has_metadata: false,
        };

        record.has_metadata = record.date_taken.is_some()
            || record.date_time.is_some()
            || record.date_digitized.is_some()
            || record.gps_date_stamp.is_some()
            || record.gps_time_stamp.is_some()
            || record.camera_make.is_some()
            || record.camera_model.is_some()
            || record.width.is_some()
            || record.height.is_some();

        record
    }
}

/// Read a tag as trimmed text, treating empty values as absent.
fn tag_string(exif: &exif::Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let text = field
        .display_value()
        .to_string()
        .trim()
        .trim_matches('"')
        .to_string();
    if text.is_empty() { None } else { Some(text) }
}

fn tag_uint(exif: &exif::Exif, tag: Tag) -> Option<u32> {
    exif.get_field(tag, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
}
