//! Search-index documents for stored raster files.
//!
//! A stored object is described by a [`FileMetadata`] record, optionally
//! enriched with [`RasterProperties`] and a GDAL metadata map. The
//! [`IndexDocument`] built from it carries the record fields plus a
//! `content` blob: the record itself flattened through the template tree,
//! which is what full-text search matches against.
//!
//! ```json
//! {
//!   "id": "7/scenes/dem.tif",
//!   "collection_id": 7,
//!   "path": "/scenes/dem.tif",
//!   "name": "dem.tif",
//!   "size": 1048576,
//!   "format": "tif",
//!   "last_modified": "2024-05-01T12:00:00Z",
//!   "raster_properties": { "width": 512, "height": 512, "band_count": 1,
//!                          "pixel_size": { "x": 30.0, "y": 30.0 } },
//!   "gdal_metadata": { "AREA_OR_POINT": "Area" },
//!   "content": "..."
//! }
//! ```

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::FlattenError;
use crate::value::Value;
use crate::walker::Converter;

/// Object-name suffix of placeholder objects that are never indexed.
const NODATA_SUFFIX: &str = "NODATA";

/// Storage-level facts about one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub collection_id: u64,
    /// Absolute object path within the collection, starting with `/`.
    pub path: String,
    pub name: String,
    pub size: u64,
    /// File extension without the dot.
    pub format: String,
    #[serde(default = "Utc::now")]
    pub last_modified: DateTime<Utc>,
}

impl FileMetadata {
    /// Describe the storage object `object_name` (e.g. `scenes/dem.tif`).
    ///
    /// `name` is the last path component and `format` the text after its
    /// last `.` (the whole name when it has none).
    #[must_use]
    pub fn new(collection_id: u64, object_name: &str, size: u64, last_modified: DateTime<Utc>) -> Self {
        let object_name = object_name.trim_start_matches('/');
        let name = object_name.rsplit('/').next().unwrap_or(object_name).to_string();
        let format = name.rsplit('.').next().unwrap_or(&name).to_string();

        Self {
            collection_id,
            path: format!("/{object_name}"),
            name,
            size,
            format,
            last_modified,
        }
    }

    /// Identifier of the index document for this file.
    #[must_use]
    pub fn document_id(&self) -> String {
        format!("{}{}", self.collection_id, self.path)
    }

    /// Whether a listed storage object should be indexed at all.
    #[must_use]
    pub fn is_indexable(object_name: &str, is_dir: bool) -> bool {
        !is_dir && !object_name.ends_with(NODATA_SUFFIX)
    }

    /// [`is_indexable`](Self::is_indexable) for this file; a path ending in
    /// `/` is a directory.
    #[must_use]
    pub fn should_index(&self) -> bool {
        Self::is_indexable(&self.path, self.path.ends_with('/'))
    }
}

/// Pixel dimensions in georeferenced units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelSize {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl PixelSize {
    /// Pixel size from a GDAL affine geotransform
    /// `[origin_x, pixel_w, rot_x, origin_y, rot_y, pixel_h]`.
    ///
    /// Without a geotransform both dimensions are unknown.
    #[must_use]
    pub fn from_geotransform(geotransform: Option<&[f64; 6]>) -> Self {
        match geotransform {
            Some(gt) => Self {
                x: Some(gt[1].abs()),
                y: Some(gt[5].abs()),
            },
            None => Self { x: None, y: None },
        }
    }
}

/// Raster dimensions.
///
/// Deserializes from either a `pixel_size` object or the reader's raw
/// `geotransform` array; `pixel_size` wins when both are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RasterPropertiesInput")]
pub struct RasterProperties {
    pub width: u64,
    pub height: u64,
    pub band_count: u64,
    pub pixel_size: PixelSize,
}

#[derive(Deserialize)]
struct RasterPropertiesInput {
    width: u64,
    height: u64,
    band_count: u64,
    #[serde(default)]
    pixel_size: Option<PixelSize>,
    #[serde(default)]
    geotransform: Option<[f64; 6]>,
}

impl From<RasterPropertiesInput> for RasterProperties {
    fn from(input: RasterPropertiesInput) -> Self {
        Self {
            width: input.width,
            height: input.height,
            band_count: input.band_count,
            pixel_size: input
                .pixel_size
                .unwrap_or_else(|| PixelSize::from_geotransform(input.geotransform.as_ref())),
        }
    }
}

/// File metadata plus whatever the raster reader could extract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterRecord {
    #[serde(flatten)]
    pub file: FileMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raster_properties: Option<RasterProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gdal_metadata: Option<IndexMap<String, String>>,
}

impl From<FileMetadata> for RasterRecord {
    fn from(file: FileMetadata) -> Self {
        Self {
            file,
            raster_properties: None,
            gdal_metadata: None,
        }
    }
}

/// A record ready to be written to the search index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDocument {
    pub id: String,
    #[serde(flatten)]
    pub record: RasterRecord,
    /// The record flattened to text.
    pub content: String,
}

impl IndexDocument {
    /// Render `record` with `converter` and wrap it as a document.
    ///
    /// # Errors
    ///
    /// Propagates conversion failures; a record that fails to render is not
    /// indexed.
    pub fn build(record: RasterRecord, converter: &Converter) -> Result<Self, FlattenError> {
        let value = Value::from_serialize(&record).map_err(|e| FlattenError::Other {
            message: format!("Failed to serialize record {}: {e}", record.file.path),
        })?;
        let content = converter.convert_to_string(&value)?;

        tracing::debug!(
            "Built index document {} ({} bytes of content)",
            record.file.document_id(),
            content.len()
        );
        Ok(Self {
            id: record.file.document_id(),
            record,
            content,
        })
    }
}

/// Whether a stored document is stale: absent, or recorded with a different size.
#[must_use]
pub fn needs_reindex(stored_size: Option<u64>, current: &FileMetadata) -> bool {
    stored_size != Some(current.size)
}
