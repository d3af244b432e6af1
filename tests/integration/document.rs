//! Index documents built from metadata records.

use chrono::{TimeZone, Utc};
use metaflat_cli::document::{FileMetadata, IndexDocument, RasterRecord, needs_reindex};
use metaflat_cli::test_utils::{RASTER_RECORD, bracket_converter};

#[test]
fn test_document_from_raster_record() {
    let record: RasterRecord = serde_json::from_str(RASTER_RECORD).unwrap();
    let document = IndexDocument::build(record, &bracket_converter()).unwrap();

    assert_eq!(document.id, "7/scenes/dem.tif");
    assert!(document.content.contains("width=512;\n"));
    assert!(document.content.contains("x=30.0;\n"));
    assert!(document.content.contains("AREA_OR_POINT=Area;\n"));

    let json = serde_json::to_value(&document).unwrap();
    assert_eq!(json["name"], "dem.tif");
    assert_eq!(json["raster_properties"]["band_count"], 1);
    assert_eq!(json["content"], document.content.as_str());
}

#[test]
fn test_listing_filter_and_staleness() {
    let listed = [
        ("scenes/", true, 0),
        ("scenes/dem.tif", false, 1024),
        ("scenes/dem_NODATA", false, 8),
        ("scenes/ortho.jp2", false, 2048),
    ];
    let stored = |id: &str| match id {
        "7/scenes/dem.tif" => Some(1024),
        "7/scenes/ortho.jp2" => Some(1000),
        _ => None,
    };
    let modified = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();

    let stale: Vec<String> = listed
        .iter()
        .filter(|(name, is_dir, _)| FileMetadata::is_indexable(name, *is_dir))
        .map(|(name, _, size)| FileMetadata::new(7, name, *size, modified))
        .filter(|file| needs_reindex(stored(&file.document_id()), file))
        .map(|file| file.path)
        .collect();

    assert_eq!(stale, ["/scenes/ortho.jp2"]);
}
