//! Test utilities for metaflat
//!
//! Shared by unit tests and the integration suite (via the `test-utils`
//! feature):
//! - Logging setup that works with the test harness
//! - Template and input fixtures
//!
//! # Example
//!
//! ```rust,no_run
//! use metaflat_cli::test_utils::{bracket_converter, init_test_logging};
//! use metaflat_cli::value::Value;
//!
//! init_test_logging(None);
//! let lines = bracket_converter()
//!     .convert(&Value::from_json_str(r#"{"a": 1}"#).unwrap())
//!     .unwrap();
//! assert_eq!(lines, ["{\n", "a=1;\n", "}\n"]);
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::templates::TemplateTree;
use crate::walker::Converter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Bracket-style templates: `{`/`}` for maps, `[`/`]` for lists and
/// `name=value;` for scalars, one per line.
pub const BRACKET_TEMPLATES: &str = r#"{
  "*.in_dict": "{\n",
  "*.out_dict": "}\n",
  "*.in_list": "[\n",
  "*.out_list": "]\n",
  "*.in_null": "{name}=null;\n",
  "*.in_bool": "{name}={value};\n",
  "*.in_int": "{name}={value};\n",
  "*.in_float": "{name}={value};\n",
  "*.in_str": "{name}={value};\n"
}"#;

/// A metadata record as produced for a single-band GeoTIFF.
pub const RASTER_RECORD: &str = r#"{
  "collection_id": 7,
  "path": "/scenes/dem.tif",
  "name": "dem.tif",
  "size": 1048576,
  "format": "tif",
  "last_modified": "2024-05-01T12:00:00Z",
  "raster_properties": {
    "width": 512,
    "height": 256,
    "band_count": 1,
    "pixel_size": {"x": 30.0, "y": 30.0}
  },
  "gdal_metadata": {"AREA_OR_POINT": "Area"}
}"#;

/// Initialize logging for tests.
///
/// With `Some(level)` that level is used; with `None`, logging is only
/// enabled when `RUST_LOG` is set. Safe to call from every test.
///
/// ```bash
/// RUST_LOG=metaflat_cli=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// Template tree built from [`BRACKET_TEMPLATES`].
///
/// # Panics
///
/// Never for the bundled fixture.
#[must_use]
pub fn bracket_templates() -> TemplateTree {
    let entries: indexmap::IndexMap<String, String> =
        serde_json::from_str(BRACKET_TEMPLATES).expect("bracket fixture is valid JSON");
    TemplateTree::build(entries).expect("bracket fixture builds")
}

/// Converter over [`bracket_templates`] with the default depth limit.
#[must_use]
pub fn bracket_converter() -> Converter {
    Converter::new(Arc::new(bracket_templates()))
}

/// Write `content` to `dir/name` and return the path.
///
/// # Panics
///
/// If the file cannot be written.
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
    path
}
