//! Build a search-index document from a file-metadata record.
//!
//! The input is a JSON or YAML record with the file metadata fields and
//! optional `raster_properties` / `gdal_metadata`. The document, including
//! its rendered `content`, is printed as JSON.
//!
//! ```bash
//! metaflat document record.json
//! metaflat document record.json --stored-size 1048576   # skip if unchanged
//! ```

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::common::{InputFormat, read_input};
use crate::config::Settings;
use crate::document::{IndexDocument, RasterRecord, needs_reindex};

/// Command to build an index document.
#[derive(Args, Debug)]
pub struct DocumentCommand {
    /// Metadata record, or `-` for stdin
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Input format
    #[arg(long, value_enum, default_value = "auto")]
    pub format: InputFormat,

    /// Size recorded in the existing index document; when it matches the
    /// record, nothing is printed
    #[arg(long, value_name = "BYTES")]
    pub stored_size: Option<u64>,
}

impl DocumentCommand {
    pub fn execute(self, settings: &Settings) -> Result<()> {
        if let Some(document) = self.build(settings)? {
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        Ok(())
    }

    /// Build the document, or `None` when the record is not indexable or the
    /// stored document is current.
    pub fn build(&self, settings: &Settings) -> Result<Option<IndexDocument>> {
        let content = read_input(&self.input)?;
        let record: RasterRecord = match self.format.resolve(&self.input) {
            InputFormat::Yaml => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse metadata record: {}", self.input.display()))?,
            InputFormat::Json | InputFormat::Auto => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse metadata record: {}", self.input.display()))?,
        };

        if !record.file.should_index() {
            tracing::info!("Skipping {}: NODATA objects and directories are not indexed", record.file.path);
            return Ok(None);
        }

        if self.stored_size.is_some() && !needs_reindex(self.stored_size, &record.file) {
            tracing::info!("Document {} is up to date", record.file.document_id());
            return Ok(None);
        }

        let converter = settings.converter()?;
        let document = IndexDocument::build(record, &converter)
            .with_context(|| format!("Failed to build document from {}", self.input.display()))?;
        Ok(Some(document))
    }
}
