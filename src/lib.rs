//! olap-schema: declarative OLAP schema definitions rendered to canonical XML
//!
//! Schemas are described with a nested builder vocabulary (cubes, tables,
//! joins, dimensions, hierarchies, levels, measures, aggregates, ...) and
//! rendered as a deterministic Mondrian-style XML document: attributes are
//! sorted, empty elements self-close, and identifier attributes can be
//! upper-cased for databases with upper-case data dictionaries.

pub mod casing;
pub mod error;
pub mod input;
pub mod model;
pub mod naming;
pub mod render;

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info};

pub use casing::Driver;
pub use error::{Result, SchemaError};
pub use model::{Concept, Context, Node, Options, Schema, Value};
pub use render::RenderOptions;

/// Minimum number of files to benefit from parallel processing.
/// Below this threshold, sequential processing is faster due to rayon overhead.
const PARALLEL_THRESHOLD: usize = 8;

/// A schema file that has been read, parsed and re-rendered
#[derive(Debug, Clone)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub xml: String,
}

/// Read, import and render one schema file
pub fn render_file(path: &Path, options: &RenderOptions) -> Result<RenderedFile> {
    let content = input::read_schema_file(path)?;
    let schema = Schema::from_xml(&content)?;
    let xml = schema.to_xml(options)?;
    debug!(path = %path.display(), "rendered schema file");
    Ok(RenderedFile {
        path: path.to_path_buf(),
        xml,
    })
}

/// Render several schema files, using parallel processing for larger sets.
///
/// Results keep the order of `paths`; the first failure is returned.
pub fn render_files(paths: &[PathBuf], options: &RenderOptions) -> Result<Vec<RenderedFile>> {
    let results: Vec<Result<RenderedFile>> = if paths.len() >= PARALLEL_THRESHOLD {
        paths
            .par_iter()
            .map(|path| render_file(path, options))
            .collect()
    } else {
        paths.iter().map(|path| render_file(path, options)).collect()
    };

    let rendered = results.into_iter().collect::<Result<Vec<_>>>()?;
    info!(files = rendered.len(), "rendered schema files");
    Ok(rendered)
}
