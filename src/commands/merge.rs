use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::catalog::{RenderedEntryParser, merge, render};
use crate::cli::MergeArgs;
use crate::model::SourceMapping;
use crate::util::write_output;

pub fn run(args: MergeArgs) -> Result<()> {
    let parser = RenderedEntryParser::new()?;
    let primary = read_rendered(&parser, &args.primary)?;
    let secondary = read_rendered(&parser, &args.secondary)?;

    let canonical = merge(&primary, &secondary);
    info!(
        primary = primary.len(),
        secondary = secondary.len(),
        canonical = canonical.len(),
        "merged rendered catalogs"
    );

    write_output(args.output.as_deref(), &render(&canonical))
}

fn read_rendered(parser: &RenderedEntryParser, path: &Path) -> Result<SourceMapping> {
    let markdown =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mapping = parser.parse_document(&markdown);
    info!(path = %path.display(), entries = mapping.len(), "read rendered catalog");
    Ok(mapping)
}
