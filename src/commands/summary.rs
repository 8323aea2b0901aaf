use anyhow::{Context, Result};
use tracing::info;

use crate::catalog::{SummaryParser, render_entries};
use crate::cli::SummaryArgs;
use crate::sources::load_layout_source;
use crate::text::TextNormalizer;
use crate::util::{print_json, write_output};

pub fn run(args: SummaryArgs) -> Result<()> {
    let normalizer = TextNormalizer::new()?;
    let parser = SummaryParser::new()?;
    let source = load_layout_source(&args.source)?;

    let entries = parser
        .extract_entries(&source.text, &normalizer)
        .with_context(|| format!("failed to extract summary entries from {}", source.origin))?;
    info!(entries = entries.len(), "extracted summary entries");

    if args.json {
        return print_json(&entries);
    }

    let markdown = render_entries(
        entries
            .iter()
            .map(|entry| (&entry.code, entry.description.as_str())),
    );
    write_output(args.output.as_deref(), &markdown)
}
