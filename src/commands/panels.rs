use anyhow::{Context, Result};
use tracing::info;

use crate::catalog::{extract_sections, render_with_annotations};
use crate::cli::PanelsArgs;
use crate::sources::load_markup_source;
use crate::text::TextNormalizer;
use crate::util::{print_json, write_output};

pub fn run(args: PanelsArgs) -> Result<()> {
    let normalizer = TextNormalizer::new()?;
    let source = load_markup_source(&args.source)?;

    let sections = extract_sections(&source.text, &normalizer)
        .with_context(|| format!("failed to extract panels from {}", source.origin))?;
    info!(
        sections = sections.len(),
        lines = sections.iter().map(|section| section.lines.len()).sum::<usize>(),
        "extracted markup panels"
    );

    if args.json {
        return print_json(&sections);
    }

    let markdown = render_with_annotations(&sections, &normalizer)
        .with_context(|| format!("failed to render panels from {}", source.origin))?;
    write_output(args.output.as_deref(), &markdown)
}
