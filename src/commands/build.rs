use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::catalog::{
    RenderedEntryParser, SummaryParser, extract_sections, merge_with_stats, render,
};
use crate::cli::BuildArgs;
use crate::model::{BUCKET_COUNT, BuildReport, SourceMapping, SourceReport};
use crate::sources::{LoadedSource, load_layout_source, load_markup_source};
use crate::text::TextNormalizer;
use crate::util::{now_utc_string, write_json_pretty, write_output};

pub fn run(args: BuildArgs) -> Result<()> {
    let normalizer = TextNormalizer::new()?;
    let summary_parser = SummaryParser::new()?;
    let entry_parser = RenderedEntryParser::new()?;

    let layout = load_layout_source(&args.layout)?;
    let layout_entries = summary_parser
        .extract_entries(&layout.text, &normalizer)
        .with_context(|| format!("failed to extract summary entries from {}", layout.origin))?;
    let primary = SourceMapping::from_entries(layout_entries.iter().cloned());

    let markup = load_markup_source(&args.markup)?;
    let sections = extract_sections(&markup.text, &normalizer)
        .with_context(|| format!("failed to extract panels from {}", markup.origin))?;
    let secondary = entry_parser.mapping_from_sections(&sections);
    if secondary.is_empty() {
        warn!(origin = %markup.origin, "markup source produced no coded entries");
    }

    let (canonical, stats) = merge_with_stats(&primary, &secondary);
    let markdown = render(&canonical);
    write_output(args.output.as_deref(), &markdown)?;

    info!(
        primary = primary.len(),
        secondary = secondary.len(),
        canonical = canonical.len(),
        unassigned_dropped = stats.unassigned_dropped,
        "canonical catalog built"
    );

    if let Some(report_path) = &args.report_path {
        let mut bucket_counts = vec![0usize; BUCKET_COUNT];
        for code in canonical.keys() {
            bucket_counts[code.bucket()] += 1;
        }

        let markup_line_count = sections
            .iter()
            .map(|section| section.lines.len())
            .sum::<usize>();
        let report = BuildReport {
            report_version: 1,
            generated_at: now_utc_string(),
            sources: vec![
                source_report("layout", &layout, layout_entries.len(), primary.len()),
                source_report("markup", &markup, markup_line_count, secondary.len()),
            ],
            primary_kept: stats.primary_kept,
            secondary_kept: stats.secondary_kept,
            unassigned_dropped: stats.unassigned_dropped,
            canonical_count: canonical.len(),
            bucket_counts,
            output_path: args
                .output
                .as_ref()
                .map(|path| path.display().to_string()),
        };
        write_json_pretty(report_path, &report)?;
        info!(path = %report_path.display(), "wrote build report");
    }

    Ok(())
}

fn source_report(
    name: &str,
    source: &LoadedSource,
    extracted_count: usize,
    mapped_count: usize,
) -> SourceReport {
    SourceReport {
        name: name.to_string(),
        origin: source.origin.clone(),
        sha256: source.sha256.clone(),
        byte_count: source.byte_count,
        extracted_count,
        mapped_count,
    }
}
