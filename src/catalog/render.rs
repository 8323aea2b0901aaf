use std::collections::HashMap;

use crate::error::StructureError;
use crate::model::{BUCKET_COUNT, CanonicalMapping, Code, PanelSection};
use crate::text::TextNormalizer;

pub const CATALOG_TITLE: &str = "# Dewey Decimal System Call Numbers";

pub fn render(mapping: &CanonicalMapping) -> String {
    render_entries(
        mapping
            .iter()
            .map(|(code, description)| (code, description.as_str())),
    )
}

pub fn render_entries<'a>(entries: impl IntoIterator<Item = (&'a Code, &'a str)>) -> String {
    let mut buckets: Vec<Vec<(&Code, &str)>> = vec![Vec::new(); BUCKET_COUNT];
    for (code, description) in entries {
        buckets[code.bucket()].push((code, description));
    }

    let mut lines = vec![CATALOG_TITLE.to_string(), String::new()];
    for (index, bucket) in buckets.iter_mut().enumerate() {
        lines.push(format!("## The {index}00s"));
        bucket.sort_by(|left, right| left.0.cmp(right.0));
        for (code, description) in bucket.iter() {
            lines.push(format!("- {code} {description}"));
        }
        lines.push(String::new());
    }

    finish_document(&lines)
}

pub fn render_with_annotations(
    sections: &[PanelSection],
    normalizer: &TextNormalizer,
) -> Result<String, StructureError> {
    let mut lines = vec![CATALOG_TITLE.to_string(), String::new()];
    let mut definitions = Vec::new();
    let mut identifiers = FootnoteIdentifiers::default();

    for section in sections {
        lines.push(format!("## {}", section.heading));
        let mut current_bullet: Option<(usize, &str)> = None;

        for line in &section.lines {
            if !line.is_annotation {
                lines.push(format!("- {}", line.text));
                current_bullet = Some((lines.len() - 1, line.text.as_str()));
                continue;
            }

            let Some((bullet_index, bullet_text)) = current_bullet else {
                return Err(StructureError::OrphanAnnotation {
                    heading: section.heading.clone(),
                    text: line.text.clone(),
                });
            };
            let label = format!(
                "cite:{}",
                identifiers.next(normalizer, &section.heading, bullet_text)
            );
            lines[bullet_index].push_str(&format!(" [^{label}]"));
            definitions.push(format!("[^{label}]: cite: {}", line.text));
        }

        lines.push(String::new());
    }

    if !definitions.is_empty() {
        lines.extend(definitions);
        lines.push(String::new());
    }

    Ok(finish_document(&lines))
}

#[derive(Debug, Default)]
struct FootnoteIdentifiers {
    occurrences: HashMap<String, usize>,
}

impl FootnoteIdentifiers {
    fn next(&mut self, normalizer: &TextNormalizer, heading: &str, entry_text: &str) -> String {
        let base = format!(
            "{}-{}",
            normalizer.slugify(heading),
            normalizer.slugify(entry_text)
        )
        .trim_matches('-')
        .to_string();

        let count = self.occurrences.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base
        } else {
            format!("{base}-{count}")
        }
    }
}

fn finish_document(lines: &[String]) -> String {
    let mut document = lines.join("\n").trim().to_string();
    document.push('\n');
    document
}
