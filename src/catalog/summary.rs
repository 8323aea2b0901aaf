use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

use crate::error::NotFoundError;
use crate::model::{Code, Entry};
use crate::text::TextNormalizer;

pub const SECTION_MARKER: &str = "Third Summary";

const SKIPPED_LINE_PREFIXES: [&str; 3] = [SECTION_MARKER, "Thousand Sections", "Consult schedules"];

#[derive(Debug)]
pub struct SummaryParser {
    entry_start: Regex,
    entry_boundary: Regex,
}

impl SummaryParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            entry_start: Regex::new(r"(\d{3}(?:\.\d+)?)\s+")
                .context("failed to compile summary entry regex")?,
            entry_boundary: Regex::new(r"\s{2,}\d{3}(?:\.\d+)?\b")
                .context("failed to compile summary boundary regex")?,
        })
    }

    pub fn extract_entries(
        &self,
        text: &str,
        normalizer: &TextNormalizer,
    ) -> Result<Vec<Entry>, NotFoundError> {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        let start = normalized
            .find(SECTION_MARKER)
            .ok_or_else(|| NotFoundError::MissingMarker {
                marker: SECTION_MARKER.to_string(),
            })?;

        let mut entries = Vec::new();
        let mut skipped_lines = 0usize;
        for raw_line in normalized[start..].split(is_line_break) {
            let cleaned = raw_line.trim_end();
            let stripped = cleaned.trim_start();
            if stripped.is_empty() {
                continue;
            }
            if SKIPPED_LINE_PREFIXES
                .iter()
                .any(|prefix| stripped.starts_with(prefix))
            {
                skipped_lines += 1;
                continue;
            }
            self.parse_line(cleaned, normalizer, &mut entries);
        }

        debug!(
            entries = entries.len(),
            skipped_lines, "parsed summary section"
        );
        if entries.is_empty() {
            return Err(NotFoundError::NoEntries {
                marker: SECTION_MARKER.to_string(),
            });
        }
        Ok(entries)
    }

    fn parse_line(&self, line: &str, normalizer: &TextNormalizer, entries: &mut Vec<Entry>) {
        let mut position = 0usize;
        while position < line.len() {
            let Some(captures) = self.entry_start.captures_at(line, position) else {
                break;
            };
            let (Some(whole), Some(code)) = (captures.get(0), captures.get(1)) else {
                break;
            };

            let description_start = whole.end();
            let search_from = line[description_start..]
                .chars()
                .next()
                .map(|character| description_start + character.len_utf8())
                .unwrap_or(line.len());
            let description_end = self
                .entry_boundary
                .find_at(line, search_from)
                .map(|boundary| boundary.start())
                .unwrap_or(line.len());

            let description = normalizer.normalize(&line[description_start..description_end]);
            if !description.is_empty() {
                entries.push(Entry {
                    code: Code::new(code.as_str()),
                    description,
                });
            }
            position = description_end;
        }
    }
}

fn is_line_break(character: char) -> bool {
    matches!(
        character,
        '\n' | '\u{000B}' | '\u{000C}' | '\u{001C}' | '\u{001D}' | '\u{001E}' | '\u{0085}'
            | '\u{2028}' | '\u{2029}'
    )
}
