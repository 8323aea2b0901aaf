use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

use crate::model::{CanonicalMapping, Code, PanelSection, SourceMapping};
use crate::text::is_unassigned;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub primary_kept: usize,
    pub secondary_kept: usize,
    pub unassigned_dropped: usize,
}

pub fn merge(primary: &SourceMapping, secondary: &SourceMapping) -> CanonicalMapping {
    merge_with_stats(primary, secondary).0
}

pub fn merge_with_stats(
    primary: &SourceMapping,
    secondary: &SourceMapping,
) -> (CanonicalMapping, MergeStats) {
    let mut canonical = CanonicalMapping::new();
    let mut stats = MergeStats::default();

    for (code, description) in primary.iter() {
        if is_unassigned(description) {
            stats.unassigned_dropped += 1;
            continue;
        }
        canonical.insert(code.clone(), description.to_string());
        stats.primary_kept += 1;
    }

    for (code, description) in secondary.iter() {
        if canonical.contains_key(code) {
            continue;
        }
        if is_unassigned(description) {
            stats.unassigned_dropped += 1;
            continue;
        }
        canonical.insert(code.clone(), description.to_string());
        stats.secondary_kept += 1;
    }

    debug!(
        primary_kept = stats.primary_kept,
        secondary_kept = stats.secondary_kept,
        unassigned_dropped = stats.unassigned_dropped,
        "merged source mappings"
    );
    (canonical, stats)
}

#[derive(Debug)]
pub struct RenderedEntryParser {
    bullet: Regex,
}

impl RenderedEntryParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            bullet: Regex::new(r"^- (\S+) (.+)$").context("failed to compile bullet regex")?,
        })
    }

    pub fn parse_line(&self, line: &str) -> Option<(Code, String)> {
        let captures = self.bullet.captures(line.trim())?;
        let code = captures.get(1)?.as_str();
        let description = captures.get(2)?.as_str().trim();
        Some((Code::new(code), description.to_string()))
    }

    pub fn parse_document(&self, markdown: &str) -> SourceMapping {
        let mut mapping = SourceMapping::default();
        for line in markdown.lines() {
            if let Some((code, description)) = self.parse_line(line) {
                mapping.insert(code, description);
            }
        }
        mapping
    }

    pub fn mapping_from_sections(&self, sections: &[PanelSection]) -> SourceMapping {
        let mut mapping = SourceMapping::default();
        for line in sections
            .iter()
            .flat_map(|section| section.lines.iter())
            .filter(|line| !line.is_annotation)
        {
            if let Some((code, description)) = self.parse_line(&format!("- {}", line.text)) {
                mapping.insert(code, description);
            }
        }
        mapping
    }
}
