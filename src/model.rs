use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Code(String);

impl Code {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn integer_part(&self) -> u32 {
        let before_hyphen = self.0.split('-').next().unwrap_or_default();
        let integer_text = before_hyphen.split('.').next().unwrap_or_default();
        integer_text.parse::<u32>().unwrap_or(0)
    }

    pub fn bucket(&self) -> usize {
        ((self.integer_part() / 100) as usize).min(BUCKET_COUNT - 1)
    }
}

pub const BUCKET_COUNT: usize = 10;

impl Ord for Code {
    fn cmp(&self, other: &Self) -> Ordering {
        self.integer_part()
            .cmp(&other.integer_part())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Code {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub code: Code,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedLine {
    pub text: String,
    pub is_annotation: bool,
}

impl AnnotatedLine {
    pub fn entry(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_annotation: false,
        }
    }

    pub fn annotation(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_annotation: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelSection {
    pub heading: String,
    pub lines: Vec<AnnotatedLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMapping {
    entries: BTreeMap<Code, String>,
}

impl SourceMapping {
    pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        let mut mapping = Self::default();
        for entry in entries {
            mapping.insert(entry.code, entry.description);
        }
        mapping
    }

    pub fn insert(&mut self, code: Code, description: String) {
        self.entries.insert(code, description);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Code, &str)> {
        self.entries
            .iter()
            .map(|(code, description)| (code, description.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub type CanonicalMapping = IndexMap<Code, String>;

#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub name: String,
    pub origin: String,
    pub sha256: String,
    pub byte_count: usize,
    pub extracted_count: usize,
    pub mapped_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub report_version: u32,
    pub generated_at: String,
    pub sources: Vec<SourceReport>,
    pub primary_kept: usize,
    pub secondary_kept: usize,
    pub unassigned_dropped: usize,
    pub canonical_count: usize,
    pub bucket_counts: Vec<usize>,
    pub output_path: Option<String>,
}
