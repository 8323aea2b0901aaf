mod merge;
mod panels;
mod render;
mod summary;

pub use merge::{RenderedEntryParser, merge, merge_with_stats};
pub use panels::extract_sections;
pub use render::{render, render_entries, render_with_annotations};
pub use summary::SummaryParser;
