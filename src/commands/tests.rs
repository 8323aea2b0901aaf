use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::cli::{
    BuildArgs, DEFAULT_HTML_URL, DEFAULT_PDF_URL, LayoutSourceArgs, MarkupSourceArgs, MergeArgs,
    PanelsArgs, PdfBackend, SummaryArgs,
};
use crate::sources::layout_text_from_pdf;

const LAYOUT_TEXT: &str = "Table of contents 100 Philosophy\n\
                           Third Summary\n\
                           Thousand Sections\n\
                           300 Social sciences  310 Statistics\n\
                           350 Public administration & military science\n\
                           990 [Unassigned]\n";

const PANEL_HTML: &str = r#"<html><body>
<div id="ui_lib_panel">
  <span class="sh-font-semibold">The 300s &amp; 900s</span>
  <div class="ui-lib-coll-pan-id3">
    300 Social sciences, sociology<br>
    900 History<br>
    <p>Note on history<br>910 Geography &amp; travel</p>
  </div>
</div>
</body></html>"#;

fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write fixture");
    path
}

fn markup_args(html_path: PathBuf) -> MarkupSourceArgs {
    MarkupSourceArgs {
        html_path: Some(html_path),
        html_url: DEFAULT_HTML_URL.to_string(),
        html_timeout_secs: 30,
    }
}

fn layout_args(text_path: PathBuf) -> LayoutSourceArgs {
    LayoutSourceArgs {
        text_path: Some(text_path),
        pdf_path: None,
        pdf_url: DEFAULT_PDF_URL.to_string(),
        pdf_timeout_secs: 60,
        pdf_backend: PdfBackend::Auto,
    }
}

#[test]
fn build_writes_canonical_catalog_and_report() {
    let dir = TempDir::new().expect("tempdir");
    let text_path = write_fixture(dir.path(), "summaries.txt", LAYOUT_TEXT);
    let html_path = write_fixture(dir.path(), "panels.html", PANEL_HTML);
    let output_path = dir.path().join("out").join("catalog.md");
    let report_path = dir.path().join("out").join("report.json");

    super::build::run(BuildArgs {
        markup: markup_args(html_path),
        layout: layout_args(text_path),
        output: Some(output_path.clone()),
        report_path: Some(report_path.clone()),
    })
    .expect("build");

    let catalog = fs::read_to_string(&output_path).expect("catalog");
    assert!(catalog.starts_with("# Dewey Decimal System Call Numbers\n\n## The 000s\n"));
    assert!(catalog.contains(
        "## The 300s\n\
         - 300 Social sciences\n\
         - 310 Statistics\n\
         - 350 Public administration & military science\n"
    ));
    assert!(catalog.contains("## The 900s\n- 900 History\n- 910 Geography & travel\n"));
    assert!(!catalog.contains("990"));
    assert!(!catalog.contains("[^cite:"));
    assert_eq!(catalog.lines().filter(|line| line.starts_with("## ")).count(), 10);

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).expect("report")).expect("json");
    assert_eq!(report["canonical_count"], 5);
    assert_eq!(report["primary_kept"], 3);
    assert_eq!(report["secondary_kept"], 2);
    assert_eq!(report["unassigned_dropped"], 1);
    assert_eq!(
        report["bucket_counts"],
        serde_json::json!([0, 0, 0, 3, 0, 0, 0, 0, 0, 2])
    );
    assert_eq!(report["sources"][0]["name"], "layout");
    assert_eq!(report["sources"][0]["extracted_count"], 4);
    assert_eq!(report["sources"][1]["name"], "markup");
    assert_eq!(report["sources"][1]["extracted_count"], 4);
    assert_eq!(report["sources"][1]["mapped_count"], 3);
}

#[test]
fn build_aborts_without_output_when_marker_is_missing() {
    let dir = TempDir::new().expect("tempdir");
    let text_path = write_fixture(dir.path(), "summaries.txt", "300 Social sciences\n");
    let html_path = write_fixture(dir.path(), "panels.html", PANEL_HTML);
    let output_path = dir.path().join("catalog.md");

    let error = super::build::run(BuildArgs {
        markup: markup_args(html_path),
        layout: layout_args(text_path),
        output: Some(output_path.clone()),
        report_path: None,
    })
    .expect_err("missing marker");

    assert!(format!("{error:#}").contains("Third Summary"));
    assert!(!output_path.exists());
}

#[test]
fn summary_renders_every_extracted_entry() {
    let dir = TempDir::new().expect("tempdir");
    let text_path = write_fixture(
        dir.path(),
        "summaries.txt",
        "Third Summary\n005 Computer programming\n004 Data processing  004 Data processing, revised\n",
    );
    let output_path = dir.path().join("summary.md");

    super::summary::run(SummaryArgs {
        source: layout_args(text_path),
        output: Some(output_path.clone()),
        json: false,
    })
    .expect("summary");

    let rendered = fs::read_to_string(&output_path).expect("rendered");
    assert!(rendered.contains(
        "## The 000s\n\
         - 004 Data processing\n\
         - 004 Data processing, revised\n\
         - 005 Computer programming\n\n\
         ## The 100s\n"
    ));
}

#[test]
fn panels_renders_annotations_as_footnotes() {
    let dir = TempDir::new().expect("tempdir");
    let html_path = write_fixture(dir.path(), "panels.html", PANEL_HTML);
    let output_path = dir.path().join("panels.md");

    super::panels::run(PanelsArgs {
        source: markup_args(html_path),
        output: Some(output_path.clone()),
        json: false,
    })
    .expect("panels");

    let rendered = fs::read_to_string(&output_path).expect("rendered");
    assert_eq!(
        rendered,
        "# Dewey Decimal System Call Numbers\n\
         \n\
         ## The 300s & 900s\n\
         - 300 Social sciences, sociology\n\
         - 900 History [^cite:the-300s-900s-900-history]\n\
         - 910 Geography & travel\n\
         \n\
         [^cite:the-300s-900s-900-history]: cite: Note on history\n"
    );
}

#[test]
fn merge_reads_rendered_catalogs_and_prefers_primary() {
    let dir = TempDir::new().expect("tempdir");
    let primary = write_fixture(
        dir.path(),
        "primary.md",
        "# Dewey Decimal System Call Numbers\n\n## The 000s\n- 004 Data processing\n- 006 [Unassigned]\n",
    );
    let secondary = write_fixture(
        dir.path(),
        "secondary.md",
        "## The 000s\n- 004 Computers\n- 006 Special methods\n- 020 Library science\n",
    );
    let output_path = dir.path().join("merged.md");

    super::merge::run(MergeArgs {
        primary,
        secondary,
        output: Some(output_path.clone()),
    })
    .expect("merge");

    let rendered = fs::read_to_string(&output_path).expect("rendered");
    assert!(rendered.contains(
        "## The 000s\n\
         - 004 Data processing\n\
         - 006 Special methods\n\
         - 020 Library science\n\n\
         ## The 100s\n"
    ));
}

#[test]
fn library_backend_rejects_bytes_that_are_not_a_pdf() {
    assert!(layout_text_from_pdf(b"not a pdf document", PdfBackend::Library).is_err());
}
