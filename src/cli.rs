use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub const DEFAULT_HTML_URL: &str = "https://www.library.illinois.edu/infosci/research/guides/dewey/";
pub const DEFAULT_PDF_URL: &str = "https://www.oclc.org/content/dam/oclc/dewey/ddc23-summaries.pdf";

#[derive(Parser, Debug)]
#[command(
    name = "dewey",
    version,
    about = "Build a canonical Dewey Decimal call number catalog from two published sources"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Panels(PanelsArgs),
    Summary(SummaryArgs),
    Merge(MergeArgs),
    Build(BuildArgs),
}

#[derive(Args, Debug, Clone)]
pub struct MarkupSourceArgs {
    #[arg(long)]
    pub html_path: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_HTML_URL)]
    pub html_url: String,

    #[arg(long, default_value_t = 30)]
    pub html_timeout_secs: u64,
}

#[derive(Args, Debug, Clone)]
pub struct LayoutSourceArgs {
    #[arg(long, conflicts_with = "pdf_path")]
    pub text_path: Option<PathBuf>,

    #[arg(long)]
    pub pdf_path: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_PDF_URL)]
    pub pdf_url: String,

    #[arg(long, default_value_t = 60)]
    pub pdf_timeout_secs: u64,

    #[arg(long, value_enum, default_value_t = PdfBackend::Auto)]
    pub pdf_backend: PdfBackend,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum PdfBackend {
    Auto,
    Library,
    Pdftotext,
}

impl PdfBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Library => "library",
            Self::Pdftotext => "pdftotext",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct PanelsArgs {
    #[command(flatten)]
    pub source: MarkupSourceArgs,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub source: LayoutSourceArgs,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct MergeArgs {
    #[arg(long)]
    pub primary: PathBuf,

    #[arg(long)]
    pub secondary: PathBuf,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub markup: MarkupSourceArgs,

    #[command(flatten)]
    pub layout: LayoutSourceArgs,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub report_path: Option<PathBuf>,
}
