use std::fs;
use std::panic;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::cli::{LayoutSourceArgs, MarkupSourceArgs, PdfBackend};
use crate::util::sha256_hex;

#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub origin: String,
    pub sha256: String,
    pub byte_count: usize,
    pub text: String,
}

impl LoadedSource {
    fn new(origin: String, bytes: &[u8], text: String) -> Self {
        let loaded = Self {
            origin,
            sha256: sha256_hex(bytes),
            byte_count: bytes.len(),
            text,
        };
        info!(
            origin = %loaded.origin,
            bytes = loaded.byte_count,
            sha256 = %loaded.sha256,
            "loaded source document"
        );
        loaded
    }
}

pub fn load_markup_source(args: &MarkupSourceArgs) -> Result<LoadedSource> {
    match &args.html_path {
        Some(path) => {
            let bytes = read_file(path)?;
            let text = String::from_utf8_lossy(&bytes).into_owned();
            Ok(LoadedSource::new(path.display().to_string(), &bytes, text))
        }
        None => {
            let text = fetch_text(&args.html_url, Duration::from_secs(args.html_timeout_secs))?;
            Ok(LoadedSource::new(
                args.html_url.clone(),
                text.as_bytes(),
                text.clone(),
            ))
        }
    }
}

pub fn load_layout_source(args: &LayoutSourceArgs) -> Result<LoadedSource> {
    if let Some(path) = &args.text_path {
        let bytes = read_file(path)?;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        return Ok(LoadedSource::new(path.display().to_string(), &bytes, text));
    }

    let (origin, bytes) = match &args.pdf_path {
        Some(path) => (path.display().to_string(), read_file(path)?),
        None => (
            args.pdf_url.clone(),
            fetch_bytes(&args.pdf_url, Duration::from_secs(args.pdf_timeout_secs))?,
        ),
    };
    let text = layout_text_from_pdf(&bytes, args.pdf_backend)
        .with_context(|| format!("failed to extract text from {origin}"))?;
    Ok(LoadedSource::new(origin, &bytes, text))
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

fn get(url: &str, timeout: Duration) -> Result<reqwest::blocking::Response> {
    info!(url = %url, timeout_secs = timeout.as_secs(), "fetching source document");

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to build http client")?;
    let response = client
        .get(url)
        .send()
        .with_context(|| format!("request failed for {url}"))?;

    let status = response.status();
    if !status.is_success() {
        bail!("{url} returned status {status}");
    }
    Ok(response)
}

pub fn fetch_text(url: &str, timeout: Duration) -> Result<String> {
    get(url, timeout)?
        .text()
        .with_context(|| format!("failed to read response text from {url}"))
}

pub fn fetch_bytes(url: &str, timeout: Duration) -> Result<Vec<u8>> {
    let body = get(url, timeout)?
        .bytes()
        .with_context(|| format!("failed to read response body from {url}"))?;
    Ok(body.to_vec())
}

pub fn layout_text_from_pdf(pdf_bytes: &[u8], backend: PdfBackend) -> Result<String> {
    match backend {
        PdfBackend::Library => extract_with_library(pdf_bytes),
        PdfBackend::Pdftotext => extract_with_pdftotext(pdf_bytes),
        PdfBackend::Auto => match extract_with_library(pdf_bytes) {
            Ok(text) => Ok(text),
            Err(error) => {
                warn!(
                    error = %error,
                    backend = PdfBackend::Auto.as_str(),
                    "in-process pdf extraction failed, falling back to pdftotext"
                );
                extract_with_pdftotext(pdf_bytes)
            }
        },
    }
}

fn extract_with_library(pdf_bytes: &[u8]) -> Result<String> {
    let text = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(pdf_bytes))
        .map_err(|_| anyhow!("pdf-extract panicked while reading the document"))?
        .map_err(|error| anyhow!("pdf-extract failed: {error}"))?
        .replace('\u{0000}', "");
    if text.trim().is_empty() {
        bail!("pdf-extract produced no text");
    }
    debug!(chars = text.len(), "pdf-extract produced text");
    Ok(text)
}

fn extract_with_pdftotext(pdf_bytes: &[u8]) -> Result<String> {
    let pdf_path = temp_pdf_path();
    fs::write(&pdf_path, pdf_bytes)
        .with_context(|| format!("failed to write temporary pdf: {}", pdf_path.display()))?;

    let output = Command::new("pdftotext")
        .arg("-layout")
        .arg("-enc")
        .arg("UTF-8")
        .arg(&pdf_path)
        .arg("-")
        .output();
    let _ = fs::remove_file(&pdf_path);

    let output = output.context("failed to execute pdftotext; is poppler-utils installed?")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("pdftotext returned non-zero exit status: {}", stderr.trim());
    }

    let text = String::from_utf8_lossy(&output.stdout).replace('\u{0000}', "");
    debug!(chars = text.len(), "pdftotext produced layout text");
    Ok(text)
}

fn temp_pdf_path() -> PathBuf {
    let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    std::env::temp_dir().join(format!(
        "dewey_layout_{}_{}.pdf",
        std::process::id(),
        stamp
    ))
}
