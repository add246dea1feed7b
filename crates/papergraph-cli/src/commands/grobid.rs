use anyhow::{Context, Result};
use clap::ArgMatches;
use log::warn;
use papergraph_core::grobid::GrobidClient;
use papergraph_core::neo4j::{with_session, GraphSession};
use papergraph_core::papers::{PaperSource, PaperStore};
use papergraph_core::{AppConfig, PaperMetadata};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::papers::{run_paper_queries, store_papers, OnPaperError};
use super::CommandHandler;
use crate::response_formatter::{print_banner, print_step, print_success, print_warning};
use crate::sample_data::sample_papers;

/// PDF header extraction through GROBID, with sample data as the fallback
pub struct GrobidCommand;

impl GrobidCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GrobidCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    ServiceUnavailable,
    MissingDirectory,
    NoPdfFiles,
    NothingExtracted,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FallbackReason::ServiceUnavailable => "GROBID service is unavailable",
            FallbackReason::MissingDirectory => "input directory does not exist",
            FallbackReason::NoPdfFiles => "input directory contains no PDF files",
            FallbackReason::NothingExtracted => "no PDF could be processed",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOrigin {
    Extracted,
    Fallback(FallbackReason),
}

/// Papers gathered for one run, plus the files that failed
#[derive(Debug)]
pub struct PaperBatch {
    pub origin: BatchOrigin,
    pub papers: Vec<PaperMetadata>,
    pub failures: Vec<(PathBuf, String)>,
}

impl PaperBatch {
    fn fallback(reason: FallbackReason, failures: Vec<(PathBuf, String)>) -> Self {
        Self {
            origin: BatchOrigin::Fallback(reason),
            papers: sample_papers(),
            failures,
        }
    }

    pub fn source(&self) -> PaperSource {
        match self.origin {
            BatchOrigin::Extracted => PaperSource::Grobid,
            BatchOrigin::Fallback(_) => PaperSource::Sample,
        }
    }
}

/// `*.pdf` files directly inside `dir`, extension matched case-insensitively,
/// sorted by path
pub fn find_pdfs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut pdfs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if path.is_file() && is_pdf {
            pdfs.push(path);
        }
    }
    pdfs.sort();
    Ok(pdfs)
}

/// Run every PDF in `pdf_dir` through GROBID. Service unavailability, a
/// missing or empty directory, or a run where every file fails all fall back
/// to the sample papers. A failing file is recorded and skipped.
pub async fn collect_papers(client: &GrobidClient, pdf_dir: &Path) -> Result<PaperBatch> {
    if !client.is_available().await {
        return Ok(PaperBatch::fallback(FallbackReason::ServiceUnavailable, Vec::new()));
    }
    if !pdf_dir.is_dir() {
        return Ok(PaperBatch::fallback(FallbackReason::MissingDirectory, Vec::new()));
    }

    let pdfs = find_pdfs(pdf_dir)
        .with_context(|| format!("failed to list {}", pdf_dir.display()))?;
    if pdfs.is_empty() {
        return Ok(PaperBatch::fallback(FallbackReason::NoPdfFiles, Vec::new()));
    }

    let mut papers = Vec::new();
    let mut failures = Vec::new();
    for path in pdfs {
        match client.process_header(&path).await {
            Ok(paper) => papers.push(paper),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                failures.push((path, e.to_string()));
            }
        }
    }

    if papers.is_empty() {
        return Ok(PaperBatch::fallback(FallbackReason::NothingExtracted, failures));
    }
    Ok(PaperBatch {
        origin: BatchOrigin::Extracted,
        papers,
        failures,
    })
}

impl CommandHandler for GrobidCommand {
    async fn execute(&self, _matches: &ArgMatches, config: &AppConfig) -> Result<()> {
        print_banner("GROBID extraction demo");

        let client = GrobidClient::new(&config.grobid)?;
        print_step(&format!(
            "Processing PDFs in {} with GROBID at {}",
            config.pdf_dir.display(),
            client.base_url()
        ));
        let batch = collect_papers(&client, &config.pdf_dir).await?;

        for (path, error) in &batch.failures {
            print_warning(&format!("{} failed: {}", path.display(), error));
        }
        match batch.origin {
            BatchOrigin::Extracted => {
                print_success(&format!("extracted {} papers", batch.papers.len()))
            }
            BatchOrigin::Fallback(reason) => {
                print_warning(&format!("{reason}; using sample data instead"))
            }
        }

        let source = batch.source();
        let papers = batch.papers;
        with_session(&config.neo4j, move |session| {
            Box::pin(async move { store_and_query(session, &papers, source).await })
        })
        .await
    }
}

async fn store_and_query(
    session: &GraphSession,
    papers: &[PaperMetadata],
    source: PaperSource,
) -> Result<()> {
    let ops = session.ops();
    let store = PaperStore::new(&ops)?;

    print_step("Clearing previous paper data");
    let removed = store.clear().await?;
    print_success(&format!("removed {removed} nodes"));
    store.ensure_indexes().await?;

    let skipped = store_papers(&store, papers, source, OnPaperError::Skip).await?;
    if !skipped.is_empty() {
        print_warning(&format!("{} papers could not be stored", skipped.len()));
    }
    run_paper_queries(&ops).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use papergraph_core::GrobidConfig;
    use std::net::TcpListener;
    use tempfile::TempDir;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEI: &str = r#"<TEI xmlns="http://www.tei-c.org/ns/1.0"><teiHeader><fileDesc>
        <titleStmt><title level="a" type="main">A Real Paper</title></titleStmt>
        <sourceDesc><biblStruct><analytic><author><persName>
            <forename type="first">Grace</forename><surname>Hopper</surname>
        </persName></author></analytic></biblStruct></sourceDesc>
    </fileDesc></teiHeader></TEI>"#;

    fn client_for(base_url: &str) -> GrobidClient {
        GrobidClient::new(&GrobidConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    fn closed_port_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{port}")
    }

    async fn available_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/version"))
            .respond_with(ResponseTemplate::new(200).set_body_string("0.8.1"))
            .mount(&server)
            .await;
        server
    }

    fn pdf_dir(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in files {
            fs::write(dir.path().join(name), b"%PDF-1.4 placeholder").unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn unreachable_service_falls_back_to_samples() {
        let dir = pdf_dir(&["paper.pdf"]);
        let batch = collect_papers(&client_for(&closed_port_url()), dir.path())
            .await
            .unwrap();
        assert_eq!(
            batch.origin,
            BatchOrigin::Fallback(FallbackReason::ServiceUnavailable)
        );
        assert_eq!(batch.papers, sample_papers());
        assert_eq!(batch.source(), PaperSource::Sample);
    }

    #[tokio::test]
    async fn missing_directory_falls_back_to_samples() {
        let server = available_server().await;
        let dir = TempDir::new().unwrap();
        let batch = collect_papers(&client_for(&server.uri()), &dir.path().join("absent"))
            .await
            .unwrap();
        assert_eq!(batch.origin, BatchOrigin::Fallback(FallbackReason::MissingDirectory));
    }

    #[tokio::test]
    async fn directory_without_pdfs_falls_back_to_samples() {
        let server = available_server().await;
        let dir = pdf_dir(&["notes.txt"]);
        let batch = collect_papers(&client_for(&server.uri()), dir.path())
            .await
            .unwrap();
        assert_eq!(batch.origin, BatchOrigin::Fallback(FallbackReason::NoPdfFiles));
    }

    #[tokio::test]
    async fn failing_file_is_skipped() {
        let server = available_server().await;
        Mock::given(method("POST"))
            .and(path("/api/processHeaderDocument"))
            .and(body_string_contains("good.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TEI))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/processHeaderDocument"))
            .and(body_string_contains("bad.pdf"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let dir = pdf_dir(&["bad.pdf", "good.pdf"]);
        let batch = collect_papers(&client_for(&server.uri()), dir.path())
            .await
            .unwrap();

        assert_eq!(batch.origin, BatchOrigin::Extracted);
        assert_eq!(batch.papers.len(), 1);
        assert_eq!(batch.papers[0].title.as_deref(), Some("A Real Paper"));
        assert_eq!(batch.papers[0].author_names(), vec!["Grace Hopper".to_string()]);
        assert_eq!(batch.failures.len(), 1);
        assert!(batch.failures[0].0.ends_with("bad.pdf"));
        assert!(batch.failures[0].1.contains("500"));
    }

    #[tokio::test]
    async fn every_file_failing_falls_back_to_samples() {
        let server = available_server().await;
        Mock::given(method("POST"))
            .and(path("/api/processHeaderDocument"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let dir = pdf_dir(&["a.pdf", "b.PDF"]);
        let batch = collect_papers(&client_for(&server.uri()), dir.path())
            .await
            .unwrap();
        assert_eq!(batch.origin, BatchOrigin::Fallback(FallbackReason::NothingExtracted));
        assert_eq!(batch.failures.len(), 2);
        assert_eq!(batch.papers.len(), sample_papers().len());
    }

    #[test]
    fn pdfs_are_matched_case_insensitively_and_sorted() {
        let dir = pdf_dir(&["b.PDF", "a.pdf", "c.txt", "d.pdf.bak"]);
        fs::create_dir(dir.path().join("nested.pdf")).unwrap();
        let names: Vec<String> = find_pdfs(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.PDF"]);
    }
}
