//! Shared fixtures: canned catalog pages and a renderer that records calls.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gutenberg2pdf::{ClientConfig, Error, Gutenberg, PdfRenderer, Result};
use url::Url;
use wiremock::MockServer;

/// Writes a stub PDF and remembers every page it was asked to render.
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    rendered: Arc<Mutex<Vec<(String, PathBuf)>>>,
}

impl RecordingRenderer {
    pub fn urls(&self) -> Vec<String> {
        self.rendered
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }
}

#[async_trait]
impl PdfRenderer for RecordingRenderer {
    async fn render(&self, url: &Url, output: &Path) -> Result<()> {
        self.rendered
            .lock()
            .unwrap()
            .push((url.to_string(), output.to_path_buf()));
        tokio::fs::write(output, b"%PDF-1.4\n%%EOF\n")
            .await
            .map_err(|source| Error::Io {
                path: output.to_path_buf(),
                source,
            })
    }
}

pub fn client(server: &MockServer, folder: &Path, renderer: RecordingRenderer) -> Gutenberg {
    let config = ClientConfig::new()
        .base_url(server.uri())
        .download_folder(folder);
    Gutenberg::with_renderer(config, renderer).expect("client should build")
}

/// A results page listing books `ids`, optionally linking a next page.
pub fn results_page(ids: &[u32], next_href: Option<&str>) -> String {
    let entries: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<li class="booklink">
                  <a class="link" href="/ebooks/{id}" accesskey="{id}">
                    <span class="cell leftcell with-cover">
                      <img class="cover-thumb" src="/cache/epub/{id}/pg{id}.cover.small.jpg" alt="">
                    </span>
                    <span class="cell content">
                      <span class="title">Book {id}</span>
                      <span class="subtitle">Author {id}</span>
                      <span class="extra">{id} downloads</span>
                    </span>
                  </a>
                </li>"#
            )
        })
        .collect();

    let next = next_href
        .map(|href| format!(r#"<a title="Go to the next page of results." accesskey="+" href="{href}">Next</a>"#))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html><html><body><div class="page_content">
        <ul class="results">
          <li class="navlink"><a class="link" href="/ebooks/search/?sort_order=title">Sort Alphabetically by Title</a></li>
          {entries}
        </ul>
        <div class="padded"><span class="links">{next}</span></div>
        </div></body></html>"#
    )
}

pub fn detail_page(rows: &[(&str, &str)]) -> String {
    let rows: String = rows
        .iter()
        .map(|(label, value)| format!("<tr><th>{label}</th><td>{value}</td></tr>"))
        .collect();
    format!(
        r#"<!DOCTYPE html><html><body>
        <table class="bibrec"><tbody>{rows}</tbody></table>
        </body></html>"#
    )
}

pub fn frankenstein_detail() -> String {
    detail_page(&[
        ("Author", "Shelley, Mary Wollstonecraft, 1797-1851"),
        ("Title", "Frankenstein; Or, The Modern Prometheus"),
        ("Language", "English"),
        ("Subject", "Science fiction"),
        ("Subject", "Horror tales"),
        ("Subject", "Monsters -- Fiction"),
        ("Release Date", "Oct 1, 1993"),
    ])
}
