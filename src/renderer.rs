use std::path::Path;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::{Browser, BrowserConfig};
use colored::*;
use futures_util::StreamExt;
use tokio::fs;
use tracing::{debug, error};
use url::Url;

use crate::error::{Error, Result};

/// Turns a rendered web page into a PDF file.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, url: &Url, output: &Path) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct PdfOptions {
    pub scale: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub print_background: bool,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            scale: 0.75,
            margin_top: 0.4,
            margin_right: 0.4,
            margin_bottom: 0.4,
            margin_left: 0.4,
            print_background: true,
        }
    }
}

impl PdfOptions {
    fn print_params(&self) -> PrintToPdfParams {
        PrintToPdfParams {
            scale: Some(self.scale),
            margin_top: Some(self.margin_top),
            margin_right: Some(self.margin_right),
            margin_bottom: Some(self.margin_bottom),
            margin_left: Some(self.margin_left),
            print_background: Some(self.print_background),
            ..Default::default()
        }
    }
}

/// Prints pages through a headless Chromium.
///
/// A browser is launched for each render and closed afterwards, so the
/// renderer itself holds no process state between calls.
#[derive(Debug, Clone, Default)]
pub struct ChromeRenderer {
    pdf_options: PdfOptions,
}

impl ChromeRenderer {
    pub fn new(pdf_options: PdfOptions) -> Self {
        Self { pdf_options }
    }

    async fn print_page(&self, browser: &Browser, url: &Url, output: &Path) -> Result<()> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| Error::Render(format!("failed to create new page: {e}")))?;

        page.goto(url.as_str())
            .await
            .map_err(|e| Error::Render(format!("failed to navigate to {url}: {e}")))?;

        page.wait_for_navigation()
            .await
            .map_err(|e| Error::Render(format!("failed to wait for navigation: {e}")))?;

        let pdf_data = page
            .pdf(self.pdf_options.print_params())
            .await
            .map_err(|e| Error::Render(format!("failed to generate PDF: {e}")))?;

        fs::write(output, pdf_data)
            .await
            .map_err(|e| Error::io(output, e))?;

        Ok(())
    }
}

#[async_trait]
impl PdfRenderer for ChromeRenderer {
    async fn render(&self, url: &Url, output: &Path) -> Result<()> {
        debug!(
            "Rendering \"{}\" into \"{}\"",
            url.to_string().green(),
            output.display().to_string().blue()
        );

        let config = BrowserConfig::builder()
            .window_size(1280, 1024)
            .build()
            .map_err(|e| Error::Render(format!("failed to create browser config: {e}")))?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| Error::Render(format!("failed to launch browser: {e}")))?;

        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if let Err(err) = h {
                    // Chromium emits protocol messages chromiumoxide has no types for.
                    let err_str = err.to_string();
                    if !err_str.contains("data did not match any variant")
                        && !err_str.contains("untagged enum Message")
                    {
                        error!("Browser handler error: {}", err);
                    } else {
                        debug!("Chrome protocol message ignored: {}", err);
                    }
                }
            }
        });

        let result = self.print_page(&browser, url, output).await;

        browser.close().await.ok();
        handle.abort();

        result
    }
}
