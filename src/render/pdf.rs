use std::ffi::OsStr;
use std::path::PathBuf;

use async_trait::async_trait;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use tracing::debug;

use crate::errors::ServiceError;

/// A4 paper in inches, with the fixed page margins every print uses.
const A4_WIDTH_IN: f64 = 8.27;
const A4_HEIGHT_IN: f64 = 11.69;
const PAGE_MARGIN_IN: f64 = 0.4;

/// Rasterizes finished HTML into PDF bytes.
///
/// The production engine drives an external headless browser; tests inject a
/// fake. Implementations are expected to be stateless per call.
#[async_trait]
pub trait PdfEngine: Send + Sync {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, ServiceError>;
}

/// Headless-Chromium engine. Launches a browser per request, loads the HTML
/// as a data URL, and prints to PDF at A4 with fixed margins.
///
/// There is deliberately no timeout and no retry around the browser call: a
/// hung renderer hangs the request, and any failure surfaces as a single
/// render error.
pub struct ChromiumEngine {
    chrome_binary: Option<PathBuf>,
}

impl ChromiumEngine {
    pub fn new(chrome_binary: Option<String>) -> Self {
        Self {
            chrome_binary: chrome_binary.map(PathBuf::from),
        }
    }
}

#[async_trait]
impl PdfEngine for ChromiumEngine {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, ServiceError> {
        let html = html.to_owned();
        let chrome_binary = self.chrome_binary.clone();

        // The browser call blocks for seconds; keep it off the async workers.
        tokio::task::spawn_blocking(move || print_with_chromium(&html, chrome_binary))
            .await
            .map_err(|e| ServiceError::InternalError(format!("render task failed: {e}")))?
    }
}

fn print_with_chromium(
    html: &str,
    chrome_binary: Option<PathBuf>,
) -> Result<Vec<u8>, ServiceError> {
    let mut builder = LaunchOptions::default_builder();
    builder
        .headless(true)
        .sandbox(false)
        .args(vec![OsStr::new("--disable-gpu")]);
    if chrome_binary.is_some() {
        builder.path(chrome_binary);
    }
    let options = builder
        .build()
        .map_err(|e| ServiceError::RenderError(format!("launch options: {e}")))?;

    let browser =
        Browser::new(options).map_err(|e| ServiceError::RenderError(format!("launch: {e}")))?;
    let tab = browser
        .new_tab()
        .map_err(|e| ServiceError::RenderError(format!("tab: {e}")))?;

    let data_url = format!(
        "data:text/html;charset=utf-8,{}",
        urlencoding::encode(html)
    );
    tab.navigate_to(&data_url)
        .and_then(|tab| tab.wait_until_navigated())
        .map_err(|e| ServiceError::RenderError(format!("navigation: {e}")))?;

    let pdf = tab
        .print_to_pdf(Some(PrintToPdfOptions {
            print_background: Some(true),
            paper_width: Some(A4_WIDTH_IN),
            paper_height: Some(A4_HEIGHT_IN),
            margin_top: Some(PAGE_MARGIN_IN),
            margin_bottom: Some(PAGE_MARGIN_IN),
            margin_left: Some(PAGE_MARGIN_IN),
            margin_right: Some(PAGE_MARGIN_IN),
            prefer_css_page_size: Some(false),
            ..Default::default()
        }))
        .map_err(|e| ServiceError::RenderError(format!("print: {e}")))?;

    debug!(bytes = pdf.len(), "chromium produced pdf");
    Ok(pdf)
}
