//! About page consumer
//!
//! Fetches `/about` from a running server and renders it as plain text.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use tracing::error;
use url::Url;

pub use crate::server::about::AboutContent;

pub const DEFAULT_SERVER: &str = "http://localhost:5002";

/// HTTP client for the about endpoint
pub struct AboutClient {
    http: Client,
    base: Url,
}

impl AboutClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|e| anyhow!("invalid server url: {e}"))?;
        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self { http, base })
    }

    pub fn about_url(&self) -> Result<Url> {
        self.base
            .join("/about")
            .map_err(|e| anyhow!("invalid about url: {e}"))
    }

    pub async fn fetch_about(&self) -> Result<AboutContent> {
        let url = self.about_url()?;

        let content = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()?
            .json::<AboutContent>()
            .await
            .context("invalid about payload")?;

        Ok(content)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageState {
    #[default]
    Unloaded,
    Loaded(AboutContent),
}

/// One about page instance. It fetches at most once over its lifetime.
#[derive(Debug, Default)]
pub struct AboutPage {
    state: PageState,
    mounted: bool,
    empty: AboutContent,
}

impl AboutPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, PageState::Loaded(_))
    }

    /// The loaded content, or the empty placeholder while unloaded
    pub fn content(&self) -> &AboutContent {
        match &self.state {
            PageState::Loaded(content) => content,
            PageState::Unloaded => &self.empty,
        }
    }

    /// Issue the single fetch for this page. Later calls do nothing.
    pub async fn mount(&mut self, client: &AboutClient) {
        if self.mounted {
            return;
        }
        self.mounted = true;

        let result = client.fetch_about().await;
        self.apply(result);
    }

    /// Apply a fetch outcome. Only the first success moves the page to `Loaded`.
    pub fn apply(&mut self, result: Result<AboutContent>) {
        match result {
            Ok(content) if !self.is_loaded() => self.state = PageState::Loaded(content),
            Ok(_) => {}
            Err(err) => error!("failed to load about page: {err:#}"),
        }
    }

    pub fn render(&self) -> String {
        let content = self.content();
        let mut out = String::from("About Brian\n");

        for paragraph in &content.paragraphs {
            out.push('\n');
            out.push_str(paragraph);
            out.push('\n');
        }

        if !content.image.is_empty() {
            out.push_str(&format!("\n[image: {}]\n", content.image));
        }

        out
    }
}
