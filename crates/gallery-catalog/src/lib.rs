// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use gallery_app::{ArtworkPage, ArtworkRecord};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.artic.edu/api/v1";

/// Blocking client for the artworks listing endpoint.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("catalog.base_url must not be empty");
        }
        let parsed = Url::parse(&base_url)
            .with_context(|| format!("catalog.base_url {base_url:?} is not a valid URL"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "catalog.base_url {base_url:?} must use http or https, got {}",
                parsed.scheme()
            );
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `index` is zero-based; the endpoint counts pages from one.
    pub fn page_url(&self, index: usize, size: usize) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/artworks", self.base_url))
            .with_context(|| format!("build artworks URL from {}", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("page", &(index + 1).to_string())
            .append_pair("limit", &size.to_string());
        Ok(url)
    }

    pub fn fetch_page(&self, index: usize, size: usize) -> Result<ArtworkPage> {
        let url = self.page_url(index, size)?;
        tracing::debug!(%url, page = index + 1, limit = size, "fetching artworks page");

        let response = self
            .http
            .get(url)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let parsed: ArtworksResponse = response.json().context("decode artworks page")?;
        tracing::debug!(
            records = parsed.data.len(),
            total = parsed.pagination.total,
            "artworks page decoded"
        );
        Ok(ArtworkPage {
            records: parsed.data,
            total: parsed.pagination.total,
        })
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("request to {base_url} timed out ({error})");
    }
    anyhow!("cannot reach {base_url} -- check network access and [catalog].base_url ({error})")
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<CatalogErrorEnvelope>(body) {
        if let Some(detail) = parsed.detail.filter(|detail| !detail.is_empty()) {
            return anyhow!("server error ({}): {}", status.as_u16(), detail);
        }
        if let Some(error) = parsed.error.filter(|error| !error.is_empty()) {
            return anyhow!("server error ({}): {}", status.as_u16(), error);
        }
    }

    if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        return anyhow!("server error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
struct ArtworksResponse {
    data: Vec<ArtworkRecord>,
    pagination: Pagination,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    total: u64,
}

#[derive(Debug, Deserialize)]
struct CatalogErrorEnvelope {
    error: Option<String>,
    detail: Option<String>,
}
