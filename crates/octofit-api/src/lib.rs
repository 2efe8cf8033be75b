// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use octofit_app::{Fetched, ResourceKind, normalize_body};
use reqwest::blocking::Client as HttpClient;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_PLATFORM_DOMAIN: &str = "app.github.dev";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEPLOYMENT_PORT: u16 = 8000;

/// Failure of a single collection read. Shape mismatches are not errors;
/// they normalize to an empty collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The server answered with a non-2xx status.
    #[error("Failed to load {resource} ({status})")]
    Http { resource: &'static str, status: u16 },

    /// The request never completed or the body could not be read as JSON.
    #[error("Failed to load {resource}: {reason}")]
    Network {
        resource: &'static str,
        reason: String,
    },
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Network { .. } => None,
        }
    }
}

/// `https://{identifier}-8000.{platform_domain}/api`
pub fn deployment_base_url(identifier: &str, platform_domain: &str) -> String {
    format!(
        "https://{}-{DEPLOYMENT_PORT}.{}/api",
        identifier.trim(),
        platform_domain.trim().trim_matches('.')
    )
}

/// Explicit URL wins, then a deployment identifier, then the local default.
/// Blank values count as unset.
pub fn resolve_base_url(
    explicit: Option<&str>,
    deployment_id: Option<&str>,
    platform_domain: &str,
) -> String {
    if let Some(url) = explicit.map(str::trim).filter(|url| !url.is_empty()) {
        return url.trim_end_matches('/').to_owned();
    }
    if let Some(identifier) = deployment_id.map(str::trim).filter(|id| !id.is_empty()) {
        return deployment_base_url(identifier, platform_domain);
    }
    DEFAULT_BASE_URL.to_owned()
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }
        let parsed =
            Url::parse(&base_url).with_context(|| format!("parse api base url {base_url:?}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "api base url {base_url:?} must use http or https, got {:?}",
                parsed.scheme()
            );
        }
        if parsed.host_str().is_none() {
            bail!("api base url {base_url:?} has no host");
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

    pub fn endpoint(&self, resource: ResourceKind) -> String {
        format!("{}/{}/", self.base_url, resource.as_str())
    }

    pub fn fetch_collection(&self, resource: ResourceKind) -> Result<Fetched, FetchError> {
        let path = resource.as_str();
        let endpoint = self.endpoint(resource);
        tracing::debug!(resource = path, %endpoint, "fetching collection");

        let response = self
            .http
            .get(&endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(|error| self.network_error(path, &error))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(resource = path, status = status.as_u16(), "collection request failed");
            return Err(FetchError::Http {
                resource: path,
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().map_err(|error| FetchError::Network {
            resource: path,
            reason: format!("response body is not valid JSON ({error})"),
        })?;

        let fetched = normalize_body(body);
        tracing::debug!(
            resource = path,
            shape = fetched.shape.as_str(),
            records = fetched.records.len(),
            "collection received"
        );
        Ok(fetched)
    }

    fn network_error(&self, resource: &'static str, error: &reqwest::Error) -> FetchError {
        tracing::warn!(resource, %error, "collection request did not complete");
        let reason = if error.is_timeout() {
            format!("request timed out after {}ms", self.timeout.as_millis())
        } else if error.is_connect() {
            format!("cannot reach {} -- is the API server running?", self.base_url)
        } else {
            error.to_string()
        };
        FetchError::Network { resource, reason }
    }
}
