use crate::config::REC_PATH;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use log::{debug, info};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

/// a view count to replay, either a json number or a numeric string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RecCount {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for RecCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecCount::Number(n) => write!(f, "{n}"),
            RecCount::Text(s) => write!(f, "{s}"),
        }
    }
}

/// `page_id -> count` pairs to replay against the recovery endpoint, kept in file order
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RecoveryInput {
    entries: IndexMap<String, RecCount>,
}

impl RecoveryInput {
    /// loads the recovery input from the json file at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read recovery input {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("invalid recovery input {}", path.display()))
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RecCount)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// builds `<base>/rec?page_id=<page_id>&count=<count>`, percent-encoding both values
pub fn rec_url(base: &str, page_id: &str, count: &RecCount) -> Result<Url> {
    let endpoint = format!("{}{REC_PATH}", base.trim_end_matches('/'));
    let count = count.to_string();

    Url::parse_with_params(&endpoint, &[("page_id", page_id), ("count", count.as_str())])
        .with_context(|| format!("invalid recovery endpoint {endpoint}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReply {
    pub status: StatusCode,
    pub body: String,
}

/// issues a single GET and hands back the status and body.
///
/// transport failures are returned as errors; any http status, including
/// non-2xx ones, is a successful reply.
#[allow(async_fn_in_trait)]
pub trait PageClient {
    async fn get(&self, url: Url) -> Result<PageReply>;
}

#[derive(Debug, Default, Clone)]
pub struct HttpPageClient {
    client: reqwest::Client,
}

impl HttpPageClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl PageClient for HttpPageClient {
    async fn get(&self, url: Url) -> Result<PageReply> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .with_context(|| format!("failed to read response body from {url}"))?;

        Ok(PageReply { status, body })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecoverySummary {
    pub recovered: usize,
    pub failed: usize,
}

/// replays recovery input against the badge service one page at a time
pub struct Recoverer<C: PageClient> {
    client: C,
    base_url: String,
}

impl<C: PageClient> Recoverer<C> {
    pub fn new<T: Into<String>>(client: C, base_url: T) -> Result<Self> {
        let base_url = base_url.into();
        Url::parse(&base_url).with_context(|| format!("invalid base url {base_url}"))?;

        Ok(Self { client, base_url })
    }

    /// sends one request per entry, in input order, writing one line per
    /// outcome to `out`. a non-200 status is reported and skipped, a
    /// transport error aborts the run.
    pub async fn run<W: Write>(&self, input: &RecoveryInput, out: &mut W) -> Result<RecoverySummary> {
        let mut summary = RecoverySummary::default();

        for (page_id, count) in input.iter() {
            let url = rec_url(&self.base_url, page_id, count)?;
            debug!("recovering page {page_id} with count {count}");

            let reply = self.client.get(url).await?;
            if reply.status == StatusCode::OK {
                writeln!(out, "Response content: {}", reply.body)?;
                summary.recovered += 1;
            } else {
                debug!("recovery of {page_id} rejected with {}", reply.status);
                writeln!(out, "Request error: {}", reply.status.as_u16())?;
                summary.failed += 1;
            }
        }

        info!(
            "recovery done: {} recovered, {} rejected",
            summary.recovered, summary.failed
        );

        Ok(summary)
    }
}
