use std::time::Duration;

use encoding_rs::UTF_8;
use reqwest::blocking::Client;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use serde::Serialize;
use serde_json::Value;

use crate::error::{CmsError, Result};
use crate::model::Catalog;
use crate::services::legacy;

/// Which source a load ended up using.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LoadSource {
    Fetch,
    Embedded,
    Handle,
    Empty,
}

/// Remote copy of the published catalog.
pub trait CatalogFetcher: Send {
    /// The parsed document, or an error when the request, the status or the
    /// body is unusable.
    fn fetch(&self) -> Result<Value>;
}

pub struct HttpFetcher {
    client: Client,
    url: String,
}

impl HttpFetcher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(url, client))
    }

    pub fn with_client(url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl CatalogFetcher for HttpFetcher {
    fn fetch(&self) -> Result<Value> {
        let resp = self
            .client
            .get(&self.url)
            .header(CACHE_CONTROL, "no-store")
            .header(PRAGMA, "no-cache")
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CmsError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let bytes = resp.bytes()?;
        decode_document(&bytes)
    }
}

/// Decodes file or response bytes the way a browser reads text: UTF-8 with
/// BOM sniffing, invalid sequences replaced. Blank text reads as `{}`.
pub fn decode_document(bytes: &[u8]) -> Result<Value> {
    let (text, encoding, had_errors) = UTF_8.decode(bytes);
    if had_errors {
        log::warn!("catalog text is not valid {}, replaced bad sequences", encoding.name());
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    Ok(serde_json::from_str(trimmed)?)
}

/// Current-shape documents are used as they are; anything else goes
/// through the legacy adapter.
pub fn catalog_from_document(doc: Value) -> Result<Catalog> {
    if Catalog::is_current_shape(&doc) {
        Ok(Catalog::from_value(doc)?)
    } else {
        Ok(legacy::adapt(&doc))
    }
}
