//! Rendered image payloads.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::{ClickforgeError, Result};

pub const DEFAULT_IMAGE_MIME: &str = "image/png";

/// An image carried as a `data:<mime>;base64,<payload>` URL.
///
/// This is the form stored in history and exchanged with the image model, so
/// it stays a plain string on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageData(String);

impl ImageData {
    /// Wraps an existing data URL without validating it.
    pub fn from_data_url(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Builds a data URL from already base64-encoded payload.
    pub fn from_base64(mime_type: &str, payload: &str) -> Self {
        Self(format!("data:{mime_type};base64,{payload}"))
    }

    /// Encodes raw bytes into a data URL.
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self::from_base64(mime_type, &BASE64_STANDARD.encode(bytes))
    }

    pub fn as_data_url(&self) -> &str {
        &self.0
    }

    /// MIME type declared in the header, PNG when the header is missing.
    pub fn mime_type(&self) -> &str {
        self.0
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(';'))
            .map(|(mime, _)| mime)
            .filter(|mime| !mime.is_empty())
            .unwrap_or(DEFAULT_IMAGE_MIME)
    }

    /// The base64 payload after the comma.
    ///
    /// A value with no header is treated as a bare payload.
    pub fn base64_payload(&self) -> &str {
        match self.0.split_once(',') {
            Some((_, payload)) => payload,
            None => &self.0,
        }
    }

    /// Decodes the payload into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        let payload = self.base64_payload();
        if payload.is_empty() {
            return Err(ClickforgeError::invalid_input("image payload is empty"));
        }
        Ok(BASE64_STANDARD.decode(payload)?)
    }

    /// Approximate decoded size in bytes, without decoding.
    pub fn approx_len(&self) -> usize {
        self.base64_payload().len() / 4 * 3
    }
}
