//! Stable fingerprints identifying the same underlying post across sources

use crate::content::ContentRecord;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use url::Url;

/// Default number of characters of normalized text that enter the key
pub const DEFAULT_TEXT_PREFIX_LEN: usize = 200;

/// SHA-256 digest of a record's composite key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(&text, &mut bytes).map_err(serde::de::Error::custom)?;
        Ok(Self(bytes))
    }
}

/// Computes fingerprints with a fixed text prefix length
#[derive(Debug, Clone)]
pub struct Fingerprinter {
    text_prefix_len: usize,
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new(DEFAULT_TEXT_PREFIX_LEN)
    }
}

impl Fingerprinter {
    pub fn new(text_prefix_len: usize) -> Self {
        Self { text_prefix_len }
    }

    pub fn text_prefix_len(&self) -> usize {
        self.text_prefix_len
    }

    /// Fingerprint a record. Pure and total.
    pub fn fingerprint(&self, record: &ContentRecord) -> Fingerprint {
        let url = normalize_url(&record.canonical_url);
        let text = self.text_projection(record);

        let mut hasher = Sha256::new();
        hasher.update(record.source_category.as_str().as_bytes());
        hasher.update(b"|");
        hasher.update(record.creator_id.as_bytes());
        hasher.update(b"|");
        hasher.update(url.as_bytes());
        hasher.update(b"|");
        hasher.update(text.as_bytes());

        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hasher.finalize());
        Fingerprint(bytes)
    }

    /// Normalized title and description prefix that enters the composite key.
    ///
    /// Empty for text-less records, which then match on URL, category and
    /// creator alone.
    pub fn text_projection(&self, record: &ContentRecord) -> String {
        let headline = format!("{} {}", record.title, record.description_excerpt);
        normalize_text(&headline)
            .chars()
            .take(self.text_prefix_len)
            .collect()
    }
}

/// Fingerprint with the default prefix length
pub fn fingerprint(record: &ContentRecord) -> Fingerprint {
    Fingerprinter::default().fingerprint(record)
}

/// Lower-case, drop non-alphanumerics, collapse whitespace
pub fn normalize_text(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip query and fragment, lower-case scheme and host, trim trailing slash
pub fn normalize_url(raw: &str) -> String {
    let raw = raw.trim();
    match Url::parse(raw) {
        Ok(mut url) if url.has_host() => {
            url.set_query(None);
            url.set_fragment(None);
            url.as_str().trim_end_matches('/').to_string()
        }
        _ => normalize_url_text(raw),
    }
}

fn normalize_url_text(raw: &str) -> String {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    let without_query = &raw[..end];

    let normalized = match without_query.split_once("://") {
        Some((scheme, rest)) => {
            let (host, path) = rest.split_at(rest.find('/').unwrap_or(rest.len()));
            format!(
                "{}://{}{}",
                scheme.to_lowercase(),
                host.to_lowercase(),
                path
            )
        }
        None => without_query.to_string(),
    };
    normalized.trim_end_matches('/').to_string()
}
