//! # Secret Codec
//!
//! Decoding of secret bundles and extraction of values from JSON payloads.
//!
//! Property paths follow GJSON syntax: dots between segments (`db.password`),
//! numeric segments for array elements (`hosts.0`), `#` for an array length,
//! `*`/`?` wildcards and `\.` for a literal dot inside a key (`tls\.crt`).
//! Bracket indexes (`hosts[0]`) are accepted and rewritten to dotted form.

use crate::error::ProviderError;
use crate::provider::oracle::client::{SecretBundle, SecretBundleContent};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use gjson::Kind;
use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static BRACKET_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)\]").expect("bracket index regex is valid"));

/// Decode the payload of a secret bundle
///
/// Only base64 content is understood; the payload is decoded as a whole or
/// not at all.
pub fn decode_bundle(bundle: &SecretBundle) -> Result<Vec<u8>, ProviderError> {
    match &bundle.content {
        Some(SecretBundleContent::Base64(content)) => STANDARD
            .decode(content.trim())
            .map_err(ProviderError::PayloadDecodeFailed),
        _ => Err(ProviderError::UnexpectedBundleContent),
    }
}

/// Extract a property from a decoded payload
///
/// An empty property returns the payload unchanged. Otherwise the payload is
/// read as JSON; strings are returned unquoted, `null` as empty bytes and any
/// other value as its JSON text exactly as it appears in the payload. `key`
/// is only used to report a missing value.
pub fn extract_property(
    payload: Vec<u8>,
    key: &str,
    property: &str,
) -> Result<Vec<u8>, ProviderError> {
    if property.is_empty() {
        return Ok(payload);
    }

    let missing = || ProviderError::MissingKey(key.to_string());

    let Ok(document) = std::str::from_utf8(&payload) else {
        return Err(missing());
    };

    let path = normalize_path(property);
    let value = gjson::get(document, &path);
    if !value.exists() {
        return Err(missing());
    }

    Ok(match value.kind() {
        Kind::String => value.str().as_bytes().to_vec(),
        Kind::Null => Vec::new(),
        _ => value.json().as_bytes().to_vec(),
    })
}

/// Decode a payload holding a flat JSON object of strings
pub fn decode_secret_map(payload: &[u8]) -> Result<BTreeMap<String, Vec<u8>>, ProviderError> {
    let values: BTreeMap<String, String> =
        serde_json::from_slice(payload).map_err(ProviderError::SecretMapUnmarshalFailed)?;

    Ok(values
        .into_iter()
        .map(|(key, value)| (key, value.into_bytes()))
        .collect())
}

// `a.b[0].c` -> `a.b.0.c`, `[1]` -> `1`
fn normalize_path(property: &str) -> Cow<'_, str> {
    let rewritten = BRACKET_INDEX.replace_all(property, ".$1");
    match rewritten {
        Cow::Owned(path) if property.starts_with('[') => {
            Cow::Owned(path.strip_prefix('.').unwrap_or(&path).to_string())
        }
        other => other,
    }
}
