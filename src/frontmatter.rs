//! YAML front-matter splitting and typed parsing.
//!
//! A content file optionally starts with a YAML header fenced by `---` lines:
//!
//! ```text
//! ---
//! title: "Hello"
//! date: "2025-01-15"
//! ---
//! Markdown body starts here.
//! ```
//!
//! Files without an opening fence are all body, with an empty header. An
//! opening fence with no closing fence is an error rather than silently
//! treating the whole file as metadata.

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("front-matter opened with '---' but never closed")]
    Unterminated,
    #[error("invalid front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A content file split into its header and body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<'a> {
    /// Raw YAML between the fences, `None` when the file has no header.
    pub header: Option<&'a str>,
    /// Everything after the closing fence.
    pub body: &'a str,
}

const FENCE: &str = "---";

fn is_fence(line: &str) -> bool {
    line.trim_end_matches(['\r', '\n']).trim_end() == FENCE
}

/// Split raw file text into header and body.
pub fn split(raw: &str) -> Result<Document<'_>, FrontmatterError> {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let Some(first_len) = text.find('\n').map(|i| i + 1) else {
        // Single line: either a lone fence (unterminated) or plain body.
        if is_fence(text) {
            return Err(FrontmatterError::Unterminated);
        }
        return Ok(Document {
            header: None,
            body: text,
        });
    };

    if !is_fence(&text[..first_len]) {
        return Ok(Document {
            header: None,
            body: text,
        });
    }

    let rest = &text[first_len..];
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if is_fence(line) {
            return Ok(Document {
                header: Some(&rest[..offset]),
                body: &rest[offset + line.len()..],
            });
        }
        offset += line.len();
    }
    Err(FrontmatterError::Unterminated)
}

/// Split and deserialize the header into `T`.
///
/// A missing or blank header deserializes from an empty mapping, so `T`
/// decides through `#[serde(default)]` which fields are optional.
pub fn parse<T: DeserializeOwned>(raw: &str) -> Result<(T, &str), FrontmatterError> {
    let doc = split(raw)?;
    let yaml = doc.header.filter(|h| !h.trim().is_empty()).unwrap_or("{}");
    let meta = serde_yaml::from_str(yaml)?;
    Ok((meta, doc.body))
}
