//! Identifier and label conventions shared by every content kind.
//!
//! Content files are named after the identifier they publish under:
//! `content/blog/my-first-post.md` is the post `my-first-post`, served at
//! `/blog/my-first-post/`. Display labels are derived from identifiers in two
//! flavours:
//!
//! - [`humanize`] for page titles and breadcrumbs:
//!   `my-awesome_post` → "My Awesome Post"
//! - [`policy_title`] for policy documents, which only split on dashes:
//!   `privacy-policy` → "Privacy Policy"

use percent_encoding::percent_decode_str;
use std::path::Path;

/// Derive the content identifier from a Markdown filename.
///
/// Returns `None` for anything that is not a visible `.md` file:
/// - `"my-post.md"` → `Some("my-post")`
/// - `"notes.txt"` → `None`
/// - `".draft.md"` → `None` (hidden)
/// - `"archive.md.bak"` → `None`
pub fn content_id(file_name: &str) -> Option<&str> {
    if file_name.starts_with('.') {
        return None;
    }
    file_name
        .strip_suffix(".md")
        .filter(|stem| !stem.is_empty())
}

/// Same as [`content_id`], taking a path.
pub fn content_id_from_path(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    content_id(name).map(str::to_string)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Upper-case every word character that starts a word.
///
/// A word starts at the beginning of the string or after any non-word
/// character, so `"release notes 2025"` → `"Release Notes 2025"` and
/// `"don't"` → `"Don'T"`. The rest of each word is left untouched.
pub fn title_case_words(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_is_word = false;
    for c in input.chars() {
        let word = is_word_char(c);
        if word && !prev_is_word {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_is_word = word;
    }
    out
}

/// Collapse every run of `-` and `_` into a single space.
pub fn separators_to_spaces(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_run = false;
    for c in input.chars() {
        if c == '-' || c == '_' {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Turn a slug or id into a display label.
///
/// Slashes separate segments, which are humanized individually and joined
/// with a space:
/// - `"my-first-post"` → "My First Post"
/// - `"my-awesome_post"` → "My Awesome Post"
/// - `"release-notes-2025-jun-25"` → "Release Notes 2025 Jun 25"
pub fn humanize(input: &str) -> String {
    input
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|segment| title_case_words(&separators_to_spaces(segment)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Humanize a single URL path segment, percent-decoding it first.
///
/// `"my%20post"` → "My Post". Invalid escapes leave the segment as-is.
pub fn humanize_segment(segment: &str) -> String {
    title_case_words(&separators_to_spaces(&decode_segment(segment)))
}

/// Percent-decode a URL path segment.
///
/// Falls back to the raw segment when the decoded bytes are not UTF-8.
pub fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

/// Title for a policy document: split on `-`, upper-case each word's first
/// character, join with spaces.
///
/// `"privacy-policy"` → "Privacy Policy", `"terms_of-use"` → "Terms_of Use".
pub fn policy_title(id: &str) -> String {
    id.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
