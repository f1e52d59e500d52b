//! The content kinds and their front-matter shapes.
//!
//! Each kind deserializes its header into an all-optional `*Meta` struct and
//! then builds the record field by field, so a missing required field is a
//! [`ContentError::Invalid`] naming the field and file.

use super::{ContentError, ContentKind, LoadMode, by_date_desc};
use crate::frontmatter::{self, FrontmatterError};
use crate::{markdown, naming};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Product id that always sorts after every other product.
pub const EVERYTHING_ELSE_ID: &str = "everything-else";

/// Partners without an explicit `order` sort as if they had this one.
const DEFAULT_PARTNER_ORDER: u32 = 999;

/// Maximum length of a description derived from a policy body.
const POLICY_SUMMARY_CHARS: usize = 160;

/// A labelled outbound link from a project or product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub url: String,
}

// =============================================================================
// Field helpers
// =============================================================================

fn parse_header<T: serde::de::DeserializeOwned>(
    raw: &str,
    path: &Path,
) -> Result<(T, String), ContentError> {
    frontmatter::parse::<T>(raw)
        .map(|(meta, body)| (meta, body.to_string()))
        .map_err(|source: FrontmatterError| ContentError::Frontmatter {
            path: path.to_path_buf(),
            source,
        })
}

fn required(value: Option<String>, field: &str, path: &Path) -> Result<String, ContentError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ContentError::invalid(
            path,
            format!("missing required field `{field}`"),
        )),
    }
}

/// A required date whose first ten characters are a calendar date.
///
/// `2025-01-15` and `2025-01-15T09:30:00Z` are accepted and kept verbatim;
/// listings compare these strings directly.
fn required_date(value: Option<String>, path: &Path) -> Result<String, ContentError> {
    let date = required(value, "date", path)?;
    let valid = date
        .get(..10)
        .is_some_and(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").is_ok());
    if !valid {
        return Err(ContentError::invalid(
            path,
            format!("date `{date}` is not in YYYY-MM-DD form"),
        ));
    }
    Ok(date)
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => format!("{}…", text[..end].trim_end()),
        None => text.to_string(),
    }
}

// =============================================================================
// Blog posts
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PostMeta {
    title: Option<String>,
    date: Option<String>,
    excerpt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogPost {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub excerpt: String,
    /// Rendered body. Only populated when the post is fetched by slug.
    pub content_html: Option<String>,
}

impl ContentKind for BlogPost {
    const DIR: &'static str = "blog";

    fn parse(id: &str, raw: &str, path: &Path, mode: LoadMode) -> Result<Self, ContentError> {
        let (meta, body) = parse_header::<PostMeta>(raw, path)?;
        Ok(BlogPost {
            slug: id.to_string(),
            title: required(meta.title, "title", path)?,
            date: required_date(meta.date, path)?,
            excerpt: meta.excerpt.unwrap_or_default(),
            content_html: (mode == LoadMode::Detail).then(|| markdown::render(&body)),
        })
    }

    fn id(&self) -> &str {
        &self.slug
    }

    fn compare(a: &Self, b: &Self) -> Ordering {
        by_date_desc(&a.date, &a.slug, &b.date, &b.slug)
    }
}

// =============================================================================
// Projects
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProjectMeta {
    title: Option<String>,
    date: Option<String>,
    description: Option<String>,
    features: Vec<String>,
    technologies: Vec<String>,
    links: Vec<Link>,
    application_category: Option<String>,
    operating_system: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub date: String,
    pub description: String,
    pub content_html: String,
    pub features: Vec<String>,
    pub technologies: Vec<String>,
    pub links: Vec<Link>,
    /// Schema.org `applicationCategory`; generators fall back to a default.
    pub application_category: Option<String>,
    pub operating_system: Option<String>,
}

impl ContentKind for Project {
    const DIR: &'static str = "projects";

    fn parse(id: &str, raw: &str, path: &Path, _mode: LoadMode) -> Result<Self, ContentError> {
        let (meta, body) = parse_header::<ProjectMeta>(raw, path)?;
        Ok(Project {
            id: id.to_string(),
            title: required(meta.title, "title", path)?,
            date: required_date(meta.date, path)?,
            description: meta.description.unwrap_or_default(),
            content_html: markdown::render(&body),
            features: meta.features,
            technologies: meta.technologies,
            links: meta.links,
            application_category: meta.application_category,
            operating_system: meta.operating_system,
        })
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn compare(a: &Self, b: &Self) -> Ordering {
        by_date_desc(&a.date, &a.id, &b.date, &b.id)
    }
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductType {
    MobileApp,
    Consulting,
}

impl ProductType {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductType::MobileApp => "mobile-app",
            ProductType::Consulting => "consulting",
        }
    }

    /// Badge text shown on product cards.
    pub fn label(self) -> &'static str {
        match self {
            ProductType::MobileApp => "Mobile App",
            ProductType::Consulting => "Consulting",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mobile-app" => Ok(ProductType::MobileApp),
            "consulting" => Ok(ProductType::Consulting),
            other => Err(format!(
                "unknown product type `{other}` (expected `mobile-app` or `consulting`)"
            )),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProductMeta {
    title: Option<String>,
    date: Option<String>,
    description: Option<String>,
    #[serde(rename = "type")]
    product_type: Option<String>,
    price: Option<String>,
    features: Vec<String>,
    technologies: Vec<String>,
    links: Vec<Link>,
    deliverables: Vec<String>,
    duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub date: String,
    pub description: String,
    pub content_html: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub price: Option<String>,
    pub features: Vec<String>,
    pub technologies: Vec<String>,
    pub links: Vec<Link>,
    pub deliverables: Vec<String>,
    pub duration: Option<String>,
}

impl ContentKind for Product {
    const DIR: &'static str = "products";

    fn parse(id: &str, raw: &str, path: &Path, _mode: LoadMode) -> Result<Self, ContentError> {
        let (meta, body) = parse_header::<ProductMeta>(raw, path)?;
        let product_type = required(meta.product_type, "type", path)?
            .parse::<ProductType>()
            .map_err(|message| ContentError::invalid(path, message))?;
        Ok(Product {
            id: id.to_string(),
            title: required(meta.title, "title", path)?,
            date: required_date(meta.date, path)?,
            description: meta.description.unwrap_or_default(),
            content_html: markdown::render(&body),
            product_type,
            price: meta.price,
            features: meta.features,
            technologies: meta.technologies,
            links: meta.links,
            deliverables: meta.deliverables,
            duration: meta.duration,
        })
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn compare(a: &Self, b: &Self) -> Ordering {
        let a_last = a.id == EVERYTHING_ELSE_ID;
        let b_last = b.id == EVERYTHING_ELSE_ID;
        a_last
            .cmp(&b_last)
            .then_with(|| by_date_desc(&a.date, &a.id, &b.date, &b.id))
    }
}

// =============================================================================
// Releases
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReleaseMeta {
    title: Option<String>,
    date: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Release {
    pub id: String,
    pub title: String,
    pub date: String,
    pub description: String,
    pub content_html: String,
}

impl ContentKind for Release {
    const DIR: &'static str = "releases";

    fn parse(id: &str, raw: &str, path: &Path, _mode: LoadMode) -> Result<Self, ContentError> {
        let (meta, body) = parse_header::<ReleaseMeta>(raw, path)?;
        Ok(Release {
            id: id.to_string(),
            title: required(meta.title, "title", path)?,
            date: required_date(meta.date, path)?,
            description: meta.description.unwrap_or_default(),
            content_html: markdown::render(&body),
        })
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn compare(a: &Self, b: &Self) -> Ordering {
        by_date_desc(&a.date, &a.id, &b.date, &b.id)
    }
}

// =============================================================================
// Policies
// =============================================================================

/// A policy document. The whole file is Markdown; there is no header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Policy {
    pub id: String,
    /// The id with each dash-separated word capitalised.
    pub title: String,
    pub content_html: String,
    /// Leading plain text of the body, for meta descriptions.
    pub summary: String,
}

impl ContentKind for Policy {
    const DIR: &'static str = "policies";

    fn parse(id: &str, raw: &str, _path: &Path, _mode: LoadMode) -> Result<Self, ContentError> {
        Ok(Policy {
            id: id.to_string(),
            title: naming::policy_title(id),
            content_html: markdown::render(raw),
            summary: truncate_chars(&markdown::plain_text(raw), POLICY_SUMMARY_CHARS),
        })
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn compare(a: &Self, b: &Self) -> Ordering {
        a.id.cmp(&b.id)
    }
}

// =============================================================================
// Partners
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartnerMeta {
    title: Option<String>,
    description: Option<String>,
    logo: Option<String>,
    url: Option<String>,
    order: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partner {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Site-relative path or absolute URL of the partner's logo.
    pub logo: String,
    pub url: String,
    pub order: Option<u32>,
}

impl Partner {
    pub fn sort_order(&self) -> u32 {
        self.order.unwrap_or(DEFAULT_PARTNER_ORDER)
    }
}

impl ContentKind for Partner {
    const DIR: &'static str = "partners";

    fn parse(id: &str, raw: &str, path: &Path, _mode: LoadMode) -> Result<Self, ContentError> {
        let (meta, _body) = parse_header::<PartnerMeta>(raw, path)?;
        Ok(Partner {
            id: id.to_string(),
            title: required(meta.title, "title", path)?,
            description: meta.description.unwrap_or_default(),
            logo: meta.logo.unwrap_or_default(),
            url: meta.url.unwrap_or_default(),
            order: meta.order,
        })
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn compare(a: &Self, b: &Self) -> Ordering {
        a.sort_order()
            .cmp(&b.sort_order())
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.id.cmp(&b.id))
    }
}

// =============================================================================
// Standalone pages
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PageMeta {
    title: Option<String>,
    description: Option<String>,
}

/// A one-off page such as `about` or `privacy`, served at `/<id>/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content_html: String,
}

impl ContentKind for Page {
    const DIR: &'static str = "pages";

    fn parse(id: &str, raw: &str, path: &Path, _mode: LoadMode) -> Result<Self, ContentError> {
        let (meta, body) = parse_header::<PageMeta>(raw, path)?;
        Ok(Page {
            id: id.to_string(),
            title: required(meta.title, "title", path)?,
            description: meta.description.unwrap_or_default(),
            content_html: markdown::render(&body),
        })
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn compare(a: &Self, b: &Self) -> Ordering {
        a.id.cmp(&b.id)
    }
}
