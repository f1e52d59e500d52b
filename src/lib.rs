//! # AGL Site
//!
//! Static site generator for the AGL Consulting marketing and content site.
//! The content directory is the data source: each subdirectory holds one kind
//! of record, one Markdown file per record, with a YAML front-matter header.
//!
//! # Architecture: Load, Then Render
//!
//! ```text
//! 1. Load      content/  →  SiteContent        (front-matter + Markdown → records)
//! 2. Render    SiteContent + SiteConfig → dist/ (HTML, sitemap, robots, CSS)
//! ```
//!
//! Loading is the only stage that touches the content directory, and it is
//! the same code for every kind: [`content::list_sorted`] and
//! [`content::get_by_id`] are generic over [`content::ContentKind`]. Rendering
//! is pure with respect to content: every page is a function of records plus
//! the resolved [`config::SiteConfig`].
//!
//! The `validate` command reuses the same records to build every JSON-LD
//! object the site would emit and checks each one against a JSON Schema.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`content`] | Content kinds, the generic loader and [`content::SiteContent`] |
//! | [`frontmatter`] | Splits `---` YAML headers from Markdown bodies |
//! | [`markdown`] | Markdown → HTML and plain-text rendering |
//! | [`naming`] | Ids from file names, humanized labels |
//! | [`config`] | `config.toml` loading, base URL resolution, CSS variables |
//! | [`metadata`] | Per-page title, description, canonical, Open Graph, Twitter |
//! | [`schema`] | schema.org JSON-LD objects |
//! | [`breadcrumbs`] | Breadcrumb trails from URL paths |
//! | [`sitemap`] | `sitemap.xml` and `robots.txt` |
//! | [`validate`] | JSON Schema checks for every emitted JSON-LD object |
//! | [`contact`] | Contact form rules shared with the page script |
//! | [`generate`] | HTML rendering with Maud and the output tree |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Base URL, Passed Explicitly
//!
//! Canonical links, social images, JSON-LD and the sitemap all need absolute
//! URLs. The base URL is resolved once (flag, environment, config file,
//! default) and handed to every generator inside `SiteConfig`; nothing reads
//! the environment after startup.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): malformed markup
//! is a compile error, interpolation is escaped by default, and there is no
//! template directory to ship alongside the binary.
//!
//! ## Missing Is Not an Error
//!
//! A missing content directory is an empty listing and an unknown id is
//! `Ok(None)`. A file that exists but cannot be parsed is always an error
//! naming that file.

pub mod breadcrumbs;
pub mod config;
pub mod contact;
pub mod content;
pub mod frontmatter;
pub mod generate;
pub mod markdown;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod schema;
pub mod sitemap;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
