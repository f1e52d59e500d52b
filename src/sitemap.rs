//! Sitemap and robots.txt.
//!
//! The sitemap is a flat list of every public URL in a fixed section order,
//! each with a crawl-frequency hint and a priority from this table:
//!
//! | URL | Frequency | Priority |
//! |-----|-----------|----------|
//! | `/` | weekly | 1.0 |
//! | `/policies` | weekly | 0.8 |
//! | `/policies/<id>` | monthly | 0.5 |
//! | `/blog/page/1` | weekly | 0.8 |
//! | `/blog/<slug>` | monthly | 0.5, `lastmod` = post date |
//! | `/projects` | monthly | 0.8 |
//! | `/projects/<id>` | monthly | 0.5 |
//! | `/products` | monthly | 0.9 |
//! | `/products/<id>` | monthly | 0.6 |
//! | `/people` | monthly | 0.25 |
//! | `/releases` | monthly | 0.125 |
//! | `/releases/<id>` | monthly | 0.5 |
//! | `/security`, `/contact`, `/privacy` | monthly | 0.125 |
//!
//! Entries are neither deduplicated nor reordered across sections.

use crate::config::SiteConfig;
use crate::content::{ContentError, SiteContent};
use maud::{Markup, PreEscaped, html};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Weekly,
    Monthly,
}

impl ChangeFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

fn entry(url: String, change_frequency: ChangeFrequency, priority: f32) -> SitemapEntry {
    SitemapEntry {
        url,
        last_modified: None,
        change_frequency,
        priority,
    }
}

/// Every sitemap entry for already-loaded content.
pub fn build_sitemap(config: &SiteConfig, content: &SiteContent) -> Vec<SitemapEntry> {
    use ChangeFrequency::{Monthly, Weekly};

    let url = |path: &str| config.url_for(path);
    let mut entries = vec![entry(url(""), Weekly, 1.0)];

    entries.push(entry(url("policies"), Weekly, 0.8));
    entries.extend(
        content
            .policies
            .iter()
            .map(|p| entry(url(&format!("policies/{}", p.id)), Monthly, 0.5)),
    );

    entries.push(entry(url("blog/page/1"), Weekly, 0.8));
    entries.extend(content.posts.iter().map(|p| SitemapEntry {
        last_modified: Some(p.date.clone()),
        ..entry(url(&format!("blog/{}", p.slug)), Monthly, 0.5)
    }));

    entries.push(entry(url("projects"), Monthly, 0.8));
    entries.extend(
        content
            .projects
            .iter()
            .map(|p| entry(url(&format!("projects/{}", p.id)), Monthly, 0.5)),
    );

    entries.push(entry(url("products"), Monthly, 0.9));
    entries.extend(
        content
            .products
            .iter()
            .map(|p| entry(url(&format!("products/{}", p.id)), Monthly, 0.6)),
    );

    entries.push(entry(url("people"), Monthly, 0.25));

    entries.push(entry(url("releases"), Monthly, 0.125));
    entries.extend(
        content
            .releases
            .iter()
            .map(|r| entry(url(&format!("releases/{}", r.id)), Monthly, 0.5)),
    );

    for page in ["security", "contact", "privacy"] {
        entries.push(entry(url(page), Monthly, 0.125));
    }
    entries
}

/// Load all content under `root` and build the sitemap.
pub fn load_sitemap(config: &SiteConfig, root: &Path) -> Result<Vec<SitemapEntry>, ContentError> {
    let content = SiteContent::load(root)?;
    Ok(build_sitemap(config, &content))
}

/// `0.5` → `"0.5"`, `1.0` → `"1.0"`, `0.125` → `"0.125"`.
pub fn format_priority(priority: f32) -> String {
    let fixed = format!("{priority:.3}");
    let trimmed = fixed.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{trimmed}0")
    } else {
        trimmed.to_string()
    }
}

/// `sitemap.xml` in the sitemaps.org 0.9 format.
pub fn render_sitemap_xml(entries: &[SitemapEntry]) -> Markup {
    html! {
        (PreEscaped(r#"<?xml version="1.0" encoding="UTF-8"?>"#))
        "\n"
        urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" {
            @for e in entries {
                url {
                    loc { (e.url) }
                    @if let Some(date) = &e.last_modified {
                        lastmod { (date) }
                    }
                    changefreq { (e.change_frequency.as_str()) }
                    priority { (format_priority(e.priority)) }
                }
            }
        }
    }
}

pub fn render_robots_txt(config: &SiteConfig) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}\n",
        config.url_for("sitemap.xml")
    )
}
