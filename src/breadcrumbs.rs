//! Breadcrumb trails derived from URL paths.
//!
//! `/blog/my-post` becomes `Home → Blog → My Post`, each hop carrying the
//! absolute URL of its cumulative prefix. The same trail feeds the
//! `BreadcrumbList` JSON-LD and the on-page breadcrumb bar.

use crate::config::SiteConfig;
use crate::naming;
use crate::schema::{BreadcrumbItem, BreadcrumbListSchema, generate_breadcrumb_schema};
use maud::{Markup, html};

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Ordered trail for a path, starting at Home. `/` yields Home alone.
pub fn path_to_breadcrumb_items(config: &SiteConfig, path: &str) -> Vec<BreadcrumbItem> {
    let segments = segments(path);
    let mut items = Vec::with_capacity(segments.len() + 1);
    items.push(BreadcrumbItem {
        name: "Home".to_string(),
        url: config.base_url.clone(),
    });

    let mut prefix = String::new();
    for segment in segments {
        prefix.push('/');
        prefix.push_str(segment);
        items.push(BreadcrumbItem {
            name: naming::humanize_segment(segment),
            url: format!("{}{}", config.base_url, prefix),
        });
    }
    items
}

pub fn breadcrumb_schema_for_path(config: &SiteConfig, path: &str) -> BreadcrumbListSchema {
    generate_breadcrumb_schema(&path_to_breadcrumb_items(config, path))
}

/// Visible breadcrumb bar. Empty on the home page.
///
/// Links are site-relative and labelled with the decoded path segment, so
/// the bar mirrors the URL the visitor sees.
pub fn render_breadcrumbs(path: &str) -> Markup {
    let segments = segments(path);
    let crumbs: Vec<(String, String)> = segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let href = format!("/{}", segments[..=i].join("/"));
            (href, naming::decode_segment(segment))
        })
        .collect();

    html! {
        nav.breadcrumbs aria-label="Breadcrumbs" {
            @if !crumbs.is_empty() {
                a href="/" { "Home" }
                @for (href, label) in &crumbs {
                    span.breadcrumb-sep { " / " }
                    a href=(href) { (label) }
                }
            }
        }
    }
}
