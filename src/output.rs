//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Each record leads
//! with its position and title; the file it came from, its date and other
//! context follow on indented lines. The output reads as a content inventory
//! while still pointing back at the markdown that produced it.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Blog (2 posts)
//!     001 My First Post
//!         Source: blog/my-first-post.md
//!         Date: 2025-01-15
//!
//! Products (2)
//!     001 MVP Development [Consulting]
//!         Source: products/mvp-development.md
//!
//! Config
//!     config.toml
//!     public/
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! Blog
//!     Blog: All Posts → blog/index.html
//!     Blog: My First Post → blog/my-first-post/index.html
//!
//! Generated 24 pages, 3 public files, 18 sitemap entries
//! Stylesheet: style-1a2b3c4d.css
//! ```
//!
//! ## Validate
//!
//! ```text
//! Blog: my-first-post (BlogPosting)
//!     /headline: "" is shorter than 1 character
//!
//! Checked 9 objects (2 posts, 1 project): 1 error
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::content::SiteContent;
use crate::generate::BuildReport;
use crate::sitemap::{SitemapEntry, format_priority};
use crate::validate::ValidationReport;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 post`, `3 posts`.
fn plural(n: usize, word: &str) -> String {
    counted(n, word, &format!("{word}s"))
}

fn counted(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// One record: index + title, then `Source:` and optional context lines.
fn record_lines(
    index: usize,
    title: &str,
    source: String,
    context: &[(&str, &str)],
) -> Vec<String> {
    let mut lines = vec![format!("{}{} {}", indent(1), format_index(index), title)];
    lines.push(format!("{}Source: {}", indent(2), source));
    for (label, value) in context {
        if !value.is_empty() {
            lines.push(format!("{}{}: {}", indent(2), label, value));
        }
    }
    lines
}

fn section_header(lines: &mut Vec<String>, title: &str, count: usize) {
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!("{title} ({count})"));
}

// ============================================================================
// Check: content inventory
// ============================================================================

/// Every record the loaders found, grouped by kind in listing order.
pub fn format_content_output(content: &SiteContent, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!("Blog ({})", plural(content.posts.len(), "post")));
    for (i, post) in content.posts.iter().enumerate() {
        lines.extend(record_lines(
            i + 1,
            &post.title,
            format!("blog/{}.md", post.slug),
            &[("Date", post.date.as_str())],
        ));
    }

    section_header(&mut lines, "Projects", content.projects.len());
    for (i, project) in content.projects.iter().enumerate() {
        lines.extend(record_lines(
            i + 1,
            &project.title,
            format!("projects/{}.md", project.id),
            &[("Date", project.date.as_str())],
        ));
    }

    section_header(&mut lines, "Products", content.products.len());
    for (i, product) in content.products.iter().enumerate() {
        let title = format!("{} [{}]", product.title, product.product_type.label());
        lines.extend(record_lines(
            i + 1,
            &title,
            format!("products/{}.md", product.id),
            &[("Price", product.price.as_deref().unwrap_or_default())],
        ));
    }

    section_header(&mut lines, "Releases", content.releases.len());
    for (i, release) in content.releases.iter().enumerate() {
        lines.extend(record_lines(
            i + 1,
            &release.title,
            format!("releases/{}.md", release.id),
            &[("Date", release.date.as_str())],
        ));
    }

    section_header(&mut lines, "Policies", content.policies.len());
    for (i, policy) in content.policies.iter().enumerate() {
        lines.extend(record_lines(
            i + 1,
            &policy.title,
            format!("policies/{}.md", policy.id),
            &[],
        ));
    }

    section_header(&mut lines, "Partners", content.partners.len());
    for (i, partner) in content.partners.iter().enumerate() {
        let order = partner.order.map(|o| o.to_string()).unwrap_or_default();
        lines.extend(record_lines(
            i + 1,
            &partner.title,
            format!("partners/{}.md", partner.id),
            &[("Order", order.as_str())],
        ));
    }

    section_header(&mut lines, "Pages", content.pages.len());
    for (i, page) in content.pages.iter().enumerate() {
        lines.extend(record_lines(
            i + 1,
            &page.title,
            format!("pages/{}.md", page.id),
            &[],
        ));
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push(format!("{}config.toml", indent(1)));
    }
    if source_root.join("public").is_dir() {
        lines.push(format!("{}public/", indent(1)));
    }

    lines
}

pub fn print_content_output(content: &SiteContent, source_root: &Path) {
    for line in format_content_output(content, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Pages grouped by section in build order, then totals.
///
/// A section holding a single page is shown inline: `Home → index.html`.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut sections: Vec<&str> = Vec::new();
    for page in &report.pages {
        if !sections.contains(&page.section) {
            sections.push(page.section);
        }
    }

    for section in sections {
        let pages: Vec<_> = report.pages_in(section).collect();
        if let [page] = pages.as_slice() {
            lines.push(format!("{} \u{2192} {}", page.title, page.path));
            continue;
        }
        lines.push(section.to_string());
        for page in pages {
            lines.push(format!("{}{} \u{2192} {}", indent(1), page.title, page.path));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, {}",
        plural(report.pages.len(), "page"),
        plural(report.public_files, "public file"),
        counted(report.sitemap_entries, "sitemap entry", "sitemap entries")
    ));
    lines.push(format!("Stylesheet: {}", report.stylesheet));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Validate
// ============================================================================

/// Each failing object with its field errors, then a one-line summary.
pub fn format_validation_output(report: &ValidationReport) -> Vec<String> {
    let mut lines = Vec::new();
    for failure in &report.failures {
        lines.push(format!("{} ({})", failure.schema_name, failure.schema_type));
        for error in &failure.errors {
            lines.push(format!("{}{}: {}", indent(1), error.path, error.message));
        }
        lines.push(String::new());
    }

    let errors = report.error_count();
    let outcome = if errors == 0 {
        "all valid".to_string()
    } else {
        plural(errors, "error")
    };
    lines.push(format!(
        "Checked {} ({}, {}): {}",
        plural(report.checked, "object"),
        plural(report.posts, "post"),
        plural(report.projects, "project"),
        outcome
    ));
    lines
}

pub fn print_validation_output(report: &ValidationReport) {
    for line in format_validation_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Sitemap
// ============================================================================

/// `priority  changefreq  url  (lastmod)`, one line per entry.
pub fn format_sitemap_output(entries: &[SitemapEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| {
            let line = format!(
                "{:<5} {:<7} {}",
                format_priority(e.priority),
                e.change_frequency.as_str(),
                e.url
            );
            match &e.last_modified {
                Some(date) => format!("{line} ({date})"),
                None => line,
            }
        })
        .collect()
}

pub fn print_sitemap_output(entries: &[SitemapEntry]) {
    for line in format_sitemap_output(entries) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
