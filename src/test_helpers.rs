//! Shared test utilities for the agl-site test suite.
//!
//! Provides fixture setup, lookup helpers, bulk extractors and ordering
//! assertions over loaded [`SiteContent`].
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let content = SiteContent::load(tmp.path()).unwrap();
//!
//! let post = find_post(&content, "my-first-post");
//! assert_eq!(post.title, "My First Post");
//!
//! assert_non_increasing(content.posts.iter().map(|p| p.date.as_str()));
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::content::{BlogPost, Page, Product, Project, SiteContent};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Content lookups, panicking with the available ids on a miss
// =========================================================================

pub fn find_post<'a>(content: &'a SiteContent, slug: &str) -> &'a BlogPost {
    content
        .posts
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| panic!("post '{slug}' not found. Available: {:?}", post_slugs(&content.posts)))
}

pub fn find_project<'a>(content: &'a SiteContent, id: &str) -> &'a Project {
    content
        .projects
        .iter()
        .find(|p| p.id == id)
        .unwrap_or_else(|| {
            let ids: Vec<&str> = content.projects.iter().map(|p| p.id.as_str()).collect();
            panic!("project '{id}' not found. Available: {ids:?}")
        })
}

pub fn find_product<'a>(content: &'a SiteContent, id: &str) -> &'a Product {
    content
        .products
        .iter()
        .find(|p| p.id == id)
        .unwrap_or_else(|| {
            let ids: Vec<&str> = content.products.iter().map(|p| p.id.as_str()).collect();
            panic!("product '{id}' not found. Available: {ids:?}")
        })
}

pub fn find_page<'a>(content: &'a SiteContent, id: &str) -> &'a Page {
    content.page(id).unwrap_or_else(|| {
        let ids: Vec<&str> = content.pages.iter().map(|p| p.id.as_str()).collect();
        panic!("page '{id}' not found. Available: {ids:?}")
    })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// Post slugs in listing order.
pub fn post_slugs(posts: &[BlogPost]) -> Vec<&str> {
    posts.iter().map(|p| p.slug.as_str()).collect()
}

/// Product ids in listing order.
pub fn product_ids(content: &SiteContent) -> Vec<&str> {
    content.products.iter().map(|p| p.id.as_str()).collect()
}

// =========================================================================
// Ordering assertions
// =========================================================================

/// Assert a sequence of ISO dates never increases.
pub fn assert_non_increasing<'a>(dates: impl IntoIterator<Item = &'a str>) {
    let dates: Vec<&str> = dates.into_iter().collect();
    for pair in dates.windows(2) {
        assert!(
            pair[0] >= pair[1],
            "dates out of order: {} before {} in {dates:?}",
            pair[0],
            pair[1]
        );
    }
}
