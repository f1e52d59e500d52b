//! Content loading: Markdown files with front-matter → typed records.
//!
//! Every content kind lives in its own directory under the content root and
//! follows the same pipeline:
//!
//! ```text
//! content/<kind>/<id>.md  →  front-matter + body  →  typed record
//!                             (frontmatter)          (validated, body → HTML)
//! ```
//!
//! | Kind | Directory | Listing order |
//! |------|-----------|---------------|
//! | [`BlogPost`] | `blog/` | date desc, id asc |
//! | [`Project`] | `projects/` | date desc, id asc |
//! | [`Product`] | `products/` | date desc, id asc, `everything-else` last |
//! | [`Release`] | `releases/` | date desc, id asc |
//! | [`Policy`] | `policies/` | id asc |
//! | [`Partner`] | `partners/` | `order` asc (unset = 999), title asc |
//! | [`Page`] | `pages/` | id asc |
//!
//! The kinds differ only in their [`ContentKind`] implementation; directory
//! walking, identifier derivation, not-found handling and sorting are shared
//! by [`list_sorted`] and [`get_by_id`].
//!
//! ## Identifiers
//!
//! The id (or slug, for posts) is the filename without `.md`. Hidden files and
//! files with any other extension are ignored.
//!
//! ## Validation
//!
//! Required front-matter fields are checked at load time. A missing title or a
//! malformed date fails the load with [`ContentError::Invalid`] naming the
//! file, instead of producing a record with blank fields.
//!
//! ## Not found
//!
//! [`get_by_id`] returns `Ok(None)` when no file exists for the id, for every
//! kind. Any other read or parse failure is an error.

mod kinds;

pub use kinds::{
    BlogPost, EVERYTHING_ELSE_ID, Link, Page, Partner, Policy, Product, ProductType, Project,
    Release,
};

use crate::frontmatter::FrontmatterError;
use crate::naming;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", .path.display())]
    Frontmatter {
        path: PathBuf,
        #[source]
        source: FrontmatterError,
    },
    #[error("{}: {message}", .path.display())]
    Invalid { path: PathBuf, message: String },
}

impl ContentError {
    pub(crate) fn invalid(path: &Path, message: impl Into<String>) -> Self {
        ContentError::Invalid {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

/// How a record is being loaded.
///
/// Blog listings only need title, date and excerpt, so posts skip rendering
/// their body unless fetched individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    Listing,
    Detail,
}

/// A content kind: where its files live, how one is parsed, how they sort.
pub trait ContentKind: Sized + Send {
    /// Directory under the content root.
    const DIR: &'static str;

    /// Build a record from a file's id and raw text. `path` is for errors.
    fn parse(id: &str, raw: &str, path: &Path, mode: LoadMode) -> Result<Self, ContentError>;

    fn id(&self) -> &str;

    /// Listing order.
    fn compare(a: &Self, b: &Self) -> Ordering;
}

/// Newest first by ISO date string, ties broken by id ascending.
pub fn by_date_desc(a_date: &str, a_id: &str, b_date: &str, b_id: &str) -> Ordering {
    b_date.cmp(a_date).then_with(|| a_id.cmp(b_id))
}

/// Directory holding a kind's files.
pub fn kind_dir<K: ContentKind>(root: &Path) -> PathBuf {
    root.join(K::DIR)
}

/// Collect `(id, path)` for every Markdown file in a directory, sorted by id.
///
/// A missing directory is treated as empty.
fn collect_sources(dir: &Path) -> Result<Vec<(String, PathBuf)>, ContentError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(dir = %dir.display(), "content directory missing, treating as empty");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(ContentError::Io {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut sources = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ContentError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match naming::content_id_from_path(&path) {
            Some(id) => sources.push((id, path)),
            None => debug!(path = %path.display(), "skipping non-markdown file"),
        }
    }
    sources.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(sources)
}

fn read_source(path: &Path) -> Result<String, ContentError> {
    fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_one<K: ContentKind>(id: &str, path: &Path, mode: LoadMode) -> Result<K, ContentError> {
    let raw = read_source(path)?;
    debug!(kind = K::DIR, id, "loaded content file");
    K::parse(id, &raw, path, mode)
}

/// Load every record of a kind, sorted by the kind's listing order.
///
/// Files are read and parsed in parallel; the result is sorted afterwards so
/// the order never depends on directory enumeration.
pub fn list_sorted<K: ContentKind>(root: &Path) -> Result<Vec<K>, ContentError> {
    let sources = collect_sources(&kind_dir::<K>(root))?;
    let mut records = sources
        .par_iter()
        .map(|(id, path)| load_one::<K>(id, path, LoadMode::Listing))
        .collect::<Result<Vec<K>, ContentError>>()?;
    records.sort_by(K::compare);
    Ok(records)
}

/// Whether an id can name a file in a kind's directory.
///
/// Rejects path separators and dot-prefixed names so an id can never reach
/// outside the directory.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && !id.starts_with('.') && !id.contains(['/', '\\'])
}

/// Load one fully-rendered record by id. `Ok(None)` if there is no such file.
pub fn get_by_id<K: ContentKind>(root: &Path, id: &str) -> Result<Option<K>, ContentError> {
    if !is_valid_id(id) {
        return Ok(None);
    }
    let path = kind_dir::<K>(root).join(format!("{id}.md"));
    if path.exists() && !path.is_file() {
        debug!(path = %path.display(), "not a regular file, treating as missing");
        return Ok(None);
    }
    match fs::read_to_string(&path) {
        Ok(raw) => K::parse(id, &raw, &path, LoadMode::Detail).map(Some),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ContentError::Io { path, source }),
    }
}

/// Every content kind, loaded once for a build.
#[derive(Debug, Default)]
pub struct SiteContent {
    pub posts: Vec<BlogPost>,
    pub projects: Vec<Project>,
    pub products: Vec<Product>,
    pub releases: Vec<Release>,
    pub policies: Vec<Policy>,
    pub partners: Vec<Partner>,
    pub pages: Vec<Page>,
}

impl SiteContent {
    pub fn load(root: &Path) -> Result<Self, ContentError> {
        Ok(Self {
            posts: list_sorted(root)?,
            projects: list_sorted(root)?,
            products: list_sorted(root)?,
            releases: list_sorted(root)?,
            policies: list_sorted(root)?,
            partners: list_sorted(root)?,
            pages: list_sorted(root)?,
        })
    }

    /// Look up a standalone page by id.
    pub fn page(&self, id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn post(title: &str, date: &str) -> String {
        format!("---\ntitle: \"{title}\"\ndate: \"{date}\"\nexcerpt: \"About {title}\"\n---\nBody of {title}.\n")
    }

    // =========================================================================
    // Generic loader behaviour
    // =========================================================================

    #[test]
    fn missing_directory_is_empty_list() {
        let tmp = TempDir::new().unwrap();
        let posts: Vec<BlogPost> = list_sorted(tmp.path()).unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn empty_directory_is_empty_list() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("releases")).unwrap();
        let releases: Vec<Release> = list_sorted(tmp.path()).unwrap();
        assert!(releases.is_empty());
    }

    #[test]
    fn non_markdown_and_hidden_files_ignored() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "blog/a.md", &post("A", "2025-01-01"));
        write(tmp.path(), "blog/notes.txt", "not content");
        write(tmp.path(), "blog/.draft.md", &post("Draft", "2025-02-01"));
        fs::create_dir_all(tmp.path().join("blog/images")).unwrap();

        let posts: Vec<BlogPost> = list_sorted(tmp.path()).unwrap();
        assert_eq!(post_slugs(&posts), vec!["a"]);
    }

    #[test]
    fn sorted_newest_first() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "blog/old.md", &post("Old", "2024-03-01"));
        write(tmp.path(), "blog/new.md", &post("New", "2025-06-01"));
        write(tmp.path(), "blog/mid.md", &post("Mid", "2024-12-31"));

        let posts: Vec<BlogPost> = list_sorted(tmp.path()).unwrap();
        assert_eq!(post_slugs(&posts), vec!["new", "mid", "old"]);
    }

    #[test]
    fn equal_dates_break_ties_by_id() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "blog/zeta.md", &post("Zeta", "2025-01-01"));
        write(tmp.path(), "blog/alpha.md", &post("Alpha", "2025-01-01"));
        write(tmp.path(), "blog/mu.md", &post("Mu", "2025-01-01"));

        let posts: Vec<BlogPost> = list_sorted(tmp.path()).unwrap();
        assert_eq!(post_slugs(&posts), vec!["alpha", "mu", "zeta"]);
    }

    #[test]
    fn get_by_id_missing_is_none() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("projects")).unwrap();
        let project: Option<Project> = get_by_id(tmp.path(), "does-not-exist").unwrap();
        assert!(project.is_none());
    }

    #[test]
    fn get_by_id_missing_post_is_none_not_error() {
        let tmp = TempDir::new().unwrap();
        let post: Option<BlogPost> = get_by_id(tmp.path(), "nope").unwrap();
        assert!(post.is_none());
    }

    #[test]
    fn get_by_id_directory_named_like_a_record_is_none() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("projects/odd.md")).unwrap();
        let project: Option<Project> = get_by_id(tmp.path(), "odd").unwrap();
        assert!(project.is_none());
    }

    #[test]
    fn get_by_id_rejects_path_escapes() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "secret.md", &post("Secret", "2025-01-01"));
        write(tmp.path(), "blog/ok.md", &post("Ok", "2025-01-01"));

        for id in ["../secret", "..", "", ".hidden", "a/b", "a\\b"] {
            let found: Option<BlogPost> = get_by_id(tmp.path(), id).unwrap();
            assert!(found.is_none(), "id {id:?} should not resolve");
        }
    }

    #[test]
    fn invalid_front_matter_names_the_file() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "blog/broken.md", "---\ntitle: [oops\n---\nBody");

        let err = list_sorted::<BlogPost>(tmp.path()).unwrap_err();
        assert!(matches!(err, ContentError::Frontmatter { .. }));
        assert!(err.to_string().contains("broken.md"));
    }

    #[test]
    fn listing_fails_when_any_record_is_invalid() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "blog/good.md", &post("Good", "2025-01-01"));
        write(tmp.path(), "blog/bad.md", "---\ndate: \"2025-01-01\"\n---\nNo title");

        let err = list_sorted::<BlogPost>(tmp.path()).unwrap_err();
        assert!(matches!(err, ContentError::Invalid { .. }));
    }

    // =========================================================================
    // Fixture round-trips
    // =========================================================================

    #[test]
    fn every_listed_id_round_trips_through_get_by_id() {
        let tmp = setup_fixtures();
        let root = tmp.path();

        for listed in list_sorted::<BlogPost>(root).unwrap() {
            let fetched: BlogPost = get_by_id(root, &listed.slug).unwrap().unwrap();
            assert_eq!(fetched.slug, listed.slug);
            assert_eq!(fetched.title, listed.title);
        }
        for listed in list_sorted::<Project>(root).unwrap() {
            let fetched: Project = get_by_id(root, &listed.id).unwrap().unwrap();
            assert_eq!((fetched.id, fetched.title), (listed.id, listed.title));
        }
        for listed in list_sorted::<Product>(root).unwrap() {
            let fetched: Product = get_by_id(root, &listed.id).unwrap().unwrap();
            assert_eq!((fetched.id, fetched.title), (listed.id, listed.title));
        }
        for listed in list_sorted::<Release>(root).unwrap() {
            let fetched: Release = get_by_id(root, &listed.id).unwrap().unwrap();
            assert_eq!((fetched.id, fetched.title), (listed.id, listed.title));
        }
        for listed in list_sorted::<Policy>(root).unwrap() {
            let fetched: Policy = get_by_id(root, &listed.id).unwrap().unwrap();
            assert_eq!((fetched.id, fetched.title), (listed.id, listed.title));
        }
    }

    #[test]
    fn fixture_ids_have_no_extension() {
        let tmp = setup_fixtures();
        let content = SiteContent::load(tmp.path()).unwrap();

        let ids = content
            .posts
            .iter()
            .map(|p| p.slug.as_str())
            .chain(content.projects.iter().map(|p| p.id.as_str()))
            .chain(content.products.iter().map(|p| p.id.as_str()))
            .chain(content.releases.iter().map(|p| p.id.as_str()))
            .chain(content.policies.iter().map(|p| p.id.as_str()))
            .chain(content.partners.iter().map(|p| p.id.as_str()))
            .chain(content.pages.iter().map(|p| p.id.as_str()));
        for id in ids {
            assert!(!id.is_empty());
            assert!(!id.contains(".md"), "{id} still has an extension");
        }
    }

    #[test]
    fn fixture_listings_are_date_ordered() {
        let tmp = setup_fixtures();
        let content = SiteContent::load(tmp.path()).unwrap();

        assert_non_increasing(content.posts.iter().map(|p| p.date.as_str()));
        assert_non_increasing(content.projects.iter().map(|p| p.date.as_str()));
        assert_non_increasing(content.releases.iter().map(|p| p.date.as_str()));
        assert_non_increasing(
            content
                .products
                .iter()
                .filter(|p| p.id != EVERYTHING_ELSE_ID)
                .map(|p| p.date.as_str()),
        );
        assert_eq!(
            content.products.last().map(|p| p.id.as_str()),
            Some(EVERYTHING_ELSE_ID)
        );
    }

    #[test]
    fn fixture_records_carry_front_matter() {
        let tmp = setup_fixtures();
        let content = SiteContent::load(tmp.path()).unwrap();

        let post = find_post(&content, "my-first-post");
        assert_eq!(post.title, "My First Post");
        assert!(post.content_html.is_none());

        let project = find_project(&content, "recall-kit");
        assert_eq!(project.features, vec!["Offline study", "Cloud sync"]);
        assert_eq!(project.links[0].text, "App Store");

        let product = find_product(&content, "mvp-development");
        assert_eq!(product.product_type, ProductType::Consulting);
        assert_eq!(product.duration.as_deref(), Some("6-8 weeks"));
        assert_eq!(
            product_ids(&content),
            vec!["recall-kit-pro", "mvp-development", EVERYTHING_ELSE_ID]
        );

        assert_eq!(find_page(&content, "privacy").title, "Privacy");
    }

    #[test]
    fn site_content_page_lookup() {
        let tmp = setup_fixtures();
        let content = SiteContent::load(tmp.path()).unwrap();
        assert!(content.page("about").is_some());
        assert!(content.page("missing").is_none());
    }
}
