//! HTML site generation.
//!
//! Final stage of the build: takes the loaded [`SiteContent`] and writes the
//! complete static site. Every page gets the same shell (head metadata,
//! site-wide JSON-LD, header, breadcrumbs, footer) from [`Site::document`].
//!
//! ## Generated Pages
//!
//! - **Home** (`/index.html`): hero plus the newest posts and projects
//! - **Blog** (`/blog/`, `/blog/page/<n>/`): paginated listing, `/blog/`
//!   mirrors page 1; one page per post at `/blog/<slug>/`
//! - **Projects, Products, Releases, Policies**: a listing page and one
//!   detail page per record
//! - **Partners** (`/partners/`): partner cards
//! - **Standalone pages** (`/<id>/`): about, people, security, ...
//! - **Contact** (`/contact/`): form posting to the external endpoint
//! - **Not found** (`/404.html`)
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── 404.html
//! ├── sitemap.xml
//! ├── robots.txt
//! ├── style-1a2b3c4d.css        # fingerprinted stylesheet
//! ├── siteicon.png              # copied from content/public/
//! ├── blog/
//! │   ├── index.html
//! │   ├── page/1/index.html
//! │   └── my-first-post/index.html
//! ├── projects/
//! │   ├── index.html
//! │   └── recall-kit/index.html
//! └── ...
//! ```
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: base styles (colors injected from config)
//! - `static/contact.js`: contact form checks and submission
//!
//! The stylesheet is written once under a content hash so deployments never
//! serve a stale copy.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Markdown bodies are trusted and injected with `PreEscaped`; everything else
//! is escaped by maud.

use crate::breadcrumbs::{breadcrumb_schema_for_path, render_breadcrumbs};
use crate::config::{self, SiteConfig};
use crate::contact::{ContactScriptConfig, captcha_enabled};
use crate::content::{
    self, BlogPost, ContentError, Link, Page, Partner, Policy, Product, Project, Release,
    SiteContent,
};
use crate::metadata::{
    MetadataOptions, PageMetadata, PageType, RouteParams, metadata_factory, render_head,
};
use crate::schema::{
    DEFAULT_APPLICATION_CATEGORY, DEFAULT_OPERATING_SYSTEM, generate_article_schema,
    generate_organization_schema, generate_person_schema, generate_project_schema,
    generate_website_schema, json_ld_script,
};
use crate::sitemap::{build_sitemap, render_robots_txt, render_sitemap_xml};
use chrono::NaiveDate;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rayon::prelude::*;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
    #[error("Copying public files: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("{kind} '{id}' was listed but could not be loaded")]
    Vanished { kind: &'static str, id: String },
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const CONTACT_JS: &str = include_str!("../static/contact.js");
const RECAPTCHA_SCRIPT: &str = "https://www.google.com/recaptcha/api.js";

/// How many posts and projects the home page previews.
const HOME_LATEST: usize = 3;

/// Top-level paths owned by generated sections; standalone pages may not
/// reuse them.
const RESERVED_PATHS: &[&str] = &[
    "blog",
    "projects",
    "products",
    "releases",
    "policies",
    "partners",
    "contact",
    "404",
    "404.html",
    "sitemap.xml",
    "robots.txt",
];

/// Standalone pages linked from the footer when present.
const FOOTER_PAGES: &[&str] = &["people", "security", "privacy", "accessibility"];

/// One written HTML page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedPage {
    /// Report grouping: `Home`, `Blog`, `Projects`, ...
    pub section: &'static str,
    pub title: String,
    /// Output-relative file path with `/` separators.
    pub path: String,
}

/// Everything a build wrote, for CLI reporting.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    pub pages: Vec<GeneratedPage>,
    /// Fingerprinted stylesheet file name.
    pub stylesheet: String,
    pub public_files: usize,
    pub sitemap_entries: usize,
}

impl BuildReport {
    pub fn pages_in<'a>(&'a self, section: &'a str) -> impl Iterator<Item = &'a GeneratedPage> {
        self.pages.iter().filter(move |p| p.section == section)
    }
}

/// A rendered page before it is written.
struct RenderedPage {
    title: String,
    html: Markup,
}

/// Load content from `source` and write the site to `output`.
pub fn generate(
    config: &SiteConfig,
    source: &Path,
    output: &Path,
) -> Result<BuildReport, GenerateError> {
    let content = SiteContent::load(source)?;
    generate_site(config, &content, source, output)
}

/// Write the site for already-loaded content.
///
/// `source` is still needed to fetch full post bodies and to copy
/// `public/`.
pub fn generate_site(
    config: &SiteConfig,
    content: &SiteContent,
    source: &Path,
    output: &Path,
) -> Result<BuildReport, GenerateError> {
    fs::create_dir_all(output)?;
    let mut report = BuildReport {
        public_files: copy_public(&source.join("public"), output)?,
        ..BuildReport::default()
    };

    let css = build_stylesheet(config);
    report.stylesheet = stylesheet_name(&css);
    fs::write(output.join(&report.stylesheet), &css)?;

    let site = Site {
        config,
        content,
        stylesheet_href: format!("/{}", report.stylesheet),
    };
    let pages = &mut report.pages;

    // Home
    pages.push(write_page(output, "", "Home", site.render_home()?)?);

    // Blog listing, page 1 twice: /blog/ and /blog/page/1/
    let total = page_count(content.posts.len(), config.posts_per_page);
    pages.push(write_page(output, "blog", "Blog", site.render_blog_page(1, total, "/blog")?)?);
    for n in 1..=total {
        let path = format!("blog/page/{n}");
        let page = site.render_blog_page(n, total, &path)?;
        pages.push(write_page(output, &path, "Blog", page)?);
    }

    // Posts are re-read individually for their rendered bodies.
    let post_pages = content
        .posts
        .par_iter()
        .map(|listed| {
            let post: BlogPost = content::get_by_id(source, &listed.slug)?.ok_or_else(|| {
                GenerateError::Vanished {
                    kind: "blog post",
                    id: listed.slug.clone(),
                }
            })?;
            let page = site.render_post(&post)?;
            write_page(output, &format!("blog/{}", post.slug), "Blog", page)
        })
        .collect::<Result<Vec<_>, GenerateError>>()?;
    pages.extend(post_pages);
    info!(posts = content.posts.len(), pages = total, "generated blog");

    pages.push(write_page(output, "projects", "Projects", site.render_projects()?)?);
    for project in &content.projects {
        let page = site.render_project(project)?;
        pages.push(write_page(output, &format!("projects/{}", project.id), "Projects", page)?);
    }
    info!(count = content.projects.len(), "generated projects");

    pages.push(write_page(output, "products", "Products", site.render_products()?)?);
    for product in &content.products {
        let page = site.render_product(product)?;
        pages.push(write_page(output, &format!("products/{}", product.id), "Products", page)?);
    }
    info!(count = content.products.len(), "generated products");

    pages.push(write_page(output, "releases", "Releases", site.render_releases()?)?);
    for release in &content.releases {
        let page = site.render_release(release)?;
        pages.push(write_page(output, &format!("releases/{}", release.id), "Releases", page)?);
    }
    info!(count = content.releases.len(), "generated releases");

    pages.push(write_page(output, "policies", "Policies", site.render_policies()?)?);
    for policy in &content.policies {
        let page = site.render_policy(policy)?;
        pages.push(write_page(output, &format!("policies/{}", policy.id), "Policies", page)?);
    }
    info!(count = content.policies.len(), "generated policies");

    pages.push(write_page(output, "partners", "Partners", site.render_partners()?)?);

    for page in &content.pages {
        if RESERVED_PATHS.contains(&page.id.as_str()) {
            warn!(id = %page.id, "standalone page collides with a generated section, skipping");
            continue;
        }
        pages.push(write_page(output, &page.id, "Pages", site.render_standalone(page)?)?);
    }

    pages.push(write_page(output, "contact", "Contact", site.render_contact()?)?);

    let not_found = site.render_not_found()?;
    fs::write(output.join("404.html"), not_found.html.into_string())?;
    pages.push(GeneratedPage {
        section: "Errors",
        title: not_found.title,
        path: "404.html".to_string(),
    });

    let entries = build_sitemap(config, content);
    fs::write(output.join("sitemap.xml"), render_sitemap_xml(&entries).into_string())?;
    fs::write(output.join("robots.txt"), render_robots_txt(config))?;
    report.sitemap_entries = entries.len();

    info!(pages = report.pages.len(), output = %output.display(), "site generated");
    Ok(report)
}

/// Write `page` as `<dir>/index.html` under `output`.
fn write_page(
    output: &Path,
    dir: &str,
    section: &'static str,
    page: RenderedPage,
) -> Result<GeneratedPage, GenerateError> {
    let rel: PathBuf = if dir.is_empty() {
        PathBuf::from("index.html")
    } else {
        Path::new(dir).join("index.html")
    };
    let target = output.join(&rel);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, page.html.into_string())?;
    debug!(path = %rel.display(), "wrote page");
    Ok(GeneratedPage {
        section,
        title: page.title,
        path: rel.to_string_lossy().replace('\\', "/"),
    })
}

/// Copy `content/public/` verbatim into the output root.
fn copy_public(public: &Path, output: &Path) -> Result<usize, GenerateError> {
    if !public.is_dir() {
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(public).min_depth(1) {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(public) else {
            continue;
        };
        let target = output.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Color variables followed by the base stylesheet.
pub fn build_stylesheet(config: &SiteConfig) -> String {
    format!(
        "{}\n\n{}",
        config::generate_color_css(&config.colors),
        CSS_STATIC
    )
}

/// `style-<first 8 hex digits of SHA-256>.css`.
pub fn stylesheet_name(css: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(css.as_bytes()));
    format!("style-{}.css", &digest[..8])
}

/// Number of blog listing pages; at least one even with no posts.
pub fn page_count(total: usize, per_page: usize) -> usize {
    total.div_ceil(per_page.max(1)).max(1)
}

fn blog_page_href(n: usize) -> String {
    if n == 1 {
        "/blog/".to_string()
    } else {
        format!("/blog/page/{n}/")
    }
}

/// `2025-01-15` → `January 15, 2025`. Anything unparseable is shown as-is.
pub fn format_date(date: &str) -> String {
    date.get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| date.to_string())
}

fn non_empty(s: &str) -> Option<String> {
    (!s.trim().is_empty()).then(|| s.to_string())
}

// ============================================================================
// HTML Components
// ============================================================================

fn time_tag(date: &str) -> Markup {
    html! { time datetime=(date) { (format_date(date)) } }
}

fn post_card(post: &BlogPost) -> Markup {
    html! {
        li.card {
            (time_tag(&post.date))
            h3 { a href={ "/blog/" (post.slug) "/" } { (post.title) } }
            @if !post.excerpt.is_empty() {
                p { (post.excerpt) }
            }
        }
    }
}

fn project_card(project: &Project) -> Markup {
    html! {
        li.card {
            (time_tag(&project.date))
            h3 { a href={ "/projects/" (project.id) "/" } { (project.title) } }
            @if !project.description.is_empty() {
                p { (project.description) }
            }
        }
    }
}

fn string_list(heading: &str, items: &[String]) -> Markup {
    html! {
        @if !items.is_empty() {
            section {
                h2 { (heading) }
                ul.detail-list {
                    @for item in items {
                        li { (item) }
                    }
                }
            }
        }
    }
}

fn link_list(links: &[Link]) -> Markup {
    html! {
        @if !links.is_empty() {
            section {
                h2 { "Links" }
                ul.detail-list {
                    @for link in links {
                        li { a href=(link.url) rel="noopener" { (link.text) } }
                    }
                }
            }
        }
    }
}

fn pagination(page: usize, total: usize) -> Markup {
    html! {
        @if total > 1 {
            nav.pagination aria-label="Blog pages" {
                @if page > 1 {
                    a rel="prev" href=(blog_page_href(page - 1)) { "← Newer" }
                }
                @for n in 1..=total {
                    @if n == page {
                        span.current aria-current="page" { (n) }
                    } @else {
                        a href=(blog_page_href(n)) { (n) }
                    }
                }
                @if page < total {
                    a rel="next" href=(blog_page_href(page + 1)) { "Older →" }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

struct Site<'a> {
    config: &'a SiteConfig,
    content: &'a SiteContent,
    stylesheet_href: String,
}

impl Site<'_> {
    /// Wrap `main` in the shared page shell.
    ///
    /// Every page carries the Organization, Person and WebSite JSON-LD; pages
    /// other than home add their BreadcrumbList, then `extra_ld`.
    fn document(
        &self,
        meta: PageMetadata,
        path: &str,
        extra_ld: Option<Markup>,
        main: Markup,
    ) -> Result<RenderedPage, GenerateError> {
        let is_home = path.trim_matches('/').is_empty();
        let mut json_ld = vec![
            json_ld_script(&generate_organization_schema(self.config))?,
            json_ld_script(&generate_person_schema(self.config))?,
            json_ld_script(&generate_website_schema(self.config))?,
        ];
        if !is_home {
            json_ld.push(json_ld_script(&breadcrumb_schema_for_path(self.config, path))?);
        }
        json_ld.extend(extra_ld);

        let html = html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    (render_head(&meta))
                    link rel="icon" href={ "/" (self.config.identity.site_icon) };
                    link rel="stylesheet" href=(self.stylesheet_href);
                    @for script in &json_ld {
                        (script)
                    }
                }
                body {
                    a.skip-link href="#main" { "Skip to content" }
                    (self.site_header(path))
                    @if !is_home {
                        (render_breadcrumbs(path))
                    }
                    main id="main" {
                        (main)
                    }
                    (self.site_footer())
                }
            }
        };
        Ok(RenderedPage {
            title: meta.title,
            html,
        })
    }

    fn nav_items(&self) -> Vec<(&'static str, &'static str)> {
        let mut items = vec![
            ("Blog", "blog"),
            ("Projects", "projects"),
            ("Products", "products"),
            ("Releases", "releases"),
            ("Partners", "partners"),
        ];
        if self.content.page("about").is_some() {
            items.push(("About", "about"));
        }
        items.push(("Contact", "contact"));
        items
    }

    fn site_header(&self, path: &str) -> Markup {
        let section = path.trim_matches('/').split('/').next().unwrap_or("");
        html! {
            header.site-header {
                a.site-title href="/" { (self.config.identity.site_name) }
                nav.site-nav aria-label="Main" {
                    ul {
                        @for (label, slug) in self.nav_items() {
                            li class=[(section == slug).then_some("current")] {
                                a href={ "/" (slug) "/" } { (label) }
                            }
                        }
                    }
                }
            }
        }
    }

    fn site_footer(&self) -> Markup {
        let pages: Vec<&Page> = FOOTER_PAGES
            .iter()
            .filter_map(|id| self.content.page(id))
            .collect();
        html! {
            footer.site-footer {
                ul {
                    li { a href="/policies/" { "Policies" } }
                    @for page in &pages {
                        li { a href={ "/" (page.id) "/" } { (page.title) } }
                    }
                    li { a href="/sitemap.xml" { "Sitemap" } }
                }
                p { "© " (self.config.identity.site_name) }
            }
        }
    }

    fn render_home(&self) -> Result<RenderedPage, GenerateError> {
        let identity = &self.config.identity;
        let meta = PageMetadata::for_path(
            self.config,
            &identity.site_name,
            &identity.organization_description,
            "",
        );
        let main = html! {
            section.hero {
                h1 { (identity.site_name) }
                p { (identity.organization_description) }
                a href="/contact/" { "Get in touch" }
            }
            section {
                h2 { "Latest posts" }
                ul.card-list {
                    @for post in self.content.posts.iter().take(HOME_LATEST) {
                        (post_card(post))
                    }
                }
                p { a href="/blog/" { "All posts →" } }
            }
            section {
                h2 { "Recent projects" }
                ul.card-list {
                    @for project in self.content.projects.iter().take(HOME_LATEST) {
                        (project_card(project))
                    }
                }
                p { a href="/projects/" { "All projects →" } }
            }
        };
        self.document(meta, "/", None, main)
    }

    fn render_blog_page(
        &self,
        page: usize,
        total: usize,
        path: &str,
    ) -> Result<RenderedPage, GenerateError> {
        let per_page = self.config.posts_per_page.max(1);
        let options = if page == 1 {
            MetadataOptions::default()
        } else {
            MetadataOptions {
                description: Some(format!(
                    "Browse all blog posts from {}.",
                    self.config.identity.site_name
                )),
                ..MetadataOptions::default()
            }
        };
        let meta = metadata_factory("Blog", "All Posts", options)
            .generate(self.config, RouteParams::none());
        let posts = self.content.posts.iter().skip((page - 1) * per_page).take(per_page);
        let main = html! {
            h1 { "Blog" }
            @if self.content.posts.is_empty() {
                p.muted { "No posts yet." }
            } @else {
                ul.card-list {
                    @for post in posts {
                        (post_card(post))
                    }
                }
            }
            (pagination(page, total))
        };
        self.document(meta, path, None, main)
    }

    fn render_post(&self, post: &BlogPost) -> Result<RenderedPage, GenerateError> {
        let options = MetadataOptions {
            description: non_empty(&post.excerpt),
            page_type: PageType::Article,
            ..MetadataOptions::default()
        };
        let meta = metadata_factory("Blog", "All Posts", options)
            .generate(self.config, RouteParams::slug(&post.slug));
        let article = generate_article_schema(
            self.config,
            &post.title,
            &post.date,
            &meta.canonical,
            Some(&post.excerpt),
            None,
        );
        let main = html! {
            article {
                h1 { (post.title) }
                (time_tag(&post.date))
                div.prose {
                    (PreEscaped(post.content_html.as_deref().unwrap_or_default()))
                }
            }
            p { a href="/blog/" { "← All posts" } }
        };
        let path = format!("/blog/{}", post.slug);
        self.document(meta, &path, Some(json_ld_script(&article)?), main)
    }

    fn render_projects(&self) -> Result<RenderedPage, GenerateError> {
        let meta = metadata_factory("Projects", "All Projects", MetadataOptions::default())
            .generate(self.config, RouteParams::none());
        let main = html! {
            h1 { "Projects" }
            ul.card-list {
                @for project in &self.content.projects {
                    (project_card(project))
                }
            }
        };
        self.document(meta, "/projects", None, main)
    }

    fn render_project(&self, project: &Project) -> Result<RenderedPage, GenerateError> {
        let options = MetadataOptions {
            description: non_empty(&project.description),
            ..MetadataOptions::default()
        };
        let meta = metadata_factory("Projects", "All Projects", options)
            .generate(self.config, RouteParams::id(&project.id));
        let app = generate_project_schema(
            self.config,
            &project.title,
            &project.description,
            &meta.canonical,
            Some(
                project
                    .application_category
                    .as_deref()
                    .unwrap_or(DEFAULT_APPLICATION_CATEGORY),
            ),
            Some(
                project
                    .operating_system
                    .as_deref()
                    .unwrap_or(DEFAULT_OPERATING_SYSTEM),
            ),
        );
        let main = html! {
            article {
                h1 { (project.title) }
                (time_tag(&project.date))
                @if !project.description.is_empty() {
                    p.lead { (project.description) }
                }
                div.prose { (PreEscaped(&project.content_html)) }
                (string_list("Features", &project.features))
                (string_list("Technologies", &project.technologies))
                (link_list(&project.links))
            }
            p { a href="/projects/" { "← All projects" } }
        };
        let path = format!("/projects/{}", project.id);
        self.document(meta, &path, Some(json_ld_script(&app)?), main)
    }

    fn render_products(&self) -> Result<RenderedPage, GenerateError> {
        let meta = metadata_factory("Products", "All Products", MetadataOptions::default())
            .generate(self.config, RouteParams::none());
        let main = html! {
            h1 { "Products" }
            ul.card-list {
                @for product in &self.content.products {
                    li.card {
                        span.badge { (product.product_type.label()) }
                        h3 { a href={ "/products/" (product.id) "/" } { (product.title) } }
                        @if let Some(price) = &product.price {
                            p.muted { (price) }
                        }
                        p { (product.description) }
                    }
                }
            }
        };
        self.document(meta, "/products", None, main)
    }

    fn render_product(&self, product: &Product) -> Result<RenderedPage, GenerateError> {
        let options = MetadataOptions {
            description: non_empty(&product.description),
            ..MetadataOptions::default()
        };
        let meta = metadata_factory("Products", "All Products", options)
            .generate(self.config, RouteParams::id(&product.id));
        let main = html! {
            article {
                span.badge { (product.product_type.label()) }
                h1 { (product.title) }
                @if let Some(price) = &product.price {
                    p { strong { "Price: " } (price) }
                }
                @if let Some(duration) = &product.duration {
                    p { strong { "Duration: " } (duration) }
                }
                @if !product.description.is_empty() {
                    p.lead { (product.description) }
                }
                div.prose { (PreEscaped(&product.content_html)) }
                (string_list("Features", &product.features))
                (string_list("Deliverables", &product.deliverables))
                (string_list("Technologies", &product.technologies))
                (link_list(&product.links))
            }
            p { a href="/products/" { "← All products" } }
        };
        let path = format!("/products/{}", product.id);
        self.document(meta, &path, None, main)
    }

    fn render_releases(&self) -> Result<RenderedPage, GenerateError> {
        let meta = metadata_factory("Releases", "All Releases", MetadataOptions::default())
            .generate(self.config, RouteParams::none());
        let main = html! {
            h1 { "Releases" }
            ul.card-list {
                @for release in &self.content.releases {
                    li.card {
                        (time_tag(&release.date))
                        h3 { a href={ "/releases/" (release.id) "/" } { (release.title) } }
                        p { (release.description) }
                    }
                }
            }
        };
        self.document(meta, "/releases", None, main)
    }

    fn render_release(&self, release: &Release) -> Result<RenderedPage, GenerateError> {
        let options = MetadataOptions {
            description: non_empty(&release.description),
            ..MetadataOptions::default()
        };
        let meta = metadata_factory("Releases", "All Releases", options)
            .generate(self.config, RouteParams::id(&release.id));
        let main = html! {
            article {
                h1 { (release.title) }
                (time_tag(&release.date))
                div.prose { (PreEscaped(&release.content_html)) }
            }
            p { a href="/releases/" { "← All releases" } }
        };
        let path = format!("/releases/{}", release.id);
        self.document(meta, &path, None, main)
    }

    fn render_policies(&self) -> Result<RenderedPage, GenerateError> {
        let meta = metadata_factory("Policies", "All Policies", MetadataOptions::default())
            .generate(self.config, RouteParams::none());
        let main = html! {
            h1 { "Policies" }
            ul {
                @for policy in &self.content.policies {
                    li { a href={ "/policies/" (policy.id) "/" } { (policy.title) } }
                }
            }
        };
        self.document(meta, "/policies", None, main)
    }

    fn render_policy(&self, policy: &Policy) -> Result<RenderedPage, GenerateError> {
        let options = MetadataOptions {
            description: non_empty(&policy.summary),
            ..MetadataOptions::default()
        };
        let meta = metadata_factory("Policies", "All Policies", options)
            .generate(self.config, RouteParams::id(&policy.id));
        let main = html! {
            article.prose {
                (PreEscaped(&policy.content_html))
            }
            p { a href="/policies/" { "← All policies" } }
        };
        let path = format!("/policies/{}", policy.id);
        self.document(meta, &path, None, main)
    }

    fn render_partners(&self) -> Result<RenderedPage, GenerateError> {
        let meta = PageMetadata::for_path(
            self.config,
            "Partners",
            &format!("Organizations working with {}", self.config.identity.site_name),
            "partners",
        );
        let main = html! {
            h1 { "Partners" }
            @if self.content.partners.is_empty() {
                p.muted { "No partners listed yet." }
            } @else {
                ul.card-list {
                    @for partner in &self.content.partners {
                        (partner_card(partner))
                    }
                }
            }
        };
        self.document(meta, "/partners", None, main)
    }

    fn render_standalone(&self, page: &Page) -> Result<RenderedPage, GenerateError> {
        let description = non_empty(&page.description).unwrap_or_else(|| {
            format!("{} | {}", page.title, self.config.identity.site_name)
        });
        let meta = PageMetadata::for_path(self.config, &page.title, &description, &page.id);
        let main = html! {
            article {
                h1 { (page.title) }
                div.prose { (PreEscaped(&page.content_html)) }
            }
        };
        self.document(meta, &format!("/{}", page.id), None, main)
    }

    fn render_contact(&self) -> Result<RenderedPage, GenerateError> {
        let contact = &self.config.contact;
        let meta = PageMetadata::for_path(
            self.config,
            "Contact",
            &format!("Get in touch with {}", self.config.identity.site_name),
            "contact",
        );
        let script_config =
            serde_json::to_string(&ContactScriptConfig::new(contact))?.replace("</", "<\\/");
        let captcha = captcha_enabled(contact);

        let main = html! {
            h1 { "Contact Us" }
            p { "Expect to hear back from us within 3-5 business days." }
            form.contact-form id="contact-form" novalidate {
                label for="name" { "Name " span aria-hidden="true" { "*" } }
                input id="name" type="text" name="name" autocomplete="name" required
                    aria-describedby="name-error";
                p.field-error id="name-error" role="alert" hidden {}

                label for="email" { "Email " span aria-hidden="true" { "*" } }
                input id="email" type="email" name="email" autocomplete="email" required
                    aria-describedby="email-error";
                p.field-error id="email-error" role="alert" hidden {}

                label for="message" { "Message " span aria-hidden="true" { "*" } }
                textarea id="message" name="message" rows="6" required
                    aria-describedby="message-error" {}
                p.field-error id="message-error" role="alert" hidden {}

                div.honeypot aria-hidden="true" {
                    label for="website" { "Website" }
                    input id="website" type="text" name="website" tabindex="-1" autocomplete="off";
                }

                @if captcha {
                    div.g-recaptcha data-sitekey=(contact.recaptcha_site_key) {}
                    p.field-error id="captcha-error" role="alert" hidden {}
                }

                button type="submit" { "Send message" }
                p id="contact-status" role="status" aria-live="polite" {}
            }
            script type="application/json" id="contact-config" { (PreEscaped(script_config)) }
            @if captcha {
                script src=(RECAPTCHA_SCRIPT) defer {}
            }
            script { (PreEscaped(CONTACT_JS)) }
        };
        self.document(meta, "/contact", None, main)
    }

    fn render_not_found(&self) -> Result<RenderedPage, GenerateError> {
        let meta = PageMetadata::for_path(
            self.config,
            "Not Found",
            "The page you are looking for does not exist.",
            "404",
        );
        let main = html! {
            h1 { "Not Found" }
            p { "Sorry, we couldn't find that page." }
            p { a href="/" { "Return home" } }
        };
        self.document(meta, "/", None, main)
    }
}

fn partner_card(partner: &Partner) -> Markup {
    html! {
        li.card {
            @if !partner.logo.is_empty() {
                img.partner-logo src=(partner.logo) alt={ (partner.title) " logo" } loading="lazy";
            }
            h3 {
                @if partner.url.is_empty() {
                    (partner.title)
                } @else {
                    a href=(partner.url) rel="noopener" { (partner.title) }
                }
            }
            @if !partner.description.is_empty() {
                p { (partner.description) }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ProductType;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn config() -> SiteConfig {
        SiteConfig {
            base_url: "https://example.test".into(),
            posts_per_page: 2,
            ..SiteConfig::default()
        }
    }

    fn post(slug: &str, date: &str) -> BlogPost {
        BlogPost {
            slug: slug.into(),
            title: format!("Post {slug}"),
            date: date.into(),
            excerpt: format!("About {slug}"),
            content_html: Some("<p>Body</p>".into()),
        }
    }

    fn site<'a>(config: &'a SiteConfig, content: &'a SiteContent) -> Site<'a> {
        Site {
            config,
            content,
            stylesheet_href: "/style-test.css".into(),
        }
    }

    #[test]
    fn page_count_never_zero() {
        assert_eq!(page_count(0, 5), 1);
        assert_eq!(page_count(5, 5), 1);
        assert_eq!(page_count(6, 5), 2);
        assert_eq!(page_count(11, 5), 3);
        assert_eq!(page_count(3, 0), 3);
    }

    #[test]
    fn stylesheet_name_is_content_hashed() {
        let a = stylesheet_name("body {}");
        let b = stylesheet_name("body { color: red }");
        assert!(a.starts_with("style-") && a.ends_with(".css"));
        assert_eq!(a.len(), "style-".len() + 8 + ".css".len());
        assert_ne!(a, b);
        assert_eq!(a, stylesheet_name("body {}"));
    }

    #[test]
    fn stylesheet_includes_color_variables() {
        let css = build_stylesheet(&config());
        assert!(css.starts_with(":root {"));
        assert!(css.contains("--color-accent: #1e40af;"));
        assert!(css.contains(".site-header"));
    }

    #[test]
    fn format_date_long_form() {
        assert_eq!(format_date("2025-01-05"), "January 5, 2025");
        assert_eq!(format_date("2024-12-31T10:00:00Z"), "December 31, 2024");
        assert_eq!(format_date("someday"), "someday");
    }

    #[test]
    fn document_has_site_wide_json_ld() {
        let config = config();
        let content = SiteContent::default();
        let page = site(&config, &content).render_home().unwrap();
        let html = page.html.into_string();
        assert_eq!(html.matches("application/ld+json").count(), 3);
        assert!(html.contains(r#""@type":["Organization","ProfessionalService"]"#));
        assert!(html.contains(r#""@type":"Person""#));
        assert!(html.contains(r#""@type":"WebSite""#));
        assert!(!html.contains("BreadcrumbList"));
        assert!(html.contains(r#"<link rel="stylesheet" href="/style-test.css">"#));
        assert_eq!(page.title, "AGL Consulting LLC");
    }

    #[test]
    fn inner_pages_add_breadcrumbs() {
        let config = config();
        let content = SiteContent::default();
        let html = site(&config, &content)
            .render_projects()
            .unwrap()
            .html
            .into_string();
        assert!(html.contains(r#""@type":"BreadcrumbList""#));
        assert!(html.contains(r#"aria-label="Breadcrumbs""#));
        assert!(html.contains(r#"<link rel="canonical" href="https://example.test/projects">"#));
    }

    #[test]
    fn nav_marks_current_section() {
        let config = config();
        let content = SiteContent::default();
        let html = site(&config, &content).site_header("/blog/x").into_string();
        assert!(html.contains(r#"<li class="current"><a href="/blog/">Blog</a></li>"#));
        assert!(!html.contains(r#"href="/about/""#));
    }

    #[test]
    fn post_page_has_article_schema_and_body() {
        let config = config();
        let content = SiteContent::default();
        let page = site(&config, &content)
            .render_post(&post("hello-world", "2025-01-15"))
            .unwrap();
        assert_eq!(page.title, "Blog: Hello World");
        let html = page.html.into_string();
        assert!(html.contains(r#""@type":"BlogPosting""#));
        assert!(html.contains(r#""dateModified":"2025-01-15""#));
        assert!(html.contains("<p>Body</p>"));
        assert!(html.contains(r#"property="og:type" content="article""#));
        assert!(html.contains(r#"<meta name="description" content="About hello-world">"#));
    }

    #[test]
    fn blog_pages_slice_and_link() {
        let config = config();
        let content = SiteContent {
            posts: vec![
                post("c", "2025-03-01"),
                post("b", "2025-02-01"),
                post("a", "2025-01-01"),
            ],
            ..SiteContent::default()
        };
        let s = site(&config, &content);

        let first = s.render_blog_page(1, 2, "/blog").unwrap().html.into_string();
        assert!(first.contains("/blog/c/") && first.contains("/blog/b/"));
        assert!(!first.contains("/blog/a/"));
        assert!(first.contains(r#"<a rel="next" href="/blog/page/2/">"#));

        let second = s.render_blog_page(2, 2, "/blog/page/2").unwrap();
        assert_eq!(second.title, "Blog: All Posts");
        let html = second.html.into_string();
        assert!(html.contains(r#"<link rel="canonical" href="https://example.test/blog">"#));
        assert!(html.contains("Browse all blog posts from"));
        assert!(html.contains("/blog/a/"));
        assert!(html.contains(r#"<a rel="prev" href="/blog/">"#));
        assert!(html.contains(r#"<span class="current" aria-current="page">2</span>"#));
    }

    #[test]
    fn empty_blog_still_renders() {
        let config = config();
        let content = SiteContent::default();
        let html = site(&config, &content)
            .render_blog_page(1, 1, "/blog")
            .unwrap()
            .html
            .into_string();
        assert!(html.contains("No posts yet."));
        assert!(!html.contains("pagination"));
    }

    #[test]
    fn project_schema_uses_defaults() {
        let config = config();
        let content = SiteContent::default();
        let project = Project {
            id: "recall-kit".into(),
            title: "Recall Kit".into(),
            date: "2024-06-01".into(),
            description: "Flashcards".into(),
            content_html: "<p>Study.</p>".into(),
            features: vec!["Offline".into()],
            technologies: vec![],
            links: vec![Link {
                text: "App Store".into(),
                url: "https://apps.example/recall".into(),
            }],
            application_category: None,
            operating_system: Some("iOS".into()),
        };
        let html = site(&config, &content)
            .render_project(&project)
            .unwrap()
            .html
            .into_string();
        assert!(html.contains(r#""applicationCategory":"MobileApplication""#));
        assert!(html.contains(r#""operatingSystem":"iOS""#));
        assert!(html.contains("<li>Offline</li>"));
        assert!(!html.contains("Technologies"));
        assert!(html.contains(r#"href="https://apps.example/recall""#));
    }

    #[test]
    fn product_card_shows_type_and_price() {
        let config = config();
        let content = SiteContent {
            products: vec![Product {
                id: "mvp".into(),
                title: "MVP Development".into(),
                date: "2024-01-01".into(),
                description: "Ship it".into(),
                content_html: String::new(),
                product_type: ProductType::Consulting,
                price: Some("From $5,000".into()),
                features: vec![],
                technologies: vec![],
                links: vec![],
                deliverables: vec![],
                duration: None,
            }],
            ..SiteContent::default()
        };
        let html = site(&config, &content)
            .render_products()
            .unwrap()
            .html
            .into_string();
        assert!(html.contains(r#"<span class="badge">Consulting</span>"#));
        assert!(html.contains("From $5,000"));
    }

    #[test]
    fn contact_page_embeds_config_and_honeypot() {
        let config = config();
        let content = SiteContent::default();
        let html = site(&config, &content)
            .render_contact()
            .unwrap()
            .html
            .into_string();
        assert!(html.contains(r#"id="contact-config""#));
        assert!(html.contains("entry.1059374314"));
        assert!(html.contains(r#"name="website""#));
        assert!(html.contains("g-recaptcha"));
        assert!(html.contains("no-cors"));
    }

    #[test]
    fn contact_page_without_captcha() {
        let mut config = config();
        config.contact.recaptcha_site_key = String::new();
        let content = SiteContent::default();
        let html = site(&config, &content)
            .render_contact()
            .unwrap()
            .html
            .into_string();
        assert!(!html.contains("g-recaptcha"));
        assert!(!html.contains(RECAPTCHA_SCRIPT));
    }

    #[test]
    fn html_escape_in_maud() {
        let config = config();
        let content = SiteContent::default();
        let mut p = post("x", "2025-01-01");
        p.title = "<script>alert('xss')</script>".into();
        let html = site(&config, &content).render_post(&p).unwrap().html.into_string();
        assert!(html.contains("<h1>&lt;script&gt;alert"));
        assert!(!html.contains("<h1><script>"));
        assert!(html.contains(r#"<\/script>"#));
    }

    #[test]
    fn partner_without_url_or_logo() {
        let partner = Partner {
            id: "p".into(),
            title: "Plain".into(),
            description: String::new(),
            logo: String::new(),
            url: String::new(),
            order: None,
        };
        let html = partner_card(&partner).into_string();
        assert!(!html.contains("<img"));
        assert!(!html.contains("<a"));
        assert!(html.contains("<h3>Plain</h3>"));
    }

    #[test]
    fn generate_fixture_site() {
        let tmp = setup_fixtures();
        let out = TempDir::new().unwrap();
        let config = config();

        let report = generate(&config, tmp.path(), out.path()).unwrap();

        assert!(out.path().join("index.html").exists());
        assert!(out.path().join("blog/index.html").exists());
        assert!(out.path().join("blog/page/1/index.html").exists());
        assert!(out.path().join("404.html").exists());
        assert!(out.path().join("sitemap.xml").exists());
        assert!(out.path().join("robots.txt").exists());
        assert!(out.path().join(&report.stylesheet).exists());
        assert!(out.path().join("siteicon.png").exists());
        assert!(report.public_files >= 1);
        assert_eq!(report.pages_in("Home").count(), 1);
        assert_eq!(report.pages_in("Contact").count(), 1);
    }

    #[test]
    fn generate_with_empty_content() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let report = generate(&config(), src.path(), out.path()).unwrap();

        assert!(out.path().join("blog/page/1/index.html").exists());
        assert!(!out.path().join("blog/page/2").exists());
        assert_eq!(report.public_files, 0);
        let sitemap = fs::read_to_string(out.path().join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>https://example.test</loc>"));
    }

    #[test]
    fn reserved_page_ids_are_skipped() {
        let src = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("pages")).unwrap();
        fs::write(
            src.path().join("pages/contact.md"),
            "---\ntitle: Impostor\n---\nShadow",
        )
        .unwrap();
        let out = TempDir::new().unwrap();
        generate(&config(), src.path(), out.path()).unwrap();

        let html = fs::read_to_string(out.path().join("contact/index.html")).unwrap();
        assert!(!html.contains("Shadow"));
        assert!(html.contains("contact-form"));
    }

    #[test]
    fn pages_named_like_generated_files_are_skipped() {
        let src = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("pages")).unwrap();
        for id in ["sitemap.xml", "robots.txt", "404"] {
            fs::write(
                src.path().join(format!("pages/{id}.md")),
                "---\ntitle: Shadow\n---\nShadow",
            )
            .unwrap();
        }
        let out = TempDir::new().unwrap();
        let report = generate(&config(), src.path(), out.path()).unwrap();

        assert_eq!(report.pages_in("Pages").count(), 0);
        assert!(out.path().join("sitemap.xml").is_file());
        assert!(out.path().join("robots.txt").is_file());
        assert!(!out.path().join("404").exists());
    }
}
