//! Page metadata: titles, descriptions, canonical links and social cards.
//!
//! Every generated page carries a [`PageMetadata`], rendered into `<head>` by
//! [`render_head`]. Section pages (blog, projects, products, ...) build theirs
//! through a [`MetadataFactory`], which derives the title and canonical URL
//! from the section name and the route's slug or id:
//!
//! | Section | Route | Title | Canonical |
//! |---------|-------|-------|-----------|
//! | `Blog` | (none) | `Blog: All Posts` | `<base>/blog` |
//! | `Blog` | `my-first-post` | `Blog: My First Post` | `<base>/blog/my-first-post` |
//!
//! The base URL and site identity come from [`SiteConfig`]; nothing here reads
//! the environment.

use crate::config::SiteConfig;
use crate::naming;
use maud::{Markup, html};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    #[default]
    Website,
    Article,
}

impl PageType {
    pub fn as_str(self) -> &'static str {
        match self {
            PageType::Website => "website",
            PageType::Article => "article",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenGraphImage {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub url: String,
    pub site_name: String,
    pub images: Vec<OpenGraphImage>,
    pub locale: String,
    #[serde(rename = "type")]
    pub page_type: PageType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwitterCard {
    pub card: String,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
}

const TWITTER_CARD_KIND: &str = "summary_large_image";

/// Open Graph block. `image` defaults to the site icon.
pub fn open_graph(
    config: &SiteConfig,
    title: &str,
    description: &str,
    url: &str,
    image: Option<&str>,
    page_type: PageType,
) -> OpenGraph {
    let image = image.map_or_else(|| config.site_icon_url(), str::to_string);
    OpenGraph {
        title: title.to_string(),
        description: description.to_string(),
        url: url.to_string(),
        site_name: config.identity.site_name.clone(),
        images: vec![OpenGraphImage { url: image }],
        locale: config.identity.locale.clone(),
        page_type,
    }
}

/// Twitter card block, always `summary_large_image`.
pub fn twitter_card(
    config: &SiteConfig,
    title: &str,
    description: &str,
    image: Option<&str>,
) -> TwitterCard {
    let image = image.map_or_else(|| config.site_icon_url(), str::to_string);
    TwitterCard {
        card: TWITTER_CARD_KIND.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        images: vec![image],
    }
}

/// Everything a page declares about itself in `<head>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub open_graph: Option<OpenGraph>,
    pub twitter: Option<TwitterCard>,
}

impl PageMetadata {
    /// Metadata for a page outside any section, with both social blocks.
    pub fn for_path(config: &SiteConfig, title: &str, description: &str, path: &str) -> Self {
        let canonical = config.url_for(path);
        Self {
            open_graph: Some(open_graph(
                config,
                title,
                description,
                &canonical,
                None,
                PageType::Website,
            )),
            twitter: Some(twitter_card(config, title, description, None)),
            title: title.to_string(),
            description: description.to_string(),
            canonical,
        }
    }
}

/// Tuning for a [`MetadataFactory`].
#[derive(Debug, Clone)]
pub struct MetadataOptions {
    pub description: Option<String>,
    pub image: Option<String>,
    pub page_type: PageType,
    pub include_open_graph: bool,
    pub include_twitter: bool,
}

impl Default for MetadataOptions {
    fn default() -> Self {
        Self {
            description: None,
            image: None,
            page_type: PageType::Website,
            include_open_graph: true,
            include_twitter: true,
        }
    }
}

/// The identifier part of a route: `/blog/[slug]` or `/products/[id]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteParams<'a> {
    pub slug: Option<&'a str>,
    pub id: Option<&'a str>,
}

impl<'a> RouteParams<'a> {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn slug(slug: &'a str) -> Self {
        Self {
            slug: Some(slug),
            id: None,
        }
    }

    pub fn id(id: &'a str) -> Self {
        Self {
            slug: None,
            id: Some(id),
        }
    }

    /// The slug if present, else the id. Empty values count as absent.
    fn slug_or_id(&self) -> Option<&'a str> {
        self.slug
            .filter(|s| !s.is_empty())
            .or(self.id.filter(|s| !s.is_empty()))
    }
}

/// Builds [`PageMetadata`] for every route of one section.
#[derive(Debug, Clone)]
pub struct MetadataFactory {
    section: String,
    default_title: String,
    options: MetadataOptions,
}

pub fn metadata_factory(
    section: &str,
    default_title: &str,
    options: MetadataOptions,
) -> MetadataFactory {
    MetadataFactory {
        section: section.to_string(),
        default_title: default_title.to_string(),
        options,
    }
}

impl MetadataFactory {
    pub fn generate(&self, config: &SiteConfig, params: RouteParams<'_>) -> PageMetadata {
        let slug_or_id = params.slug_or_id();
        let title = match slug_or_id {
            Some(s) => format!("{}: {}", self.section, naming::humanize(s)),
            None => format!("{}: {}", self.section, self.default_title),
        };

        let section_path = self.section.to_lowercase();
        let canonical = match slug_or_id {
            Some(s) => config.url_for(&format!("{section_path}/{s}")),
            None => config.url_for(&section_path),
        };

        let description = self.options.description.clone().unwrap_or_else(|| {
            format!(
                "Content from {} on {}",
                self.section, config.identity.site_name
            )
        });
        let image = self.options.image.as_deref();

        PageMetadata {
            open_graph: self.options.include_open_graph.then(|| {
                open_graph(
                    config,
                    &title,
                    &description,
                    &canonical,
                    image,
                    self.options.page_type,
                )
            }),
            twitter: self
                .options
                .include_twitter
                .then(|| twitter_card(config, &title, &description, image)),
            title,
            description,
            canonical,
        }
    }
}

/// `<head>` tags for a page: title, description, canonical, OG, Twitter.
pub fn render_head(meta: &PageMetadata) -> Markup {
    html! {
        title { (meta.title) }
        meta name="description" content=(meta.description);
        link rel="canonical" href=(meta.canonical);
        @if let Some(og) = &meta.open_graph {
            meta property="og:title" content=(og.title);
            meta property="og:description" content=(og.description);
            meta property="og:url" content=(og.url);
            meta property="og:site_name" content=(og.site_name);
            meta property="og:locale" content=(og.locale);
            meta property="og:type" content=(og.page_type.as_str());
            @for image in &og.images {
                meta property="og:image" content=(image.url);
            }
        }
        @if let Some(tw) = &meta.twitter {
            meta name="twitter:card" content=(tw.card);
            meta name="twitter:title" content=(tw.title);
            meta name="twitter:description" content=(tw.description);
            @for image in &tw.images {
                meta name="twitter:image" content=(image);
            }
        }
    }
}
