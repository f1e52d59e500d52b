//! Schema.org structured data, embedded in pages as JSON-LD.
//!
//! Each generator is a pure function of its arguments and the [`SiteConfig`]
//! identity; the returned structs serialize to the exact JSON-LD shape with
//! `@context`/`@type` keys. [`json_ld_script`] wraps any of them in a
//! `<script type="application/ld+json">` element.
//!
//! | Generator | `@type` | Emitted on |
//! |-----------|---------|------------|
//! | [`generate_organization_schema`] | `Organization`, `ProfessionalService` | every page |
//! | [`generate_person_schema`] | `Person` | every page |
//! | [`generate_website_schema`] | `WebSite` | every page |
//! | [`generate_breadcrumb_schema`] | `BreadcrumbList` | every page but home |
//! | [`generate_article_schema`] | `BlogPosting` | blog posts |
//! | [`generate_project_schema`] | `SoftwareApplication` | projects |
//!
//! Nothing here validates its output; see [`crate::validate`].

use crate::config::SiteConfig;
use maud::{Markup, PreEscaped, html};
use serde::Serialize;

pub const SCHEMA_CONTEXT: &str = "https://schema.org";

/// Category used for projects whose front-matter does not name one.
pub const DEFAULT_APPLICATION_CATEGORY: &str = "MobileApplication";
pub const DEFAULT_OPERATING_SYSTEM: &str = "iOS, Android";

/// One hop in a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreadcrumbItem {
    pub name: String,
    pub url: String,
}

// =============================================================================
// Nested references
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonRef {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl PersonRef {
    fn new(name: &str, url: Option<&str>) -> Self {
        Self {
            kind: "Person",
            name: name.to_string(),
            url: url.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageObject {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub url: String,
}

impl ImageObject {
    fn new(url: String) -> Self {
        Self {
            kind: "ImageObject",
            url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganizationRef {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<ImageObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebPageRef {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub price: String,
    pub price_currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub position: usize,
    pub name: String,
    pub item: String,
}

// =============================================================================
// Top-level schemas
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSchema {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub url: String,
    pub job_title: String,
    pub works_for: OrganizationRef,
    pub same_as: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSchema {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: [&'static str; 2],
    pub name: String,
    pub url: String,
    pub logo: ImageObject,
    pub description: String,
    pub same_as: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebsiteSchema {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub url: String,
    pub author: PersonRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSchema {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub headline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date_published: String,
    pub date_modified: String,
    pub author: PersonRef,
    pub publisher: OrganizationRef,
    pub main_entity_of_page: WebPageRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareApplicationSchema {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub description: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_system: Option<String>,
    pub offers: Offer,
    pub author: PersonRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbListSchema {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub item_list_element: Vec<ListItem>,
}

// =============================================================================
// Generators
// =============================================================================

pub fn generate_person_schema(config: &SiteConfig) -> PersonSchema {
    let id = &config.identity;
    PersonSchema {
        context: SCHEMA_CONTEXT,
        kind: "Person",
        name: id.author_name.clone(),
        url: config.base_url.clone(),
        job_title: id.author_job_title.clone(),
        works_for: OrganizationRef {
            kind: "Organization",
            name: id.site_name.clone(),
            url: Some(id.organization_url.clone()),
            logo: None,
        },
        same_as: id.author_same_as.clone(),
        description: id.author_description.clone(),
    }
}

pub fn generate_organization_schema(config: &SiteConfig) -> OrganizationSchema {
    let id = &config.identity;
    OrganizationSchema {
        context: SCHEMA_CONTEXT,
        kind: ["Organization", "ProfessionalService"],
        name: id.site_name.clone(),
        url: config.base_url.clone(),
        logo: ImageObject::new(config.site_icon_url()),
        description: id.organization_description.clone(),
        same_as: id.organization_same_as.clone(),
    }
}

pub fn generate_website_schema(config: &SiteConfig) -> WebsiteSchema {
    WebsiteSchema {
        context: SCHEMA_CONTEXT,
        kind: "WebSite",
        name: config.identity.site_name.clone(),
        url: config.base_url.clone(),
        author: PersonRef::new(&config.identity.author_name, None),
    }
}

/// `BlogPosting` for a post. `date_modified` defaults to `date_published`;
/// an empty excerpt is omitted.
pub fn generate_article_schema(
    config: &SiteConfig,
    title: &str,
    date_published: &str,
    url: &str,
    excerpt: Option<&str>,
    date_modified: Option<&str>,
) -> ArticleSchema {
    ArticleSchema {
        context: SCHEMA_CONTEXT,
        kind: "BlogPosting",
        headline: title.to_string(),
        description: excerpt.filter(|e| !e.is_empty()).map(str::to_string),
        date_published: date_published.to_string(),
        date_modified: date_modified.unwrap_or(date_published).to_string(),
        author: PersonRef::new(&config.identity.author_name, Some(&config.base_url)),
        publisher: OrganizationRef {
            kind: "Organization",
            name: config.identity.site_name.clone(),
            url: None,
            logo: Some(ImageObject::new(config.site_icon_url())),
        },
        main_entity_of_page: WebPageRef {
            kind: "WebPage",
            id: url.to_string(),
        },
    }
}

/// `SoftwareApplication` for a project, always offered free.
pub fn generate_project_schema(
    config: &SiteConfig,
    title: &str,
    description: &str,
    url: &str,
    application_category: Option<&str>,
    operating_system: Option<&str>,
) -> SoftwareApplicationSchema {
    SoftwareApplicationSchema {
        context: SCHEMA_CONTEXT,
        kind: "SoftwareApplication",
        name: title.to_string(),
        description: description.to_string(),
        url: url.to_string(),
        application_category: application_category
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        operating_system: operating_system.filter(|s| !s.is_empty()).map(str::to_string),
        offers: Offer {
            kind: "Offer",
            price: "0".to_string(),
            price_currency: "USD".to_string(),
        },
        author: PersonRef::new(&config.identity.author_name, None),
    }
}

/// Number a trail 1..=n. An empty trail yields an empty list.
pub fn generate_breadcrumb_schema(items: &[BreadcrumbItem]) -> BreadcrumbListSchema {
    BreadcrumbListSchema {
        context: SCHEMA_CONTEXT,
        kind: "BreadcrumbList",
        item_list_element: items
            .iter()
            .enumerate()
            .map(|(index, item)| ListItem {
                kind: "ListItem",
                position: index + 1,
                name: item.name.clone(),
                item: item.url.clone(),
            })
            .collect(),
    }
}

/// A `<script type="application/ld+json">` element holding `value`.
///
/// `</` is escaped so string content can never close the script early.
pub fn json_ld_script<T: Serialize>(value: &T) -> Result<Markup, serde_json::Error> {
    let json = serde_json::to_string(value)?.replace("</", "<\\/");
    Ok(html! {
        script type="application/ld+json" { (PreEscaped(json)) }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn config() -> SiteConfig {
        SiteConfig {
            base_url: "https://example.test".into(),
            ..SiteConfig::default()
        }
    }

    fn to_json<T: Serialize>(value: &T) -> Value {
        serde_json::to_value(value).unwrap()
    }

    #[test]
    fn article_date_modified_defaults_to_published() {
        let schema = generate_article_schema(
            &config(),
            "Hello",
            "2025-01-15",
            "https://example.test/blog/hello",
            Some("Intro"),
            None,
        );
        assert_eq!(schema.date_modified, "2025-01-15");

        let schema = generate_article_schema(
            &config(),
            "Hello",
            "2025-01-15",
            "https://example.test/blog/hello",
            None,
            Some("2025-02-01"),
        );
        assert_eq!(schema.date_modified, "2025-02-01");
    }

    #[test]
    fn article_shape() {
        let schema = generate_article_schema(
            &config(),
            "Hello",
            "2025-01-15",
            "https://example.test/blog/hello",
            Some("Intro"),
            None,
        );
        let v = to_json(&schema);
        assert_eq!(v["@context"], "https://schema.org");
        assert_eq!(v["@type"], "BlogPosting");
        assert_eq!(v["headline"], "Hello");
        assert_eq!(v["description"], "Intro");
        assert_eq!(v["datePublished"], "2025-01-15");
        assert_eq!(
            v["author"],
            json!({"@type": "Person", "name": "Brandon Shoop", "url": "https://example.test"})
        );
        assert_eq!(
            v["publisher"]["logo"],
            json!({"@type": "ImageObject", "url": "https://example.test/siteicon.png"})
        );
        assert!(v["publisher"].get("url").is_none());
        assert_eq!(
            v["mainEntityOfPage"],
            json!({"@type": "WebPage", "@id": "https://example.test/blog/hello"})
        );
    }

    #[test]
    fn article_empty_excerpt_is_omitted() {
        let schema = generate_article_schema(&config(), "T", "2025-01-15", "u", Some(""), None);
        assert!(to_json(&schema).get("description").is_none());
    }

    #[test]
    fn breadcrumb_schema_empty_list() {
        let schema = generate_breadcrumb_schema(&[]);
        assert!(schema.item_list_element.is_empty());
        assert_eq!(to_json(&schema)["itemListElement"], json!([]));
    }

    #[test]
    fn breadcrumb_positions_are_one_based() {
        let items = vec![
            BreadcrumbItem {
                name: "Home".into(),
                url: "https://example.test".into(),
            },
            BreadcrumbItem {
                name: "Blog".into(),
                url: "https://example.test/blog".into(),
            },
        ];
        let schema = generate_breadcrumb_schema(&items);
        let positions: Vec<usize> = schema.item_list_element.iter().map(|i| i.position).collect();
        assert_eq!(positions, vec![1, 2]);
        assert_eq!(
            to_json(&schema)["itemListElement"][1],
            json!({"@type": "ListItem", "position": 2, "name": "Blog", "item": "https://example.test/blog"})
        );
    }

    #[test]
    fn project_offer_is_free() {
        let schema = generate_project_schema(
            &config(),
            "Recall Kit",
            "Flashcards",
            "https://example.test/projects/recall-kit",
            Some(DEFAULT_APPLICATION_CATEGORY),
            None,
        );
        let v = to_json(&schema);
        assert_eq!(
            v["offers"],
            json!({"@type": "Offer", "price": "0", "priceCurrency": "USD"})
        );
        assert_eq!(v["applicationCategory"], "MobileApplication");
        assert!(v.get("operatingSystem").is_none());
        assert_eq!(v["author"], json!({"@type": "Person", "name": "Brandon Shoop"}));
    }

    #[test]
    fn person_uses_base_url_and_identity() {
        let v = to_json(&generate_person_schema(&config()));
        assert_eq!(v["@type"], "Person");
        assert_eq!(v["url"], "https://example.test");
        assert_eq!(v["jobTitle"], "Managing Partner");
        assert_eq!(v["worksFor"]["url"], "https://aglflorida.com");
        assert_eq!(v["sameAs"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn organization_has_two_types() {
        let v = to_json(&generate_organization_schema(&config()));
        assert_eq!(v["@type"], json!(["Organization", "ProfessionalService"]));
        assert_eq!(v["logo"]["url"], "https://example.test/siteicon.png");
    }

    #[test]
    fn website_shape() {
        let v = to_json(&generate_website_schema(&config()));
        assert_eq!(
            v,
            json!({
                "@context": "https://schema.org",
                "@type": "WebSite",
                "name": "AGL Consulting LLC",
                "url": "https://example.test",
                "author": {"@type": "Person", "name": "Brandon Shoop"}
            })
        );
    }

    #[test]
    fn json_ld_script_escapes_closing_tags() {
        let item = BreadcrumbItem {
            name: "</script><b>".into(),
            url: "https://example.test".into(),
        };
        let html = json_ld_script(&generate_breadcrumb_schema(&[item]))
            .unwrap()
            .into_string();
        assert!(html.starts_with(r#"<script type="application/ld+json">"#));
        assert!(!html.contains("</script><b>"));
        assert!(html.contains(r"<\/script>"));
    }
}
