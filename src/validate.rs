//! JSON Schema validation of the site's JSON-LD.
//!
//! A QA step, not a build gate: `agl-site validate` regenerates every JSON-LD
//! object the site embeds and checks each against a JSON Schema describing
//! the exact shape the generators promise. The report lists every failing
//! object with `(path, message)` pairs; the command exits 1 if any failed.
//!
//! Checked objects:
//!
//! - the site-wide Organization, Person and WebSite
//! - every blog post's BlogPosting and its breadcrumb trail
//! - every project's SoftwareApplication and its breadcrumb trail
//!
//! Formats (`uri`) are asserted, not just annotated.

use crate::breadcrumbs::breadcrumb_schema_for_path;
use crate::config::SiteConfig;
use crate::content::{ContentError, SiteContent};
use crate::schema::{
    DEFAULT_APPLICATION_CATEGORY, DEFAULT_OPERATING_SYSTEM, generate_article_schema,
    generate_organization_schema, generate_person_schema, generate_project_schema,
    generate_website_schema,
};
use jsonschema::Validator;
use serde::Serialize;
use serde_json::{Value, json};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidateError {
    #[error("invalid JSON Schema for {kind}: {message}")]
    Compile { kind: &'static str, message: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
}

/// The JSON-LD types the site emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Organization,
    Person,
    WebSite,
    BlogPosting,
    SoftwareApplication,
    BreadcrumbList,
}

impl SchemaKind {
    pub const ALL: [SchemaKind; 6] = [
        SchemaKind::Organization,
        SchemaKind::Person,
        SchemaKind::WebSite,
        SchemaKind::BlogPosting,
        SchemaKind::SoftwareApplication,
        SchemaKind::BreadcrumbList,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SchemaKind::Organization => "Organization",
            SchemaKind::Person => "Person",
            SchemaKind::WebSite => "WebSite",
            SchemaKind::BlogPosting => "BlogPosting",
            SchemaKind::SoftwareApplication => "SoftwareApplication",
            SchemaKind::BreadcrumbList => "BreadcrumbList",
        }
    }

    /// The JSON Schema document for this type.
    pub fn definition(self) -> Value {
        match self {
            SchemaKind::Organization => organization_definition(),
            SchemaKind::Person => person_definition(),
            SchemaKind::WebSite => website_definition(),
            SchemaKind::BlogPosting => blog_posting_definition(),
            SchemaKind::SoftwareApplication => software_application_definition(),
            SchemaKind::BreadcrumbList => breadcrumb_list_definition(),
        }
    }
}

// =============================================================================
// Definitions
// =============================================================================

const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}";
const CURRENCY_PATTERN: &str = "^[A-Z]{3}$";

fn context() -> Value {
    json!({ "type": "string", "const": "https://schema.org" })
}

fn type_const(name: &str) -> Value {
    json!({ "type": "string", "const": name })
}

fn name_field() -> Value {
    json!({ "type": "string", "minLength": 1 })
}

fn uri() -> Value {
    json!({ "type": "string", "format": "uri" })
}

fn image_object() -> Value {
    json!({
        "type": "object",
        "required": ["@type", "url"],
        "properties": { "@type": type_const("ImageObject"), "url": uri() },
        "additionalProperties": false
    })
}

fn person_ref(with_url: bool) -> Value {
    let (required, properties) = if with_url {
        (
            json!(["@type", "name", "url"]),
            json!({ "@type": type_const("Person"), "name": name_field(), "url": uri() }),
        )
    } else {
        (
            json!(["@type", "name"]),
            json!({ "@type": type_const("Person"), "name": name_field() }),
        )
    };
    json!({
        "type": "object",
        "required": required,
        "properties": properties,
        "additionalProperties": false
    })
}

fn organization_definition() -> Value {
    json!({
        "type": "object",
        "required": ["@context", "@type", "name", "url"],
        "properties": {
            "@context": context(),
            "@type": {
                "type": "array",
                "items": { "type": "string" },
                "contains": { "const": "Organization" }
            },
            "name": name_field(),
            "url": uri(),
            "logo": image_object(),
            "description": { "type": "string" },
            "sameAs": { "type": "array", "items": uri() }
        },
        "additionalProperties": false
    })
}

fn person_definition() -> Value {
    json!({
        "type": "object",
        "required": ["@context", "@type", "name", "url"],
        "properties": {
            "@context": context(),
            "@type": type_const("Person"),
            "name": name_field(),
            "url": uri(),
            "jobTitle": { "type": "string" },
            "worksFor": {
                "type": "object",
                "required": ["@type", "name", "url"],
                "properties": {
                    "@type": type_const("Organization"),
                    "name": name_field(),
                    "url": uri()
                },
                "additionalProperties": false
            },
            "sameAs": { "type": "array", "items": uri() },
            "description": { "type": "string" }
        },
        "additionalProperties": false
    })
}

fn website_definition() -> Value {
    json!({
        "type": "object",
        "required": ["@context", "@type", "name", "url"],
        "properties": {
            "@context": context(),
            "@type": type_const("WebSite"),
            "name": name_field(),
            "url": uri(),
            "author": person_ref(false)
        },
        "additionalProperties": false
    })
}

fn blog_posting_definition() -> Value {
    json!({
        "type": "object",
        "required": [
            "@context", "@type", "headline", "datePublished",
            "author", "publisher", "mainEntityOfPage"
        ],
        "properties": {
            "@context": context(),
            "@type": type_const("BlogPosting"),
            "headline": name_field(),
            "description": { "type": "string" },
            "datePublished": { "type": "string", "pattern": DATE_PATTERN },
            "dateModified": { "type": "string", "pattern": DATE_PATTERN },
            "author": person_ref(true),
            "publisher": {
                "type": "object",
                "required": ["@type", "name"],
                "properties": {
                    "@type": type_const("Organization"),
                    "name": name_field(),
                    "logo": image_object()
                },
                "additionalProperties": false
            },
            "mainEntityOfPage": {
                "type": "object",
                "required": ["@type", "@id"],
                "properties": { "@type": type_const("WebPage"), "@id": uri() },
                "additionalProperties": false
            }
        },
        "additionalProperties": false
    })
}

fn software_application_definition() -> Value {
    json!({
        "type": "object",
        "required": ["@context", "@type", "name", "description", "author", "offers"],
        "properties": {
            "@context": context(),
            "@type": type_const("SoftwareApplication"),
            "name": name_field(),
            "description": { "type": "string", "minLength": 1 },
            "url": uri(),
            "applicationCategory": { "type": "string" },
            "operatingSystem": { "type": "string" },
            "author": person_ref(false),
            "offers": {
                "type": "object",
                "required": ["@type", "price", "priceCurrency"],
                "properties": {
                    "@type": type_const("Offer"),
                    "price": { "type": "string" },
                    "priceCurrency": { "type": "string", "pattern": CURRENCY_PATTERN }
                },
                "additionalProperties": false
            }
        },
        "additionalProperties": false
    })
}

fn breadcrumb_list_definition() -> Value {
    json!({
        "type": "object",
        "required": ["@context", "@type", "itemListElement"],
        "properties": {
            "@context": context(),
            "@type": type_const("BreadcrumbList"),
            "itemListElement": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["@type", "position", "name", "item"],
                    "properties": {
                        "@type": type_const("ListItem"),
                        "position": { "type": "integer", "minimum": 1 },
                        "name": name_field(),
                        "item": uri()
                    },
                    "additionalProperties": false
                }
            }
        },
        "additionalProperties": false
    })
}

// =============================================================================
// Validation
// =============================================================================

/// One schema violation inside one JSON-LD object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// JSON pointer into the object, `root` for the object itself.
    pub path: String,
    pub message: String,
}

/// A JSON-LD object that failed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    pub schema_type: &'static str,
    /// Which object: `Root Person`, `Blog: my-post`, ...
    pub schema_name: String,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    /// Number of objects checked.
    pub checked: usize,
    pub posts: usize,
    pub projects: usize,
    pub failures: Vec<ValidationFailure>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.failures.iter().map(|f| f.errors.len()).sum()
    }
}

/// Compiled validators for every [`SchemaKind`].
pub struct SchemaValidators {
    /// Indexed by `SchemaKind as usize`, in [`SchemaKind::ALL`] order.
    validators: Vec<Validator>,
}

impl SchemaValidators {
    pub fn new() -> Result<Self, ValidateError> {
        let validators = SchemaKind::ALL
            .iter()
            .map(|&kind| {
                jsonschema::options()
                    .should_validate_formats(true)
                    .build(&kind.definition())
                    .map_err(|e| ValidateError::Compile {
                        kind: kind.name(),
                        message: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { validators })
    }

    /// Violations of `instance` against `kind`'s schema.
    pub fn errors_for(&self, kind: SchemaKind, instance: &Value) -> Vec<FieldError> {
        self.validators[kind as usize]
            .iter_errors(instance)
            .map(|e| {
                let path = e.instance_path.to_string();
                FieldError {
                    path: if path.is_empty() { "root".into() } else { path },
                    message: e.to_string(),
                }
            })
            .collect()
    }

    /// Serialize and check one object, recording a failure in `report`.
    pub fn check<T: Serialize>(
        &self,
        kind: SchemaKind,
        name: impl Into<String>,
        value: &T,
        report: &mut ValidationReport,
    ) -> Result<(), ValidateError> {
        let instance = serde_json::to_value(value)?;
        let errors = self.errors_for(kind, &instance);
        report.checked += 1;
        if !errors.is_empty() {
            report.failures.push(ValidationFailure {
                schema_type: kind.name(),
                schema_name: name.into(),
                errors,
            });
        }
        Ok(())
    }
}

/// Check every JSON-LD object the site embeds for the given content.
pub fn validate_site(
    config: &SiteConfig,
    content: &SiteContent,
) -> Result<ValidationReport, ValidateError> {
    let validators = SchemaValidators::new()?;
    let mut report = ValidationReport::default();

    validators.check(
        SchemaKind::Organization,
        "Root Organization",
        &generate_organization_schema(config),
        &mut report,
    )?;
    validators.check(
        SchemaKind::Person,
        "Root Person",
        &generate_person_schema(config),
        &mut report,
    )?;
    validators.check(
        SchemaKind::WebSite,
        "Root WebSite",
        &generate_website_schema(config),
        &mut report,
    )?;

    for post in &content.posts {
        let path = format!("/blog/{}", post.slug);
        let article = generate_article_schema(
            config,
            &post.title,
            &post.date,
            &config.url_for(&path),
            Some(&post.excerpt),
            None,
        );
        validators.check(
            SchemaKind::BlogPosting,
            format!("Blog: {}", post.slug),
            &article,
            &mut report,
        )?;
        validators.check(
            SchemaKind::BreadcrumbList,
            format!("Blog breadcrumb: {}", post.slug),
            &breadcrumb_schema_for_path(config, &path),
            &mut report,
        )?;
    }
    report.posts = content.posts.len();

    for project in &content.projects {
        let path = format!("/projects/{}", project.id);
        let app = generate_project_schema(
            config,
            &project.title,
            &project.description,
            &config.url_for(&path),
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
        validators.check(
            SchemaKind::SoftwareApplication,
            format!("Project: {}", project.id),
            &app,
            &mut report,
        )?;
        validators.check(
            SchemaKind::BreadcrumbList,
            format!("Project breadcrumb: {}", project.id),
            &breadcrumb_schema_for_path(config, &path),
            &mut report,
        )?;
    }
    report.projects = content.projects.len();

    Ok(report)
}

/// Load content from `root` and validate it.
pub fn validate_root(config: &SiteConfig, root: &Path) -> Result<ValidationReport, ValidateError> {
    let content = SiteContent::load(root)?;
    validate_site(config, &content)
}
