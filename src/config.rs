//! Site configuration module.
//!
//! Handles loading, validating, and resolving `config.toml`. Stock defaults
//! describe the production site; a `config.toml` in the content root
//! overrides any subset of them.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── config.toml        # Site config (optional)
//! ├── blog/
//! ├── projects/
//! └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! base_url = "https://aglflorida.com"
//! posts_per_page = 5
//!
//! [identity]
//! site_name = "AGL Consulting LLC"
//! locale = "en_US"
//! author_name = "Brandon Shoop"
//! site_icon = "siteicon.png"
//!
//! [contact]
//! endpoint = "https://docs.google.com/forms/d/.../formResponse"
//!
//! [colors]
//! background = "#f9fafb"
//! accent = "#1e40af"
//! ```
//!
//! ## Base URL
//!
//! The base URL drives every absolute link the site emits: canonical links,
//! Open Graph and Twitter images, JSON-LD `url`/`item` fields and the sitemap.
//! It is resolved once, in this order, and then passed explicitly to every
//! generator:
//!
//! 1. `--base-url` on the command line
//! 2. the `SITE_BASE_URL` environment variable
//! 3. `base_url` in `config.toml`
//! 4. the stock default
//!
//! Steps 1 and 2 are handled by clap; this module only sees the resulting
//! `Option<String>` override. Trailing slashes are stripped so URL joins can
//! always use `format!("{base}/{path}")`.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Environment variable consulted (through clap) for the base URL.
pub const BASE_URL_ENV: &str = "SITE_BASE_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute origin of the published site, without trailing slash.
    pub base_url: String,
    /// Number of posts per blog listing page.
    pub posts_per_page: usize,
    /// Fixed identity of the business and its author (JSON-LD, OG tags).
    pub identity: IdentityConfig,
    /// External form endpoint and field mapping for the contact page.
    pub contact: ContactConfig,
    /// Stylesheet colors.
    pub colors: ColorConfig,
}

pub const DEFAULT_BASE_URL: &str = "https://aglflorida.com";

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            posts_per_page: 5,
            identity: IdentityConfig::default(),
            contact: ContactConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.base_url).map_err(|e| {
            ConfigError::Validation(format!("base_url '{}' is not a URL: {e}", self.base_url))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "base_url must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if self.posts_per_page == 0 {
            return Err(ConfigError::Validation(
                "posts_per_page must be at least 1".into(),
            ));
        }
        if self.identity.site_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "identity.site_name must not be empty".into(),
            ));
        }
        if self.contact.endpoint.trim().is_empty() {
            return Err(ConfigError::Validation(
                "contact.endpoint must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Absolute URL of a site path. `url_for("blog")` → `<base>/blog`.
    pub fn url_for(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Default social preview image and publisher logo.
    pub fn site_icon_url(&self) -> String {
        self.url_for(&self.identity.site_icon)
    }
}

/// Who the site is for and who writes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityConfig {
    pub site_name: String,
    /// Open Graph locale, e.g. `en_US`.
    pub locale: String,
    /// Path of the site icon relative to the base URL.
    pub site_icon: String,
    pub author_name: String,
    pub author_job_title: String,
    pub author_description: String,
    pub author_same_as: Vec<String>,
    /// Canonical organization URL. Independent of `base_url` so preview
    /// deployments still point at the production organization.
    pub organization_url: String,
    pub organization_description: String,
    pub organization_same_as: Vec<String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            site_name: "AGL Consulting LLC".to_string(),
            locale: "en_US".to_string(),
            site_icon: "siteicon.png".to_string(),
            author_name: "Brandon Shoop".to_string(),
            author_job_title: "Managing Partner".to_string(),
            author_description: "Computer scientist and software generalist working at the \
                intersection of technical product management and hands-on development."
                .to_string(),
            author_same_as: vec![
                "https://www.linkedin.com/in/brandonshoop/".to_string(),
                "https://github.com/aglflorida/".to_string(),
            ],
            organization_url: DEFAULT_BASE_URL.to_string(),
            organization_description: "Fractional technical leadership and software development \
                for small and mid-sized businesses. We help organizations modernize \
                technology\u{2014}infrastructure, developer workflows, and platform \
                migrations\u{2014}without the overhead of a full-time executive."
                .to_string(),
            organization_same_as: vec![
                "https://www.linkedin.com/company/agl-consulting-llc/".to_string(),
                "https://github.com/aglflorida/".to_string(),
                "https://play.google.com/store/apps/dev?id=5851403031328766349".to_string(),
                "https://apps.apple.com/us/developer/agl-consulting-llc/id1801519023".to_string(),
            ],
        }
    }
}

/// External form-collection endpoint used by the contact page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    /// URL receiving the URL-encoded POST.
    pub endpoint: String,
    /// Form field names on the external service.
    pub name_field: String,
    pub email_field: String,
    pub message_field: String,
    /// reCAPTCHA site key. Empty disables the CAPTCHA requirement.
    pub recaptcha_site_key: String,
    /// Hostnames treated as local development (CAPTCHA bypassed).
    pub local_hostnames: Vec<String>,
    /// Message shown after a successful submission.
    pub success_message: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://docs.google.com/forms/d/1oY3nolFTHpH34NNbIi1DZfJwZYx5-y9Mcyv9bi5KiuQ/formResponse"
                .to_string(),
            name_field: "entry.1059374314".to_string(),
            email_field: "entry.1359071833".to_string(),
            message_field: "entry.1364077543".to_string(),
            recaptcha_site_key: "6Lc3-PoqAAAAAOBDfRKS8Es-iqAy3JQ4qWif_kJy".to_string(),
            local_hostnames: vec![
                "localhost".to_string(),
                "127.0.0.1".to_string(),
                "[::1]".to_string(),
            ],
            success_message: "Thank you for contacting AGL Consulting of Florida.".to_string(),
        }
    }
}

/// Stylesheet colors, emitted as CSS custom properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub background: String,
    pub surface: String,
    pub text: String,
    /// Dates, captions, breadcrumbs.
    pub text_muted: String,
    pub accent: String,
    pub accent_hover: String,
    pub footer: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#f9fafb".to_string(),
            surface: "#ffffff".to_string(),
            text: "#111827".to_string(),
            text_muted: "#4b5563".to_string(),
            accent: "#1e40af".to_string(),
            accent_hover: "#1e3a8a".to_string(),
            footer: "#1f2937".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Normalize a base URL: trim whitespace and trailing slashes.
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

/// Merge the user's overlay on top of stock defaults, apply the base URL
/// override, then validate.
pub fn resolve_config(
    overlay: Option<toml::Value>,
    base_url_override: Option<&str>,
) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let mut config: SiteConfig = merged.try_into()?;
    if let Some(url) = base_url_override.filter(|u| !u.trim().is_empty()) {
        config.base_url = url.to_string();
    }
    config.base_url = normalize_base_url(&config.base_url);
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the content root.
///
/// `base_url_override` is the already-resolved CLI/environment value.
pub fn load_config(root: &Path, base_url_override: Option<&str>) -> Result<SiteConfig, ConfigError> {
    let overlay = load_raw_config(root)?;
    resolve_config(overlay, base_url_override)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# agl-site Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Absolute origin of the published site. Overridden by --base-url or the
# SITE_BASE_URL environment variable.
base_url = "https://aglflorida.com"

# Posts per blog listing page (/blog/page/N/).
posts_per_page = 5

# ---------------------------------------------------------------------------
# Identity: used in Open Graph tags and Schema.org JSON-LD
# ---------------------------------------------------------------------------
[identity]
site_name = "AGL Consulting LLC"
locale = "en_US"
# Relative to base_url. Default image for social previews, publisher logo.
site_icon = "siteicon.png"
author_name = "Brandon Shoop"
author_job_title = "Managing Partner"
author_description = "Computer scientist and software generalist working at the intersection of technical product management and hands-on development."
author_same_as = ["https://www.linkedin.com/in/brandonshoop/", "https://github.com/aglflorida/"]
organization_url = "https://aglflorida.com"
organization_description = "Fractional technical leadership and software development for small and mid-sized businesses. We help organizations modernize technology—infrastructure, developer workflows, and platform migrations—without the overhead of a full-time executive."
organization_same_as = [
    "https://www.linkedin.com/company/agl-consulting-llc/",
    "https://github.com/aglflorida/",
    "https://play.google.com/store/apps/dev?id=5851403031328766349",
    "https://apps.apple.com/us/developer/agl-consulting-llc/id1801519023",
]

# ---------------------------------------------------------------------------
# Contact form: external form-collection endpoint
# ---------------------------------------------------------------------------
[contact]
endpoint = "https://docs.google.com/forms/d/1oY3nolFTHpH34NNbIi1DZfJwZYx5-y9Mcyv9bi5KiuQ/formResponse"
name_field = "entry.1059374314"
email_field = "entry.1359071833"
message_field = "entry.1364077543"
# Leave empty to disable the CAPTCHA requirement.
recaptcha_site_key = "6Lc3-PoqAAAAAOBDfRKS8Es-iqAy3JQ4qWif_kJy"
# CAPTCHA is skipped when the page is served from one of these hosts.
local_hostnames = ["localhost", "127.0.0.1", "[::1]"]
success_message = "Thank you for contacting AGL Consulting of Florida."

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
background = "#f9fafb"
surface = "#ffffff"
text = "#111827"
text_muted = "#4b5563"    # Dates, breadcrumbs, captions
accent = "#1e40af"
accent_hover = "#1e3a8a"
footer = "#1f2937"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {bg};
    --color-surface: {surface};
    --color-text: {text};
    --color-text-muted: {text_muted};
    --color-accent: {accent};
    --color-accent-hover: {accent_hover};
    --color-footer: {footer};
}}"#,
        bg = colors.background,
        surface = colors.surface,
        text = colors.text,
        text_muted = colors.text_muted,
        accent = colors.accent,
        accent_hover = colors.accent_hover,
        footer = colors.footer,
    )
}
