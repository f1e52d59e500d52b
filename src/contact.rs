//! Contact form model.
//!
//! The site has no backend: the contact page posts straight to an external
//! form-collection endpoint from the browser. This module owns the rules that
//! script applies, so they are defined and tested once:
//!
//! - name, email and message are required (whitespace-only counts as empty)
//! - email must match [`EMAIL_PATTERN`]
//! - a CAPTCHA token is required unless the page is served from a local
//!   development hostname or no site key is configured
//! - a filled-in honeypot field rejects the submission outright
//!
//! [`ContactScriptConfig`] carries the endpoint, field mapping, messages and
//! pattern into the page as JSON, where `static/contact.js` reads them.

use crate::config::ContactConfig;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use thiserror::Error;

/// Loose email shape check: something@something.something, no spaces.
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(EMAIL_PATTERN).unwrap());

/// Status line shown when the network request itself fails.
pub const SEND_FAILED_MESSAGE: &str = "Error sending message";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContactError {
    #[error("Name is required")]
    NameRequired,
    #[error("Email is required")]
    EmailRequired,
    #[error("Please enter a valid email address")]
    EmailInvalid,
    #[error("Message is required")]
    MessageRequired,
    #[error("Please complete the reCAPTCHA verification")]
    CaptchaRequired,
    #[error("Submission rejected")]
    Honeypot,
}

impl ContactError {
    /// Form field the error is shown against.
    pub fn field(self) -> &'static str {
        match self {
            ContactError::NameRequired => "name",
            ContactError::EmailRequired | ContactError::EmailInvalid => "email",
            ContactError::MessageRequired => "message",
            ContactError::CaptchaRequired => "captcha",
            ContactError::Honeypot => "website",
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Whether `hostname` is a development host that skips the CAPTCHA.
pub fn is_local_hostname(config: &ContactConfig, hostname: &str) -> bool {
    config.local_hostnames.iter().any(|h| h == hostname)
}

pub fn captcha_enabled(config: &ContactConfig) -> bool {
    !config.recaptcha_site_key.trim().is_empty()
}

/// What a visitor typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    /// Hidden `website` field; humans leave it empty.
    pub honeypot: String,
    pub captcha_token: Option<String>,
}

impl ContactSubmission {
    /// Every problem with the submission, in field order.
    ///
    /// A filled honeypot short-circuits to `[Honeypot]` without checking
    /// anything else.
    pub fn validate(&self, config: &ContactConfig, hostname: &str) -> Result<(), Vec<ContactError>> {
        if !self.honeypot.is_empty() {
            return Err(vec![ContactError::Honeypot]);
        }

        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(ContactError::NameRequired);
        }
        if self.email.trim().is_empty() {
            errors.push(ContactError::EmailRequired);
        } else if !is_valid_email(&self.email) {
            errors.push(ContactError::EmailInvalid);
        }
        if self.message.trim().is_empty() {
            errors.push(ContactError::MessageRequired);
        }
        let has_token = self.captcha_token.as_deref().is_some_and(|t| !t.is_empty());
        if !has_token && captcha_enabled(config) && !is_local_hostname(config, hostname) {
            errors.push(ContactError::CaptchaRequired);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// URL-encoded POST body using the endpoint's field ids.
    pub fn form_body(&self, config: &ContactConfig) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair(&config.name_field, &self.name)
            .append_pair(&config.email_field, &self.email)
            .append_pair(&config.message_field, &self.message)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessages {
    pub name_required: String,
    pub email_required: String,
    pub email_invalid: String,
    pub message_required: String,
    pub captcha_required: String,
    pub send_failed: String,
    pub success: String,
}

/// Settings embedded in the contact page for the form script.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactScriptConfig {
    pub endpoint: String,
    pub fields: ContactFields,
    pub local_hostnames: Vec<String>,
    pub captcha_enabled: bool,
    pub email_pattern: &'static str,
    pub messages: ContactMessages,
}

impl ContactScriptConfig {
    pub fn new(config: &ContactConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            fields: ContactFields {
                name: config.name_field.clone(),
                email: config.email_field.clone(),
                message: config.message_field.clone(),
            },
            local_hostnames: config.local_hostnames.clone(),
            captcha_enabled: captcha_enabled(config),
            email_pattern: EMAIL_PATTERN,
            messages: ContactMessages {
                name_required: ContactError::NameRequired.to_string(),
                email_required: ContactError::EmailRequired.to_string(),
                email_invalid: ContactError::EmailInvalid.to_string(),
                message_required: ContactError::MessageRequired.to_string(),
                captcha_required: ContactError::CaptchaRequired.to_string(),
                send_failed: SEND_FAILED_MESSAGE.to_string(),
                success: config.success_message.clone(),
            },
        }
    }
}
