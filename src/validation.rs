//! Field-level validation for incoming lead submissions.
//!
//! Validation is pure: it never touches the store, and every failing field
//! is reported in a single pass.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::models::{LeadCreate, NewLead};

/// Maximum length of `nome`, in characters.
pub const NAME_MAX_CHARS: usize = 100;
/// Maximum length of `mensagem`, in characters.
pub const MESSAGE_MAX_CHARS: usize = 1000;

const EMAIL_LOCAL_MAX_CHARS: usize = 64;
const EMAIL_MAX_CHARS: usize = 254;

/// Machine-readable reason a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorCode {
    Missing,
    Empty,
    TooLong,
    InvalidEmail,
    MalformedBody,
}

impl FieldErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldErrorCode::Missing => "missing",
            FieldErrorCode::Empty => "empty",
            FieldErrorCode::TooLong => "too_long",
            FieldErrorCode::InvalidEmail => "invalid_email",
            FieldErrorCode::MalformedBody => "malformed_body",
        }
    }
}

impl Serialize for FieldErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub code: FieldErrorCode,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, code: FieldErrorCode, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.field, self.code.as_str())
    }
}

/// Client-supplied data violated one or more field constraints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation: {}", .errors.len(), join_fields(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// The request body could not be decoded into a submission at all.
    pub fn malformed_body(detail: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError::new(
                "body",
                FieldErrorCode::MalformedBody,
                detail,
            )],
        }
    }

    /// Whether `field` is among the rejected fields.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Top-level domains reserved for special use; mail to them is never delivered.
pub const SPECIAL_USE_DOMAINS: &[&str] = &[
    "arpa",
    "invalid",
    "local",
    "localdomain",
    "localhost",
    "onion",
    "test",
];

static LOCAL_PART_RE: OnceLock<Regex> = OnceLock::new();
static ASCII_DOMAIN_RE: OnceLock<Regex> = OnceLock::new();

fn local_part_regex() -> &'static Regex {
    LOCAL_PART_RE.get_or_init(|| {
        // RFC 5322 atom characters plus any Unicode letter, mark or digit (RFC 6531).
        let pattern = r"^[\p{L}\p{M}\p{N}!#$%&'*+/=?^_`{|}~.-]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email local part regex failed to compile: {error}"))
    })
}

fn ascii_domain_regex() -> &'static Regex {
    ASCII_DOMAIN_RE.get_or_init(|| {
        // Applied after IDNA conversion, so labels are lower-case LDH or punycode.
        let pattern = r"^[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email domain regex failed to compile: {error}"))
    })
}

fn is_valid_local_part(local: &str) -> bool {
    local.chars().count() <= EMAIL_LOCAL_MAX_CHARS
        && local_part_regex().is_match(local)
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
}

/// Convert `domain` to its ASCII (punycode) form if it is deliverable.
fn deliverable_ascii_domain(domain: &str) -> Option<String> {
    if domain.is_empty() || domain.chars().any(char::is_whitespace) {
        return None;
    }

    let ascii = idna::domain_to_ascii_strict(domain).ok()?;
    if !ascii_domain_regex().is_match(&ascii) {
        return None;
    }

    let tld = ascii.rsplit('.').next()?;
    if tld.chars().all(|c| c.is_ascii_digit()) || SPECIAL_USE_DOMAINS.contains(&tld) {
        return None;
    }

    Some(ascii)
}

/// Validate `email` and return it with the domain lower-cased.
///
/// The local part may contain Unicode letters and the domain may be an
/// internationalized name, as long as it converts to valid IDNA. Numeric
/// and special-use top-level domains are rejected.
pub fn normalize_email(email: &str) -> Option<String> {
    if email.chars().count() > EMAIL_MAX_CHARS {
        return None;
    }

    let (local, domain) = email.rsplit_once('@')?;
    if !is_valid_local_part(local) {
        return None;
    }
    deliverable_ascii_domain(domain)?;

    Some(format!("{}@{}", local, domain.to_lowercase()))
}

/// Check email address syntax.
pub fn is_valid_email(email: &str) -> bool {
    normalize_email(email).is_some()
}

fn check_text(
    field: &str,
    value: Option<String>,
    max_chars: usize,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let Some(value) = value else {
        errors.push(FieldError::new(field, FieldErrorCode::Missing, "Campo obrigatório"));
        return None;
    };

    let length = value.chars().count();
    if length == 0 {
        errors.push(FieldError::new(
            field,
            FieldErrorCode::Empty,
            "Campo não pode ser vazio",
        ));
        return None;
    }
    if length > max_chars {
        errors.push(FieldError::new(
            field,
            FieldErrorCode::TooLong,
            format!("Máximo de {} caracteres", max_chars),
        ));
        return None;
    }

    Some(value)
}

fn check_email(value: Option<String>, errors: &mut Vec<FieldError>) -> Option<String> {
    let Some(value) = value else {
        errors.push(FieldError::new("email", FieldErrorCode::Missing, "Campo obrigatório"));
        return None;
    };

    let normalized = normalize_email(&value);
    if normalized.is_none() {
        errors.push(FieldError::new(
            "email",
            FieldErrorCode::InvalidEmail,
            "Endereço de email inválido",
        ));
    }
    normalized
}

/// Validate a raw submission.
///
/// Returns a [`NewLead`] when every constraint holds, otherwise a
/// [`ValidationError`] listing each failing field.
pub fn validate_lead(input: LeadCreate) -> Result<NewLead, ValidationError> {
    let mut errors = Vec::new();

    let name = check_text("nome", input.nome, NAME_MAX_CHARS, &mut errors);
    let email = check_email(input.email, &mut errors);
    let message = check_text("mensagem", input.mensagem, MESSAGE_MAX_CHARS, &mut errors);

    match (name, email, message) {
        (Some(name), Some(email), Some(message)) if errors.is_empty() => Ok(NewLead {
            name,
            email,
            message,
        }),
        _ => Err(ValidationError { errors }),
    }
}
