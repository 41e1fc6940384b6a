//! Request validation on top of `validator` derives.
//!
//! Built-in rules (`email`, `length`) come from the crate; the custom rules
//! below carry the domain checks. `describe` renders one message per field,
//! sorted by field name and joined with `", "`.

use serde_json::Value;
use std::borrow::Cow;

pub use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::{DocumentId, InviteStatus, Location, Role, Specialty};

/// Roles a client may pick for itself at registration.
pub const SELF_ASSIGNABLE_ROLES: &[Role] = &[Role::Customer, Role::Doctor];

fn rule(code: &'static str) -> ValidationError {
    ValidationError::new(code)
}

/// A single-field failure, for checks made outside a derive.
pub fn field_error(field: &'static str, code: &'static str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, rule(code));
    errors
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rule("required"));
    }
    Ok(())
}

/// `+` followed by 2..=15 digits, the first non-zero. Blank is `required`.
pub fn e164(phone: &str) -> Result<(), ValidationError> {
    not_blank(phone)?;
    let valid = phone.strip_prefix('+').map_or(false, |digits| {
        (2..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()) && !digits.starts_with('0')
    });
    if valid { Ok(()) } else { Err(rule("e164")) }
}

pub fn document_id(value: &str) -> Result<(), ValidationError> {
    DocumentId::parse(value).map(|_| ()).map_err(|_| rule("uuid"))
}

pub fn required_document_id(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    document_id(value)
}

pub fn registration_roles(roles: &[String]) -> Result<(), ValidationError> {
    let allowed = roles
        .iter()
        .all(|r| r.parse::<Role>().map_or(false, |role| SELF_ASSIGNABLE_ROLES.contains(&role)));
    if allowed { Ok(()) } else { Err(rule("roles")) }
}

pub fn specialty_names(values: &[String]) -> Result<(), ValidationError> {
    if values.is_empty() {
        return Err(rule("required"));
    }
    if values.iter().any(|s| s.parse::<Specialty>().is_err()) {
        return Err(rule("specialties"));
    }
    Ok(())
}

pub fn not_empty<T>(values: &[T]) -> Result<(), ValidationError> {
    if values.is_empty() { Err(rule("required")) } else { Ok(()) }
}

pub fn invite_status(value: &str) -> Result<(), ValidationError> {
    value.parse::<InviteStatus>().map(|_| ()).map_err(|_| rule("oneof"))
}

/// A GeoJSON `Point` with `[longitude, latitude]` inside WGS84 bounds and
/// a non-blank address.
pub fn geopoint(location: &Location) -> Result<(), ValidationError> {
    if location.address.trim().is_empty() {
        return Err(rule("required"));
    }
    let point = &location.point;
    match point.coordinates.as_slice() {
        [lng, lat] if point.kind == "Point" && (-180.0..=180.0).contains(lng) && (-90.0..=90.0).contains(lat) => Ok(()),
        _ => Err(rule("geopoint")),
    }
}

/// `hospital_id` -> `hospitalId`, matching the JSON field names.
fn json_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn length_message(err: &ValidationError) -> &'static str {
    let len = match err.params.get("value") {
        Some(Value::String(s)) => Some(s.chars().count() as u64),
        Some(Value::Array(items)) => Some(items.len() as u64),
        _ => None,
    };
    match (len, err.params.get("min").and_then(Value::as_u64)) {
        (Some(len), Some(min)) if len < min => "must meet the minimum length",
        (Some(_), _) => "exceeds the maximum length",
        _ => "has an invalid length",
    }
}

fn message(field: &str, err: &ValidationError) -> String {
    let code: &Cow<'static, str> = &err.code;
    match code.as_ref() {
        "required" => format!("{} is required", field),
        "email" => format!("{} must be a valid email address", field),
        "length" => format!("{} {}", field, length_message(err)),
        other => format!("{} failed on the '{}' validation", field, other),
    }
}

/// Client-facing text for `errors`. A blank field reports only `required`.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            let name = json_name(&field.to_string());
            let first = errs.iter().find(|e| e.code == "required").or_else(|| errs.first())?;
            Some((name.clone(), message(&name, first)))
        })
        .collect();
    fields.sort();
    fields.into_iter().map(|(_, msg)| msg).collect::<Vec<_>>().join(", ")
}
