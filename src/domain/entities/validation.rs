use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors};

use crate::entities::option_fields::OptionField;

pub const MAX_TITLE_LENGTH: u64 = 120;
pub const MIN_SLUG_LENGTH: usize = 1;
pub const MAX_SLUG_LENGTH: usize = 80;
pub const MAX_SUMMARY_LENGTH: u64 = 500;
pub const MAX_LIST_ITEMS: usize = 30;
pub const MAX_LIST_ITEM_LENGTH: usize = 60;

const COPY_SUFFIX: &str = " (Copy)";

/// Title for a duplicated item. The original is shortened when needed so
/// the result still passes `MAX_TITLE_LENGTH`.
pub fn copy_title(title: &str) -> String {
    let room = MAX_TITLE_LENGTH as usize - COPY_SUFFIX.chars().count();
    let base: String = title.chars().take(room).collect();
    format!("{}{}", base.trim_end(), COPY_SUFFIX)
}

pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(url) {
        Ok(parsed) => {
            if parsed.scheme() == "http" || parsed.scheme() == "https" {
                Ok(())
            } else {
                Err(new_validation_error("invalid_url_scheme", "URL must start with http:// or https://"))
            }
        }
        Err(_) => Err(new_validation_error("invalid_url", "Invalid URL format")),
    }
}

/// Uploaded images are served from this host, so relative `/uploads/...`
/// paths are accepted alongside absolute URLs.
pub fn validate_image_ref(value: &str) -> Result<(), ValidationError> {
    if value.starts_with("/uploads/") && !value.contains("..") {
        return Ok(());
    }
    validate_url(value)
}

pub fn validate_image_refs(values: &[String]) -> Result<(), ValidationError> {
    values.iter().try_for_each(|v| validate_image_ref(v))
}

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.len() < MIN_SLUG_LENGTH || slug.len() > MAX_SLUG_LENGTH {
        return Err(new_validation_error("slug_length", "Slug must be between 1 and 80 characters"));
    }
    if !slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err(new_validation_error("slug_invalid_chars", "Slug must contain only lowercase letters, digits, or hyphens"));
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(new_validation_error("slug_edge_hyphen", "Slug must not start or end with a hyphen"));
    }
    if slug.contains("--") {
        return Err(new_validation_error("slug_double_hyphen", "Slug must not contain consecutive hyphens"));
    }
    Ok(())
}

/// Blank slugs are allowed on input; they mean "derive it" on create and
/// "leave it alone" on update.
pub fn validate_slug_input(slug: &str) -> Result<(), ValidationError> {
    if slug.trim().is_empty() {
        return Ok(());
    }
    validate_slug(slug)
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(new_validation_error("title_blank", "Title is required"));
    }
    if title.trim().len() != title.len() {
        return Err(new_validation_error("title_whitespace", "Title must not have leading or trailing whitespace"));
    }
    Ok(())
}

pub fn validate_list(items: &[String]) -> Result<(), ValidationError> {
    if items.len() > MAX_LIST_ITEMS {
        return Err(new_validation_error("too_many_items", "Too many items provided"));
    }
    if items.iter().any(|item| item.trim().is_empty() || item.len() > MAX_LIST_ITEM_LENGTH) {
        return Err(new_validation_error("invalid_item_length", "List items must be between 1 and 60 characters"));
    }
    Ok(())
}

pub fn validate_optional_url_field(value: &OptionField<String>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(url) = value {
        validate_url(url)?;
    }
    Ok(())
}

pub fn validate_optional_image_field(value: &OptionField<String>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(url) = value {
        validate_image_ref(url)?;
    }
    Ok(())
}

pub fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}

pub fn single_field_error(field: &'static str, code: &'static str, msg: &'static str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, new_validation_error(code, msg));
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_rules() {
        assert!(validate_slug("rust-web-api-2").is_ok());
        assert!(validate_slug("Rust").is_err());
        assert!(validate_slug("-edge").is_err());
        assert!(validate_slug("double--hyphen").is_err());
        assert!(validate_slug("").is_err());
        assert!(validate_slug_input("   ").is_ok());
    }

    #[test]
    fn image_refs_accept_local_uploads() {
        assert!(validate_image_ref("/uploads/abc.png").is_ok());
        assert!(validate_image_ref("https://cdn.example.com/a.png").is_ok());
        assert!(validate_image_ref("/uploads/../secret").is_err());
        assert!(validate_image_ref("ftp://example.com/a.png").is_err());
    }

    #[test]
    fn list_rules() {
        assert!(validate_list(&["Rust".into(), "Actix".into()]).is_ok());
        assert!(validate_list(&["".into()]).is_err());
        assert!(validate_list(&vec!["x".to_string(); MAX_LIST_ITEMS + 1]).is_err());
    }
}
