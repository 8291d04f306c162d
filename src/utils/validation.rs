use crate::utils::error::{MailError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    validate_url_with_schemes(field_name, url_str, &["http", "https"])
}

pub fn validate_url_with_schemes(
    field_name: &str,
    url_str: &str,
    allowed_schemes: &[&str],
) -> Result<()> {
    if url_str.is_empty() {
        return Err(MailError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => {
            if allowed_schemes.contains(&url.scheme()) {
                Ok(())
            } else {
                Err(MailError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: url_str.to_string(),
                    reason: format!("Unsupported URL scheme: {}", url.scheme()),
                })
            }
        }
        Err(e) => Err(MailError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MailError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Exactly one of the two options may be set.
pub fn validate_exactly_one_of<A, B>(
    first_name: &str,
    first: &Option<A>,
    second_name: &str,
    second: &Option<B>,
) -> Result<()> {
    match (first, second) {
        (Some(_), Some(_)) => Err(MailError::ConfigError {
            message: format!("{} and {} are mutually exclusive", first_name, second_name),
        }),
        (None, None) => Err(MailError::ConfigError {
            message: format!("one of {} or {} is required", first_name, second_name),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("link", "https://example.com").is_ok());
        assert!(validate_url("link", "http://example.com").is_ok());
        assert!(validate_url("link", "").is_err());
        assert!(validate_url("link", "not-a-url").is_err());
        assert!(validate_url("link", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_url_with_schemes() {
        assert!(
            validate_url_with_schemes("proxy", "socks5://127.0.0.1:9050", &["http", "socks5"])
                .is_ok()
        );
        assert!(
            validate_url_with_schemes("proxy", "ftp://127.0.0.1", &["http", "socks5"]).is_err()
        );
    }

    #[test]
    fn test_validate_exactly_one_of() {
        let some = Some("x".to_string());
        let none: Option<String> = None;
        assert!(validate_exactly_one_of("--email", &some, "--targets", &none).is_ok());
        assert!(validate_exactly_one_of("--email", &none, "--targets", &some).is_ok());
        assert!(validate_exactly_one_of("--email", &some, "--targets", &some).is_err());
        assert!(validate_exactly_one_of("--email", &none, "--targets", &none).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("subject", "hello").is_ok());
        assert!(validate_non_empty_string("subject", "   ").is_err());
    }
}
