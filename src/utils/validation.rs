//! Input validation for user-supplied configuration and search bounds.

use crate::error::CliError;

/// Validate that a URL is properly formatted
pub fn validate_url(url: &str) -> crate::Result<()> {
    if url.is_empty() {
        return Err(CliError::InvalidArguments("URL cannot be empty".to_string()).into());
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(CliError::InvalidArguments(format!(
            "Invalid URL '{}': URL must start with http:// or https://",
            url
        ))
        .into());
    }

    Ok(())
}

/// Validate a date bound in YYYY-MM-DD format
pub fn validate_date(date: &str, flag: &str) -> crate::Result<()> {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
        CliError::InvalidArguments(format!(
            "Invalid {} date '{}': expected YYYY-MM-DD",
            flag, date
        ))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_accepts_valid_urls() {
        assert!(validate_url("http://localhost/api/http.php").is_ok());
        assert!(validate_url("https://helpdesk.example.com").is_ok());
    }

    #[test]
    fn test_validate_url_rejects_invalid_urls() {
        assert!(validate_url("").is_err());
        assert!(validate_url("helpdesk.example.com").is_err());
        assert!(validate_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_date_accepts_iso_dates() {
        assert!(validate_date("2024-01-15", "--from").is_ok());
        assert!(validate_date("1999-12-31", "--to").is_ok());
    }

    #[test]
    fn test_validate_date_rejects_other_formats() {
        assert!(validate_date("15/01/2024", "--from").is_err());
        assert!(validate_date("2024-13-01", "--from").is_err());
        assert!(validate_date("yesterday", "--to").is_err());
    }
}
