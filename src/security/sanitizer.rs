//! Log sanitization for credentials and personal data
//!
//! Bearer tokens and email addresses pass through here before they are
//! written to a log line.

use thiserror::Error;

/// Errors raised by [`Sanitizer::validate_input`]
#[derive(Debug, Error, PartialEq)]
pub enum SanitizerError {
    #[error("Invalid input: contains dangerous characters")]
    InvalidInput,

    #[error("Input cannot be empty")]
    EmptyInput,

    #[error("Input exceeds maximum length of {0}")]
    TooLong(usize),
}

/// Static helpers for masking sensitive values
pub struct Sanitizer;

impl Sanitizer {
    /// Masks the local part of an email address
    ///
    /// ```
    /// use retrader_lib::security::Sanitizer;
    ///
    /// assert_eq!(Sanitizer::sanitize_email("trader@retrader.io"), "tr...@retrader.io");
    /// assert_eq!(Sanitizer::sanitize_email("a@b.com"), "***@b.com");
    /// assert_eq!(Sanitizer::sanitize_email("nobody"), "***");
    /// ```
    pub fn sanitize_email(email: &str) -> String {
        match email.split_once('@') {
            Some((local, domain)) if local.chars().count() > 2 => {
                let head: String = local.chars().take(2).collect();
                format!("{}...@{}", head, domain)
            }
            Some((_, domain)) => format!("***@{}", domain),
            None => "***".to_string(),
        }
    }

    /// Keeps only the last four characters of a token
    ///
    /// ```
    /// use retrader_lib::security::Sanitizer;
    ///
    /// assert_eq!(Sanitizer::sanitize_token("eyJhbGciOiJIUzI1NiJ9.x.sig1234"), "***1234");
    /// assert_eq!(Sanitizer::sanitize_token("abcd"), "****");
    /// ```
    pub fn sanitize_token(token: &str) -> String {
        let count = token.chars().count();
        if count > 4 {
            let tail: String = token.chars().skip(count - 4).collect();
            format!("***{}", tail)
        } else {
            "****".to_string()
        }
    }

    /// Drops query string and fragment from a URL
    ///
    /// ```
    /// use retrader_lib::security::Sanitizer;
    ///
    /// assert_eq!(
    ///     Sanitizer::sanitize_url("https://checkout.stripe.com/c/pay?session=cs_live#frag"),
    ///     "https://checkout.stripe.com/c/pay"
    /// );
    /// ```
    pub fn sanitize_url(url: &str) -> String {
        let end = url.find(['?', '#']).unwrap_or(url.len());
        url[..end].to_string()
    }

    /// Rejects markup, NUL and control characters
    pub fn validate_input(input: &str) -> Result<(), SanitizerError> {
        if input.is_empty() {
            return Err(SanitizerError::EmptyInput);
        }

        let dangerous = ['<', '>', '"', '\'', '&', '\0'];
        if input
            .chars()
            .any(|c| dangerous.contains(&c) || (c.is_control() && !matches!(c, '\t' | '\n' | '\r')))
        {
            return Err(SanitizerError::InvalidInput);
        }

        Ok(())
    }

    /// [`validate_input`](Self::validate_input) with a character limit
    pub fn validate_input_with_max_length(
        input: &str,
        max_length: usize,
    ) -> Result<(), SanitizerError> {
        if input.chars().count() > max_length {
            return Err(SanitizerError::TooLong(max_length));
        }
        Self::validate_input(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_email() {
        assert_eq!(
            Sanitizer::sanitize_email("john.doe@example.com"),
            "jo...@example.com"
        );
        assert_eq!(Sanitizer::sanitize_email("ab@domain.org"), "***@domain.org");
        assert_eq!(Sanitizer::sanitize_email(""), "***");
    }

    #[test]
    fn test_sanitize_token() {
        assert_eq!(Sanitizer::sanitize_token("abcde"), "***bcde");
        assert_eq!(Sanitizer::sanitize_token("abc"), "****");
        // multi-byte characters must not split
        assert_eq!(Sanitizer::sanitize_token("توکن-رمز"), "***-رمز");
    }

    #[test]
    fn test_sanitize_url() {
        assert_eq!(
            Sanitizer::sanitize_url("http://localhost:3001/users?page=2"),
            "http://localhost:3001/users"
        );
        assert_eq!(
            Sanitizer::sanitize_url("http://localhost:3001/plans"),
            "http://localhost:3001/plans"
        );
    }

    #[test]
    fn test_validate_input() {
        assert!(Sanitizer::validate_input("trader_01").is_ok());
        assert_eq!(Sanitizer::validate_input(""), Err(SanitizerError::EmptyInput));
        assert_eq!(
            Sanitizer::validate_input("<script>"),
            Err(SanitizerError::InvalidInput)
        );
        assert_eq!(
            Sanitizer::validate_input("bell\x07"),
            Err(SanitizerError::InvalidInput)
        );
    }

    #[test]
    fn test_validate_input_with_max_length() {
        assert!(Sanitizer::validate_input_with_max_length("short", 10).is_ok());
        assert_eq!(
            Sanitizer::validate_input_with_max_length("this is too long", 5),
            Err(SanitizerError::TooLong(5))
        );
    }
}
