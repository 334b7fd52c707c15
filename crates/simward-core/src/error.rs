use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token is malformed")]
    MalformedToken,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Session expired - please log in again")]
    SessionExpired,

    #[error("Credential exchange failed: {0}")]
    ExchangeFailed(String),

    #[error("Identity provider unavailable")]
    ProviderUnavailable,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl AuthError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }

        // Back the cut up to a char boundary so a multibyte body
        // cannot panic the error path.
        let mut cut = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }

        format!(
            "{}... (truncated, {} total bytes)",
            &body[..cut],
            body.len()
        )
    }

    pub(crate) fn exchange_failed(status: reqwest::StatusCode, body: &str) -> Self {
        AuthError::ExchangeFailed(format!("Status {}: {}", status, Self::truncate_body(body)))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_body_leaves_short_bodies_alone() {
        assert_eq!(AuthError::truncate_body("short"), "short");
    }

    #[test]
    fn test_truncate_body_reports_total_length() {
        let body = "x".repeat(600);
        let truncated = AuthError::truncate_body(&body);
        assert!(truncated.starts_with(&"x".repeat(500)));
        assert!(truncated.ends_with("(truncated, 600 total bytes)"));
    }

    #[test]
    fn test_truncate_body_cuts_multibyte_bodies_on_a_char_boundary() {
        // 200 euro signs = 600 bytes; byte 500 lands inside one.
        let body = "€".repeat(200);
        let truncated = AuthError::truncate_body(&body);
        assert!(truncated.ends_with("(truncated, 600 total bytes)"));
        // 498 bytes = 166 whole chars survive the cut.
        assert!(truncated.starts_with(&"€".repeat(166)));
    }

    #[test]
    fn test_exchange_failed_with_multibyte_body() {
        let body = "€".repeat(200);
        let error = AuthError::exchange_failed(reqwest::StatusCode::FORBIDDEN, &body);
        assert!(matches!(error, AuthError::ExchangeFailed(_)));
    }
}
