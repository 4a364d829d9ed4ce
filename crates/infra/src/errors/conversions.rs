//! Conversions from external infrastructure errors into domain errors.

use brief_domain::BriefError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub BriefError);

impl From<InfraError> for BriefError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<BriefError> for InfraError {
    fn from(value: BriefError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoBriefError {
    fn into_brief(self) -> BriefError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → BriefError */
/* -------------------------------------------------------------------------- */

impl IntoBriefError for HttpError {
    fn into_brief(self) -> BriefError {
        if self.is_timeout() {
            return BriefError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return BriefError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return BriefError::InvalidInput(format!("HTTP response body malformed: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => BriefError::Auth(message),
                404 => BriefError::NotFound(message),
                _ => BriefError::Upstream { status: code, body: message },
            };
        }

        BriefError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_brief())
    }
}

/// Map a non-success status and its body onto the domain error.
///
/// Auth failures and missing resources keep their own variants so callers
/// can tell an expired grant from an outage.
pub fn status_error(status: reqwest::StatusCode, body: String) -> BriefError {
    match status.as_u16() {
        401 | 403 => BriefError::Auth(format!("HTTP {}: {body}", status.as_u16())),
        404 => BriefError::NotFound(format!("HTTP 404: {body}")),
        code => BriefError::Upstream { status: code, body },
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
