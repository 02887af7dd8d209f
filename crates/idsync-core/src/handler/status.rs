//! Uniform status code taxonomy for all remote operations

use crate::error::{Result, SyncError};

/// Classified response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    /// 200
    Ok,
    /// 201
    Created,
    /// 204
    NoContent,
    /// 400
    BadRequest,
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 409
    Conflict,
    /// 500
    ServerError,
    /// Anything else
    Unexpected(u16),
}

impl ApiStatus {
    /// Classify a raw status code
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        match code {
            200 => Self::Ok,
            201 => Self::Created,
            204 => Self::NoContent,
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            500 => Self::ServerError,
            other => Self::Unexpected(other),
        }
    }

    /// Whether the operation succeeded
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Ok | Self::Created | Self::NoContent)
    }

    /// Convert a failure status into the matching error for `resource`
    ///
    /// # Errors
    ///
    /// Returns the classified `SyncError` for every non-success status.
    pub fn into_result(self, resource: &str) -> Result<()> {
        let resource = resource.to_string();
        match self {
            Self::Ok | Self::Created | Self::NoContent => Ok(()),
            Self::BadRequest => Err(SyncError::BadRequest { resource }),
            Self::Unauthorized => Err(SyncError::Auth {
                resource,
                status: 401,
            }),
            Self::Forbidden => Err(SyncError::Auth {
                resource,
                status: 403,
            }),
            Self::NotFound => Err(SyncError::NotFound { resource }),
            Self::Conflict => Err(SyncError::Conflict { resource }),
            Self::ServerError => Err(SyncError::Server { resource }),
            Self::Unexpected(status) => Err(SyncError::UnexpectedStatus { resource, status }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_codes() {
        for code in [200, 201, 204] {
            let status = ApiStatus::from_code(code);
            assert!(status.is_success());
            assert!(status.into_result("X").is_ok());
        }
        assert!(!ApiStatus::from_code(202).is_success());
    }

    #[test]
    fn test_failure_classification() {
        assert!(ApiStatus::from_code(401).into_result("A").unwrap_err().is_auth());
        assert!(ApiStatus::from_code(403).into_result("A").unwrap_err().is_auth());
        assert!(ApiStatus::from_code(409).into_result("A").unwrap_err().is_conflict());
        assert!(matches!(
            ApiStatus::from_code(404).into_result("A"),
            Err(SyncError::NotFound { .. })
        ));
        assert!(matches!(
            ApiStatus::from_code(400).into_result("A"),
            Err(SyncError::BadRequest { .. })
        ));
        assert!(matches!(
            ApiStatus::from_code(500).into_result("A"),
            Err(SyncError::Server { .. })
        ));
        assert!(matches!(
            ApiStatus::from_code(418).into_result("A"),
            Err(SyncError::UnexpectedStatus { status: 418, .. })
        ));
    }
}
