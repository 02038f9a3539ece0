//! Geocoding error types.

use thiserror::Error;

/// Errors that can occur while resolving a place name to coordinates.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The geocoding service answered with a non-success status.
    #[error("HTTP {status} from {source_name}: {message}")]
    Http {
        source_name: String,
        status: u16,
        message: String,
    },

    /// The geocoding service returned a rate-limit response.
    #[error("rate limited by {source_name}")]
    RateLimited { source_name: String },

    /// A response could not be interpreted.
    #[error("parse error from {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// An error propagated from `reqwest`.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a position outside the valid range.
    #[error(transparent)]
    InvalidCoordinate(#[from] reelmap_core::InvalidCoordinate),
}

impl GeocodeError {
    /// Returns `true` when the error is transient and the lookup may
    /// succeed if retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { status, .. } => *status >= 500,
            Self::RateLimited { .. } => true,
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            Self::Parse { .. } | Self::InvalidCoordinate(_) => false,
        }
    }
}

/// Convenience alias for geocoding results.
pub type GeocodeResult<T> = std::result::Result<T, GeocodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors() {
        let http = GeocodeError::Http {
            source_name: "nominatim".to_string(),
            status: 502,
            message: "Bad Gateway".to_string(),
        };
        let limited = GeocodeError::RateLimited {
            source_name: "nominatim".to_string(),
        };
        assert!(http.is_transient());
        assert!(limited.is_transient());
    }

    #[test]
    fn test_permanent_errors() {
        let parse = GeocodeError::Parse {
            source_name: "nominatim".to_string(),
            message: "bad lat".to_string(),
        };
        let coordinate = GeocodeError::from(reelmap_core::InvalidCoordinate {
            latitude: 91.0,
            longitude: 0.0,
        });
        let forbidden = GeocodeError::Http {
            source_name: "nominatim".to_string(),
            status: 403,
            message: "Forbidden".to_string(),
        };
        assert!(!parse.is_transient());
        assert!(!forbidden.is_transient());
        assert!(!coordinate.is_transient());
    }

    #[test]
    fn test_error_display() {
        let err = GeocodeError::RateLimited {
            source_name: "nominatim".to_string(),
        };
        assert_eq!(err.to_string(), "rate limited by nominatim");
    }
}
