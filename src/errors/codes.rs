use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Error codes for structured API responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ErrorCode {
    /// Malformed request or invalid argument
    #[serde(rename = "BAD")]
    Bad,

    /// User-level domain error
    #[serde(rename = "USER-EX")]
    UserEx,

    /// Anything the service could not classify
    #[serde(rename = "EX")]
    Ex,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bad => write!(f, "BAD"),
            Self::UserEx => write!(f, "USER-EX"),
            Self::Ex => write!(f, "EX"),
        }
    }
}

impl ErrorCode {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Bad => 400,
            Self::UserEx => 400,
            Self::Ex => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_wire_value() {
        for code in [ErrorCode::Bad, ErrorCode::UserEx, ErrorCode::Ex] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code));
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorCode::Bad.status_code(), 400);
        assert_eq!(ErrorCode::UserEx.status_code(), 400);
        assert_eq!(ErrorCode::Ex.status_code(), 500);
    }
}
