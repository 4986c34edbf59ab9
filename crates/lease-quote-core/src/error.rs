use thiserror::Error;

#[derive(Debug, Error)]
pub enum LeaseQuoteError {
    /// Malformed or out-of-domain input. The caller should fix `field`.
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    /// Well-formed input with no finite positive solution. The caller should
    /// adjust the combination of parameters rather than a single field.
    #[error("Computation error: {0}")]
    Computation(String),

    /// The offer document collaborator was unreachable or rejected the payload.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LeaseQuoteError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        LeaseQuoteError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, LeaseQuoteError::InvalidInput { .. })
    }

    pub fn is_computation(&self) -> bool {
        matches!(self, LeaseQuoteError::Computation(_))
    }

    /// Stable machine-readable code used by the HTTP and binding layers.
    pub fn code(&self) -> &'static str {
        match self {
            LeaseQuoteError::InvalidInput { .. } => "VALIDATION_ERROR",
            LeaseQuoteError::Computation(_) => "COMPUTATION_ERROR",
            LeaseQuoteError::Upstream(_) => "UPSTREAM_ERROR",
            LeaseQuoteError::SerializationError(_) => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for LeaseQuoteError {
    fn from(e: serde_json::Error) -> Self {
        LeaseQuoteError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_distinguish_classes() {
        let v = LeaseQuoteError::invalid("term_months", "must be > 0");
        let c = LeaseQuoteError::Computation("principal is not positive".into());
        assert!(v.is_validation());
        assert!(!v.is_computation());
        assert!(c.is_computation());
        assert_eq!(v.code(), "VALIDATION_ERROR");
        assert_eq!(c.code(), "COMPUTATION_ERROR");
        assert_eq!(
            LeaseQuoteError::Upstream("503".into()).code(),
            "UPSTREAM_ERROR"
        );
    }

    #[test]
    fn test_display_includes_field() {
        let e = LeaseQuoteError::invalid("vehicle_value", "must be positive");
        assert_eq!(
            e.to_string(),
            "Invalid input: vehicle_value — must be positive"
        );
    }
}
