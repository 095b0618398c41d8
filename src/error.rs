use std::collections::HashMap;
use thiserror::Error;

/// Failures of the filter relations engine
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelationsError {
    /// A traversed node matches none of the expected shapes
    #[error("Broken filter relations: unknown node type")]
    UnknownNodeType,

    #[error("Broken filter relations model: cascading filter not found for levels {levels:?}")]
    CascadingFilterNotFound { levels: Vec<String> },

    /// Wire relations reference a filter missing from both the filters and the highlights.
    /// Surfaced to end users, see [`RelationsError::translation_key`].
    #[error("Filter relations reference an unknown filter: {instance_id}")]
    UnknownFilterInRelations { instance_id: String },
}

impl RelationsError {
    /// Translation key for errors meant to be shown to end users
    pub fn translation_key(&self) -> Option<&'static str> {
        match self {
            RelationsError::UnknownFilterInRelations { .. } => {
                Some("errors.unknownFilterInFilterRelations")
            }
            _ => None,
        }
    }

    /// Interpolation values for the translated message
    pub fn translation_params(&self) -> HashMap<&'static str, String> {
        let mut params = HashMap::new();
        if let RelationsError::UnknownFilterInRelations { instance_id } = self {
            params.insert("filterGuid", instance_id.clone());
        }
        params
    }
}

pub type RelationsResult<T> = Result<T, RelationsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unknown_filter_is_translatable() {
        let err = RelationsError::UnknownFilterInRelations {
            instance_id: "f1".to_string(),
        };
        assert_eq!(
            err.translation_key(),
            Some("errors.unknownFilterInFilterRelations")
        );
        assert_eq!(err.translation_params().get("filterGuid"), Some(&"f1".to_string()));

        assert_eq!(RelationsError::UnknownNodeType.translation_key(), None);
        assert!(RelationsError::UnknownNodeType.translation_params().is_empty());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            RelationsError::UnknownNodeType.to_string(),
            "Broken filter relations: unknown node type"
        );
        let err = RelationsError::CascadingFilterNotFound {
            levels: vec!["a".to_string()],
        };
        assert!(err.to_string().contains("cascading filter not found"));
    }
}
