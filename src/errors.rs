use std::fmt;

/// Error types for asset/resource conversion operations
#[derive(Debug)]
pub enum ConvertError {
    /// Asset carries no resource data where the converter requires it
    MissingResourceData {
        asset_type: String,
        name: String,
    },

    /// An ambiguous asset type matched none of its disambiguation rules.
    /// This means the rule table is incomplete and is always fatal.
    UnmatchedDisambiguation {
        asset_type: String,
        name: String,
    },

    /// A resource record is missing or has an invalid required field
    MalformedRecord {
        address: String,
        message: String,
    },

    /// The caller lacks permission on a hierarchy resource
    PermissionDenied {
        resource: String,
    },

    /// A hierarchy resource does not exist
    HierarchyNotFound {
        resource: String,
    },

    /// Resource manager API request failed
    HierarchyApi(String),

    /// Ancestry lookup needs the API but no client is available (offline mode)
    AncestryUnavailable {
        key: String,
    },

    /// A pre-seeded ancestry path could not be parsed
    InvalidAncestryPath {
        path: String,
        message: String,
    },

    /// Serialization error
    Serialization(String),

    /// General I/O error
    Io(std::io::Error),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::MissingResourceData { asset_type, name } => {
                write!(f, "asset {} ({}) has no resource data", name, asset_type)
            }
            ConvertError::UnmatchedDisambiguation { asset_type, name } => {
                write!(
                    f,
                    "no disambiguation rule matched asset {} of ambiguous type {}",
                    name, asset_type
                )
            }
            ConvertError::MalformedRecord { address, message } => {
                write!(f, "malformed resource {}: {}", address, message)
            }
            ConvertError::PermissionDenied { resource } => {
                write!(
                    f,
                    "user does not have the correct permissions for {}",
                    resource
                )
            }
            ConvertError::HierarchyNotFound { resource } => {
                write!(f, "hierarchy resource not found: {}", resource)
            }
            ConvertError::HierarchyApi(msg) => {
                write!(f, "resource manager API error: {}", msg)
            }
            ConvertError::AncestryUnavailable { key } => {
                write!(
                    f,
                    "a resource manager client is required to fetch ancestry for {} from the API",
                    key
                )
            }
            ConvertError::InvalidAncestryPath { path, message } => {
                write!(f, "invalid ancestry path '{}': {}", path, message)
            }
            ConvertError::Serialization(msg) => {
                write!(f, "serialization error: {}", msg)
            }
            ConvertError::Io(err) => {
                write!(f, "I/O error: {}", err)
            }
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        ConvertError::Io(err)
    }
}

impl From<serde_json::Error> for ConvertError {
    fn from(err: serde_json::Error) -> Self {
        ConvertError::Serialization(err.to_string())
    }
}

/// Result type for conversion operations
pub type ConvertResult<T> = Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_resource_identity() {
        let err = ConvertError::UnmatchedDisambiguation {
            asset_type: "compute.googleapis.com/Autoscaler".to_string(),
            name: "//compute.googleapis.com/projects/p/autoscalers/a".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("compute.googleapis.com/Autoscaler"));
        assert!(msg.contains("autoscalers/a"));
    }

    #[test]
    fn test_malformed_record_names_the_address() {
        let err = ConvertError::MalformedRecord {
            address: "google_project.demo".to_string(),
            message: "missing project_id".to_string(),
        };
        assert!(err.to_string().contains("google_project.demo"));
    }
}
