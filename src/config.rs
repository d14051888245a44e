use std::collections::HashMap;

/// Settings shared by both conversion directions.
///
/// Defaults for project/region/zone follow the same environment variables the
/// Google provider recognizes; resolution happens at the CLI boundary so the
/// core pipeline never reads the environment itself.
#[derive(Debug, Clone, Default)]
pub struct ConvertConfig {
    /// When set, no network calls are made. Ancestry resolution relies
    /// entirely on the pre-seeded cache.
    pub offline: bool,

    /// Default project for resources that do not set one explicitly
    pub project: String,

    /// Default region
    pub region: String,

    /// Default zone
    pub zone: String,

    /// User agent sent on resource manager API requests
    pub user_agent: String,

    /// Pre-seeded ancestry entries: `projects/123` -> ancestry path
    pub ancestry_cache: HashMap<String, String>,

    /// Convert resources whose planned action is a no-op
    pub convert_unchanged: bool,
}

impl ConvertConfig {
    pub fn new() -> Self {
        Self {
            user_agent: default_user_agent(),
            ..Self::default()
        }
    }

    /// Offline configuration with an optional ancestry pre-seed
    pub fn offline_with_cache(ancestry_cache: HashMap<String, String>) -> Self {
        Self {
            offline: true,
            ancestry_cache,
            ..Self::new()
        }
    }
}

pub fn default_user_agent() -> String {
    format!("caiconv/{}", env!("CARGO_PKG_VERSION"))
}

/// Secondary project env vars the Google provider recognizes, consulted when
/// neither --project nor GOOGLE_PROJECT is set
pub fn fallback_project() -> String {
    for var in ["GOOGLE_CLOUD_PROJECT", "GCLOUD_PROJECT"] {
        if let Ok(value) = std::env::var(var) {
            if !value.is_empty() {
                return value;
            }
        }
    }
    String::new()
}

/// Parse a repeatable `key=ancestry-path` CLI argument
pub fn parse_cache_entry(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, path)) if !key.is_empty() && !path.is_empty() => {
            Ok((key.to_string(), path.to_string()))
        }
        _ => Err(format!(
            "expected <key>=<ancestry-path>, got '{}' (example: projects/123=organizations/1/folders/2)",
            raw
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cache_entry() {
        let (key, path) = parse_cache_entry("projects/123=organizations/1/folders/2").unwrap();
        assert_eq!(key, "projects/123");
        assert_eq!(path, "organizations/1/folders/2");
    }

    #[test]
    fn test_parse_cache_entry_rejects_missing_path() {
        assert!(parse_cache_entry("projects/123").is_err());
        assert!(parse_cache_entry("=organizations/1").is_err());
        assert!(parse_cache_entry("projects/123=").is_err());
    }

    #[test]
    fn test_offline_config() {
        let cfg = ConvertConfig::offline_with_cache(HashMap::new());
        assert!(cfg.offline);
        assert!(cfg.user_agent.starts_with("caiconv/"));
    }
}
