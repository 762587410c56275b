use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:50050";
pub const DEFAULT_ORGANIZATION_NAME: &str = "Park";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Settings for one import run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// Base URL of the resource API, without trailing slash
    pub api_base_url: String,
    /// Name the owning organization is looked up by (substring match)
    pub organization_name: String,
    /// Feature collection file to import
    pub input_path: Option<PathBuf>,
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            organization_name: DEFAULT_ORGANIZATION_NAME.to_string(),
            input_path: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ImportConfig {
    pub fn new(api_base_url: &str, organization_name: &str) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            organization_name: organization_name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_input_path(mut self, input_path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(input_path.into());
        self
    }

    pub fn with_log_level(mut self, log_level: &str) -> Self {
        self.log_level = log_level.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ImportConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:50050");
        assert_eq!(config.organization_name, "Park");
        assert_eq!(config.input_path, None);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_builder() {
        let config = ImportConfig::new("http://api.example.org:8080/", "State Parks")
            .with_input_path("data/tmk.geojson")
            .with_log_level("debug");

        assert_eq!(config.api_base_url, "http://api.example.org:8080");
        assert_eq!(config.organization_name, "State Parks");
        assert_eq!(config.input_path, Some(PathBuf::from("data/tmk.geojson")));
        assert_eq!(config.log_level, "debug");
    }
}
