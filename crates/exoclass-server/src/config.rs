use std::path::PathBuf;

use exoclass_ai::default_search_paths;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";

/// Runtime configuration for the HTTP service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `0.0.0.0:8000`.
    pub listen_addr: String,
    /// Ordered model search list; the first existing file is loaded.
    pub model_paths: Vec<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            model_paths: default_search_paths(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.listen_addr, "0.0.0.0:8000");
        assert_eq!(
            config.model_paths[0],
            PathBuf::from("models/best_koi_reduced_rf.json")
        );
        assert_eq!(config.model_paths.len(), 4);
    }

    #[test]
    fn partial_document_fills_defaults() {
        let text = r#"{"model_paths": ["/srv/model.json"]}"#;
        let config: ServerConfig = serde_json::from_str(text).unwrap();
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
        assert_eq!(config.model_paths, vec![PathBuf::from("/srv/model.json")]);
    }
}
