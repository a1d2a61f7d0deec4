use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::builds::BuildFilter;

/// Configuration file structure for BuildLens.
///
/// Allows users to save common feed settings and reuse them across runs.
/// Configuration files are loaded from the current directory or specified path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Builds API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// GitHub enrichment settings
    #[serde(default)]
    pub github: GitHubConfig,

    /// Output format preferences
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApiConfig {
    /// Builds API root
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    /// Bearer token for the builds API
    pub token: Option<String>,

    /// Number of builds requested per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Which builds to list
    #[serde(default)]
    pub filter: BuildFilter,

    /// User whose builds are listed
    #[serde(default = "default_user_id")]
    pub user_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GitHubConfig {
    /// GitHub API base URL
    #[serde(default = "default_github_base_url")]
    pub base_url: String,

    /// GitHub personal access token
    pub token: Option<String>,

    /// Look up missing avatars and display names
    #[serde(default = "default_enrich")]
    pub enrich: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Summary,
    Json,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            token: None,
            page_size: default_page_size(),
            filter: BuildFilter::default(),
            user_id: default_user_id(),
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            base_url: default_github_base_url(),
            token: None,
            enrich: default_enrich(),
        }
    }
}

fn default_api_base_url() -> String {
    "http://localhost:6500/api".to_string()
}

fn default_github_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_page_size() -> usize {
    5
}

fn default_user_id() -> u64 {
    1
}

fn default_enrich() -> bool {
    true
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./buildlens.toml
    /// 3. ./buildlens.json
    /// 4. ./buildlens.yaml
    /// 5. ./buildlens.yml
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let candidates = ["buildlens.toml", "buildlens.json", "buildlens.yaml", "buildlens.yml"];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => toml::from_str(&contents)
                .or_else(|_| serde_json::from_str(&contents))
                .or_else(|_| serde_yaml::from_str(&contents))
                .with_context(|| format!("Failed to parse config file: {}", path.display())),
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("yaml") | Some("yml") => serde_yaml::to_string(self)?,
            _ => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}
