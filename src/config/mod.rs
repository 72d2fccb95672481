pub mod defaults;
mod servers;
mod validation;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use servers::{ServerConfig, ServerSettings, ServersConfig};
pub use validation::{expand_env_var_in_string, expand_with, validate_endpoint};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LlmSettings {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GithubSettings {
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default = "defaults::default_repo")]
    pub repo: String,
    #[serde(default = "defaults::default_base_branch")]
    pub base_branch: String,
    #[serde(default = "defaults::default_branch_retries")]
    pub branch_retries: u32,
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            owner: None,
            repo: defaults::default_repo(),
            base_branch: defaults::default_base_branch(),
            branch_retries: defaults::default_branch_retries(),
        }
    }
}

/// Contents of `.toolsession.yaml` (or `.json`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub servers: ServersConfig,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub github: GithubSettings,
    #[serde(default)]
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub slides: ServerConfig,
    pub github_server: ServerConfig,
    pub llm: LlmConfig,
    pub github: GithubSettings,
    pub verbose: bool,
}

impl Config {
    /// CLI flag > environment > config file > default.
    pub fn load(verbose_flag: bool) -> Result<Self> {
        let file = FileConfig::load()?;
        Self::from_sources(file, |key| env::var(key).ok(), verbose_flag)
    }

    pub fn from_sources<F>(file: FileConfig, env_lookup: F, verbose_flag: bool) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let slides = resolve_server(
            &file.servers.slides,
            env_lookup("MCP_SERVER_URL"),
            defaults::SLIDES_SERVER_URL,
            defaults::SLIDES_CLIENT_NAME,
            &[],
        )
        .context("invalid slides server configuration")?;

        let github_server = resolve_server(
            &file.servers.github,
            env_lookup("GITHUB_MCP_SERVER_URL"),
            defaults::GITHUB_SERVER_URL,
            defaults::GITHUB_CLIENT_NAME,
            defaults::github_slow_tools(),
        )
        .context("invalid GitHub server configuration")?;

        let llm = LlmConfig {
            base_url: env_lookup("OLLAMA_BASE_URL")
                .or(file.llm.base_url.clone())
                .map(|u| expand_env_var_in_string(&u))
                .unwrap_or_else(|| defaults::LLM_BASE_URL.to_string()),
            model: env_lookup("OLLAMA_MODEL")
                .or(file.llm.model.clone())
                .unwrap_or_else(|| defaults::LLM_MODEL.to_string()),
        };

        let mut github = file.github.clone();
        if let Some(owner) = env_lookup("GITHUB_OWNER") {
            github.owner = Some(owner);
        }
        if let Some(repo) = env_lookup("GITHUB_REPO") {
            github.repo = repo;
        }

        let verbose = verbose_flag
            || env_lookup("TOOLSESSION_VERBOSE")
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .or(file.verbose)
                .unwrap_or(false);

        Ok(Config {
            slides,
            github_server,
            llm,
            github,
            verbose,
        })
    }
}

fn resolve_server(
    settings: &ServerSettings,
    env_url: Option<String>,
    default_url: &str,
    default_client_name: &str,
    slow_tools: &[&str],
) -> Result<ServerConfig> {
    let url = env_url
        .or(settings.url.clone())
        .map(|u| expand_env_var_in_string(&u))
        .unwrap_or_else(|| default_url.to_string());
    if let Err(e) = validate_endpoint(&url) {
        bail!(e);
    }

    let mut timeout_overrides: HashMap<String, Duration> = slow_tools
        .iter()
        .map(|name| {
            (
                name.to_string(),
                Duration::from_secs(defaults::default_slow_tool_timeout_secs()),
            )
        })
        .collect();
    for (name, secs) in &settings.timeout_overrides {
        timeout_overrides.insert(name.clone(), Duration::from_secs(*secs));
    }

    Ok(ServerConfig {
        url,
        timeout: Duration::from_secs(
            settings
                .timeout_secs
                .unwrap_or_else(defaults::default_tool_timeout_secs),
        ),
        handshake_timeout: Duration::from_secs(
            settings
                .handshake_timeout_secs
                .unwrap_or_else(defaults::default_handshake_timeout_secs),
        ),
        timeout_overrides,
        client_name: settings
            .client_name
            .clone()
            .unwrap_or_else(|| default_client_name.to_string()),
    })
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(FileConfig::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let ext = path.extension().and_then(|s| s.to_str());
        let config = if ext == Some("yaml") || ext == Some("yml") {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))?
        };
        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".toolsession.yaml"),
            PathBuf::from(".toolsession.yml"),
            PathBuf::from(".toolsession.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            let dir = home_dir.join(".config").join("toolsession");
            paths.push(dir.join("config.yaml"));
            paths.push(dir.join("config.yml"));
            paths.push(dir.join("config.json"));
        }

        paths
    }
}
