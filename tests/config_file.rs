use std::collections::HashMap;
use std::fs;
use std::time::Duration;

use tempfile::TempDir;
use toolsession::config::{Config, FileConfig};

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn test_defaults_without_file_or_env() {
    let config = Config::from_sources(FileConfig::default(), no_env, false).unwrap();

    assert!(config.slides.url.ends_with(":3000/mcp"));
    assert_eq!(config.slides.timeout, Duration::from_secs(60));
    assert_eq!(config.slides.handshake_timeout, Duration::from_secs(30));
    assert!(config.slides.timeout_overrides.is_empty());

    assert_eq!(
        config.github_server.timeout_overrides.get("create_branch"),
        Some(&Duration::from_secs(120))
    );
    assert_eq!(config.github.repo, "gen-ai-demo");
    assert_eq!(config.github.base_branch, "main");
    assert!(config.github.owner.is_none());
    assert_eq!(config.llm.base_url, "http://localhost:11434");
    assert!(!config.verbose);
}

#[test]
fn test_load_yaml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(
        &path,
        r#"
servers:
  slides:
    url: http://slides.internal:3000/mcp
    timeout_secs: 15
    timeout_overrides:
      batch_update_presentation: 90
github:
  owner: octo
  repo: events
verbose: true
"#,
    )
    .unwrap();

    let file = FileConfig::load_from(&path).unwrap();
    let config = Config::from_sources(file, no_env, false).unwrap();

    assert_eq!(config.slides.url, "http://slides.internal:3000/mcp");
    assert_eq!(config.slides.timeout, Duration::from_secs(15));
    assert_eq!(
        config.slides.timeout_overrides.get("batch_update_presentation"),
        Some(&Duration::from_secs(90))
    );
    assert_eq!(config.github.owner.as_deref(), Some("octo"));
    assert_eq!(config.github.repo, "events");
    assert_eq!(config.github.base_branch, "main");
    assert!(config.verbose);

    let options = config.slides.client_options();
    assert_eq!(options.default_timeout, Duration::from_secs(15));
    assert_eq!(options.client_info.name, config.slides.client_name);
}

#[test]
fn test_load_json_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"servers": {"github": {"url": "https://gh.example.com/mcp", "client_name": "events-bot"}}}"#,
    )
    .unwrap();

    let file = FileConfig::load_from(&path).unwrap();
    let config = Config::from_sources(file, no_env, false).unwrap();
    assert_eq!(config.github_server.url, "https://gh.example.com/mcp");
    assert_eq!(config.github_server.client_name, "events-bot");
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "servers: [not, a, map").unwrap();

    let err = FileConfig::load_from(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse YAML config file"));
}

#[test]
fn test_environment_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(
        &path,
        "servers:\n  slides:\n    url: http://from-file:3000/mcp\ngithub:\n  owner: file-owner\n",
    )
    .unwrap();

    let env: HashMap<&str, &str> = HashMap::from([
        ("MCP_SERVER_URL", "http://from-env:3000/mcp"),
        ("GITHUB_OWNER", "env-owner"),
        ("OLLAMA_MODEL", "qwen2.5"),
        ("TOOLSESSION_VERBOSE", "1"),
    ]);
    let file = FileConfig::load_from(&path).unwrap();
    let config = Config::from_sources(file, |key| env.get(key).map(|v| v.to_string()), false).unwrap();

    assert_eq!(config.slides.url, "http://from-env:3000/mcp");
    assert_eq!(config.github.owner.as_deref(), Some("env-owner"));
    assert_eq!(config.llm.model, "qwen2.5");
    assert!(config.verbose);
}

#[test]
fn test_invalid_url_is_rejected() {
    let env = |key: &str| (key == "GITHUB_MCP_SERVER_URL").then(|| "ftp://nowhere".to_string());
    let err = Config::from_sources(FileConfig::default(), env, false).unwrap_err();
    assert!(format!("{:#}", err).contains("GitHub server"));
}

#[test]
fn test_url_override_is_validated() {
    let config = Config::from_sources(FileConfig::default(), no_env, false).unwrap();

    let server = config
        .slides
        .clone()
        .with_url_override(Some("http://localhost:3000/mcp"))
        .unwrap();
    assert_eq!(server.url, "http://localhost:3000/mcp");

    let unchanged = config.slides.clone().with_url_override(None).unwrap();
    assert_eq!(unchanged.url, config.slides.url);

    let err = config
        .slides
        .clone()
        .with_url_override(Some("localhost:3000/mcp"))
        .unwrap_err();
    assert!(err.to_string().contains("invalid --url"));
}
