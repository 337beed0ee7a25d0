use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const PORT_ENV: &str = "AGENTCORE_CHAT_PORT";
pub const AGENT_ENV: &str = "AGENTCORE_CHAT_AGENT";

const DEFAULT_CREDENTIAL_PROFILE: &str = "aws_standalone_app/AWS Admin Full Access";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialSettings {
    #[serde(default = "default_credential_program")]
    pub program: String,
    #[serde(default = "default_credential_args")]
    pub args: Vec<String>,
    #[serde(default = "default_credential_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    #[serde(default = "default_agent_program")]
    pub program: String,
    #[serde(default = "default_agent_args")]
    pub args: Vec<String>,
    #[serde(default = "default_agent_name")]
    pub name: String,
    #[serde(default = "default_agent_timeout_secs")]
    pub timeout_secs: u64,
    /// Exported to the agent process as `AWS_REGION` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub credentials: CredentialSettings,
    #[serde(default)]
    pub agent: AgentSettings,
}

impl Default for CredentialSettings {
    fn default() -> Self {
        Self {
            program: default_credential_program(),
            args: default_credential_args(),
            timeout_secs: default_credential_timeout_secs(),
        }
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            program: default_agent_program(),
            args: default_agent_args(),
            name: default_agent_name(),
            timeout_secs: default_agent_timeout_secs(),
            region: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            credentials: CredentialSettings::default(),
            agent: AgentSettings::default(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_credential_program() -> String {
    "pybritive".to_string()
}

fn default_credential_args() -> Vec<String> {
    vec![
        "checkout".to_string(),
        DEFAULT_CREDENTIAL_PROFILE.to_string(),
        "-t".to_string(),
        "agentic-ai".to_string(),
    ]
}

fn default_credential_timeout_secs() -> u64 {
    30
}

fn default_agent_program() -> String {
    "agentcore".to_string()
}

fn default_agent_args() -> Vec<String> {
    vec!["invoke".to_string()]
}

fn default_agent_name() -> String {
    "async_shopping_strands".to_string()
}

fn default_agent_timeout_secs() -> u64 {
    60
}

pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Cannot resolve home directory")?;
    Ok(home.join(".agentcore-chat"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn load_config_or_default() -> Result<Config> {
    let path = config_path()?;
    let mut cfg = if path.exists() {
        load_config_from(&path)?
    } else {
        let cfg = Config::default();
        save_config_to(&path, &cfg)?;
        cfg
    };
    apply_overrides(&mut cfg, |key| env::var(key).ok());
    Ok(cfg)
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Invalid config: {}", path.display()))
}

pub fn save_config(cfg: &Config) -> Result<()> {
    save_config_to(&config_path()?, cfg)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    let text = toml::to_string_pretty(cfg)?;
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Environment values win over the file. An unparsable port is ignored with a warning.
pub fn apply_overrides(cfg: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup(PORT_ENV) {
        match v.trim().parse::<u16>() {
            Ok(port) => cfg.port = port,
            Err(_) => warn!(value = %v, "ignoring invalid {}", PORT_ENV),
        }
    }
    if let Some(v) = lookup(AGENT_ENV)
        && !v.trim().is_empty()
    {
        cfg.agent.name = v.trim().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.port = 8080;
        cfg.agent.region = Some("us-west-2".to_string());
        save_config_to(&path, &cfg).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.port, 8080);
        assert_eq!(loaded.agent.region.as_deref(), Some("us-west-2"));
        assert_eq!(loaded.credentials.args, default_credential_args());
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "port = 9000\n[agent]\nname = \"other_agent\"\n").unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.agent.name, "other_agent");
        assert_eq!(cfg.agent.program, "agentcore");
        assert_eq!(cfg.agent.timeout_secs, 60);
        assert_eq!(cfg.credentials.timeout_secs, 30);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "port = \"not a number\"").unwrap();
        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn env_overrides() {
        let mut cfg = Config::default();
        apply_overrides(&mut cfg, |key| match key {
            PORT_ENV => Some("7070".to_string()),
            AGENT_ENV => Some(" gift_finder ".to_string()),
            _ => None,
        });
        assert_eq!(cfg.port, 7070);
        assert_eq!(cfg.agent.name, "gift_finder");

        apply_overrides(&mut cfg, |key| (key == PORT_ENV).then(|| "http".to_string()));
        assert_eq!(cfg.port, 7070);
    }
}
