// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use octofit_api::{DEFAULT_BASE_URL, DEFAULT_PLATFORM_DOMAIN, resolve_base_url};
use octofit_app::ResourceKind;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub const APP_NAME: &str = "octofit";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_TIMEOUT: &str = "10s";
const DEFAULT_LOG_LEVEL: &str = "info";
const CONFIG_PATH_ENV: &str = "OCTOFIT_CONFIG_PATH";
const API_URL_ENV: &str = "OCTOFIT_API_URL";
const DEPLOYMENT_ENVS: [&str; 2] = ["OCTOFIT_CODESPACE_NAME", "CODESPACE_NAME"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub logging: Logging,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            api: Api::default(),
            ui: Ui::default(),
            logging: Logging::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    pub base_url: Option<String>,
    pub codespace_name: Option<String>,
    pub platform_domain: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            base_url: None,
            codespace_name: None,
            platform_domain: Some(DEFAULT_PLATFORM_DOMAIN.to_owned()),
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub start_tab: Option<String>,
    pub show_home: Option<bool>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            start_tab: Some(ResourceKind::Activities.as_str().to_owned()),
            show_home: Some(true),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Logging {
    pub level: Option<String>,
    pub file_dir: Option<String>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            file_dir: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and place values under [api], [ui], and [logging]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(timeout) = &self.api.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "api.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(domain) = &self.api.platform_domain
            && domain.trim().trim_matches('.').is_empty()
        {
            bail!("api.platform_domain in {} must not be empty", path.display());
        }

        if let Some(tab) = &self.ui.start_tab {
            ResourceKind::parse_strict(tab)
                .with_context(|| format!("invalid ui.start_tab in {}", path.display()))?;
        }

        if let Some(level) = &self.logging.level {
            EnvFilter::try_new(level).with_context(|| {
                format!(
                    "invalid logging.level {level:?} in {}; use a level such as info or debug",
                    path.display()
                )
            })?;
        }

        Ok(())
    }

    /// Resolves the API base URL with the process environment.
    pub fn base_url(&self) -> String {
        self.base_url_with(|name| env::var(name).ok())
    }

    fn base_url_with(&self, lookup: impl Fn(&str) -> Option<String>) -> String {
        let explicit = self
            .api
            .base_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| lookup(API_URL_ENV));
        let deployment_id = self
            .api
            .codespace_name
            .clone()
            .filter(|id| !id.trim().is_empty())
            .or_else(|| DEPLOYMENT_ENVS.iter().find_map(|name| lookup(name)))
            .filter(|id| !id.trim().is_empty());
        resolve_base_url(
            explicit.as_deref(),
            deployment_id.as_deref(),
            self.platform_domain(),
        )
    }

    pub fn platform_domain(&self) -> &str {
        self.api
            .platform_domain
            .as_deref()
            .unwrap_or(DEFAULT_PLATFORM_DOMAIN)
    }

    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(self.api.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn start_tab(&self) -> ResourceKind {
        self.ui
            .start_tab
            .as_deref()
            .and_then(ResourceKind::parse)
            .unwrap_or(ResourceKind::Activities)
    }

    pub fn show_home(&self) -> bool {
        self.ui.show_home.unwrap_or(true)
    }

    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.logging.file_dir {
            return Ok(PathBuf::from(dir));
        }
        let data_root = dirs::data_local_dir().ok_or_else(|| {
            anyhow!("cannot resolve data directory; set [logging].file_dir in the config")
        })?;
        Ok(data_root.join(APP_NAME).join("logs"))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# octofit config\n# Place this file at: {}\n\nversion = 1\n\n[api]\n# Optional. Takes precedence over {API_URL_ENV} and codespace_name.\n# base_url = \"{DEFAULT_BASE_URL}\"\n# Optional. Builds https://<name>-8000.<platform_domain>/api\n# codespace_name = \"my-space\"\nplatform_domain = \"{DEFAULT_PLATFORM_DOMAIN}\"\ntimeout = \"{DEFAULT_TIMEOUT}\"\n\n[ui]\nstart_tab = \"activities\"\nshow_home = true\n\n[logging]\nlevel = \"{DEFAULT_LOG_LEVEL}\"\n# Optional. Default is the platform data dir (for example ~/.local/share/octofit/logs)\n# file_dir = \"/absolute/path/to/logs\"\n",
            path.display(),
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        let secs = mins
            .checked_mul(60)
            .ok_or_else(|| anyhow!("timeout duration {raw:?} is too large"))?;
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 10s)")
}

#[cfg(test)]
mod tests {
    use super::{Config, parse_duration};
    use anyhow::Result;
    use octofit_app::ResourceKind;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect::<HashMap<_, _>>();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert!(config.show_home());
        assert_eq!(config.start_tab(), ResourceKind::Activities);
        assert_eq!(config.timeout()?, Duration::from_secs(10));
        assert_eq!(config.log_level(), "info");
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[api]\nbase_url=\"http://x/api\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[api], [ui], and [logging]"));
        Ok(())
    }

    #[test]
    fn v1_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[api]\nbase_url = \"http://api.test/api/\"\ntimeout = \"1500ms\"\n[ui]\nstart_tab = \"Leaderboard\"\nshow_home = false\n[logging]\nlevel = \"octofit_api=debug\"\nfile_dir = \"/tmp/octofit-logs\"\n",
        )?;

        let config = Config::load(&path)?;
        assert_eq!(config.timeout()?, Duration::from_millis(1500));
        assert_eq!(config.start_tab(), ResourceKind::Leaderboard);
        assert!(!config.show_home());
        assert_eq!(config.log_level(), "octofit_api=debug");
        assert_eq!(config.log_dir()?, PathBuf::from("/tmp/octofit-logs"));
        assert_eq!(config.base_url_with(lookup(&[])), "http://api.test/api");
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn unknown_start_tab_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\nstart_tab = \"dashboard\"\n")?;
        let error = Config::load(&path).expect_err("unknown tab should fail");
        let message = format!("{error:#}");
        assert!(message.contains("ui.start_tab"));
        assert!(message.contains("activities, leaderboard"));
        Ok(())
    }

    #[test]
    fn bad_log_level_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[logging]\nlevel = \"octofit=loudest\"\n")?;
        let error = Config::load(&path).expect_err("bad level should fail");
        assert!(error.to_string().contains("invalid logging.level"));
        Ok(())
    }

    #[test]
    fn zero_timeout_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[api]\ntimeout = \"0s\"\n")?;
        let error = Config::load(&path).expect_err("zero timeout should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("OCTOFIT_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("OCTOFIT_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn default_path_uses_config_toml_suffix_when_no_env_override() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var("OCTOFIT_CONFIG_PATH");
        }
        let path = Config::default_path()?;
        assert!(path.ends_with("octofit/config.toml"));
        Ok(())
    }

    #[test]
    fn base_url_prefers_config_over_env() {
        let config = Config {
            api: super::Api {
                base_url: Some("http://from-config/api".to_owned()),
                codespace_name: Some("space".to_owned()),
                ..super::Api::default()
            },
            ..Config::default()
        };
        let env = lookup(&[("OCTOFIT_API_URL", "http://from-env/api")]);
        assert_eq!(config.base_url_with(env), "http://from-config/api");
    }

    #[test]
    fn base_url_uses_env_url_before_deployment_id() {
        let env = lookup(&[
            ("OCTOFIT_API_URL", "http://from-env/api/"),
            ("CODESPACE_NAME", "space"),
        ]);
        assert_eq!(Config::default().base_url_with(env), "http://from-env/api");
    }

    #[test]
    fn base_url_builds_deployment_url_from_codespace_envs() {
        let env = lookup(&[
            ("CODESPACE_NAME", "generic"),
            ("OCTOFIT_CODESPACE_NAME", "specific"),
        ]);
        assert_eq!(
            Config::default().base_url_with(env),
            "https://specific-8000.app.github.dev/api"
        );

        let env = lookup(&[("CODESPACE_NAME", "generic")]);
        assert_eq!(
            Config::default().base_url_with(env),
            "https://generic-8000.app.github.dev/api"
        );
    }

    #[test]
    fn base_url_config_codespace_uses_configured_domain() {
        let config = Config {
            api: super::Api {
                codespace_name: Some("fuzzy-lamp".to_owned()),
                platform_domain: Some("preview.example.dev".to_owned()),
                ..super::Api::default()
            },
            ..Config::default()
        };
        assert_eq!(
            config.base_url_with(lookup(&[("CODESPACE_NAME", "ignored")])),
            "https://fuzzy-lamp-8000.preview.example.dev/api"
        );
    }

    #[test]
    fn base_url_defaults_to_localhost() {
        assert_eq!(
            Config::default().base_url_with(lookup(&[("CODESPACE_NAME", " ")])),
            "http://localhost:8000/api"
        );
    }

    #[test]
    fn timeout_parses_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("10s")?, Duration::from_secs(10));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));
        Ok(())
    }

    #[test]
    fn timeout_rejects_invalid_duration() {
        let error = parse_duration("soon").expect_err("invalid duration should fail");
        let message = error.to_string();
        assert!(
            message.contains("invalid duration") || message.contains("invalid timeout duration"),
            "unexpected message: {message}"
        );
    }

    #[test]
    fn timeout_rejects_minutes_that_overflow() -> Result<()> {
        let error = parse_duration("307445734561825861m").expect_err("overflow should fail");
        assert!(error.to_string().contains("too large"));

        let (_temp, path) =
            write_config("version = 1\n[api]\ntimeout = \"307445734561825861m\"\n")?;
        let error = Config::load(&path).expect_err("overflowing timeout should fail");
        assert!(error.to_string().contains("too large"));
        Ok(())
    }

    #[test]
    fn example_config_round_trips_through_load() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        assert!(example.contains("[api]"));
        assert!(example.contains("[ui]"));
        assert!(example.contains("[logging]"));

        std::fs::write(&path, example)?;
        let config = Config::load(&path)?;
        assert_eq!(config.platform_domain(), "app.github.dev");
        assert_eq!(config.start_tab(), ResourceKind::Activities);
        Ok(())
    }
}
