//! # Configuration Module
//!
//! Process configuration, layered as: defaults, then an optional YAML file,
//! then `TEXTGATE_*` environment variables, then CLI flags (applied by the
//! binary).
//!
//! ## File
//!
//! ```yaml
//! addr: "0.0.0.0:8080"
//! data_dir: "./data"
//! storage: file        # or: memory
//! stack_size: 0x4000   # decimal or 0x-prefixed hex
//! debug: false
//! cookie_expires: "Thu, 31 Dec 2099 23:59:59 GMT"
//! ```
//!
//! ## Environment Variables
//!
//! | Variable              | Field        |
//! |-----------------------|--------------|
//! | `TEXTGATE_ADDR`       | `addr`       |
//! | `TEXTGATE_DATA_DIR`   | `data_dir`   |
//! | `TEXTGATE_STORAGE`    | `storage`    |
//! | `TEXTGATE_STACK_SIZE` | `stack_size` |
//! | `TEXTGATE_DEBUG`      | `debug`      |
//!
//! Unparseable environment values are ignored and the previous layer wins.

use crate::server::DEFAULT_COOKIE_EXPIRES;
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the content store inside `data_dir`.
pub const CONTENT_FILE: &str = "main.json";
/// File name of the session store inside `data_dir`.
pub const SESSION_FILE: &str = "sess.json";

const DEFAULT_STACK_SIZE: usize = 0x4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Memory,
    File,
}

impl StorageKind {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Some(StorageKind::Memory),
            "file" => Some(StorageKind::File),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub addr: String,
    pub data_dir: PathBuf,
    pub storage: StorageKind,
    #[serde(deserialize_with = "deserialize_stack_size")]
    pub stack_size: usize,
    pub debug: bool,
    pub cookie_expires: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
            data_dir: PathBuf::from("./data"),
            storage: StorageKind::File,
            stack_size: DEFAULT_STACK_SIZE,
            debug: false,
            cookie_expires: DEFAULT_COOKIE_EXPIRES.to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults, overlaid by `path` (if given), overlaid by the environment.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not valid YAML for this shape.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml_str(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    /// # Errors
    ///
    /// Fails if `raw` is not valid YAML for this shape.
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Overlay `TEXTGATE_*` values returned by `lookup`.
    pub fn apply_env<F: Fn(&str) -> Option<String>>(&mut self, lookup: F) {
        if let Some(addr) = lookup("TEXTGATE_ADDR") {
            self.addr = addr;
        }
        if let Some(dir) = lookup("TEXTGATE_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(kind) = lookup("TEXTGATE_STORAGE").as_deref().and_then(StorageKind::parse) {
            self.storage = kind;
        }
        if let Some(size) = lookup("TEXTGATE_STACK_SIZE").as_deref().and_then(parse_stack_size) {
            self.stack_size = size;
        }
        if let Some(debug) = lookup("TEXTGATE_DEBUG").and_then(|v| v.parse().ok()) {
            self.debug = debug;
        }
    }

    #[must_use]
    pub fn content_path(&self) -> PathBuf {
        self.data_dir.join(CONTENT_FILE)
    }

    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }
}

/// Parse `16384` or `0x4000`.
#[must_use]
pub fn parse_stack_size(val: &str) -> Option<usize> {
    let val = val.trim();
    match val.strip_prefix("0x") {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    }
}

fn deserialize_stack_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(usize),
        Text(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Text(s) => parse_stack_size(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid stack size '{s}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_stack_size() {
        assert_eq!(parse_stack_size("0x8000"), Some(0x8000));
        assert_eq!(parse_stack_size("16384"), Some(16384));
        assert_eq!(parse_stack_size("lots"), None);
    }

    #[test]
    fn test_yaml_fields_and_defaults() {
        let cfg = AppConfig::from_yaml_str(
            "addr: \"127.0.0.1:9000\"\nstorage: memory\nstack_size: \"0x8000\"\n",
        )
        .unwrap();
        assert_eq!(cfg.addr, "127.0.0.1:9000");
        assert_eq!(cfg.storage, StorageKind::Memory);
        assert_eq!(cfg.stack_size, 0x8000);
        assert_eq!(cfg.data_dir, PathBuf::from("./data"));
        assert!(!cfg.debug);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(AppConfig::from_yaml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let env: HashMap<&str, &str> = [
            ("TEXTGATE_ADDR", "127.0.0.1:1"),
            ("TEXTGATE_STORAGE", "memory"),
            ("TEXTGATE_STACK_SIZE", "0x10000"),
            ("TEXTGATE_DEBUG", "true"),
            ("TEXTGATE_DATA_DIR", "/tmp/tg"),
        ]
        .into_iter()
        .collect();
        let mut cfg = AppConfig::default();
        cfg.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.addr, "127.0.0.1:1");
        assert_eq!(cfg.storage, StorageKind::Memory);
        assert_eq!(cfg.stack_size, 0x10000);
        assert!(cfg.debug);
        assert_eq!(cfg.session_path(), PathBuf::from("/tmp/tg/sess.json"));
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let mut cfg = AppConfig::default();
        cfg.apply_env(|k| match k {
            "TEXTGATE_STORAGE" => Some("postgres".to_string()),
            "TEXTGATE_STACK_SIZE" => Some("huge".to_string()),
            _ => None,
        });
        assert_eq!(cfg.storage, StorageKind::File);
        assert_eq!(cfg.stack_size, DEFAULT_STACK_SIZE);
    }
}
