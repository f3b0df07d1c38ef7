//! Loading console configuration from TOML and the environment.
//!
//! Precedence: environment variables > TOML file (`CONSOLE_CONFIG_PATH`) > defaults.
//! See `ConsoleConfig` for the TOML schema.

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::client::DEFAULT_BASE_URL;
use crate::form::FormState;
use crate::seeds::sample_form;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "./static";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct ConsoleConfig {
  #[serde(default)]
  pub service: ServiceCfg,
  #[serde(default)]
  pub server: ServerCfg,
  /// Replaces the built-in demonstration record. Missing fields fall back to
  /// the form defaults, not to the built-in sample.
  #[serde(default)]
  pub sample: Option<FormState>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct ServiceCfg {
  #[serde(default)] pub base_url: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct ServerCfg {
  #[serde(default)] pub port: Option<u16>,
  #[serde(default)] pub static_dir: Option<String>,
}

/// Fully resolved settings used by the running server.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
  pub base_url: String,
  pub port: u16,
  pub static_dir: String,
  pub sample: FormState,
}

impl Settings {
  /// Merge env over the optional file config. `env` is injected for tests.
  pub fn resolve(cfg: Option<ConsoleConfig>, env: impl Fn(&str) -> Option<String>) -> Self {
    let cfg = cfg.unwrap_or_default();

    let base_url = env("EVAL_API_BASE_URL")
      .or(cfg.service.base_url)
      .unwrap_or_else(|| DEFAULT_BASE_URL.into());

    let port = match env("PORT") {
      Some(p) => p.parse::<u16>().ok().or_else(|| {
        warn!(target: "answer_eval_console", value = %p, "Ignoring invalid PORT");
        None
      }),
      None => None,
    }
    .or(cfg.server.port)
    .unwrap_or(DEFAULT_PORT);

    let static_dir = env("STATIC_DIR")
      .or(cfg.server.static_dir)
      .unwrap_or_else(|| DEFAULT_STATIC_DIR.into());

    Self { base_url, port, static_dir, sample: cfg.sample.unwrap_or_else(sample_form) }
  }

  pub fn from_env() -> Self {
    Self::resolve(load_console_config_from_env(), |k| std::env::var(k).ok())
  }
}

/// Attempt to load `ConsoleConfig` from CONSOLE_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_console_config_from_env() -> Option<ConsoleConfig> {
  let path = std::env::var("CONSOLE_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<ConsoleConfig>(&s) {
      Ok(cfg) => {
        info!(target: "answer_eval_console", %path, "Loaded console config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "answer_eval_console", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "answer_eval_console", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |k: &str| map.get(k).cloned()
  }

  #[test]
  fn defaults_without_file_or_env() {
    let s = Settings::resolve(None, env_of(&[]));
    assert_eq!(s.base_url, "http://localhost:8000");
    assert_eq!(s.port, 3000);
    assert_eq!(s.static_dir, "./static");
    assert_eq!(s.sample, sample_form());
  }

  #[test]
  fn toml_values_apply_and_env_wins() {
    let cfg: ConsoleConfig = toml::from_str(
      r#"
        [service]
        base_url = "http://scoring.internal:9000"

        [server]
        port = 8080

        [sample]
        question = "Define entropy."
        rubrics = "disorder, second law"
      "#,
    )
    .unwrap();

    let s = Settings::resolve(Some(cfg.clone()), env_of(&[]));
    assert_eq!(s.base_url, "http://scoring.internal:9000");
    assert_eq!(s.port, 8080);
    assert_eq!(s.sample.question, "Define entropy.");
    assert_eq!(s.sample.total_marks, 10.0);
    assert!(s.sample.student_answer.is_empty());

    let s = Settings::resolve(Some(cfg), env_of(&[("EVAL_API_BASE_URL", "http://env:1"), ("PORT", "4000")]));
    assert_eq!(s.base_url, "http://env:1");
    assert_eq!(s.port, 4000);
  }

  #[test]
  fn bad_port_falls_back() {
    let s = Settings::resolve(None, env_of(&[("PORT", "eighty")]));
    assert_eq!(s.port, DEFAULT_PORT);
  }

  #[test]
  fn empty_file_is_valid() {
    let cfg: ConsoleConfig = toml::from_str("").unwrap();
    assert!(cfg.sample.is_none());
    assert!(cfg.service.base_url.is_none());
  }
}
