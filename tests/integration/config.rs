//! Key resolution through the real environment and a real `grok.toml`.
//!
//! Tests here mutate process environment variables, so each one holds
//! `EnvGuard` for its whole body; the guard restores every touched variable
//! on drop.

use std::fs;
use std::sync::{Mutex, MutexGuard};

use tempfile::tempdir;

use grok_client::config::API_KEY_ENV;
use grok_client::{ClientConfig, GrokClient, GrokError};

const CUSTOM_KEY_ENV: &str = "GROK_CLIENT_TEST_KEY";

static ENV_LOCK: Mutex<()> = Mutex::new(());

struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvGuard {
    fn acquire() -> Self {
        Self {
            saved: Vec::new(),
            _lock: ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner()),
        }
    }

    fn remember(&mut self, name: &'static str) {
        if !self.saved.iter().any(|(n, _)| *n == name) {
            self.saved.push((name, std::env::var(name).ok()));
        }
    }

    fn set(&mut self, name: &'static str, value: &str) {
        self.remember(name);
        std::env::set_var(name, value);
    }

    fn remove(&mut self, name: &'static str) {
        self.remember(name);
        std::env::remove_var(name);
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (name, value) in self.saved.drain(..).rev() {
            match value {
                Some(v) => std::env::set_var(name, v),
                None => std::env::remove_var(name),
            }
        }
    }
}

fn write_config(dir: &std::path::Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("grok.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_new_without_key_or_env_is_config_error() {
    let mut env = EnvGuard::acquire();
    env.remove(API_KEY_ENV);

    match GrokClient::new(None) {
        Err(GrokError::MissingApiKey { env_var }) => assert_eq!(env_var, API_KEY_ENV),
        Err(other) => panic!("expected missing-key error, got {other:?}"),
        Ok(_) => panic!("client built without a key"),
    }

    let err = ClientConfig::resolve(None).unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_blank_env_key_counts_as_missing() {
    let mut env = EnvGuard::acquire();
    env.set(API_KEY_ENV, "   ");

    let err = ClientConfig::resolve(None).unwrap_err();
    assert!(matches!(err, GrokError::MissingApiKey { .. }));
}

#[test]
fn test_new_reads_env_and_explicit_wins() {
    let mut env = EnvGuard::acquire();
    env.set(API_KEY_ENV, "xai-from-env");

    let client = GrokClient::new(None).unwrap();
    assert_eq!(client.config().api_key(), "xai-from-env");

    let client = GrokClient::new(Some("xai-explicit".into())).unwrap();
    assert_eq!(client.config().api_key(), "xai-explicit");
}

#[test]
fn test_load_uses_variable_named_in_file() {
    let mut env = EnvGuard::acquire();
    env.set(CUSTOM_KEY_ENV, "xai-custom");
    env.set(API_KEY_ENV, "xai-default-var");

    let dir = tempdir().unwrap();
    let path = write_config(
        dir.path(),
        &format!(
            "[client]\napi_key_env = \"{CUSTOM_KEY_ENV}\"\n\n[defaults]\nmodel = \"grok-3-latest\"\n"
        ),
    );

    let cfg = ClientConfig::load(&path, None).unwrap();
    assert_eq!(cfg.api_key(), "xai-custom");
    assert_eq!(cfg.defaults.model, "grok-3-latest");

    let cfg = ClientConfig::load(&path, Some("xai-explicit".into())).unwrap();
    assert_eq!(cfg.api_key(), "xai-explicit");
}

#[test]
fn test_load_reports_the_variable_it_looked_for() {
    let mut env = EnvGuard::acquire();
    env.remove(CUSTOM_KEY_ENV);
    env.set(API_KEY_ENV, "xai-default-var");

    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), &format!("[client]\napi_key_env = \"{CUSTOM_KEY_ENV}\"\n"));

    match ClientConfig::load(&path, None) {
        Err(GrokError::MissingApiKey { env_var }) => assert_eq!(env_var, CUSTOM_KEY_ENV),
        other => panic!("expected missing-key error, got {other:?}"),
    }
}

#[test]
fn test_malformed_file_is_not_a_missing_key() {
    let mut env = EnvGuard::acquire();
    env.remove(API_KEY_ENV);

    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), "[client\nbase_url = ");

    let err = ClientConfig::load(&path, None).unwrap_err();
    assert!(matches!(err, GrokError::Config(_)), "got {err:?}");
}

#[test]
fn test_load_or_resolve_without_file_reads_env() {
    let mut env = EnvGuard::acquire();
    env.set(API_KEY_ENV, "xai-from-env");

    let dir = tempdir().unwrap();
    let cfg = ClientConfig::load_or_resolve(dir.path().join("absent.toml"), None).unwrap();
    assert_eq!(cfg.api_key(), "xai-from-env");
    assert_eq!(cfg.base_url, "https://api.x.ai/v1");
}

#[test]
fn test_env_key_with_embedded_newline_is_rejected() {
    let mut env = EnvGuard::acquire();
    env.set(API_KEY_ENV, "xai-abc\ndef");

    let err = GrokClient::new(None).err().expect("key should be rejected");
    assert!(matches!(err, GrokError::Config(_)), "got {err:?}");
}
