use std::{collections::HashMap, fs, path::Path};

use client_core::{BoardSettings, FilterPolicy};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "taskboard.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub log_filter: String,
    pub filter_policy: FilterPolicy,
    pub queue_capacity: usize,
    pub event_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        let board = BoardSettings::default();
        Self {
            database_url: "sqlite://./data/taskboard.db".into(),
            log_filter: "info".into(),
            filter_policy: board.filter_policy,
            queue_capacity: board.queue_capacity,
            event_capacity: board.event_capacity,
        }
    }
}

impl Settings {
    pub fn board(&self) -> BoardSettings {
        BoardSettings {
            filter_policy: self.filter_policy,
            queue_capacity: self.queue_capacity,
            event_capacity: self.event_capacity,
        }
    }
}

/// Defaults, then the config file (if readable), then the environment.
pub fn load_settings(config_path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());

    settings
}

fn apply_file(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<HashMap<String, String>>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(err) => {
            warn!("ignoring unreadable config file: {err}");
            return;
        }
    };

    if let Some(v) = file_cfg.get("database_url") {
        settings.database_url = v.clone();
    }
    if let Some(v) = file_cfg.get("log_filter") {
        settings.log_filter = v.clone();
    }
    if let Some(v) = file_cfg.get("filter_policy") {
        set_filter_policy(settings, v);
    }
    if let Some(v) = file_cfg.get("queue_capacity") {
        set_capacity(&mut settings.queue_capacity, "queue_capacity", v);
    }
    if let Some(v) = file_cfg.get("event_capacity") {
        set_capacity(&mut settings.event_capacity, "event_capacity", v);
    }
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = var("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    if let Some(v) = var("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    if let Some(v) = var("APP__FILTER_POLICY") {
        set_filter_policy(settings, &v);
    }

    if let Some(v) = var("APP__QUEUE_CAPACITY") {
        set_capacity(&mut settings.queue_capacity, "APP__QUEUE_CAPACITY", &v);
    }
    if let Some(v) = var("APP__EVENT_CAPACITY") {
        set_capacity(&mut settings.event_capacity, "APP__EVENT_CAPACITY", &v);
    }
}

fn set_filter_policy(settings: &mut Settings, raw: &str) {
    match raw.parse::<FilterPolicy>() {
        Ok(policy) => settings.filter_policy = policy,
        Err(err) => warn!("keeping filter policy {:?}: {err}", settings.filter_policy),
    }
}

fn set_capacity(target: &mut usize, key: &str, raw: &str) {
    match raw.trim().parse::<usize>() {
        Ok(parsed) if parsed > 0 => *target = parsed,
        _ => warn!(key, value = raw, "ignoring invalid capacity"),
    }
}

pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
