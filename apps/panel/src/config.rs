use std::{collections::HashMap, fs, path::Path};

use client_core::Locale;
use tracing::warn;

/// Initial values for the panel's input fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: String,
    pub interval: String,
    pub locale: Locale,
    pub drop_stale_responses: bool,
    pub watch: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "http://localhost:8080".into(),
            interval: "5".into(),
            locale: Locale::English,
            drop_stale_responses: false,
            watch: true,
        }
    }
}

pub fn load_settings(path: &Path) -> Settings {
    load_settings_with(path, |key| std::env::var(key).ok())
}

pub(crate) fn load_settings_with(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => apply_file(&mut settings, &file_cfg),
            Err(error) => warn!(path = %path.display(), %error, "ignoring unreadable settings file"),
        }
    }

    if let Some(v) = env("PANEL_HOST") {
        settings.host = v;
    }
    if let Some(v) = env("APP__HOST") {
        settings.host = v;
    }

    if let Some(v) = env("APP__INTERVAL_SECONDS") {
        settings.interval = v;
    }

    if let Some(v) = env("APP__LOCALE") {
        set_locale(&mut settings, &v);
    }

    if let Some(v) = env("APP__DROP_STALE_RESPONSES") {
        set_flag(&mut settings.drop_stale_responses, "APP__DROP_STALE_RESPONSES", &v);
    }

    settings
}

fn apply_file(settings: &mut Settings, file_cfg: &HashMap<String, String>) {
    if let Some(v) = file_cfg.get("host") {
        settings.host = v.clone();
    }
    if let Some(v) = file_cfg.get("interval_seconds") {
        settings.interval = v.clone();
    }
    if let Some(v) = file_cfg.get("locale") {
        set_locale(settings, v);
    }
    if let Some(v) = file_cfg.get("drop_stale_responses") {
        set_flag(&mut settings.drop_stale_responses, "drop_stale_responses", v);
    }
    if let Some(v) = file_cfg.get("watch") {
        set_flag(&mut settings.watch, "watch", v);
    }
}

fn set_locale(settings: &mut Settings, raw: &str) {
    match raw.parse::<Locale>() {
        Ok(locale) => settings.locale = locale,
        Err(error) => warn!(%error, "keeping locale {:?}", settings.locale),
    }
}

fn set_flag(flag: &mut bool, key: &str, raw: &str) {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => *flag = true,
        "0" | "false" | "no" | "off" => *flag = false,
        other => warn!(key, value = other, "ignoring non-boolean setting"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
