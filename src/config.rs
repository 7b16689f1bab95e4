//! Page-supplied settings. Everything is optional: a page without a config
//! block gets the defaults used by the workout and goal lists.

use log::{LevelFilter, warn};
use serde::Deserialize;
use std::str::FromStr;
use web_sys::Document;

use crate::error::ConfigError;
use crate::model::Thresholds;

pub const CONFIG_ELEMENT_ID: &str = "swipe-delete-config";
pub const INITIALIZED_ATTR: &str = "data-swipe-initialized";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub reset_ms: i32,
    pub delete_ms: i32,
    pub dialog_show_delay_ms: i32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            reset_ms: 300,
            delete_ms: 300,
            dialog_show_delay_ms: 10,
        }
    }
}

/// Display copy shared by every kind.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub neutral_glyph: String,
    pub armed: String,
    pub confirm: String,
    pub cancel: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            neutral_glyph: "✕".into(),
            armed: "🗑️ Удалить".into(),
            confirm: "Да".into(),
            cancel: "Отмена".into(),
        }
    }
}

/// One category of deletable list item.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct KindSpec {
    /// Class namespace, e.g. `goal-card` gives `goal-card-wrapper`.
    pub name: String,
    pub item_selector: String,
    /// Link inside the item whose `href` is the delete endpoint.
    pub action_selector: String,
    pub title: String,
}

impl KindSpec {
    pub fn new(name: &str, item_selector: &str, action_selector: &str, title: &str) -> Self {
        Self {
            name: name.into(),
            item_selector: item_selector.into(),
            action_selector: action_selector.into(),
            title: title.into(),
        }
    }

    pub fn wrapper_class(&self) -> String {
        format!("{}-wrapper", self.name)
    }

    pub fn affordance_class(&self) -> String {
        format!("{}-delete-action", self.name)
    }

    /// Items of this kind that have not been attached yet.
    pub fn pending_selector(&self) -> String {
        format!("{}:not([{}])", self.item_selector, INITIALIZED_ATTR)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SwipeConfig {
    pub thresholds: Thresholds,
    pub timings: Timings,
    pub labels: Labels,
    pub log_level: String,
    pub kinds: Vec<KindSpec>,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            timings: Timings::default(),
            labels: Labels::default(),
            log_level: "warn".into(),
            kinds: vec![
                KindSpec::new(
                    "workout-session",
                    ".workout-session",
                    ".delete-session-btn",
                    "Удалить тренировку?",
                ),
                KindSpec::new(
                    "goal-card",
                    ".goal-card",
                    ".delete-goal-btn",
                    "Удалить цель?",
                ),
            ],
        }
    }
}

impl SwipeConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: SwipeConfig = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;
        if self.kinds.is_empty() {
            return Err(ConfigError::NoKinds);
        }
        Ok(())
    }

    /// Reads the optional JSON block from the page, falling back to defaults.
    pub fn from_page(document: &Document) -> Self {
        let Some(raw) = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content())
        else {
            return Self::default();
        };
        match Self::from_json(&raw) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("ignoring swipe config: {e}");
                Self::default()
            }
        }
    }

    pub fn kind(&self, name: &str) -> Option<&KindSpec> {
        self.kinds.iter().find(|k| k.name == name)
    }

    pub fn log_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Warn)
    }
}
