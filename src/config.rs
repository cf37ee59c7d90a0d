//! Engine configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

use crate::consts::{
    DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, HANDLE_SIZE, HISTORY_LIMIT, MIN_ELEMENT_SIZE, SELECTION_PADDING,
};
use crate::geometry::CanvasBounds;

/// Tuning knobs for the document store and interaction controller.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Drawing surface size; element boxes are kept inside it.
    pub canvas: CanvasBounds,
    /// Smallest width or height an element may be resized to.
    pub min_element_size: f64,
    /// Maximum number of undo steps.
    pub history_limit: usize,
    /// Extra margin around element bodies for tap and drag hit tests.
    pub selection_padding: f64,
    /// Half-extent of each resize handle's hit box.
    pub handle_size: f64,
    /// Directory for the file-backed blob store, when one is used.
    pub store_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasBounds::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT),
            min_element_size: MIN_ELEMENT_SIZE,
            history_limit: HISTORY_LIMIT,
            selection_padding: SELECTION_PADDING,
            handle_size: HANDLE_SIZE,
            store_dir: None,
        }
    }
}

impl EngineConfig {
    /// Build config from environment variables, falling back to defaults for
    /// anything missing or unparseable. Sizes must be finite and positive;
    /// padding must be finite and not negative.
    ///
    /// - `DESIGN_CANVAS_WIDTH`, `DESIGN_CANVAS_HEIGHT`: canvas size
    /// - `DESIGN_MIN_ELEMENT_SIZE`: default 10
    /// - `DESIGN_HISTORY_LIMIT`: default 50
    /// - `DESIGN_SELECTION_PADDING`: default 10
    /// - `DESIGN_HANDLE_SIZE`: default 12
    /// - `DESIGN_STORE_DIR`: directory for saved designs
    #[must_use]
    pub fn from_env() -> Self {
        let canvas = CanvasBounds::new(
            env_size("DESIGN_CANVAS_WIDTH", DEFAULT_CANVAS_WIDTH),
            env_size("DESIGN_CANVAS_HEIGHT", DEFAULT_CANVAS_HEIGHT),
        );
        Self {
            canvas,
            min_element_size: env_size("DESIGN_MIN_ELEMENT_SIZE", MIN_ELEMENT_SIZE),
            history_limit: env_parse("DESIGN_HISTORY_LIMIT", HISTORY_LIMIT),
            selection_padding: env_margin("DESIGN_SELECTION_PADDING", SELECTION_PADDING),
            handle_size: env_size("DESIGN_HANDLE_SIZE", HANDLE_SIZE),
            store_dir: std::env::var_os("DESIGN_STORE_DIR").map(PathBuf::from),
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    let Ok(raw) = std::env::var(key) else {
        return default;
    };
    raw.trim().parse::<T>().unwrap_or(default)
}

/// A length that must be finite and greater than zero.
pub(crate) fn env_size(key: &str, default: f64) -> f64 {
    let value = env_parse(key, default);
    if value.is_finite() && value > 0.0 { value } else { default }
}

/// A length that must be finite and not negative.
pub(crate) fn env_margin(key: &str, default: f64) -> f64 {
    let value = env_parse(key, default);
    if value.is_finite() && value >= 0.0 { value } else { default }
}
