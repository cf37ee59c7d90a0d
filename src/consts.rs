//! Shared constants for the design engine.

// ── Geometry ────────────────────────────────────────────────────

/// Smallest width or height an element may have after a resize.
pub const MIN_ELEMENT_SIZE: f64 = 10.0;

/// Default canvas width in points (a phone-width drawing surface).
pub const DEFAULT_CANVAS_WIDTH: f64 = 390.0;

/// Default canvas height in points (70% of a phone screen).
pub const DEFAULT_CANVAS_HEIGHT: f64 = 590.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Margin around an element body that still counts as a hit.
pub const SELECTION_PADDING: f64 = 10.0;

/// Half-extent of the square hit box around each resize handle.
pub const HANDLE_SIZE: f64 = 12.0;

/// Average glyph width as a fraction of font size, for text hit boxes.
pub const TEXT_WIDTH_FACTOR: f64 = 0.6;

// ── History ─────────────────────────────────────────────────────

/// Maximum number of undo steps kept in the past stack.
pub const HISTORY_LIMIT: usize = 50;

// ── Document defaults ───────────────────────────────────────────

/// Canvas background for a fresh or cleared design.
pub const DEFAULT_BACKGROUND: &str = "#FFFFFF";

/// Name given to a design before the user renames it.
pub const DEFAULT_DESIGN_NAME: &str = "Untitled Design";

/// Storage key prefix for saved designs.
pub const DESIGN_KEY_PREFIX: &str = "design_";

/// Storage key used when a design is saved without an id.
pub const ANONYMOUS_DESIGN_KEY: &str = "design_data";

/// Storage key for the recent-designs catalog.
pub const RECENT_DESIGNS_KEY: &str = "recentDesigns";

/// Number of entries kept in the recent-designs catalog.
pub const RECENT_DESIGNS_LIMIT: usize = 10;
