//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The map lives
//! in Rust so the browser bridge and tests resolve keys the same way.

use crate::input::Modifiers;
use crate::tools::ToolKind;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Tool switching ──
    Tool(ToolKind),

    // ── Drawing ──
    /// Finish the polyline/polygon being drawn.
    FinishDrawing,
    /// Cancel the open form or the drawing in progress.
    Cancel,

    // ── Data ──
    Export,
    /// Clear all annotations (still asks for confirmation).
    ClearAll,
}

impl ShortcutAction {
    pub fn name(&self) -> &'static str {
        match self {
            ShortcutAction::Tool(ToolKind::Marker) => "toolMarker",
            ShortcutAction::Tool(ToolKind::Polygon) => "toolPolygon",
            ShortcutAction::Tool(ToolKind::Polyline) => "toolPolyline",
            ShortcutAction::Tool(ToolKind::Circle) => "toolCircle",
            ShortcutAction::Tool(ToolKind::Measure) => "toolMeasure",
            ShortcutAction::FinishDrawing => "finishDrawing",
            ShortcutAction::Cancel => "cancel",
            ShortcutAction::Export => "export",
            ShortcutAction::ClearAll => "clearAll",
        }
    }
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘,
/// on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"m"`, `"Escape"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(key: &str, mods: Modifiers) -> Option<ShortcutAction> {
        let cmd = mods.ctrl || mods.meta;

        // ── Modifier combos first (most specific) ──
        if cmd {
            return match key {
                "s" | "S" => Some(ShortcutAction::Export),
                "Delete" | "Backspace" => Some(ShortcutAction::ClearAll),
                _ => None,
            };
        }

        if mods.alt {
            return None;
        }

        // ── Single keys ──
        match key {
            "m" | "M" => Some(ShortcutAction::Tool(ToolKind::Marker)),
            "l" | "L" => Some(ShortcutAction::Tool(ToolKind::Polyline)),
            "p" | "P" => Some(ShortcutAction::Tool(ToolKind::Polygon)),
            "c" | "C" => Some(ShortcutAction::Tool(ToolKind::Circle)),
            "d" | "D" => Some(ShortcutAction::Tool(ToolKind::Measure)),
            "Enter" => Some(ShortcutAction::FinishDrawing),
            "Escape" => Some(ShortcutAction::Cancel),
            _ => None,
        }
    }
}
