//! Drawing tool controller.
//!
//! Tracks which tool is armed and routes map events to it. States:
//!
//! ```text
//! Idle ──select_tool──▶ Armed(tool) ──first interaction──▶ Drafting(tool, draft)
//!   ▲                                                             │
//!   └──────────────────── take_draft / abort ─────────────────────┘
//! ```
//!
//! The measure tool never drafts: while it is armed, clicks are handed back
//! to the caller as `ControllerOutput::Measure`.

use crate::input::MapEvent;
use crate::tools::{CircleTool, MarkerTool, Tool, ToolEffect, ToolKind, VertexTool};
use mapnote_core::{AnnotationKind, Geometry, LatLng, ShapeId};

/// The single shape being drawn before it is committed to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftShape {
    pub shape: ShapeId,
    pub kind: AnnotationKind,
    pub geometry: Geometry,
    /// Set once the tool has finished placing the shape.
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControllerState {
    Idle,
    Armed(ToolKind),
    Drafting { tool: ToolKind, draft: DraftShape },
}

/// Result of routing one map event.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerOutput {
    Ignored,
    /// Measure tool is armed: add this point to the measurement session.
    Measure(LatLng),
    /// Draft geometry changed; redraw it.
    DraftChanged(DraftShape),
    /// Draft finished; open the annotation form.
    DraftCompleted(DraftShape),
}

pub struct ToolController {
    state: ControllerState,
    marker_tool: MarkerTool,
    polyline_tool: VertexTool,
    polygon_tool: VertexTool,
    circle_tool: CircleTool,
}

impl ToolController {
    pub fn new(earth_radius_m: f64) -> Self {
        Self {
            state: ControllerState::Idle,
            marker_tool: MarkerTool::new(),
            polyline_tool: VertexTool::polyline(),
            polygon_tool: VertexTool::polygon(),
            circle_tool: CircleTool::new(earth_radius_m),
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// The armed or drafting tool, if any.
    pub fn active_tool(&self) -> Option<ToolKind> {
        match &self.state {
            ControllerState::Idle => None,
            ControllerState::Armed(tool) | ControllerState::Drafting { tool, .. } => Some(*tool),
        }
    }

    pub fn draft(&self) -> Option<&DraftShape> {
        match &self.state {
            ControllerState::Drafting { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Arm `tool`, dropping whatever was armed before. Returns the abandoned
    /// draft so the caller can take it off the map.
    pub fn select_tool(&mut self, tool: ToolKind) -> Option<DraftShape> {
        let abandoned = self.abort();
        log::debug!("controller: arm {}", tool.name());
        self.state = ControllerState::Armed(tool);
        abandoned
    }

    /// Route a map event to the armed tool.
    pub fn handle_event(&mut self, event: &MapEvent) -> ControllerOutput {
        let tool = match &self.state {
            ControllerState::Idle => return ControllerOutput::Ignored,
            ControllerState::Armed(ToolKind::Measure) => {
                return match event {
                    MapEvent::Click { at } => ControllerOutput::Measure(*at),
                    _ => ControllerOutput::Ignored,
                };
            }
            // Completed drafts stop listening until the form closes.
            ControllerState::Drafting { draft, .. } if draft.complete => {
                return ControllerOutput::Ignored;
            }
            ControllerState::Armed(tool) | ControllerState::Drafting { tool, .. } => *tool,
        };

        let effect = match self.tool_mut(tool) {
            Some(t) => t.handle(event),
            None => ToolEffect::None,
        };
        self.apply(tool, effect)
    }

    /// Explicitly finish a multi-vertex shape.
    pub fn finish(&mut self) -> ControllerOutput {
        let tool = match &self.state {
            ControllerState::Drafting { tool, draft } if !draft.complete => *tool,
            _ => return ControllerOutput::Ignored,
        };
        let effect = match self.tool_mut(tool) {
            Some(t) => t.finish(),
            None => ToolEffect::None,
        };
        self.apply(tool, effect)
    }

    /// Hand the draft over (form saved or cancelled) and return to `Idle`.
    pub fn take_draft(&mut self) -> Option<DraftShape> {
        match std::mem::replace(&mut self.state, ControllerState::Idle) {
            ControllerState::Drafting { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Disarm everything and return to `Idle`. Returns the abandoned draft.
    pub fn abort(&mut self) -> Option<DraftShape> {
        if let Some(tool) = self.active_tool()
            && let Some(t) = self.tool_mut(tool)
        {
            t.reset();
        }
        self.take_draft()
    }

    // ─── Private helpers ─────────────────────────────────────────────────

    fn tool_mut(&mut self, kind: ToolKind) -> Option<&mut dyn Tool> {
        match kind {
            ToolKind::Marker => Some(&mut self.marker_tool),
            ToolKind::Polyline => Some(&mut self.polyline_tool),
            ToolKind::Polygon => Some(&mut self.polygon_tool),
            ToolKind::Circle => Some(&mut self.circle_tool),
            ToolKind::Measure => None,
        }
    }

    fn apply(&mut self, tool: ToolKind, effect: ToolEffect) -> ControllerOutput {
        let (geometry, complete) = match effect {
            ToolEffect::None => return ControllerOutput::Ignored,
            ToolEffect::Preview(g) => (g, false),
            ToolEffect::Complete(g) => (g, true),
        };

        let draft = match &mut self.state {
            ControllerState::Drafting { draft, .. } => {
                draft.geometry = geometry;
                draft.complete = complete;
                draft.clone()
            }
            _ => {
                let Some(kind) = tool.annotation_kind() else {
                    return ControllerOutput::Ignored;
                };
                let draft = DraftShape {
                    shape: ShapeId::mint(kind),
                    kind,
                    geometry,
                    complete,
                };
                log::debug!("controller: drafting {} as {}", kind, draft.shape);
                self.state = ControllerState::Drafting {
                    tool,
                    draft: draft.clone(),
                };
                draft
            }
        };

        if complete {
            ControllerOutput::DraftCompleted(draft)
        } else {
            ControllerOutput::DraftChanged(draft)
        }
    }
}
