//! Data carried across the engine's interaction callbacks.
//!
//! These are plain resolved records: the page renders them into whatever
//! tooltip or detail panel it owns, so nothing here references a rendering
//! surface.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use twinmap_core::{RelationId, RelationKind, Strength, ThingId, ThingKind};
use twinmap_graph::Vec2;

/// Logical size of the rendering surface the layout is centered in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Transient tooltip content for a hovered node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTooltip {
    pub name: String,
    pub kind: ThingKind,
    pub description: String,
}

/// Transient tooltip content for a hovered edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeTooltip {
    pub label: String,
    pub source_name: String,
    pub target_name: String,
    pub description: String,
}

/// What the pointer is currently over. `None` is delivered once when the
/// pointer leaves the previous target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HoverInfo {
    Node(NodeTooltip),
    Edge(EdgeTooltip),
}

/// Full record for the persistent node detail panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDetail {
    pub id: ThingId,
    pub name: String,
    pub kind: ThingKind,
    pub description: String,
    pub attributes: Map<String, Value>,
    pub features: Map<String, Value>,
}

/// Full record for the persistent edge detail panel, including the strength
/// classification derived from the relation kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDetail {
    pub id: RelationId,
    pub kind: RelationKind,
    pub label: String,
    pub strength: Strength,
    pub name: String,
    pub source_name: String,
    pub target_name: String,
    pub description: String,
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Selection {
    Node(NodeDetail),
    Edge(EdgeDetail),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragPhase {
    Started,
    Moved,
    Ended,
}

/// One step of a drag gesture on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragEvent {
    pub phase: DragPhase,
    pub node: ThingId,
    pub position: Vec2,
}
