//! Graph model, reconciliation, filtering, force layout and hit testing for
//! the twin relationship view.

pub mod filter;
pub mod graph;
pub mod hit;
pub mod simulation;
pub mod style;

#[cfg(test)]
mod testutil;

pub use filter::{GraphFilter, VisibleGraph};
pub use graph::{
    DroppedEdge, EdgeIndex, Graph, GraphEdge, GraphModel, GraphNode, NodeIndex, Vec2,
};
pub use hit::{HitResult, HitTester};
pub use simulation::{ForceParams, ForceSimulation, SimulationPhase};
pub use style::{Color, EdgeStyle, StyleSheet, relation_label};
