//! Page-level orchestration of the twin relationship view.
//!
//! [`GraphEngine`] ties the data source, the reconciled graph, the filter
//! engine, the force simulation and the hit regions together behind a small
//! surface: async lifecycle calls, a synchronous per-frame tick, and a
//! pointer interface that reports resolved records through callbacks.

pub mod engine;
pub mod view;

pub use engine::{EngineConfig, GraphEngine};
pub use view::{
    DragEvent, DragPhase, EdgeDetail, EdgeTooltip, HoverInfo, NodeDetail, NodeTooltip, Selection,
    Viewport,
};
