use crate::view::{
    DragEvent, DragPhase, EdgeDetail, EdgeTooltip, HoverInfo, NodeDetail, NodeTooltip, Selection,
    Viewport,
};
use twinmap_client::{ClientError, GraphSource};
use twinmap_core::ThingId;
use twinmap_graph::{
    DroppedEdge, ForceParams, ForceSimulation, GraphFilter, GraphModel, HitResult, HitTester,
    SimulationPhase, StyleSheet, Vec2, VisibleGraph, relation_label,
};

/// Pointer movement below this distance still counts as a click.
const CLICK_SLOP: f32 = 4.0;

/// Radius of the ring new node sets are seeded on before the first tick.
const SEED_RADIUS: f32 = 120.0;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub viewport: Viewport,
    pub params: ForceParams,
    pub styles: StyleSheet,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            params: ForceParams::default(),
            styles: StyleSheet::default(),
        }
    }
}

type HoverHandler = Box<dyn FnMut(Option<HoverInfo>)>;
type SelectHandler = Box<dyn FnMut(Selection)>;
type DragHandler = Box<dyn FnMut(DragEvent)>;

struct DragState {
    node: ThingId,
    press_pos: Vec2,
    moved: bool,
}

/// One page's graph engine instance.
///
/// Owns the reconciled graph, the visible subgraph, the simulator and the
/// hit regions; constructed per page/container and dropped on navigation.
/// The pointer interface is surface-agnostic: the page feeds it positions in
/// layout coordinates and receives resolved records through the registered
/// callbacks.
pub struct GraphEngine<S: GraphSource> {
    source: S,
    config: EngineConfig,
    model: GraphModel,
    filter: GraphFilter,
    visible: VisibleGraph,
    sim: ForceSimulation,
    hit: HitTester,
    hover: HitResult,
    drag: Option<DragState>,
    pressed: Option<(HitResult, Vec2)>,
    on_hover: Option<HoverHandler>,
    on_select: Option<SelectHandler>,
    on_drag: Option<DragHandler>,
}

impl<S: GraphSource> GraphEngine<S> {
    pub fn new(source: S, config: EngineConfig) -> Self {
        let sim = ForceSimulation::new(config.params, config.viewport.center());
        Self {
            source,
            config,
            model: GraphModel::default(),
            filter: GraphFilter::default(),
            visible: VisibleGraph::default(),
            sim,
            hit: HitTester::new(),
            hover: HitResult::None,
            drag: None,
            pressed: None,
            on_hover: None,
            on_select: None,
            on_drag: None,
        }
    }

    // -- Capability callbacks --

    pub fn on_hover(&mut self, handler: impl FnMut(Option<HoverInfo>) + 'static) {
        self.on_hover = Some(Box::new(handler));
    }

    pub fn on_select(&mut self, handler: impl FnMut(Selection) + 'static) {
        self.on_select = Some(Box::new(handler));
    }

    pub fn on_drag(&mut self, handler: impl FnMut(DragEvent) + 'static) {
        self.on_drag = Some(Box::new(handler));
    }

    // -- Lifecycle --

    /// First load: fetch both collections, reconcile, and start simulating.
    pub async fn initialize(&mut self, viewport: Viewport) -> Result<(), ClientError> {
        self.config.viewport = viewport;
        self.sim.set_center(viewport.center());
        self.refresh().await
    }

    /// Re-fetch and rebuild from scratch.
    ///
    /// On fetch failure the previous valid graph, subgraph and simulation
    /// are left exactly as they were; the error is returned for the page to
    /// surface once. A successful rebuild supersedes the prior simulation:
    /// its generation no longer matches, so any straggling step against the
    /// new data is a no-op.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let (things, relations) = self.source.fetch_graph().await.inspect_err(|err| {
            tracing::warn!(%err, "load failed, keeping previous graph");
        })?;

        let mut model = GraphModel::build(things, relations);
        model.seed_positions(self.config.viewport.center(), SEED_RADIUS);
        tracing::debug!(
            nodes = model.node_count(),
            edges = model.edge_count(),
            dropped = model.dropped_edges().len(),
            "graph rebuilt"
        );

        self.model = model;
        self.visible = self.filter.apply(&self.model);
        self.sim.bind(&self.model);
        self.hit.update(&self.model, &self.visible);
        self.drag = None;
        self.pressed = None;
        self.clear_hover();
        Ok(())
    }

    /// Re-run the filter engine over the existing graph and restart the
    /// simulation at full energy. No refetch.
    pub fn apply_filter(&mut self, filter: GraphFilter) {
        self.release_drag_pin();
        self.filter = filter;
        self.visible = self.filter.apply(&self.model);
        self.sim.restart();
        self.hit.update(&self.model, &self.visible);
        self.pressed = None;
        self.clear_hover();
    }

    /// Restart simulation energy without refetching or refiltering.
    pub fn reset(&mut self) {
        self.sim.restart();
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.config.viewport = viewport;
        self.sim.set_center(viewport.center());
    }

    /// Advance the simulation one frame. Synchronous; never touches I/O.
    pub fn tick(&mut self, dt: f32) -> bool {
        let advanced = self.sim.step(&mut self.model, &self.visible, dt);
        if advanced {
            self.hit.update(&self.model, &self.visible);
        }
        advanced
    }

    // -- Read access for the rendering layer --

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn visible(&self) -> &VisibleGraph {
        &self.visible
    }

    pub fn filter(&self) -> GraphFilter {
        self.filter
    }

    pub fn dropped_edges(&self) -> &[DroppedEdge] {
        self.model.dropped_edges()
    }

    pub fn phase(&self) -> SimulationPhase {
        self.sim.phase()
    }

    pub fn styles(&self) -> &StyleSheet {
        &self.config.styles
    }

    // -- Pointer interface --

    pub fn pointer_pressed(&mut self, pos: Vec2) {
        let hit = self.hit.hit_test(pos);
        if let HitResult::Node(id) = &hit {
            let id = id.clone();
            // The target may be stale if data changed underneath; no-op then.
            if let Some(node) = self.model.get_node_mut(&id) {
                let at = node.position;
                node.pinned = Some(at);
                self.drag = Some(DragState {
                    node: id.clone(),
                    press_pos: pos,
                    moved: false,
                });
                self.sim.reheat();
                self.emit_drag(DragPhase::Started, id, at);
            }
        }
        self.pressed = Some((hit, pos));
    }

    pub fn pointer_moved(&mut self, pos: Vec2) {
        if self.drag.is_some() {
            self.drag_to(pos);
            return;
        }

        let hit = self.hit.hit_test(pos);
        if hit == self.hover {
            return;
        }
        self.hover = hit.clone();
        let info = self.resolve_hover(&hit);
        if let Some(handler) = self.on_hover.as_mut() {
            handler(info);
        }
    }

    pub fn pointer_released(&mut self, pos: Vec2) {
        if let Some(drag) = self.drag.take() {
            if let Some(node) = self.model.get_node_mut(&drag.node) {
                node.pinned = None;
            }
            self.sim.cool();
            self.emit_drag(DragPhase::Ended, drag.node.clone(), pos);

            // A press-release without real movement is a click.
            if !drag.moved
                && let Some(selection) = self.resolve_selection(&HitResult::Node(drag.node))
                && let Some(handler) = self.on_select.as_mut()
            {
                handler(selection);
            }
            self.pressed = None;
            return;
        }

        if let Some((hit, press_pos)) = self.pressed.take()
            && press_pos.distance(pos) <= CLICK_SLOP
            && let Some(selection) = self.resolve_selection(&hit)
            && let Some(handler) = self.on_select.as_mut()
        {
            handler(selection);
        }
    }

    /// Pointer left the surface; hide any tooltip.
    pub fn pointer_left(&mut self) {
        self.clear_hover();
    }

    fn drag_to(&mut self, pos: Vec2) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        if drag.press_pos.distance(pos) > CLICK_SLOP {
            drag.moved = true;
        }
        let id = drag.node.clone();
        match self.model.get_node_mut(&id) {
            Some(node) => {
                node.pinned = Some(pos);
                node.position = pos;
                self.emit_drag(DragPhase::Moved, id, pos);
            }
            // Data changed underneath the gesture; drop it quietly.
            None => self.drag = None,
        }
    }

    fn release_drag_pin(&mut self) {
        if let Some(drag) = self.drag.take() {
            if let Some(node) = self.model.get_node_mut(&drag.node) {
                node.pinned = None;
            }
            self.sim.cool();
        }
    }

    fn clear_hover(&mut self) {
        if self.hover != HitResult::None {
            self.hover = HitResult::None;
            if let Some(handler) = self.on_hover.as_mut() {
                handler(None);
            }
        }
    }

    fn emit_drag(&mut self, phase: DragPhase, node: ThingId, position: Vec2) {
        if let Some(handler) = self.on_drag.as_mut() {
            handler(DragEvent {
                phase,
                node,
                position,
            });
        }
    }

    /// Resolve a hit against current data. A stale id yields `None` rather
    /// than an error; the caller no-ops.
    fn resolve_hover(&self, hit: &HitResult) -> Option<HoverInfo> {
        match hit {
            HitResult::None => None,
            HitResult::Node(id) => {
                let node = self.model.get_node(id)?;
                Some(HoverInfo::Node(NodeTooltip {
                    name: node.name.clone(),
                    kind: node.kind,
                    description: node.description.clone(),
                }))
            }
            HitResult::Edge(id) => {
                let edge = self.model.get_edge(id)?;
                let source = self.model.graph.node_weight(edge.source_idx)?;
                let target = self.model.graph.node_weight(edge.target_idx)?;
                Some(HoverInfo::Edge(EdgeTooltip {
                    label: relation_label(edge.kind).to_string(),
                    source_name: source.name.clone(),
                    target_name: target.name.clone(),
                    description: edge.description.clone(),
                }))
            }
        }
    }

    fn resolve_selection(&self, hit: &HitResult) -> Option<Selection> {
        match hit {
            HitResult::None => None,
            HitResult::Node(id) => {
                let node = self.model.get_node(id)?;
                Some(Selection::Node(NodeDetail {
                    id: node.id.clone(),
                    name: node.name.clone(),
                    kind: node.kind,
                    description: node.description.clone(),
                    attributes: node.attributes.clone(),
                    features: node.features.clone(),
                }))
            }
            HitResult::Edge(id) => {
                let edge = self.model.get_edge(id)?;
                let source = self.model.graph.node_weight(edge.source_idx)?;
                let target = self.model.graph.node_weight(edge.target_idx)?;
                Some(Selection::Edge(EdgeDetail {
                    id: edge.id.clone(),
                    kind: edge.kind,
                    label: relation_label(edge.kind).to_string(),
                    strength: edge.kind.strength(),
                    name: edge.name.clone(),
                    source_name: source.name.clone(),
                    target_name: target.name.clone(),
                    description: edge.description.clone(),
                    properties: edge.properties.clone(),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::sync::Mutex;
    use twinmap_core::{Relation, RelationId, RelationKind, Strength, Thing, ThingKind};

    const DT: f32 = 1.0 / 60.0;

    /// Replays a scripted sequence of fetch results.
    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<(Vec<Thing>, Vec<Relation>), ClientError>>>,
    }

    impl ScriptedSource {
        fn new(
            responses: impl IntoIterator<Item = Result<(Vec<Thing>, Vec<Relation>), ClientError>>,
        ) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().collect()),
            }
        }

        fn ok(things: Vec<Thing>, relations: Vec<Relation>) -> Self {
            Self::new([Ok((things, relations))])
        }

        fn failure() -> Result<(Vec<Thing>, Vec<Relation>), ClientError> {
            Err(ClientError::Api {
                endpoint: "/api/v1/things".to_string(),
                message: "backend down".to_string(),
            })
        }
    }

    impl GraphSource for ScriptedSource {
        async fn fetch_graph(&self) -> Result<(Vec<Thing>, Vec<Relation>), ClientError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(Self::failure)
        }
    }

    fn thing(id: &str, name: &str, kind: ThingKind) -> Thing {
        Thing {
            id: ThingId(id.to_string()),
            name: name.to_string(),
            kind,
            description: format!("{name} description"),
            attributes: Map::new(),
            features: Map::new(),
            created_at: None,
            updated_at: None,
        }
    }

    fn relation(id: &str, source: &str, target: &str, kind: RelationKind) -> Relation {
        Relation {
            id: RelationId(id.to_string()),
            source: ThingId(source.to_string()),
            target: ThingId(target.to_string()),
            kind,
            name: id.to_uppercase(),
            description: String::new(),
            properties: Map::new(),
            created_at: None,
            updated_at: None,
        }
    }

    fn sample_data() -> (Vec<Thing>, Vec<Relation>) {
        (
            vec![
                thing("1", "Alice", ThingKind::Person),
                thing("2", "Sensor-1", ThingKind::Machine),
            ],
            vec![
                relation("r1", "1", "2", RelationKind::Owns),
                relation("r2", "1", "99", RelationKind::RelatesTo),
            ],
        )
    }

    async fn initialized_engine() -> GraphEngine<ScriptedSource> {
        let (things, relations) = sample_data();
        let mut engine =
            GraphEngine::new(ScriptedSource::ok(things, relations), EngineConfig::default());
        engine.initialize(Viewport::default()).await.unwrap();
        engine
    }

    fn node_position(engine: &GraphEngine<ScriptedSource>, id: &str) -> Vec2 {
        engine.model().get_node(&id.into()).unwrap().position
    }

    #[tokio::test]
    async fn initialize_builds_graph_and_drops_ghost_edge() {
        let engine = initialized_engine().await;

        assert_eq!(engine.model().node_count(), 2);
        assert_eq!(engine.model().edge_count(), 1);
        assert!(engine.model().get_edge(&"r1".into()).is_some());

        let dropped = engine.dropped_edges();
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].id, RelationId("r2".into()));
        assert_eq!(dropped[0].target, ThingId("99".into()));

        assert_eq!(engine.phase(), SimulationPhase::Running);
    }

    #[tokio::test]
    async fn fetch_failure_keeps_previous_graph() {
        let (things, relations) = sample_data();
        let mut engine = GraphEngine::new(
            ScriptedSource::new([Ok((things, relations)), ScriptedSource::failure()]),
            EngineConfig::default(),
        );
        engine.initialize(Viewport::default()).await.unwrap();

        for _ in 0..20 {
            engine.tick(DT);
        }
        let generation = engine.model().generation();
        let positions = node_position(&engine, "1");

        let err = engine.refresh().await.unwrap_err();
        assert!(matches!(err, ClientError::Api { .. }));

        // Nothing was torn down or partially rebuilt.
        assert_eq!(engine.model().generation(), generation);
        assert_eq!(engine.model().node_count(), 2);
        assert_eq!(node_position(&engine, "1"), positions);
    }

    #[tokio::test]
    async fn initial_fetch_failure_leaves_engine_empty_but_usable() {
        let mut engine = GraphEngine::new(
            ScriptedSource::new([ScriptedSource::failure()]),
            EngineConfig::default(),
        );
        assert!(engine.initialize(Viewport::default()).await.is_err());
        assert_eq!(engine.model().node_count(), 0);

        // Ticks and pointer events degrade to no-ops, not panics.
        assert!(!engine.tick(DT));
        engine.pointer_moved(Vec2::new(10.0, 10.0));
        engine.pointer_pressed(Vec2::new(10.0, 10.0));
        engine.pointer_released(Vec2::new(10.0, 10.0));
    }

    #[tokio::test]
    async fn refresh_supersedes_previous_simulation() {
        let (things, relations) = sample_data();
        let replacement = (
            vec![thing("3", "Replacement", ThingKind::Object)],
            Vec::new(),
        );
        let mut engine = GraphEngine::new(
            ScriptedSource::new([Ok((things, relations)), Ok(replacement)]),
            EngineConfig::default(),
        );
        engine.initialize(Viewport::default()).await.unwrap();
        engine.tick(DT);

        engine.refresh().await.unwrap();
        assert_eq!(engine.model().node_count(), 1);
        // The fresh simulation drives the new model.
        assert_eq!(engine.phase(), SimulationPhase::Running);
        assert!(engine.tick(DT));
    }

    #[tokio::test]
    async fn apply_filter_recomputes_visible_and_restarts_energy() {
        let mut engine = initialized_engine().await;
        while engine.phase() != SimulationPhase::Idle {
            engine.tick(DT);
        }

        engine.apply_filter(GraphFilter {
            thing_kind: Some(ThingKind::Machine),
            ..Default::default()
        });

        assert_eq!(engine.visible().node_count(), 1);
        assert_eq!(engine.visible().edge_count(), 0);
        assert_eq!(engine.phase(), SimulationPhase::Running);
    }

    #[tokio::test]
    async fn reset_restarts_energy_without_rebuilding() {
        let mut engine = initialized_engine().await;
        let generation = engine.model().generation();
        while engine.phase() != SimulationPhase::Idle {
            engine.tick(DT);
        }

        engine.reset();
        assert_eq!(engine.phase(), SimulationPhase::Running);
        assert_eq!(engine.model().generation(), generation);
    }

    #[tokio::test]
    async fn hover_over_node_emits_tooltip_and_clears_on_leave() {
        let mut engine = initialized_engine().await;
        let events: Rc<RefCell<Vec<Option<HoverInfo>>>> = Rc::default();
        let sink = events.clone();
        engine.on_hover(move |info| sink.borrow_mut().push(info));

        let pos = node_position(&engine, "1");
        engine.pointer_moved(pos);
        engine.pointer_left();

        let events = events.borrow();
        assert_eq!(events.len(), 2);
        match &events[0] {
            Some(HoverInfo::Node(tooltip)) => {
                assert_eq!(tooltip.name, "Alice");
                assert_eq!(tooltip.kind, ThingKind::Person);
            }
            other => panic!("expected node tooltip, got {other:?}"),
        }
        assert_eq!(events[1], None);
    }

    #[tokio::test]
    async fn hover_over_edge_resolves_endpoint_names() {
        let mut engine = initialized_engine().await;
        let events: Rc<RefCell<Vec<Option<HoverInfo>>>> = Rc::default();
        let sink = events.clone();
        engine.on_hover(move |info| sink.borrow_mut().push(info));

        // Fix both endpoints so the midpoint is a clean edge hit.
        engine.model.get_node_mut(&"1".into()).unwrap().position = Vec2::new(100.0, 100.0);
        engine.model.get_node_mut(&"2".into()).unwrap().position = Vec2::new(300.0, 100.0);
        engine.hit.update(&engine.model, &engine.visible);

        engine.pointer_moved(Vec2::new(200.0, 100.0));

        let events = events.borrow();
        match events.first() {
            Some(Some(HoverInfo::Edge(tooltip))) => {
                assert_eq!(tooltip.label, "Owns");
                assert_eq!(tooltip.source_name, "Alice");
                assert_eq!(tooltip.target_name, "Sensor-1");
            }
            other => panic!("expected edge tooltip, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn hover_over_empty_space_is_silent() {
        let mut engine = initialized_engine().await;
        let events: Rc<RefCell<Vec<Option<HoverInfo>>>> = Rc::default();
        let sink = events.clone();
        engine.on_hover(move |info| sink.borrow_mut().push(info));

        engine.pointer_moved(Vec2::new(-500.0, -500.0));
        engine.pointer_left();
        assert!(events.borrow().is_empty());
    }

    #[tokio::test]
    async fn click_on_node_emits_detail() {
        let mut engine = initialized_engine().await;
        let selections: Rc<RefCell<Vec<Selection>>> = Rc::default();
        let sink = selections.clone();
        engine.on_select(move |selection| sink.borrow_mut().push(selection));

        let pos = node_position(&engine, "2");
        engine.pointer_pressed(pos);
        engine.pointer_released(pos);

        let selections = selections.borrow();
        assert_eq!(selections.len(), 1);
        match &selections[0] {
            Selection::Node(detail) => {
                assert_eq!(detail.id, ThingId("2".into()));
                assert_eq!(detail.name, "Sensor-1");
                assert_eq!(detail.kind, ThingKind::Machine);
            }
            other => panic!("expected node detail, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn click_on_edge_includes_strength_classification() {
        let mut engine = initialized_engine().await;
        let selections: Rc<RefCell<Vec<Selection>>> = Rc::default();
        let sink = selections.clone();
        engine.on_select(move |selection| sink.borrow_mut().push(selection));

        engine.model.get_node_mut(&"1".into()).unwrap().position = Vec2::new(100.0, 100.0);
        engine.model.get_node_mut(&"2".into()).unwrap().position = Vec2::new(300.0, 100.0);
        engine.hit.update(&engine.model, &engine.visible);

        let mid = Vec2::new(200.0, 100.0);
        engine.pointer_pressed(mid);
        engine.pointer_released(mid);

        let selections = selections.borrow();
        assert_eq!(selections.len(), 1);
        match &selections[0] {
            Selection::Edge(detail) => {
                assert_eq!(detail.id, RelationId("r1".into()));
                assert_eq!(detail.strength, Strength::Strong);
                assert_eq!(detail.label, "Owns");
                assert_eq!(detail.source_name, "Alice");
            }
            other => panic!("expected edge detail, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn drag_pins_node_and_release_unpins() {
        let mut engine = initialized_engine().await;
        let events: Rc<RefCell<Vec<DragEvent>>> = Rc::default();
        let sink = events.clone();
        engine.on_drag(move |event| sink.borrow_mut().push(event));

        let start = node_position(&engine, "1");
        engine.pointer_pressed(start);

        // While dragged, repeated ticks never move the node.
        let dragged_to = Vec2::new(start.x + 80.0, start.y + 40.0);
        engine.pointer_moved(dragged_to);
        for _ in 0..30 {
            engine.tick(DT);
            assert_eq!(node_position(&engine, "1"), dragged_to);
        }

        engine.pointer_released(dragged_to);
        assert!(
            engine
                .model()
                .get_node(&"1".into())
                .unwrap()
                .pinned
                .is_none()
        );

        // Once unpinned the node rejoins free simulation within a bounded
        // number of ticks.
        let mut moved = false;
        for _ in 0..120 {
            engine.tick(DT);
            if node_position(&engine, "1") != dragged_to {
                moved = true;
                break;
            }
        }
        assert!(moved, "node stayed frozen after release");

        let phases: Vec<DragPhase> = events.borrow().iter().map(|e| e.phase).collect();
        assert_eq!(phases.first(), Some(&DragPhase::Started));
        assert!(phases.contains(&DragPhase::Moved));
        assert_eq!(phases.last(), Some(&DragPhase::Ended));
    }

    #[tokio::test]
    async fn drag_without_movement_still_counts_as_click() {
        let mut engine = initialized_engine().await;
        let selections: Rc<RefCell<Vec<Selection>>> = Rc::default();
        let sink = selections.clone();
        engine.on_select(move |selection| sink.borrow_mut().push(selection));

        let pos = node_position(&engine, "1");
        engine.pointer_pressed(pos);
        engine.pointer_released(Vec2::new(pos.x + 1.0, pos.y));

        assert_eq!(selections.borrow().len(), 1);
    }

    #[tokio::test]
    async fn real_drag_suppresses_click() {
        let mut engine = initialized_engine().await;
        let selections: Rc<RefCell<Vec<Selection>>> = Rc::default();
        let sink = selections.clone();
        engine.on_select(move |selection| sink.borrow_mut().push(selection));

        let pos = node_position(&engine, "1");
        engine.pointer_pressed(pos);
        engine.pointer_moved(Vec2::new(pos.x + 50.0, pos.y));
        engine.pointer_released(Vec2::new(pos.x + 50.0, pos.y));

        assert!(selections.borrow().is_empty());
    }

    #[tokio::test]
    async fn filter_during_drag_releases_the_pin() {
        let mut engine = initialized_engine().await;
        let start = node_position(&engine, "1");
        engine.pointer_pressed(start);
        assert!(
            engine
                .model()
                .get_node(&"1".into())
                .unwrap()
                .pinned
                .is_some()
        );

        engine.apply_filter(GraphFilter {
            thing_kind: Some(ThingKind::Machine),
            ..Default::default()
        });
        assert!(
            engine
                .model()
                .get_node(&"1".into())
                .unwrap()
                .pinned
                .is_none()
        );
    }
}
