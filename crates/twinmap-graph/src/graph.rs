use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Sub};
use std::sync::atomic::{AtomicU64, Ordering};
use twinmap_core::{Relation, RelationId, RelationKind, Thing, ThingId, ThingKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeIndex(pub usize);

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeIndex(pub usize);

impl fmt::Display for EdgeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (self - other).length()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// A thing projected into the graph, with its live simulation state.
///
/// The snapshot fields are immutable for the lifetime of the model; only
/// `position`, `velocity` and `pinned` change between ticks.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: ThingId,
    pub name: String,
    pub kind: ThingKind,
    pub description: String,
    pub attributes: Map<String, Value>,
    pub features: Map<String, Value>,

    // Simulation state
    pub position: Vec2,
    pub velocity: Vec2,
    /// While set, the simulator treats the position as fixed input (drag in
    /// progress). Cleared when the gesture ends.
    pub pinned: Option<Vec2>,
}

impl GraphNode {
    fn from_thing(thing: Thing) -> Self {
        Self {
            id: thing.id,
            name: thing.name,
            kind: thing.kind,
            description: thing.description,
            attributes: thing.attributes,
            features: thing.features,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            pinned: None,
        }
    }
}

/// A relationship projected into the graph with resolved endpoint indices.
#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub id: RelationId,
    pub source: ThingId,
    pub target: ThingId,
    pub kind: RelationKind,
    pub name: String,
    pub description: String,
    pub properties: Map<String, Value>,
    pub source_idx: NodeIndex,
    pub target_idx: NodeIndex,
}

/// Flat node/edge storage indexed by the `NodeIndex`/`EdgeIndex` newtypes.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: GraphNode) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len());
        self.nodes.push(node);
        idx
    }

    pub fn add_edge(&mut self, edge: GraphEdge) -> EdgeIndex {
        let idx = EdgeIndex(self.edges.len());
        self.edges.push(edge);
        idx
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // `use<>`: the returned iterators borrow nothing, so callers may keep
    // mutating the graph while holding them.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + use<> {
        (0..self.nodes.len()).map(NodeIndex)
    }

    pub fn edge_indices(&self) -> impl Iterator<Item = EdgeIndex> + use<> {
        (0..self.edges.len()).map(EdgeIndex)
    }

    pub fn edge_endpoints(&self, index: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.edges
            .get(index.0)
            .map(|e| (e.source_idx, e.target_idx))
    }

    pub fn node_weight(&self, index: NodeIndex) -> Option<&GraphNode> {
        self.nodes.get(index.0)
    }

    pub fn edge_weight(&self, index: EdgeIndex) -> Option<&GraphEdge> {
        self.edges.get(index.0)
    }
}

impl Index<NodeIndex> for Graph {
    type Output = GraphNode;
    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index.0]
    }
}

impl IndexMut<NodeIndex> for Graph {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Self::Output {
        &mut self.nodes[index.0]
    }
}

impl Index<EdgeIndex> for Graph {
    type Output = GraphEdge;
    fn index(&self, index: EdgeIndex) -> &Self::Output {
        &self.edges[index.0]
    }
}

impl IndexMut<EdgeIndex> for Graph {
    fn index_mut(&mut self, index: EdgeIndex) -> &mut Self::Output {
        &mut self.edges[index.0]
    }
}

/// Record of a relationship excluded during reconciliation because one of
/// its endpoints is missing from the thing collection.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedEdge {
    pub id: RelationId,
    pub name: String,
    pub source: ThingId,
    pub target: ThingId,
}

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// The reconciled graph: every edge's endpoints are guaranteed present in
/// the node set.
///
/// Each model carries a unique generation stamp; a simulation bound to an
/// older generation refuses to write into a newer model.
#[derive(Debug)]
pub struct GraphModel {
    pub graph: Graph,
    pub node_map: HashMap<ThingId, NodeIndex>,
    pub edge_map: HashMap<RelationId, EdgeIndex>,
    dropped: Vec<DroppedEdge>,
    generation: u64,
}

impl Default for GraphModel {
    fn default() -> Self {
        Self::build(Vec::new(), Vec::new())
    }
}

impl GraphModel {
    /// Reconcile the two raw collections into a consistent graph.
    ///
    /// Relationships referencing a missing thing are excluded, each with one
    /// diagnostic entry. That is a tolerated condition, not a failure: the
    /// two collections are edited independently and only eventually agree.
    pub fn build(things: Vec<Thing>, relations: Vec<Relation>) -> Self {
        let mut graph = Graph::new();
        let mut node_map = HashMap::with_capacity(things.len());

        for thing in things {
            if node_map.contains_key(&thing.id) {
                tracing::warn!(id = %thing.id, "duplicate thing id, keeping first occurrence");
                continue;
            }
            let id = thing.id.clone();
            let idx = graph.add_node(GraphNode::from_thing(thing));
            node_map.insert(id, idx);
        }

        let mut edge_map = HashMap::with_capacity(relations.len());
        let mut dropped = Vec::new();

        for relation in relations {
            match (
                node_map.get(&relation.source).copied(),
                node_map.get(&relation.target).copied(),
            ) {
                (Some(source_idx), Some(target_idx)) => {
                    let id = relation.id.clone();
                    let idx = graph.add_edge(GraphEdge {
                        id: relation.id,
                        source: relation.source,
                        target: relation.target,
                        kind: relation.kind,
                        name: relation.name,
                        description: relation.description,
                        properties: relation.properties,
                        source_idx,
                        target_idx,
                    });
                    edge_map.insert(id, idx);
                }
                _ => {
                    tracing::warn!(
                        relation = %relation.name,
                        source = %relation.source,
                        target = %relation.target,
                        "dropping relationship that references a missing thing"
                    );
                    dropped.push(DroppedEdge {
                        id: relation.id,
                        name: relation.name,
                        source: relation.source,
                        target: relation.target,
                    });
                }
            }
        }

        Self {
            graph,
            node_map,
            edge_map,
            dropped,
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Diagnostic log of relationships excluded during reconciliation.
    pub fn dropped_edges(&self) -> &[DroppedEdge] {
        &self.dropped
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn get_node(&self, id: &ThingId) -> Option<&GraphNode> {
        self.node_map.get(id).map(|&idx| &self.graph[idx])
    }

    pub fn get_node_mut(&mut self, id: &ThingId) -> Option<&mut GraphNode> {
        self.node_map.get(id).map(|&idx| &mut self.graph[idx])
    }

    pub fn get_edge(&self, id: &RelationId) -> Option<&GraphEdge> {
        self.edge_map.get(id).map(|&idx| &self.graph[idx])
    }

    /// Seed node positions on a ring around `center` so the first simulation
    /// ticks start from a deterministic, non-degenerate arrangement.
    pub fn seed_positions(&mut self, center: Vec2, radius: f32) {
        let count = self.graph.node_count();
        if count == 0 {
            return;
        }
        let step = std::f32::consts::TAU / count as f32;
        for idx in self.graph.node_indices() {
            let angle = idx.0 as f32 * step;
            let node = &mut self.graph[idx];
            node.position = center + Vec2::new(radius * angle.cos(), radius * angle.sin());
            node.velocity = Vec2::ZERO;
            node.pinned = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{relation, thing};

    #[test]
    fn keeps_edges_with_both_endpoints_present() {
        let model = GraphModel::build(
            vec![
                thing("1", "Alice", ThingKind::Person),
                thing("2", "Sensor-1", ThingKind::Machine),
            ],
            vec![relation("r1", "1", "2", RelationKind::Owns)],
        );

        assert_eq!(model.node_count(), 2);
        assert_eq!(model.edge_count(), 1);
        assert!(model.dropped_edges().is_empty());
    }

    #[test]
    fn drops_dangling_edges_and_records_diagnostics() {
        // The end-to-end scenario: r2 targets a thing that does not exist.
        let model = GraphModel::build(
            vec![
                thing("1", "Alice", ThingKind::Person),
                thing("2", "Sensor-1", ThingKind::Machine),
            ],
            vec![
                relation("r1", "1", "2", RelationKind::Owns),
                relation("r2", "1", "99", RelationKind::RelatesTo),
            ],
        );

        assert_eq!(model.node_count(), 2);
        assert_eq!(model.edge_count(), 1);
        assert!(model.get_edge(&RelationId("r1".into())).is_some());
        assert!(model.get_edge(&RelationId("r2".into())).is_none());

        let dropped = model.dropped_edges();
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].id, RelationId("r2".into()));
        assert_eq!(dropped[0].source, ThingId("1".into()));
        assert_eq!(dropped[0].target, ThingId("99".into()));
    }

    #[test]
    fn no_edge_in_a_built_model_dangles() {
        let model = GraphModel::build(
            vec![thing("a", "A", ThingKind::Object)],
            vec![
                relation("r1", "a", "missing", RelationKind::Contains),
                relation("r2", "missing", "a", RelationKind::Contains),
                relation("r3", "x", "y", RelationKind::Contains),
            ],
        );

        for idx in model.graph.edge_indices() {
            let edge = &model.graph[idx];
            assert!(model.node_map.contains_key(&edge.source));
            assert!(model.node_map.contains_key(&edge.target));
        }
        assert_eq!(model.dropped_edges().len(), 3);
    }

    #[test]
    fn duplicate_thing_ids_keep_first_occurrence() {
        let model = GraphModel::build(
            vec![
                thing("1", "First", ThingKind::Person),
                thing("1", "Second", ThingKind::Machine),
            ],
            vec![],
        );
        assert_eq!(model.node_count(), 1);
        assert_eq!(model.get_node(&ThingId("1".into())).unwrap().name, "First");
    }

    #[test]
    fn seed_positions_places_nodes_apart() {
        let mut model = GraphModel::build(
            vec![
                thing("1", "A", ThingKind::Person),
                thing("2", "B", ThingKind::Person),
                thing("3", "C", ThingKind::Person),
            ],
            vec![],
        );
        model.seed_positions(Vec2::new(400.0, 300.0), 100.0);

        let positions: Vec<Vec2> = model
            .graph
            .node_indices()
            .map(|idx| model.graph[idx].position)
            .collect();
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                assert!(positions[i].distance(positions[j]) > 1.0);
            }
        }
    }

    #[test]
    fn index_iterators_allow_mutation_while_held() {
        let mut model = GraphModel::build(
            vec![
                thing("1", "A", ThingKind::Person),
                thing("2", "B", ThingKind::Machine),
            ],
            vec![relation("r1", "1", "2", RelationKind::Owns)],
        );

        for idx in model.graph.node_indices() {
            model.graph[idx].position = Vec2::new(idx.0 as f32, 0.0);
        }
        for idx in model.graph.edge_indices() {
            let edge = &model.graph[idx];
            let target = edge.target_idx;
            model.graph[target].velocity = Vec2::new(1.0, 0.0);
        }

        assert_eq!(model.graph[NodeIndex(1)].position, Vec2::new(1.0, 0.0));
        assert_eq!(model.graph[NodeIndex(1)].velocity, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn generations_are_unique_per_model() {
        let a = GraphModel::build(vec![], vec![]);
        let b = GraphModel::build(vec![], vec![]);
        assert_ne!(a.generation(), b.generation());
    }
}
