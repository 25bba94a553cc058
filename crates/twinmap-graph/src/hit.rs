use crate::filter::VisibleGraph;
use crate::graph::{GraphModel, Vec2};
use twinmap_core::{RelationId, ThingId};

/// Result of a hit test at a given position.
///
/// Priority order: Node > Edge > None.
#[derive(Debug, Clone, PartialEq)]
pub enum HitResult {
    /// Nothing was hit at the tested position.
    None,
    /// A node circle was hit.
    Node(ThingId),
    /// An edge segment was hit within tolerance.
    Edge(RelationId),
}

/// Hit tester over the current visible subgraph.
///
/// Holds a snapshot of node circles and edge segments; call `update` after
/// layout ticks or filter changes to refresh the spatial data.
#[derive(Debug, Clone, Default)]
pub struct HitTester {
    node_circles: Vec<(ThingId, Vec2)>,
    edge_segments: Vec<(RelationId, Vec2, Vec2)>,
    node_radius: f32,
    edge_tolerance: f32,
}

impl HitTester {
    /// Default node radius matches the rendered circle; the edge tolerance
    /// gives line hits a forgiving band.
    pub fn new() -> Self {
        Self {
            node_circles: Vec::new(),
            edge_segments: Vec::new(),
            node_radius: 15.0,
            edge_tolerance: 8.0,
        }
    }

    pub fn with_tolerances(node_radius: f32, edge_tolerance: f32) -> Self {
        Self {
            node_radius,
            edge_tolerance,
            ..Self::new()
        }
    }

    pub fn node_radius(&self) -> f32 {
        self.node_radius
    }

    /// Rebuild hit regions from the visible subgraph's current positions.
    pub fn update(&mut self, model: &GraphModel, visible: &VisibleGraph) {
        self.node_circles.clear();
        self.edge_segments.clear();

        for &idx in &visible.nodes {
            let node = &model.graph[idx];
            self.node_circles.push((node.id.clone(), node.position));
        }
        for &idx in &visible.edges {
            let edge = &model.graph[idx];
            self.edge_segments.push((
                edge.id.clone(),
                model.graph[edge.source_idx].position,
                model.graph[edge.target_idx].position,
            ));
        }
    }

    /// Hit test with priority Node > Edge > None.
    pub fn hit_test(&self, pos: Vec2) -> HitResult {
        if let Some(id) = self.hit_test_node(pos) {
            return HitResult::Node(id);
        }
        if let Some(id) = self.hit_test_edge(pos) {
            return HitResult::Edge(id);
        }
        HitResult::None
    }

    /// Nearest node whose circle contains the position.
    pub fn hit_test_node(&self, pos: Vec2) -> Option<ThingId> {
        let mut best: Option<(&ThingId, f32)> = None;
        for (id, center) in &self.node_circles {
            let dist = center.distance(pos);
            if dist <= self.node_radius {
                match best {
                    Some((_, best_dist)) if dist >= best_dist => {}
                    _ => best = Some((id, dist)),
                }
            }
        }
        best.map(|(id, _)| id.clone())
    }

    /// Closest edge segment within tolerance.
    pub fn hit_test_edge(&self, pos: Vec2) -> Option<RelationId> {
        let mut best: Option<(&RelationId, f32)> = None;
        for (id, a, b) in &self.edge_segments {
            let dist = point_segment_distance(pos, *a, *b);
            if dist <= self.edge_tolerance {
                match best {
                    Some((_, best_dist)) if dist >= best_dist => {}
                    _ => best = Some((id, dist)),
                }
            }
        }
        best.map(|(id, _)| id.clone())
    }
}

/// Distance from a point to the closed segment `[a, b]`.
fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.x * ab.x + ab.y * ab.y;
    if len2 <= f32::EPSILON {
        return p.distance(a);
    }
    let ap = p - a;
    let t = ((ap.x * ab.x + ap.y * ab.y) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
