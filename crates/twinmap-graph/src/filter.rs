use crate::graph::{EdgeIndex, GraphModel, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use twinmap_core::{RelationKind, ThingKind};

/// Filter configuration for deriving the visible subgraph.
///
/// Both dimensions are optional and combine conjunctively. Values are drawn
/// from the closed kind enums, so there is no malformed-filter case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphFilter {
    pub relation_kind: Option<RelationKind>,
    pub thing_kind: Option<ThingKind>,
}

impl GraphFilter {
    pub fn is_empty(&self) -> bool {
        self.relation_kind.is_none() && self.thing_kind.is_none()
    }

    /// Derive the visible subgraph, in order:
    ///
    /// 1. reduce the node subset by thing kind (if set),
    /// 2. reduce the edge subset by relation kind (if set),
    /// 3. unconditionally drop edges whose endpoints left the node subset.
    ///
    /// Step 3 runs even when no thing-kind filter is set so the no-dangling
    /// invariant survives any future reduction source. Applying the same
    /// filter twice yields the identical subgraph.
    pub fn apply(&self, model: &GraphModel) -> VisibleGraph {
        let nodes: Vec<NodeIndex> = model
            .graph
            .node_indices()
            .filter(|&idx| match self.thing_kind {
                Some(kind) => model.graph[idx].kind == kind,
                None => true,
            })
            .collect();

        let visible_nodes: HashSet<NodeIndex> = nodes.iter().copied().collect();

        let edges: Vec<EdgeIndex> = model
            .graph
            .edge_indices()
            .filter(|&idx| {
                let edge = &model.graph[idx];
                match self.relation_kind {
                    Some(kind) if edge.kind != kind => return false,
                    _ => {}
                }
                visible_nodes.contains(&edge.source_idx) && visible_nodes.contains(&edge.target_idx)
            })
            .collect();

        VisibleGraph { nodes, edges }
    }
}

/// The filtered view of the graph currently rendered.
///
/// Invariant: every edge's endpoints are contained in `nodes`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleGraph {
    pub nodes: Vec<NodeIndex>,
    pub edges: Vec<EdgeIndex>,
}

impl VisibleGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::testutil::{relation, thing};
    use proptest::prelude::*;

    fn kind_for(i: usize) -> ThingKind {
        ThingKind::ALL[i % ThingKind::ALL.len()]
    }

    fn relation_kind_for(i: usize) -> RelationKind {
        RelationKind::ALL[i % RelationKind::ALL.len()]
    }

    fn arb_model() -> impl Strategy<Value = GraphModel> {
        // Node ids 0..n plus edges whose endpoints may reference ids beyond
        // the node range, so reconciliation always has something to drop.
        (1usize..12, proptest::collection::vec((0usize..16, 0usize..16, 0usize..7), 0..24))
            .prop_map(|(node_count, raw_edges)| {
                let things = (0..node_count)
                    .map(|i| thing(&i.to_string(), &format!("t{i}"), kind_for(i)))
                    .collect();
                let relations = raw_edges
                    .into_iter()
                    .enumerate()
                    .map(|(i, (s, t, k))| {
                        relation(
                            &format!("r{i}"),
                            &s.to_string(),
                            &t.to_string(),
                            relation_kind_for(k),
                        )
                    })
                    .collect();
                GraphModel::build(things, relations)
            })
    }

    proptest! {
        /// Every edge kept by reconciliation has both endpoints in the node
        /// set, and everything else is accounted for in the diagnostics.
        #[test]
        fn built_models_never_dangle(model in arb_model()) {
            for idx in model.graph.edge_indices() {
                let edge = &model.graph[idx];
                prop_assert!(model.node_map.contains_key(&edge.source));
                prop_assert!(model.node_map.contains_key(&edge.target));
            }
        }

        /// The visible subgraph never contains an edge whose endpoints are
        /// not both visible, for any filter configuration.
        #[test]
        fn visible_subgraphs_never_dangle(
            model in arb_model(),
            rk in proptest::option::of(0usize..7),
            tk in proptest::option::of(0usize..3),
        ) {
            let filter = GraphFilter {
                relation_kind: rk.map(relation_kind_for),
                thing_kind: tk.map(kind_for),
            };
            let visible = filter.apply(&model);
            let nodes: std::collections::HashSet<_> = visible.nodes.iter().copied().collect();
            for &idx in &visible.edges {
                let edge = &model.graph[idx];
                prop_assert!(nodes.contains(&edge.source_idx));
                prop_assert!(nodes.contains(&edge.target_idx));
            }
        }

        /// Filtering is idempotent for arbitrary models and configurations.
        #[test]
        fn filtering_is_idempotent(
            model in arb_model(),
            rk in proptest::option::of(0usize..7),
            tk in proptest::option::of(0usize..3),
        ) {
            let filter = GraphFilter {
                relation_kind: rk.map(relation_kind_for),
                thing_kind: tk.map(kind_for),
            };
            prop_assert_eq!(filter.apply(&model), filter.apply(&model));
        }
    }
}
