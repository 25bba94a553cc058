use crate::filter::VisibleGraph;
use crate::graph::{GraphModel, Vec2};
use std::collections::HashMap;

/// Tunable force coefficients. None of these are correctness constraints;
/// tests assert convergence behavior, not coordinates.
#[derive(Debug, Clone, Copy)]
pub struct ForceParams {
    /// Rest length of the link spring, identical for every edge.
    pub link_distance: f32,
    /// Spring constant for link attraction.
    pub link_strength: f32,
    /// Magnitude of the pairwise inverse-square repulsion.
    pub charge_strength: f32,
    /// Pull toward the viewport center.
    pub center_strength: f32,
    /// Minimum center-to-center separation enforced between nodes.
    pub collision_radius: f32,
    /// Per-tick velocity damping factor.
    pub velocity_decay: f32,
    /// Upper bound on per-tick displacement, to keep early high-energy
    /// ticks from flinging nodes off screen.
    pub max_step: f32,
}

impl Default for ForceParams {
    fn default() -> Self {
        Self {
            link_distance: 100.0,
            link_strength: 0.6,
            charge_strength: 300.0,
            center_strength: 0.08,
            collision_radius: 30.0,
            velocity_decay: 0.6,
            max_step: 30.0,
        }
    }
}

/// Lifecycle of the simulator's energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationPhase {
    /// No simulation running; ticks are no-ops.
    Idle,
    /// Forces applied at working energy.
    Running,
    /// Forces decaying toward zero; the standard terminal approach.
    Settling,
}

const ALPHA_MIN: f32 = 0.001;
const ALPHA_DECAY: f32 = 0.0228;
const SETTLING_ALPHA: f32 = 0.1;
const DRAG_ALPHA_TARGET: f32 = 0.3;

/// Iterative force-directed layout over the current visible subgraph.
///
/// Energy follows the familiar alpha model: `restart` sets full energy which
/// decays geometrically toward `alpha_target`; a drag raises the target so
/// the rest of the graph keeps reacting to the pinned node, and releasing
/// lowers it back toward convergence.
///
/// The simulation is bound to one model generation. A step against a model
/// from a newer load is a no-op, so a superseded simulation can never write
/// into replaced data.
#[derive(Debug)]
pub struct ForceSimulation {
    params: ForceParams,
    center: Vec2,
    alpha: f32,
    alpha_target: f32,
    generation: u64,
}

impl ForceSimulation {
    pub fn new(params: ForceParams, center: Vec2) -> Self {
        Self {
            params,
            center,
            alpha: 0.0,
            alpha_target: 0.0,
            generation: 0,
        }
    }

    /// Bind to a freshly built model and restart at full energy.
    pub fn bind(&mut self, model: &GraphModel) {
        self.generation = model.generation();
        self.restart();
    }

    /// Restart at full energy without touching node/edge data.
    pub fn restart(&mut self) {
        self.alpha = 1.0;
        self.alpha_target = 0.0;
        tracing::debug!("simulation restarted at full energy");
    }

    /// Raise energy to a working level; current positions are kept.
    pub fn reheat(&mut self) {
        self.alpha_target = DRAG_ALPHA_TARGET;
        tracing::debug!(target = DRAG_ALPHA_TARGET, "simulation reheated");
    }

    /// Let energy decay back toward convergence.
    pub fn cool(&mut self) {
        self.alpha_target = 0.0;
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    pub fn phase(&self) -> SimulationPhase {
        if self.alpha < ALPHA_MIN && self.alpha_target == 0.0 {
            SimulationPhase::Idle
        } else if self.alpha_target == 0.0 && self.alpha < SETTLING_ALPHA {
            SimulationPhase::Settling
        } else {
            SimulationPhase::Running
        }
    }

    /// Advance one tick. Returns whether any positions were updated.
    ///
    /// Synchronous and allocation-light; must complete within a frame and
    /// never blocks on I/O.
    pub fn step(&mut self, model: &mut GraphModel, visible: &VisibleGraph, dt: f32) -> bool {
        if self.generation != model.generation() {
            tracing::debug!(
                bound = self.generation,
                model = model.generation(),
                "ignoring tick for superseded simulation"
            );
            return false;
        }
        if self.phase() == SimulationPhase::Idle || visible.nodes.is_empty() {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * ALPHA_DECAY;

        let slots: HashMap<_, _> = visible
            .nodes
            .iter()
            .enumerate()
            .map(|(slot, &idx)| (idx, slot))
            .collect();
        let mut forces = vec![Vec2::ZERO; visible.nodes.len()];

        // Link attraction toward the rest length.
        for &edge_idx in &visible.edges {
            let edge = &model.graph[edge_idx];
            let (Some(&s), Some(&t)) = (slots.get(&edge.source_idx), slots.get(&edge.target_idx))
            else {
                continue;
            };
            let source_pos = model.graph[edge.source_idx].position;
            let target_pos = model.graph[edge.target_idx].position;

            let delta = target_pos - source_pos;
            let dist = delta.length().max(1.0);
            let dir = delta * (1.0 / dist);
            let stretch = dist - self.params.link_distance;
            let f = dir * (stretch * self.params.link_strength * self.alpha);

            forces[s] += f;
            forces[t] += f * -1.0;
        }

        // Pairwise repulsion, inverse-square on distance.
        for i in 0..visible.nodes.len() {
            for j in (i + 1)..visible.nodes.len() {
                let pi = model.graph[visible.nodes[i]].position;
                let pj = model.graph[visible.nodes[j]].position;

                let delta = pi - pj;
                let dist2 = (delta.x * delta.x + delta.y * delta.y).max(25.0);
                let dir = delta * (1.0 / dist2.sqrt());
                let f = dir * (self.params.charge_strength * self.alpha / dist2.sqrt());

                forces[i] += f;
                forces[j] += f * -1.0;
            }
        }

        // Centering pull.
        for (slot, &idx) in visible.nodes.iter().enumerate() {
            let pos = model.graph[idx].position;
            forces[slot] += (self.center - pos) * (self.params.center_strength * self.alpha);
        }

        // Integrate. A pinned node is fixed input: it exerted forces above
        // but its own update is suppressed.
        for (slot, &idx) in visible.nodes.iter().enumerate() {
            let node = &mut model.graph[idx];
            if let Some(pin) = node.pinned {
                node.position = pin;
                node.velocity = Vec2::ZERO;
                continue;
            }

            node.velocity = (node.velocity + forces[slot] * dt) * self.params.velocity_decay;
            let mut step = node.velocity * dt;
            let len = step.length();
            if len > self.params.max_step {
                step = step * (self.params.max_step / len);
            }
            node.position += step;
        }

        self.resolve_collisions(model, visible);
        true
    }

    /// Enforce the minimum center-to-center separation. Pinned nodes do not
    /// move; the free partner absorbs the full correction.
    fn resolve_collisions(&self, model: &mut GraphModel, visible: &VisibleGraph) {
        let min_dist = self.params.collision_radius * 2.0;

        for i in 0..visible.nodes.len() {
            for j in (i + 1)..visible.nodes.len() {
                let a = visible.nodes[i];
                let b = visible.nodes[j];
                let pa = model.graph[a].position;
                let pb = model.graph[b].position;

                let mut delta = pa - pb;
                let mut dist = delta.length();
                if dist >= min_dist {
                    continue;
                }
                if dist < f32::EPSILON {
                    // Coincident nodes: separate along a deterministic axis.
                    delta = Vec2::new(1.0, 0.0);
                    dist = 1.0;
                }

                let overlap = min_dist - dist;
                let dir = delta * (1.0 / dist);
                let a_pinned = model.graph[a].pinned.is_some();
                let b_pinned = model.graph[b].pinned.is_some();

                match (a_pinned, b_pinned) {
                    (true, true) => {}
                    (true, false) => {
                        model.graph[b].position += dir * -overlap;
                    }
                    (false, true) => {
                        model.graph[a].position += dir * overlap;
                    }
                    (false, false) => {
                        model.graph[a].position += dir * (overlap * 0.5);
                        model.graph[b].position += dir * (-overlap * 0.5);
                    }
                }
            }
        }
    }
}
