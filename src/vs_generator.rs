//! Graph generators
//!
//! The network model consumes any [`GraphGenerator`]: it only needs an
//! undirected simple graph over `0..num_persons` with a position per node.
//! Self-loops, duplicate edges and dangling endpoints are rejected later by
//! `Network::initialize`.

use std::f64::consts::TAU;

use crate::vs_error::{SimError, SimResult};
use crate::vs_interface::{NodeId, Position};
use crate::vs_random::UniformSource;

/// Default connection radius for random geometric graphs
pub const DEFAULT_RADIUS: f64 = 0.1;

/// Output of a generator: one position per node and an undirected edge list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedGraph {
    pub positions: Vec<Position>,
    pub edges: Vec<(NodeId, NodeId)>,
}

/// Capability contract for graph generation
pub trait GraphGenerator {
    fn generate(
        &mut self,
        num_persons: usize,
        rng: &mut dyn UniformSource,
    ) -> SimResult<GeneratedGraph>;
}

/// Random geometric graph: nodes placed uniformly in the unit square, joined
/// when their euclidean distance is at most `radius`.
#[derive(Debug, Clone, Copy)]
pub struct RandomGeometricGenerator {
    pub radius: f64,
}

impl RandomGeometricGenerator {
    pub fn new(radius: f64) -> SimResult<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(SimError::config(format!(
                "connection radius must be positive, got {}",
                radius
            )));
        }
        Ok(Self { radius })
    }
}

impl Default for RandomGeometricGenerator {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
        }
    }
}

impl GraphGenerator for RandomGeometricGenerator {
    fn generate(
        &mut self,
        num_persons: usize,
        rng: &mut dyn UniformSource,
    ) -> SimResult<GeneratedGraph> {
        let positions: Vec<Position> = (0..num_persons)
            .map(|_| (rng.next_uniform(), rng.next_uniform()))
            .collect();

        // Bucket nodes into cells of side at least `radius` so only adjacent cells
        // are compared. The grid never has more cells than nodes.
        let by_radius = (1.0 / self.radius).floor();
        let by_population = (num_persons as f64).sqrt().ceil();
        let cells_per_side = (by_radius.min(by_population) as usize).max(1);
        let cell_of = |p: &Position| -> (usize, usize) {
            let cx = ((p.0 * cells_per_side as f64) as usize).min(cells_per_side - 1);
            let cy = ((p.1 * cells_per_side as f64) as usize).min(cells_per_side - 1);
            (cx, cy)
        };

        let mut grid: Vec<Vec<NodeId>> = vec![Vec::new(); cells_per_side * cells_per_side];
        for (id, p) in positions.iter().enumerate() {
            let (cx, cy) = cell_of(p);
            grid[cy * cells_per_side + cx].push(id);
        }

        let radius_sq = self.radius * self.radius;
        let mut edges = Vec::new();
        for (u, pu) in positions.iter().enumerate() {
            let (cx, cy) = cell_of(pu);
            for ny in cy.saturating_sub(1)..=(cy + 1).min(cells_per_side - 1) {
                for nx in cx.saturating_sub(1)..=(cx + 1).min(cells_per_side - 1) {
                    for &v in &grid[ny * cells_per_side + nx] {
                        if v <= u {
                            continue;
                        }
                        let pv = positions[v];
                        let dx = pu.0 - pv.0;
                        let dy = pu.1 - pv.1;
                        if dx * dx + dy * dy <= radius_sq {
                            edges.push((u, v));
                        }
                    }
                }
            }
        }

        edges.sort_unstable();
        Ok(GeneratedGraph { positions, edges })
    }
}

/// Ring: node `i` is joined to `i + 1` (wrapping), nodes laid out on a circle
#[derive(Debug, Clone, Copy, Default)]
pub struct RingGenerator;

impl GraphGenerator for RingGenerator {
    fn generate(
        &mut self,
        num_persons: usize,
        _rng: &mut dyn UniformSource,
    ) -> SimResult<GeneratedGraph> {
        let positions = circle_layout(num_persons);
        let edges = match num_persons {
            0 | 1 => Vec::new(),
            2 => vec![(0, 1)],
            n => (0..n).map(|i| (i, (i + 1) % n)).collect(),
        };
        Ok(GeneratedGraph { positions, edges })
    }
}

/// Hand-built graph from an explicit edge list
#[derive(Debug, Clone, Default)]
pub struct EdgeListGenerator {
    pub edges: Vec<(NodeId, NodeId)>,
}

impl EdgeListGenerator {
    pub fn new(edges: Vec<(NodeId, NodeId)>) -> Self {
        Self { edges }
    }

    /// Path graph 0 - 1 - ... - (n-1)
    pub fn line(n: usize) -> Self {
        Self::new((1..n).map(|i| (i - 1, i)).collect())
    }

    /// Star with `center` joined to every node in `leaves`
    pub fn star(center: NodeId, leaves: impl IntoIterator<Item = NodeId>) -> Self {
        Self::new(leaves.into_iter().map(|leaf| (center, leaf)).collect())
    }
}

impl GraphGenerator for EdgeListGenerator {
    fn generate(
        &mut self,
        num_persons: usize,
        _rng: &mut dyn UniformSource,
    ) -> SimResult<GeneratedGraph> {
        Ok(GeneratedGraph {
            positions: circle_layout(num_persons),
            edges: self.edges.clone(),
        })
    }
}

/// Evenly spaced points on a circle inside the unit square
fn circle_layout(n: usize) -> Vec<Position> {
    (0..n)
        .map(|i| {
            let angle = TAU * i as f64 / n.max(1) as f64;
            (0.5 + 0.4 * angle.cos(), 0.5 + 0.4 * angle.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_geometric_graph_is_simple() {
        let mut rng = StdRng::from_seed([1u8; 32]);
        let graph = RandomGeometricGenerator::default()
            .generate(400, &mut rng)
            .unwrap();

        assert_eq!(graph.positions.len(), 400);
        let mut seen = HashSet::new();
        for &(u, v) in &graph.edges {
            assert!(u < v, "edge ({}, {}) not normalized", u, v);
            assert!(v < 400);
            assert!(seen.insert((u, v)), "duplicate edge ({}, {})", u, v);
        }
    }

    #[test]
    fn test_geometric_graph_matches_brute_force() {
        let mut rng = StdRng::from_seed([2u8; 32]);
        let radius = 0.15;
        let graph = RandomGeometricGenerator::new(radius)
            .unwrap()
            .generate(200, &mut rng)
            .unwrap();

        let mut expected = Vec::new();
        for u in 0..200 {
            for v in (u + 1)..200 {
                let (a, b) = (graph.positions[u], graph.positions[v]);
                let (dx, dy) = (a.0 - b.0, a.1 - b.1);
                if dx * dx + dy * dy <= radius * radius {
                    expected.push((u, v));
                }
            }
        }
        assert_eq!(graph.edges, expected);
    }

    #[test]
    fn test_geometric_positions_in_unit_square() {
        let mut rng = StdRng::from_seed([4u8; 32]);
        let graph = RandomGeometricGenerator::default()
            .generate(100, &mut rng)
            .unwrap();
        for (x, y) in graph.positions {
            assert!((0.0..1.0).contains(&x));
            assert!((0.0..1.0).contains(&y));
        }
    }

    #[test]
    fn test_tiny_radius_yields_no_edges() {
        let mut rng = StdRng::from_seed([5u8; 32]);
        let graph = RandomGeometricGenerator::new(1e-10)
            .unwrap()
            .generate(10, &mut rng)
            .unwrap();
        assert_eq!(graph.positions.len(), 10);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_small_radius_large_population_matches_brute_force() {
        // grid capped by population, cells wider than the radius
        let mut rng = StdRng::from_seed([6u8; 32]);
        let radius = 0.001;
        let graph = RandomGeometricGenerator::new(radius)
            .unwrap()
            .generate(300, &mut rng)
            .unwrap();

        let mut expected = Vec::new();
        for u in 0..300 {
            for v in (u + 1)..300 {
                let (a, b) = (graph.positions[u], graph.positions[v]);
                let (dx, dy) = (a.0 - b.0, a.1 - b.1);
                if dx * dx + dy * dy <= radius * radius {
                    expected.push((u, v));
                }
            }
        }
        assert_eq!(graph.edges, expected);
    }

    #[test]
    fn test_invalid_radius() {
        assert!(RandomGeometricGenerator::new(0.0).is_err());
        assert!(RandomGeometricGenerator::new(-1.0).is_err());
        assert!(RandomGeometricGenerator::new(f64::NAN).is_err());
    }

    #[test]
    fn test_ring_edges() {
        let mut rng = StdRng::from_seed([0u8; 32]);
        let graph = RingGenerator.generate(5, &mut rng).unwrap();
        assert_eq!(graph.edges, vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]);
        assert_eq!(graph.positions.len(), 5);

        assert!(RingGenerator.generate(1, &mut rng).unwrap().edges.is_empty());
        assert_eq!(RingGenerator.generate(2, &mut rng).unwrap().edges, vec![(0, 1)]);
    }

    #[test]
    fn test_edge_list_helpers() {
        assert_eq!(EdgeListGenerator::line(4).edges, vec![(0, 1), (1, 2), (2, 3)]);
        assert_eq!(
            EdgeListGenerator::star(0, 1..4).edges,
            vec![(0, 1), (0, 2), (0, 3)]
        );
    }
}
