//! Network model
//!
//! Owns every piece of mutable simulation state: node attributes and the
//! undirected adjacency. Person nodes are created from a [`GraphGenerator`];
//! the influencer is appended afterwards. Nodes are never removed, and a node
//! that became a buyer stays a buyer with its first provenance.

use indexmap::IndexSet;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::vs_error::{SimError, SimResult};
use crate::vs_generator::{GeneratedGraph, GraphGenerator};
use crate::vs_interface::{BuyState, Influence, NodeId, NodeKind, Position, Stage};
use crate::vs_random::UniformSource;

/// Per-node attribute record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub state: BuyState,
    pub influenced_by: Influence,
    pub position: Position,
    /// Stage at which the node converted (None for non-buyers and the influencer)
    pub converted_at: Option<Stage>,
}

impl Node {
    fn person(id: NodeId, position: Position) -> Self {
        Self {
            id,
            kind: NodeKind::Person,
            state: BuyState::NoBuyer,
            influenced_by: Influence::None,
            position,
            converted_at: None,
        }
    }

    pub fn is_person(&self) -> bool {
        self.kind == NodeKind::Person
    }

    pub fn is_buyer(&self) -> bool {
        self.state.is_buyer()
    }
}

/// Read-only copy of the network for renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<(NodeId, NodeId)>,
    pub influencer: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Network {
    nodes: Vec<Node>,
    adjacency: Vec<IndexSet<NodeId>>,
    num_persons: usize,
    influencer: Option<NodeId>,
    edge_count: usize,
    peer_rounds_run: u32,
    outreach_passes_run: u32,
}

impl Network {
    /// Create `num_persons` Person nodes through `generator`, all in the
    /// default state (Person / No-Buyer / no provenance).
    pub fn initialize(
        num_persons: usize,
        generator: &mut dyn GraphGenerator,
        rng: &mut dyn UniformSource,
    ) -> SimResult<Self> {
        if num_persons == 0 {
            return Err(SimError::config("num_persons must be positive"));
        }
        let graph = generator.generate(num_persons, rng)?;
        Self::from_graph(num_persons, graph)
    }

    /// Build from an already generated graph, rejecting anything that is not
    /// a simple graph over `0..num_persons`.
    pub fn from_graph(num_persons: usize, graph: GeneratedGraph) -> SimResult<Self> {
        if num_persons == 0 {
            return Err(SimError::config("num_persons must be positive"));
        }
        if graph.positions.len() != num_persons {
            return Err(SimError::invariant(format!(
                "generator produced {} positions for {} persons",
                graph.positions.len(),
                num_persons
            )));
        }

        let mut network = Self {
            nodes: graph
                .positions
                .into_iter()
                .enumerate()
                .map(|(id, pos)| Node::person(id, pos))
                .collect(),
            adjacency: vec![IndexSet::new(); num_persons],
            num_persons,
            influencer: None,
            edge_count: 0,
            peer_rounds_run: 0,
            outreach_passes_run: 0,
        };

        for (u, v) in graph.edges {
            if !network.add_edge(u, v)? {
                return Err(SimError::invariant(format!(
                    "generator produced duplicate edge ({}, {})",
                    u, v
                )));
            }
        }

        debug!(
            "network initialized: {} persons, {} edges",
            network.num_persons, network.edge_count
        );
        Ok(network)
    }

    /// Append the influencer node. It starts as a buyer with no provenance
    /// and no edges.
    pub fn attach_influencer(&mut self, position: Position) -> SimResult<NodeId> {
        if let Some(existing) = self.influencer {
            return Err(SimError::invariant(format!(
                "influencer already attached as node {}",
                existing
            )));
        }

        let id = self.nodes.len();
        self.nodes.push(Node {
            id,
            kind: NodeKind::Influencer,
            state: BuyState::Buyer,
            influenced_by: Influence::None,
            position,
            converted_at: None,
        });
        self.adjacency.push(IndexSet::new());
        self.influencer = Some(id);
        Ok(id)
    }

    /// Add an undirected edge. Returns false if it already existed.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> SimResult<bool> {
        self.check_node(a)?;
        self.check_node(b)?;
        if a == b {
            return Err(SimError::invariant(format!("self-loop on node {}", a)));
        }
        if !self.adjacency[a].insert(b) {
            return Ok(false);
        }
        self.adjacency[b].insert(a);
        self.edge_count += 1;
        Ok(true)
    }

    /// Convert a Person node to buyer. Fails if the node is already a buyer,
    /// which would overwrite its provenance.
    pub fn convert(&mut self, id: NodeId, influence: Influence, stage: Stage) -> SimResult<()> {
        self.check_node(id)?;
        if influence == Influence::None {
            return Err(SimError::invariant(format!(
                "conversion of node {} without provenance",
                id
            )));
        }

        let node = &mut self.nodes[id];
        if !node.is_person() {
            return Err(SimError::invariant(format!(
                "node {} is not a person and cannot convert",
                id
            )));
        }
        if node.is_buyer() {
            return Err(SimError::invariant(format!(
                "node {} already converted by {:?}",
                id, node.influenced_by
            )));
        }

        node.state = BuyState::Buyer;
        node.influenced_by = influence;
        node.converted_at = Some(stage);
        Ok(())
    }

    fn check_node(&self, id: NodeId) -> SimResult<()> {
        if id >= self.nodes.len() {
            return Err(SimError::UnknownNode(id));
        }
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Person nodes only
    pub fn persons(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_person())
    }

    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency
            .get(id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn degree(&self, id: NodeId) -> usize {
        self.adjacency.get(id).map_or(0, |set| set.len())
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.adjacency.get(a).is_some_and(|set| set.contains(&b))
    }

    /// Configured population size (excludes the influencer)
    pub fn num_persons(&self) -> usize {
        self.num_persons
    }

    /// All nodes including the influencer
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn influencer(&self) -> Option<NodeId> {
        self.influencer
    }

    /// True if `id` is a Person node in the Buyer state
    pub fn is_person_buyer(&self, id: NodeId) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|n| n.is_person() && n.is_buyer())
    }

    /// Current Person-buyer flags, indexed by node id
    pub fn buyer_snapshot(&self) -> Vec<bool> {
        self.nodes
            .iter()
            .map(|n| n.is_person() && n.is_buyer())
            .collect()
    }

    /// Every undirected edge once, as (low, high)
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(u, set)| {
            set.iter()
                .copied()
                .filter(move |&v| u < v)
                .map(move |v| (u, v))
        })
    }

    /// Edges between persons, hiding the influencer
    pub fn person_edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        let influencer = self.influencer;
        self.edges()
            .filter(move |&(u, v)| Some(u) != influencer && Some(v) != influencer)
    }

    /// Edges touching the influencer
    pub fn influencer_edges(&self) -> Vec<(NodeId, NodeId)> {
        match self.influencer {
            Some(inf) => self.neighbors(inf).map(|n| (inf, n)).collect(),
            None => Vec::new(),
        }
    }

    pub fn snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges().collect(),
            influencer: self.influencer,
        }
    }

    /// Advance and return the 1-based peer round counter
    pub(crate) fn next_peer_round(&mut self) -> u32 {
        self.peer_rounds_run += 1;
        self.peer_rounds_run
    }

    /// Advance and return the 1-based outreach pass counter
    pub(crate) fn next_outreach_pass(&mut self) -> u32 {
        self.outreach_passes_run += 1;
        self.outreach_passes_run
    }

    pub fn peer_rounds_run(&self) -> u32 {
        self.peer_rounds_run
    }

    pub fn outreach_passes_run(&self) -> u32 {
        self.outreach_passes_run
    }
}
