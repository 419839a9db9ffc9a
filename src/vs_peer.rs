//! Peer influence
//!
//! Both stages here update synchronously: every decision in a pass is made
//! against the buyer flags captured at the start of the pass, and conversions
//! are applied only after all nodes have been evaluated. Only Person buyers
//! exert peer pressure; the influencer never counts as a buying neighbour.

use indexmap::IndexSet;
use log::debug;

use crate::vs_error::{check_probability, SimResult};
use crate::vs_interface::{Influence, NodeId, Stage};
use crate::vs_network::Network;
use crate::vs_random::UniformSource;

/// Conversion probability for a non-buyer with `buying_neighbors` Person
/// buyers around it, or `None` when no draw is taken.
///
/// Exactly one buying neighbour uses `single_prob`, more than two use
/// `multiple_prob`. Exactly two falls in neither tier and never converts.
pub fn peer_probability(
    buying_neighbors: usize,
    single_prob: f64,
    multiple_prob: f64,
) -> Option<f64> {
    match buying_neighbors {
        1 => Some(single_prob),
        b if b > 2 => Some(multiple_prob),
        _ => None,
    }
}

/// One peer influence round.
///
/// Returns the nodes converted in this round, in id order.
pub fn apply_peer_influence_round<R: UniformSource + ?Sized>(
    network: &mut Network,
    single_prob: f64,
    multiple_prob: f64,
    rng: &mut R,
) -> SimResult<Vec<NodeId>> {
    check_probability("friend_single_prob", single_prob)?;
    check_probability("friend_multiple_prob", multiple_prob)?;

    let round = network.next_peer_round();
    let buyers = network.buyer_snapshot();

    let mut decided = Vec::new();
    for node in network.persons() {
        if buyers[node.id] {
            continue;
        }

        let buying_neighbors = network.neighbors(node.id).filter(|&n| buyers[n]).count();
        if let Some(prob) = peer_probability(buying_neighbors, single_prob, multiple_prob) {
            if rng.next_uniform() < prob {
                decided.push(node.id);
            }
        }
    }

    for &id in &decided {
        network.convert(id, Influence::Peer, Stage::PeerRound(round))?;
    }

    debug!("peer round {} converted {} nodes", round, decided.len());
    Ok(decided)
}

/// Outreach pass: every Person buyer tries once to convince each of its
/// non-buying Person neighbours with probability `single_prob`. A neighbour
/// of several buyers gets one draw per buyer.
///
/// Returns the converted nodes in the order they were first convinced.
pub fn apply_buyer_outreach<R: UniformSource + ?Sized>(
    network: &mut Network,
    single_prob: f64,
    rng: &mut R,
) -> SimResult<Vec<NodeId>> {
    check_probability("friend_single_prob", single_prob)?;

    let pass = network.next_outreach_pass();
    let buyers = network.buyer_snapshot();

    let mut decided: IndexSet<NodeId> = IndexSet::new();
    for buyer in (0..buyers.len()).filter(|&id| buyers[id]) {
        for neighbor in network.neighbors(buyer) {
            if buyers[neighbor] || !network.nodes()[neighbor].is_person() {
                continue;
            }
            if rng.next_uniform() < single_prob {
                decided.insert(neighbor);
            }
        }
    }

    for &id in &decided {
        network.convert(id, Influence::Peer, Stage::Outreach(pass))?;
    }

    debug!("outreach pass {} converted {} nodes", pass, decided.len());
    Ok(decided.into_iter().collect())
}
