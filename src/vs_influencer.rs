//! Influencer stages: wiring the influencer into the network and converting
//! its direct neighbours.

use log::{debug, warn};

use crate::vs_error::{check_probability, SimError, SimResult};
use crate::vs_interface::{Influence, NodeId, Stage};
use crate::vs_network::Network;
use crate::vs_random::{sample_distinct, UniformSource};

fn check_influencer(network: &Network, influencer: NodeId) -> SimResult<()> {
    if network.influencer() != Some(influencer) {
        return Err(SimError::config(format!(
            "node {} is not the attached influencer",
            influencer
        )));
    }
    Ok(())
}

/// Number of influencer edges for a given reach fraction.
///
/// The denominator is the total node count *including* the influencer, so the
/// effective reach among persons is slightly below `reach_fraction`.
pub fn reach_count(network: &Network, reach_fraction: f64) -> usize {
    reach_for_node_count(network.node_count(), reach_fraction)
}

/// Reach for a network of `node_count` nodes, influencer included
pub fn reach_for_node_count(node_count: usize, reach_fraction: f64) -> usize {
    (reach_fraction * node_count as f64).floor() as usize
}

/// Connect the influencer to `floor(reach_fraction * node_count)` distinct
/// nodes drawn uniformly from everyone except the influencer.
///
/// Returns the sampled nodes in selection order.
pub fn attach_reach<R: UniformSource + ?Sized>(
    network: &mut Network,
    influencer: NodeId,
    reach_fraction: f64,
    rng: &mut R,
) -> SimResult<Vec<NodeId>> {
    check_probability("influencer_reach_fraction", reach_fraction)?;
    check_influencer(network, influencer)?;

    let k = reach_count(network, reach_fraction);
    let candidates: Vec<NodeId> = (0..network.node_count())
        .filter(|&id| id != influencer)
        .collect();

    if k > candidates.len() {
        return Err(SimError::config(format!(
            "reach of {} nodes exceeds the {} available persons",
            k,
            candidates.len()
        )));
    }

    let targets = sample_distinct(&candidates, k, rng)?;
    for &target in &targets {
        network.add_edge(influencer, target)?;
    }

    debug!(
        "influencer {} attached to {} of {} nodes",
        influencer,
        targets.len(),
        network.node_count()
    );
    Ok(targets)
}

/// One independent draw per current influencer neighbour; a draw below
/// `convince_prob` converts that neighbour with provenance `Influencer`.
/// Neighbours that are already buyers keep their provenance.
///
/// Returns the converted nodes.
pub fn apply_direct_influence<R: UniformSource + ?Sized>(
    network: &mut Network,
    influencer: NodeId,
    convince_prob: f64,
    rng: &mut R,
) -> SimResult<Vec<NodeId>> {
    check_probability("influencer_convince_prob", convince_prob)?;
    check_influencer(network, influencer)?;

    let targets: Vec<NodeId> = network.neighbors(influencer).collect();
    if targets.is_empty() {
        warn!("influencer {} has no neighbours, direct influence is a no-op", influencer);
    }

    let mut converted = Vec::new();
    for target in targets {
        let draw = rng.next_uniform();
        if draw < convince_prob && !network.is_person_buyer(target) {
            network.convert(target, Influence::Influencer, Stage::Direct)?;
            converted.push(target);
        }
    }

    debug!("direct influence converted {} nodes", converted.len());
    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vs_generator::{RandomGeometricGenerator, RingGenerator};
    use crate::vs_interface::{BuyState, INFLUENCER_POSITION};
    use crate::vs_random::ScriptedSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn with_influencer(n: usize) -> (Network, NodeId) {
        let mut rng = StdRng::from_seed([0u8; 32]);
        let mut network = Network::initialize(n, &mut RingGenerator, &mut rng).unwrap();
        let inf = network.attach_influencer(INFLUENCER_POSITION).unwrap();
        (network, inf)
    }

    #[test]
    fn test_reach_count_includes_influencer() {
        let (network, _) = with_influencer(10);
        assert_eq!(reach_count(&network, 0.3), 3);
        assert_eq!(reach_count(&network, 0.15), 1);
        assert_eq!(reach_count(&network, 0.0), 0);

        let (network, _) = with_influencer(500);
        // 0.15 * 501 = 75.15
        assert_eq!(reach_count(&network, 0.15), 75);
        assert_eq!(reach_for_node_count(501, 0.15), 75);
        assert_eq!(reach_for_node_count(11, 1.0), 11);
    }

    #[test]
    fn test_attach_reach_degree_and_distinct() {
        let mut rng = StdRng::from_seed([7u8; 32]);
        let mut network =
            Network::initialize(300, &mut RandomGeometricGenerator::default(), &mut rng).unwrap();
        let inf = network.attach_influencer(INFLUENCER_POSITION).unwrap();

        let targets = attach_reach(&mut network, inf, 0.2, &mut rng).unwrap();
        let expected = (0.2 * 301.0_f64).floor() as usize;

        assert_eq!(targets.len(), expected);
        assert_eq!(network.degree(inf), expected);
        let unique: HashSet<_> = targets.iter().collect();
        assert_eq!(unique.len(), expected);
        assert!(!targets.contains(&inf));
        assert!(!network.has_edge(inf, inf));
    }

    #[test]
    fn test_attach_reach_too_large() {
        let (mut network, inf) = with_influencer(10);
        let mut rng = StdRng::from_seed([0u8; 32]);

        // floor(1.0 * 11) = 11 > 10 persons
        let err = attach_reach(&mut network, inf, 1.0, &mut rng).unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(network.degree(inf), 0);
    }

    #[test]
    fn test_attach_reach_rejects_bad_input() {
        let (mut network, inf) = with_influencer(10);
        let mut rng = StdRng::from_seed([0u8; 32]);

        assert!(attach_reach(&mut network, inf, 1.5, &mut rng)
            .unwrap_err()
            .is_configuration());
        assert!(attach_reach(&mut network, 3, 0.2, &mut rng)
            .unwrap_err()
            .is_configuration());
        assert_eq!(network.degree(inf), 0);
    }

    #[test]
    fn test_direct_influence_certain() {
        let (mut network, inf) = with_influencer(10);
        let mut rng = StdRng::from_seed([1u8; 32]);
        let targets = attach_reach(&mut network, inf, 0.3, &mut rng).unwrap();

        let converted = apply_direct_influence(&mut network, inf, 1.0, &mut rng).unwrap();
        let converted: HashSet<_> = converted.into_iter().collect();
        let targets: HashSet<_> = targets.into_iter().collect();
        assert_eq!(converted, targets);

        for id in targets {
            let node = network.node(id).unwrap();
            assert_eq!(node.state, BuyState::Buyer);
            assert_eq!(node.influenced_by, Influence::Influencer);
            assert_eq!(node.converted_at, Some(Stage::Direct));
        }
    }

    #[test]
    fn test_direct_influence_never() {
        let (mut network, inf) = with_influencer(10);
        let mut rng = StdRng::from_seed([1u8; 32]);
        attach_reach(&mut network, inf, 0.5, &mut rng).unwrap();

        let converted = apply_direct_influence(&mut network, inf, 0.0, &mut rng).unwrap();
        assert!(converted.is_empty());
        assert_eq!(network.persons().filter(|n| n.is_buyer()).count(), 0);
    }

    #[test]
    fn test_direct_influence_keeps_existing_provenance() {
        let (mut network, inf) = with_influencer(6);
        network.add_edge(inf, 0).unwrap();
        network.add_edge(inf, 1).unwrap();
        network.convert(0, Influence::Peer, Stage::PeerRound(1)).unwrap();

        let mut rng = ScriptedSource::constant(0.0).unwrap();
        let converted = apply_direct_influence(&mut network, inf, 1.0, &mut rng).unwrap();

        assert_eq!(converted, vec![1]);
        assert_eq!(network.node(0).unwrap().influenced_by, Influence::Peer);

        // second application changes nothing
        let again = apply_direct_influence(&mut network, inf, 1.0, &mut rng).unwrap();
        assert!(again.is_empty());
        assert_eq!(network.node(1).unwrap().influenced_by, Influence::Influencer);
    }

    #[test]
    fn test_direct_influence_threshold_is_strict() {
        let (mut network, inf) = with_influencer(4);
        network.add_edge(inf, 0).unwrap();
        network.add_edge(inf, 1).unwrap();

        // draws equal to the probability do not convert
        let mut rng = ScriptedSource::new(vec![0.5, 0.49]).unwrap();
        let converted = apply_direct_influence(&mut network, inf, 0.5, &mut rng).unwrap();
        assert_eq!(converted, vec![1]);
        assert_eq!(rng.drawn(), 2);
    }

    #[test]
    fn test_direct_influence_uses_current_neighbours() {
        let (mut network, inf) = with_influencer(5);
        let mut rng = ScriptedSource::constant(0.0).unwrap();
        assert!(apply_direct_influence(&mut network, inf, 1.0, &mut rng)
            .unwrap()
            .is_empty());

        network.add_edge(inf, 4).unwrap();
        let converted = apply_direct_influence(&mut network, inf, 1.0, &mut rng).unwrap();
        assert_eq!(converted, vec![4]);
    }
}
