//! Unit tests for nm-agent.

use nm_core::{AgentId, AgentRng, Arena, Generation, NormKind, NormSet, SimRng, SteeringParams, Vector2};

use crate::{Agent, Neighbor, PeerPositions};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn agent_at(id: u32, x: f32, y: f32) -> Agent {
    Agent::new(AgentId(id), Vector2::new(x, y), NormSet::ALL, NormKind::Legal, Generation::ZERO)
}

fn neighbor(a: &Agent) -> Neighbor {
    Neighbor { id: a.id, position: a.position, velocity: a.velocity }
}

fn big_arena() -> Arena {
    Arena::new(Vector2::new(-10_000.0, -10_000.0), Vector2::new(10_000.0, 10_000.0))
}

/// No peers resolvable.
struct NoPeers;
impl PeerPositions for NoPeers {
    fn position_of(&self, _id: AgentId) -> Option<Vector2> {
        None
    }
}

/// Every peer sits at a fixed point.
struct PeersAt(Vector2);
impl PeerPositions for PeersAt {
    fn position_of(&self, _id: AgentId) -> Option<Vector2> {
        Some(self.0)
    }
}

#[cfg(test)]
mod ledger {
    use nm_core::{AgentId, Generation};

    use crate::{LedgerKey, LedgerStatus, RelationalLedger};

    fn key(peer: u32, g: u32) -> LedgerKey {
        LedgerKey::new(AgentId(peer), Generation(g))
    }

    #[test]
    fn first_resolution_wins() {
        let mut l = RelationalLedger::new();
        assert!(l.record(key(1, 0), LedgerStatus::Fulfilled));
        assert!(!l.record(key(1, 0), LedgerStatus::Denied));
        assert_eq!(l.get(&key(1, 0)), Some(LedgerStatus::Fulfilled));
        // A different generation is a different key.
        assert!(l.record(key(1, 1), LedgerStatus::Denied));
        assert_eq!(l.len(), 2);
    }

    #[test]
    fn repair_only_from_denied_or_expired() {
        let mut l = RelationalLedger::new();
        l.record(key(1, 0), LedgerStatus::Fulfilled);
        l.record(key(2, 0), LedgerStatus::Denied);
        l.record(key(3, 0), LedgerStatus::Expired);

        assert_eq!(l.repair(key(1, 0)), None);
        assert_eq!(l.repair(key(2, 0)), Some(LedgerStatus::Denied));
        assert_eq!(l.repair(key(3, 0)), Some(LedgerStatus::Expired));
        // Repaired is terminal.
        assert_eq!(l.repair(key(2, 0)), None);
        assert_eq!(l.repair(key(9, 0)), None);
        assert_eq!(l.get(&key(1, 0)), Some(LedgerStatus::Fulfilled));
    }

    #[test]
    fn counts_and_repairable_keys() {
        let mut l = RelationalLedger::new();
        l.record(key(1, 0), LedgerStatus::Fulfilled);
        l.record(key(2, 0), LedgerStatus::Denied);
        l.record(key(3, 0), LedgerStatus::Expired);
        l.repair(key(3, 0));
        let c = l.counts();
        assert_eq!((c.fulfilled, c.denied, c.expired, c.repaired), (1, 1, 0, 1));
        assert_eq!(c.total(), 3);
        assert_eq!(l.repairable_keys(), vec![key(2, 0)]);
    }
}

#[cfg(test)]
mod agent {
    use nm_core::{AgentId, Generation, NormKind, NormSet};

    use super::agent_at;
    use crate::LedgerStatus;

    #[test]
    fn fresh_agent_has_zero_debt() {
        let a = agent_at(0, 0.0, 0.0);
        assert_eq!(a.contradiction_debt(), 0.0);
        assert_eq!(a.attempts(), 0);
        assert_eq!(a.success_rate(), 0.0);
    }

    #[test]
    fn conflict_follows_profile() {
        let mut a = agent_at(0, 0.0, 0.0);
        assert_eq!(a.internal_conflict(), 1.5);
        a.acknowledgments = NormSet::only(NormKind::Care);
        a.recompute_conflict_and_debt();
        assert_eq!(a.internal_conflict(), 1.5); // legal missing (1.0) + care (0.5)
        a.preference = NormKind::Care;
        a.recompute_conflict_and_debt();
        assert_eq!(a.internal_conflict(), 0.0);
    }

    #[test]
    fn resolutions_update_counters_trust_and_debt() {
        let mut a = agent_at(0, 0.0, 0.0);
        let peer = AgentId(5);
        assert!(a.record_resolution(peer, Generation(0), LedgerStatus::Fulfilled));
        assert!(a.record_resolution(peer, Generation(1), LedgerStatus::Denied));
        assert!(a.record_resolution(AgentId(6), Generation(1), LedgerStatus::Expired));
        assert_eq!(a.attempts(), 3);
        assert_eq!(a.successes(), 1);
        assert_eq!(a.trust_in(peer), 0); // +1 then −1
        assert_eq!(a.trust_in(AgentId(6)), 0);
        assert_eq!(a.trust_count(), 1); // expiry leaves no trust entry
        assert!((a.contradiction_debt() - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn duplicate_key_keeps_first_status_but_counts_attempt() {
        let mut a = agent_at(0, 0.0, 0.0);
        let peer = AgentId(1);
        assert!(a.record_resolution(peer, Generation(0), LedgerStatus::Fulfilled));
        assert!(!a.record_resolution(peer, Generation(0), LedgerStatus::Denied));
        assert_eq!(a.ledger.counts().fulfilled, 1);
        assert_eq!(a.ledger.counts().denied, 0);
        assert_eq!(a.attempts(), 2);
    }

    #[test]
    fn debt_stays_in_unit_interval() {
        let mut a = agent_at(0, 0.0, 0.0);
        for g in 0..50u32 {
            let status = if g % 3 == 0 { LedgerStatus::Fulfilled } else { LedgerStatus::Denied };
            a.record_resolution(AgentId(1 + g), Generation(g), status);
            assert!((0.0..=1.0).contains(&a.contradiction_debt()));
        }
    }

    #[test]
    fn trust_can_go_negative_and_max_floors_at_zero() {
        let mut a = agent_at(0, 0.0, 0.0);
        a.record_trust(AgentId(1), false);
        a.record_trust(AgentId(1), false);
        assert_eq!(a.trust_in(AgentId(1)), -2);
        assert_eq!(a.trust_min(), -2);
        assert_eq!(a.trust_max(), 0);
    }

    #[test]
    fn biography_is_append_only_and_capped() {
        let mut a = agent_at(0, 0.0, 0.0);
        a.set_biography_cap(Some(2));
        a.record_biography(Generation(1));
        a.record_biography(Generation(2));
        a.record_biography(Generation(3));
        let gens: Vec<_> = a.biography().map(|b| b.generation).collect();
        assert_eq!(gens, vec![Generation(2), Generation(3)]);
        assert_eq!(a.biography().last().unwrap().acknowledgments, NormSet::ALL);
    }
}

#[cfg(test)]
mod offspring {
    use nm_core::{AgentId, Arena, Generation, InheritanceParams, NormKind, NormSet, SimRng, Vector2};

    use crate::Agent;

    fn parent() -> Agent {
        let mut p = Agent::new(AgentId(0), Vector2::new(500.0, 300.0), NormSet::only(NormKind::Care), NormKind::Care, Generation(0));
        p.momentum = 0.95;
        p
    }

    #[test]
    fn perfect_fidelity_copies_profile() {
        let inh = InheritanceParams {
            fidelity_base: 1.0,
            mutation_base: 0.0,
            mutation_per_conflict: 0.0,
            preference_fidelity: 1.0,
            momentum_jitter: 0.0,
            ..InheritanceParams::default()
        };
        let mut rng = SimRng::new(3);
        let child = Agent::offspring(&parent(), AgentId(9), Generation(2), &inh, &Arena::default(), &mut rng);
        assert_eq!(child.id, AgentId(9));
        assert_eq!(child.acknowledgments, NormSet::only(NormKind::Care));
        assert_eq!(child.preference, NormKind::Care);
        assert_eq!(child.momentum, 0.95);
        assert_eq!(child.birth_generation, Generation(2));
        assert_eq!(child.attempts(), 0);
        assert!(child.ledger.is_empty());
    }

    #[test]
    fn momentum_stays_clamped() {
        let inh = InheritanceParams::default();
        let mut rng = SimRng::new(11);
        let p = parent();
        for i in 0..200 {
            let child = Agent::offspring(&p, AgentId(i + 1), Generation(1), &inh, &Arena::default(), &mut rng);
            assert!((0.1..=1.0).contains(&child.momentum));
            assert!(Arena::default().contains(child.position));
        }
    }
}

#[cfg(test)]
mod steering {
    use super::*;

    #[test]
    fn separation_pushes_apart() {
        let a = agent_at(0, 0.0, 0.0);
        let b = agent_at(1, 10.0, 0.0);
        let params = SteeringParams { wander_force: 0.0, alignment_force: 0.0, cohesion_force: 0.0, ..SteeringParams::default() };
        let mut rng = AgentRng::new(1, a.id);
        let s = a.steer(&[neighbor(&a), neighbor(&b)], &NoPeers, &params, &mut rng);
        assert!(s.force.x < 0.0, "should be pushed away from b: {:?}", s.force);
        assert!((s.force.mag() - params.separation_force).abs() < 1e-6);
    }

    #[test]
    fn cohesion_pulls_toward_centroid() {
        let a = agent_at(0, 0.0, 0.0);
        let b = agent_at(1, 50.0, 0.0);
        let params = SteeringParams { wander_force: 0.0, ..SteeringParams::default() };
        let mut rng = AgentRng::new(1, a.id);
        let s = a.steer(&[neighbor(&b)], &NoPeers, &params, &mut rng);
        assert!(s.force.x > 0.0);
        assert!((s.force.mag() - params.cohesion_force).abs() < 1e-6);
    }

    #[test]
    fn trusted_peer_attracts_and_suppresses_wander() {
        let mut a = agent_at(0, 0.0, 0.0);
        for _ in 0..4 {
            a.record_trust(AgentId(7), true);
        }
        let params = SteeringParams::default();
        let mut rng = AgentRng::new(1, a.id);
        let s = a.steer(&[], &PeersAt(Vector2::new(0.0, 500.0)), &params, &mut rng);
        // 0.05 × trust 4 = 0.2 straight up; wander heading unchanged.
        assert!((s.force.y - 0.2).abs() < 1e-6);
        assert!(s.force.x.abs() < 1e-6);
        assert_eq!(s.wander, a.wander);
    }

    #[test]
    fn low_trust_is_ignored() {
        let mut a = agent_at(0, 0.0, 0.0);
        a.record_trust(AgentId(7), true);
        a.record_trust(AgentId(7), true);
        let params = SteeringParams { wander_force: 0.0, ..SteeringParams::default() };
        let mut rng = AgentRng::new(1, a.id);
        let s = a.steer(&[], &PeersAt(Vector2::new(0.0, 500.0)), &params, &mut rng);
        assert_eq!(s.force, Vector2::ZERO);
    }

    #[test]
    fn speed_is_capped_and_position_wraps() {
        let mut a = agent_at(0, 99.0, 50.0);
        a.velocity = Vector2::new(100.0, 0.0);
        let params = SteeringParams::default();
        let arena = Arena::new(Vector2::new(0.0, 0.0), Vector2::new(100.0, 100.0));
        let mut rng = AgentRng::new(1, a.id);
        a.tick(&[], &NoPeers, &params, &arena, &mut rng);
        assert!(a.velocity.mag() <= params.max_speed + 1e-5);
        assert_eq!(a.position.x, 0.0);
        assert!(arena.contains(a.position));
    }

    #[test]
    fn wander_is_deterministic_per_seed() {
        let params = SteeringParams::default();
        let arena = big_arena();
        let run = || {
            let mut a = agent_at(3, 0.0, 0.0);
            let mut rng = AgentRng::new(99, a.id);
            for _ in 0..25 {
                a.tick(&[], &NoPeers, &params, &arena, &mut rng);
            }
            a.position
        };
        assert_eq!(run(), run());
    }
}

#[cfg(test)]
mod population {
    use super::*;
    use crate::PopulationBuilder;

    #[test]
    fn ids_are_monotonic_and_never_reused() {
        let mut rng = SimRng::new(1);
        let mut pop = PopulationBuilder::new(5, 1).build(&mut rng);
        assert_eq!(pop.ids().collect::<Vec<_>>(), (0..5).map(AgentId).collect::<Vec<_>>());

        let dead = pop.retain(|a| a.id.0 % 2 == 0);
        assert_eq!(dead.len(), 2);
        let id = pop.spawn(|id| agent_at(id.0, 0.0, 0.0));
        assert_eq!(id, AgentId(5));
        assert!(!pop.contains(AgentId(1)));
    }

    #[test]
    fn index_follows_removals() {
        let mut rng = SimRng::new(1);
        let mut pop = PopulationBuilder::new(4, 1).build(&mut rng);
        pop.retain(|a| a.id != AgentId(1));
        assert_eq!(pop.index_of(AgentId(2)), Some(1));
        assert_eq!(pop.get(AgentId(3)).map(|a| a.id), Some(AgentId(3)));
        assert!(pop.get(AgentId(1)).is_none());
        assert_eq!(pop.position_of(AgentId(1)), None);
    }

    #[test]
    fn founders_are_inside_arena() {
        let arena = Arena::default();
        let mut rng = SimRng::new(7);
        let pop = PopulationBuilder::new(50, 7).arena(arena).generation(Generation(3)).build(&mut rng);
        assert_eq!(pop.len(), 50);
        for a in pop.iter() {
            assert!(arena.contains(a.position));
            assert_eq!(a.birth_generation, Generation(3));
            assert!((0.3..1.0).contains(&a.momentum));
        }
    }

    #[test]
    fn builder_is_deterministic() {
        let a = PopulationBuilder::new(20, 5).build(&mut SimRng::new(5));
        let b = PopulationBuilder::new(20, 5).build(&mut SimRng::new(5));
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.position, y.position);
            assert_eq!(x.acknowledgments, y.acknowledgments);
            assert_eq!(x.preference, y.preference);
        }
    }

    #[test]
    fn steering_parts_are_slot_aligned() {
        let mut pop = PopulationBuilder::new(3, 5).build(&mut SimRng::new(5));
        let ids: Vec<_> = pop.ids().collect();
        let (view, rngs) = pop.steering_parts();
        assert_eq!(view.agents().len(), rngs.len());
        for id in ids {
            assert_eq!(view.get(id).map(|a| a.id), Some(id));
        }
    }
}
