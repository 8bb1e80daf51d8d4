//! Integration tests for nm-sim.

use nm_agent::{Agent, Population};
use nm_core::{
    Generation, MortalityParams, NormKind, NormSet, RetentionPolicy, SimRng, Tick, Vector2, WorldConfig,
};
use nm_metrics::GenerationSnapshot;
use nm_obligation::{ObligationSampler, ObligationVector};
use nm_spatial::NeighborIndex;

use crate::SimObserver;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(agents: usize) -> WorldConfig {
    WorldConfig {
        seed: 7,
        initial_agents: agents,
        ticks_per_generation: 20,
        retention: RetentionPolicy::UNBOUNDED,
        ..WorldConfig::default()
    }
}

fn immortal() -> MortalityParams {
    MortalityParams {
        base_rate: 0.0,
        conflict_weight: 0.0,
        conflict_cap: 0.0,
        senescence_age: 0,
        senescence_slope: 0.0,
    }
}

#[derive(Default)]
struct Recorder {
    ticks: u64,
    resolved: usize,
    last_tick: Option<Tick>,
    generations: Vec<GenerationSnapshot>,
    populations: Vec<usize>,
    resets: u32,
}

impl SimObserver for Recorder {
    fn on_tick_end(&mut self, tick: Tick, resolved: usize) {
        self.ticks += 1;
        self.resolved += resolved;
        self.last_tick = Some(tick);
    }

    fn on_generation_end(&mut self, snapshot: &GenerationSnapshot, population: &Population) {
        self.generations.push(snapshot.clone());
        self.populations.push(population.len());
    }

    fn on_reset(&mut self) {
        self.resets += 1;
    }
}

/// Replays a fixed obligation list whenever both endpoints are alive.
struct Scripted(Vec<ObligationVector>);

impl ObligationSampler for Scripted {
    fn sample(&self, population: &Population, _: &NeighborIndex, _: &mut SimRng) -> Vec<ObligationVector> {
        self.0
            .iter()
            .filter(|ob| population.contains(ob.source) && population.contains(ob.target))
            .cloned()
            .collect()
    }
}

fn pair_population(a: NormSet, b: NormSet, gap: f32) -> Population {
    let mut pop = Population::new(7, None);
    pop.spawn(|id| Agent::new(id, Vector2::new(400.0, 300.0), a, NormKind::Care, Generation::ZERO));
    pop.spawn(|id| Agent::new(id, Vector2::new(400.0 + gap, 300.0), b, NormKind::Care, Generation::ZERO));
    pop
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use nm_core::{AgentId, Generation, NormKind, NormSet, ObligationId, WorldConfig};
    use nm_obligation::ObligationVector;

    use super::{Scripted, pair_population, test_config};
    use crate::{NoopObserver, SimError, WorldBuilder};

    #[test]
    fn builds_with_defaults() {
        let world = WorldBuilder::new(test_config(60)).build().unwrap();
        assert_eq!(world.population().len(), 60);
        assert_eq!(world.generation(), Generation::ZERO);
        assert!(!world.is_paused());
        assert!(!world.obligations().is_empty());
        assert!(world.obligations().len() <= 120);
        assert!(world.generation_log().is_empty());
    }

    #[test]
    fn invalid_config_errors() {
        let config = WorldConfig { ticks_per_generation: 0, ..test_config(5) };
        let result = WorldBuilder::new(config).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn oversized_population_errors() {
        let config = WorldConfig { initial_agents: 1, max_agents: 1, ..test_config(1) };
        let result = WorldBuilder::new(config)
            .population(pair_population(NormSet::ALL, NormSet::ALL, 10.0))
            .build();
        assert!(matches!(result, Err(SimError::PopulationTooLarge { got: 2, max: 1 })));
    }

    #[test]
    fn scripted_sampler_drives_enforcement() {
        let ob = ObligationVector::new(ObligationId(0), AgentId(0), AgentId(1), NormKind::Care, 0.5, 15);
        let mut world = WorldBuilder::new(test_config(2))
            .population(pair_population(NormSet::ALL, NormSet::NONE, 10.0))
            .sampler(Scripted(vec![ob]))
            .build()
            .unwrap();
        assert_eq!(world.obligations().len(), 1);

        world.step(&mut NoopObserver);

        let events: Vec<_> = world.obligation_log().iter().copied().collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].status, nm_agent::LedgerStatus::Denied);
        assert_eq!(events[0].tick, nm_core::Tick::ZERO);
        let source = world.population().get(AgentId(0)).unwrap();
        assert_eq!(source.trust_in(AgentId(1)), -1);
        assert_eq!(source.contradiction_debt(), 1.0);
        assert_eq!(world.current_events().denied, 1);
    }
}

// ── Determinism ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod determinism {
    use nm_core::WorldConfig;
    use nm_scenario::Scenario;

    use super::test_config;
    use crate::{AgentView, NoopObserver, World, WorldBuilder};

    fn views(world: &World) -> Vec<AgentView> {
        world.agent_views().collect()
    }

    #[test]
    fn same_seed_same_run() {
        let build = || WorldBuilder::new(test_config(50)).scenario(Scenario::Anomic).build().unwrap();
        let mut a = build();
        let mut b = build();
        a.run_generations(3, &mut NoopObserver);
        b.run_generations(3, &mut NoopObserver);

        assert_eq!(views(&a), views(&b));
        assert_eq!(
            a.generation_log().iter().collect::<Vec<_>>(),
            b.generation_log().iter().collect::<Vec<_>>()
        );
        assert_eq!(
            a.obligation_log().iter().collect::<Vec<_>>(),
            b.obligation_log().iter().collect::<Vec<_>>()
        );
        assert_eq!(a.agent_log().len(), b.agent_log().len());
    }

    #[test]
    fn different_seed_different_run() {
        let mut a = WorldBuilder::new(test_config(30)).build().unwrap();
        let mut b = WorldBuilder::new(WorldConfig { seed: 8, ..test_config(30) }).build().unwrap();
        a.run_ticks(5, &mut NoopObserver);
        b.run_ticks(5, &mut NoopObserver);
        assert_ne!(views(&a), views(&b));
    }

    #[test]
    fn reset_replays_the_run() {
        let mut fresh = WorldBuilder::new(test_config(40)).build().unwrap();
        let mut world = WorldBuilder::new(test_config(40)).build().unwrap();
        world.run_generations(2, &mut NoopObserver);
        world.reset(&mut NoopObserver);

        assert_eq!(world.generation().0, 0);
        assert_eq!(world.tick().0, 0);
        assert!(world.generation_log().is_empty());
        assert!(world.agent_log().is_empty());
        assert!(world.obligation_log().is_empty());
        assert!(world.flip_log().is_empty());
        assert_eq!(views(&world), views(&fresh));

        world.run_generations(2, &mut NoopObserver);
        fresh.run_generations(2, &mut NoopObserver);
        assert_eq!(
            world.generation_log().iter().collect::<Vec<_>>(),
            fresh.generation_log().iter().collect::<Vec<_>>()
        );
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use std::collections::HashSet;

    use nm_core::{AgentId, Generation, MortalityParams, WorldConfig};

    use super::{Recorder, immortal, test_config};
    use crate::{NoopObserver, WorldBuilder};

    #[test]
    fn reproduction_doubles_an_immortal_population() {
        let config = WorldConfig {
            initial_agents: 4,
            max_agents: 100,
            reproduction_probability: 1.0,
            mortality: immortal(),
            ..test_config(4)
        };
        let mut world = WorldBuilder::new(config).build().unwrap();
        world.run_generations(1, &mut NoopObserver);

        assert_eq!(world.population().len(), 8);
        let snap = world.latest_snapshot().unwrap();
        assert_eq!((snap.population, snap.births, snap.deaths), (4, 4, 0));
        for id in 4..8 {
            let child = world.population().get(AgentId(id)).unwrap();
            assert_eq!(child.birth_generation, Generation(1));
        }
    }

    #[test]
    fn reproduction_adds_at_most_one_child_per_survivor() {
        let config = WorldConfig {
            initial_agents: 4,
            reproduction_probability: 1.0,
            ..test_config(4)
        };
        let mut world = WorldBuilder::new(config).build().unwrap();
        world.run_generations(1, &mut NoopObserver);
        let snap = world.latest_snapshot().unwrap();
        assert!(snap.births <= snap.population);
        assert_eq!(world.population().len(), snap.population + snap.births);
        assert!(world.population().len() <= 8);
    }

    #[test]
    fn population_never_exceeds_cap() {
        let config = WorldConfig {
            initial_agents: 25,
            max_agents: 30,
            reproduction_probability: 1.0,
            mortality: immortal(),
            ..test_config(25)
        };
        let mut world = WorldBuilder::new(config).build().unwrap();
        let mut rec = Recorder::default();
        world.run_generations(5, &mut rec);

        assert_eq!(rec.populations, vec![30; 5]);
        for snap in &rec.generations {
            assert!(snap.population + snap.births <= 30);
        }
    }

    #[test]
    fn ids_are_never_reused() {
        let config = WorldConfig { reproduction_probability: 0.5, ..test_config(30) };
        let mut world = WorldBuilder::new(config).build().unwrap();
        let mut rec = Recorder::default();
        world.run_generations(6, &mut rec);

        let births: usize = rec.generations.iter().map(|s| s.births).sum();
        assert_eq!(world.population().next_id().0 as usize, 30 + births);

        let mut seen = HashSet::new();
        for id in world.population().ids() {
            assert!(id < world.population().next_id());
            assert!(seen.insert(id));
        }
    }

    #[test]
    fn certain_death_empties_the_world_gracefully() {
        let config = WorldConfig {
            initial_agents: 5,
            mortality: MortalityParams { base_rate: 1.0, ..MortalityParams::default() },
            ..test_config(5)
        };
        let mut world = WorldBuilder::new(config).build().unwrap();
        world.run_generations(1, &mut NoopObserver);
        assert!(world.population().is_empty());
        assert!(world.obligations().is_empty());

        world.run_generations(1, &mut NoopObserver);
        let snap = world.latest_snapshot().unwrap();
        assert_eq!(snap.population, 0);
        assert_eq!(snap.fulfillment_rate, 0.0);
        assert_eq!(snap.relational_integrity, 0.0);
        assert_eq!(snap.avg_debt, 0.0);
    }

    #[test]
    fn debt_and_conflict_stay_in_bounds() {
        let mut world = WorldBuilder::new(test_config(60)).build().unwrap();
        for _ in 0..4 {
            world.run_generations(1, &mut NoopObserver);
            for a in world.population().iter() {
                assert!((0.0..=1.0).contains(&a.contradiction_debt()));
                assert!(a.internal_conflict() >= 0.0);
                assert!((0.1..=1.0).contains(&a.momentum));
            }
        }
    }

    #[test]
    fn biography_grows_once_per_generation() {
        let config = WorldConfig { mortality: immortal(), ..test_config(10) };
        let mut world = WorldBuilder::new(config).build().unwrap();
        world.run_generations(3, &mut NoopObserver);
        let entries: Vec<_> = world.biography(AgentId(0)).unwrap().collect();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2].generation, Generation(2));
        assert!(world.biography(AgentId(9_999)).is_none());
    }
}

// ── Obligations & ledgers ─────────────────────────────────────────────────────

#[cfg(test)]
mod obligations {
    use std::collections::BTreeMap;

    use nm_agent::{LedgerKey, LedgerStatus};
    use nm_core::{AgentId, WorldConfig};
    use nm_scenario::Scenario;

    use super::{immortal, test_config};
    use crate::{NoopObserver, WorldBuilder};

    #[test]
    fn utopian_first_tick_fulfils_everything() {
        let mut world = WorldBuilder::new(test_config(10)).scenario(Scenario::Utopian).build().unwrap();
        assert!(world.population().iter().all(|a| a.acknowledgments == nm_core::NormSet::ALL));
        let issued = world.obligations().len();
        assert!(issued > 0);

        world.step(&mut NoopObserver);

        assert!(world.obligation_log().iter().all(|e| e.status == LedgerStatus::Fulfilled));
        assert_eq!(world.obligation_log().len(), issued);
        assert!(world.obligations().iter().all(|ob| ob.is_fulfilled()));
        assert_eq!(world.current_events().denied, 0);
    }

    #[test]
    fn collapsed_world_denies_everything() {
        let mut world = WorldBuilder::new(test_config(40)).scenario(Scenario::Collapsed).build().unwrap();
        let issued = world.obligations().len();
        world.step(&mut NoopObserver);
        assert_eq!(world.current_events().denied as usize, issued);
        assert_eq!(world.current_events().fulfilled, 0);
    }

    #[test]
    fn staggered_enforcement_alternates_by_parity() {
        let config = WorldConfig { stagger_enforcement: true, ..test_config(40) };
        let mut world = WorldBuilder::new(config).scenario(Scenario::Collapsed).build().unwrap();
        assert!(world.obligations().len() >= 2);

        world.step(&mut NoopObserver);
        for (i, ob) in world.obligations().iter().enumerate() {
            assert_eq!(ob.is_pending(), i % 2 == 1, "obligation {i}");
        }
        world.step(&mut NoopObserver);
        assert!(world.obligations().iter().all(|ob| !ob.is_pending()));
    }

    #[test]
    fn snapshot_tallies_match_the_event_log() {
        let mut world = WorldBuilder::new(test_config(50)).scenario(Scenario::Pluralist).build().unwrap();
        world.run_generations(3, &mut NoopObserver);
        for snap in world.generation_log().iter() {
            let mut counts = nm_agent::LedgerCounts::default();
            for e in world.obligation_log().iter().filter(|e| e.generation == snap.generation) {
                counts.add(e.status);
            }
            assert_eq!(snap.events(), counts);
            assert!((snap.fulfilled + snap.denied + snap.expired) as usize <= snap.obligations);
        }
    }

    #[test]
    fn ledger_entries_only_move_to_repaired() {
        let config = WorldConfig { repair_probability: 0.5, mortality: immortal(), ..test_config(40) };
        let mut world = WorldBuilder::new(config).scenario(Scenario::Anomic).build().unwrap();

        let mut previous: BTreeMap<(AgentId, LedgerKey), LedgerStatus> = BTreeMap::new();
        for _ in 0..5 {
            world.run_generations(1, &mut NoopObserver);
            let mut current = BTreeMap::new();
            for a in world.population().iter() {
                for (key, status) in a.ledger.iter() {
                    current.insert((a.id, key), status);
                }
            }
            for (k, before) in &previous {
                let after = current[k];
                match before {
                    LedgerStatus::Fulfilled | LedgerStatus::Repaired => assert_eq!(after, *before),
                    LedgerStatus::Denied | LedgerStatus::Expired => {
                        assert!(after == *before || after == LedgerStatus::Repaired)
                    }
                }
            }
            previous = current;
        }
        assert!(world.obligation_log().iter().any(|e| e.status == LedgerStatus::Repaired));
    }

    #[test]
    fn repair_off_means_no_repaired_events() {
        let mut config = WorldConfig { repair_probability: 1.0, ..test_config(40) };
        config.flags.moral_repair = false;
        let mut world = WorldBuilder::new(config).scenario(Scenario::Collapsed).build().unwrap();
        world.run_generations(2, &mut NoopObserver);
        assert!(world.obligation_log().iter().all(|e| e.status != LedgerStatus::Repaired));
        assert!(world.generation_log().iter().all(|s| s.repaired == 0));
    }

    #[test]
    fn certain_repair_heals_every_failure() {
        let config = WorldConfig { repair_probability: 1.0, mortality: immortal(), ..test_config(30) };
        let mut world = WorldBuilder::new(config).scenario(Scenario::Collapsed).build().unwrap();
        let per_generation = u64::from(world.config().ticks_per_generation);

        // Everything is denied on the first tick; stop one short of the boundary.
        world.run_ticks(per_generation - 1, &mut NoopObserver);
        assert!(world.obligations().iter().all(|ob| !ob.is_pending()));
        let failed_keys: usize = world.population().iter().map(|a| a.ledger.repairable_keys().len()).sum();
        assert!(failed_keys > 0);

        world.step(&mut NoopObserver);
        let snap = world.latest_snapshot().unwrap();
        // Repeated pairs log one event each but share one ledger key.
        assert_eq!(snap.repaired as usize, failed_keys);
        assert!(snap.repaired <= snap.denied + snap.expired);
        for a in world.population().iter() {
            let c = a.ledger.counts();
            assert_eq!(c.denied + c.expired, 0);
        }
    }
}

// ── Control & queries ─────────────────────────────────────────────────────────

#[cfg(test)]
mod control {
    use nm_core::{Flag, NormSet};
    use nm_metrics::Assessment;
    use nm_scenario::Scenario;

    use super::{Recorder, test_config};
    use crate::{Command, NoopObserver, WorldBuilder};

    #[test]
    fn pause_blocks_runs_but_not_step() {
        let mut world = WorldBuilder::new(test_config(20)).build().unwrap();
        world.apply(Command::Pause, &mut NoopObserver);
        assert!(world.is_paused());
        assert_eq!(world.run_ticks(10, &mut NoopObserver), 0);
        assert_eq!(world.run_generations(1, &mut NoopObserver), 0);
        assert_eq!(world.tick().0, 0);

        world.apply(Command::Step, &mut NoopObserver);
        assert_eq!(world.tick().0, 1);

        world.apply(Command::Resume, &mut NoopObserver);
        assert_eq!(world.run_ticks(4, &mut NoopObserver), 4);
        assert_eq!(world.tick().0, 5);
    }

    #[test]
    fn run_generations_reports_ticks() {
        let mut world = WorldBuilder::new(test_config(20)).build().unwrap();
        let mut rec = Recorder::default();
        world.run_ticks(5, &mut rec);
        let ticks = world.run_generations(2, &mut rec);
        assert_eq!(ticks, 35);
        assert_eq!(rec.ticks, 40);
        assert_eq!(rec.generations.len(), 2);
        assert_eq!(rec.last_tick.map(|t| t.0), Some(39));
        assert_eq!(world.generation().0, 2);
        assert_eq!(world.clock().ticks_into_generation, 0);
    }

    #[test]
    fn observer_sees_every_resolution() {
        let mut world = WorldBuilder::new(test_config(30)).build().unwrap();
        let mut rec = Recorder::default();
        world.run_generations(1, &mut rec);
        let snap = &rec.generations[0];
        assert_eq!(rec.resolved as u32, snap.fulfilled + snap.denied + snap.expired);
    }

    #[test]
    fn set_scenario_reloads_live_agents_and_flags_flips() {
        let mut world = WorldBuilder::new(test_config(40)).scenario(Scenario::Utopian).build().unwrap();
        world.apply(Command::SetScenario(Scenario::Collapsed), &mut NoopObserver);
        assert_eq!(world.scenario(), Scenario::Collapsed);
        assert!(world.population().iter().all(|a| a.acknowledgments == NormSet::NONE));
        assert!(world.flip_log().is_empty());

        world.run_generations(1, &mut NoopObserver);
        let snap = world.latest_snapshot().unwrap();
        assert_eq!(world.flip_log().len(), snap.population * 4);
        assert!(world.flip_log().iter().all(|f| !f.acknowledged && f.generation.0 == 0));
    }

    #[test]
    fn set_flag_updates_config() {
        let mut world = WorldBuilder::new(test_config(10)).build().unwrap();
        world.apply(Command::SetFlag(Flag::DirectedEmergence, true), &mut NoopObserver);
        world.apply(Command::SetFlag(Flag::MoralRepair, false), &mut NoopObserver);
        assert!(world.flags().directed_emergence);
        assert!(!world.flags().moral_repair);
    }

    #[test]
    fn reset_command_notifies_observer() {
        let mut world = WorldBuilder::new(test_config(10)).build().unwrap();
        let mut rec = Recorder::default();
        world.run_ticks(3, &mut rec);
        world.apply(Command::Reset, &mut rec);
        assert_eq!(rec.resets, 1);
        assert_eq!(world.tick().0, 0);
    }

    #[test]
    fn views_mirror_state() {
        let world = WorldBuilder::new(test_config(30)).build().unwrap();
        assert_eq!(world.agent_views().count(), 30);
        assert_eq!(world.obligation_views().count(), world.obligations().len());
        for v in world.obligation_views() {
            assert!(v.source_position.dist(v.target_position) < 150.0);
            assert_eq!(v.age, 0);
        }
    }

    #[test]
    fn summary_tracks_latest_generation() {
        let mut world = WorldBuilder::new(test_config(30)).scenario(Scenario::Utopian).build().unwrap();
        let before = world.summary();
        assert_eq!(before.assessment, Assessment::EthicalFragmentation);

        world.run_generations(1, &mut NoopObserver);
        let s = world.summary();
        let snap = world.latest_snapshot().unwrap();
        assert_eq!(s.generation, world.generation());
        assert_eq!(s.scenario, Scenario::Utopian);
        assert_eq!(s.fulfillment_rate, snap.fulfillment_rate);
        assert_eq!(s.assessment, Assessment::from_fulfillment(snap.fulfillment_rate));
        assert!(s.to_string().contains("utopian"));
    }

    #[test]
    fn drains_empty_the_logs() {
        let mut world = WorldBuilder::new(test_config(20)).build().unwrap();
        world.run_generations(1, &mut NoopObserver);
        let rows = world.drain_agent_log();
        assert_eq!(rows.len(), world.latest_snapshot().unwrap().population);
        assert!(world.agent_log().is_empty());
        let events = world.drain_obligation_log();
        assert!(!events.is_empty());
        assert!(world.obligation_log().is_empty());
    }
}

// ── Retention ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod retention {
    use nm_core::{RetentionPolicy, WorldConfig};

    use super::test_config;
    use crate::{NoopObserver, WorldBuilder};

    #[test]
    fn capped_logs_evict_oldest() {
        let config = WorldConfig {
            retention: RetentionPolicy { obligation_log: Some(5), biography: Some(1), ..RetentionPolicy::UNBOUNDED },
            ..test_config(40)
        };
        let mut world = WorldBuilder::new(config).build().unwrap();
        world.run_generations(2, &mut NoopObserver);
        assert_eq!(world.obligation_log().len(), 5);
        assert!(world.obligation_log().evicted() > 0);
        assert!(world.population().iter().all(|a| a.biography_len() <= 1));
    }
}
