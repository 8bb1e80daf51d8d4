//! pluralist — headless runner for the rust_norms simulation.
//!
//! Usage: `pluralist [SCENARIO] [GENERATIONS]`.  Scenario defaults to
//! `pluralist`; any name `nm_scenario::Scenario` parses is accepted
//! (`allCare`, `all-care`, `genocide_shock`, …).  `RUST_LOG=info` prints one
//! line per generation from the scheduler itself.
//!
//! Writes `generations.json` and `agents.jsonl` under
//! `output/<scenario>/` and prints the interpretive summary at the end.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use nm_agent::Population;
use nm_core::{NormKind, WorldConfig};
use nm_metrics::GenerationSnapshot;
use nm_scenario::Scenario;
use nm_sim::{SimObserver, WorldBuilder};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:                 u64   = 42;
const INITIAL_AGENTS:       usize = 100;
const MAX_AGENTS:           usize = 1_000;
const TICKS_PER_GENERATION: u32   = 100;
const DEFAULT_GENERATIONS:  u32   = 30;

// ── Observer ──────────────────────────────────────────────────────────────────

/// Prints one table row per generation.
struct TablePrinter;

impl TablePrinter {
    fn header() {
        println!(
            "{:>4} {:>5} {:>5} {:>5} {:>6} {:>5} {:>5} {:>5} {:>5} {:>6} {:>6} {:>6}  {}",
            "gen", "pop", "born", "died", "oblig", "ful", "den", "exp", "rep", "rate", "integ", "debt", "acks L/A/C/E",
        );
        println!("{}", "-".repeat(92));
    }
}

impl SimObserver for TablePrinter {
    fn on_generation_end(&mut self, s: &GenerationSnapshot, _: &Population) {
        println!(
            "{:>4} {:>5} {:>5} {:>5} {:>6} {:>5} {:>5} {:>5} {:>5} {:>6.2} {:>6.2} {:>6.2}  {}",
            s.generation.0,
            s.population,
            s.births,
            s.deaths,
            s.obligations,
            s.fulfilled,
            s.denied,
            s.expired,
            s.repaired,
            s.fulfillment_rate,
            s.relational_integrity,
            s.avg_debt,
            acks(s),
        );
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let scenario: Scenario = match args.next() {
        Some(name) => name.parse()?,
        None => Scenario::Pluralist,
    };
    let generations: u32 = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid generation count {n:?}"))?,
        None => DEFAULT_GENERATIONS,
    };

    println!("=== pluralist — rust_norms ===");
    println!("Scenario: {scenario}  |  Generations: {generations}  |  Seed: {SEED}");
    println!();

    let config = WorldConfig {
        seed: SEED,
        initial_agents: INITIAL_AGENTS,
        max_agents: MAX_AGENTS,
        ticks_per_generation: TICKS_PER_GENERATION,
        ..WorldConfig::default()
    };
    let mut world = WorldBuilder::new(config).scenario(scenario).build()?;
    info!("built world: {} agents, {} obligations", world.population().len(), world.obligations().len());

    TablePrinter::header();
    let t0 = Instant::now();
    let ticks = world.run_generations(generations, &mut TablePrinter);
    let elapsed = t0.elapsed();
    println!();
    println!("{ticks} ticks in {:.3} s", elapsed.as_secs_f64());

    // Export.
    let dir = Path::new("output").join(scenario.name());
    std::fs::create_dir_all(&dir)?;

    let snapshots: Vec<&GenerationSnapshot> = world.generation_log().iter().collect();
    let gen_path = dir.join("generations.json");
    serde_json::to_writer_pretty(BufWriter::new(File::create(&gen_path)?), &snapshots)
        .with_context(|| format!("writing {}", gen_path.display()))?;
    let gen_rows = snapshots.len();

    let agent_path = dir.join("agents.jsonl");
    let mut out = BufWriter::new(File::create(&agent_path)?);
    let rows = world.drain_agent_log();
    for row in &rows {
        serde_json::to_writer(&mut out, row)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    println!("  {:<28} : {} rows", gen_path.display(), gen_rows);
    println!("  {:<28} : {} rows", agent_path.display(), rows.len());
    println!("  {:<28} : {}", "acknowledgment flips", world.flip_log().len());
    println!();

    print!("{}", world.summary());
    Ok(())
}

fn acks(s: &GenerationSnapshot) -> String {
    NormKind::ALL
        .iter()
        .map(|n| s.acknowledging(*n).to_string())
        .collect::<Vec<_>>()
        .join("/")
}
