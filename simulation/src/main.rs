//! Broodline headless driver
//!
//! Usage: `broodline [config.json] [generations]`

use anyhow::Context;
use simulation::{SimConfig, SimulationWorld};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_GENERATIONS: u32 = 10;

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            SimConfig::from_json_str(&json).with_context(|| format!("loading config {path}"))?
        }
        None => SimConfig::default(),
    };
    let generations = match args.next() {
        Some(raw) => raw
            .parse::<u32>()
            .with_context(|| format!("invalid generation count {raw:?}"))?,
        None => DEFAULT_GENERATIONS,
    };

    let mut world = SimulationWorld::new(config)?;
    info!("Seeded {} founders", world.counters().created);

    for _ in 0..generations {
        world.advance_generation();
        let counters = world.counters();
        info!(
            "Generation {}: created {}, active {}, dead {} (A {}, B {}, C {}, none {})",
            world.current_generation(),
            counters.created,
            counters.active,
            counters.dead,
            counters.by_kind.a,
            counters.by_kind.b,
            counters.by_kind.c,
            counters.by_kind.unassigned,
        );
        if counters.active == 0 {
            info!("Population extinct");
            break;
        }
    }

    Ok(())
}
