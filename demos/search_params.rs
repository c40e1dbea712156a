//! Runs the parameter search over the synth's parameter names and prints the
//! constants to bake into the runtime table.
//!
//! Ranges come from the environment:
//! - `PARAM_HASH_MULTIPLIERS`: upper bound of the multiplier search index (default 100000)
//! - `PARAM_HASH_SHIFTS`: upper bound of the shift range (default 23)
//! - `PARAM_HASH_MODULI`: comma separated bucket counts (default 128)
//! - `PARAM_HASH_SEARCH_THREADS`: worker threads

#[path = "../tests/common/mod.rs"]
mod common;

use common::{registry_entries, REGISTRY};
use param_hash::{ParamTable, SearchConfig, Searcher};
use std::env;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_search_config();
    println!("param_hash search");
    println!("n = {} keys", REGISTRY.len());
    println!(
        "multipliers 3..={}, shifts {:?}, moduli {:?}",
        2 * (config.multipliers.end - 1) + 1,
        config.shifts,
        config.moduli
    );
    println!("{}", "=".repeat(60));

    let outcome = Searcher::new().with_config(config).run(REGISTRY)?;
    print!("{}", outcome.report());
    outcome.print_summary();

    let start = Instant::now();
    let table = ParamTable::from_search(registry_entries(), &outcome)?;
    let built = start.elapsed();
    table.stats().print_summary();
    println!("  Build time: {:?}", built);

    for name in REGISTRY {
        let id = table.lookup(name)?;
        assert_eq!(REGISTRY[*id], name);
    }

    let params = outcome.params();
    println!();
    println!("const MULTIPLIER: u64 = {};", params.multiplier);
    println!("const SHIFT: u32 = {};", params.shift);
    println!("const ENTRIES: u32 = {};", params.modulus);

    Ok(())
}

fn load_search_config() -> SearchConfig {
    let defaults = SearchConfig::default();
    let multipliers = env_u32("PARAM_HASH_MULTIPLIERS")
        .filter(|&v| v > 1)
        .map(|end| 1..end)
        .unwrap_or(defaults.multipliers.clone());
    let shifts = env_u32("PARAM_HASH_SHIFTS")
        .filter(|&v| v > 0 && v <= 64)
        .map(|end| 0..end)
        .unwrap_or(defaults.shifts.clone());
    let moduli = parse_moduli(env::var("PARAM_HASH_MODULI").ok().as_deref())
        .unwrap_or(defaults.moduli.clone());
    SearchConfig {
        multipliers,
        shifts,
        moduli,
        ..defaults
    }
}

fn env_u32(name: &str) -> Option<u32> {
    env::var(name).ok().and_then(|v| v.trim().parse::<u32>().ok())
}

fn parse_moduli(v: Option<&str>) -> Option<Vec<u32>> {
    let text = v?;
    let moduli = text
        .split(',')
        .filter_map(|s| s.trim().parse::<u32>().ok())
        .filter(|&m| m > 0)
        .collect::<Vec<_>>();
    if moduli.is_empty() { None } else { Some(moduli) }
}
