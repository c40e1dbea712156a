mod common;

use common::{registry_entries, REGISTRY};
use param_hash::{HashParams, KeySet, ParamTable, SearchOutcome, Searcher, TableError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

fn registry_search() -> SearchOutcome {
    Searcher::new()
        .with_multipliers(1..2000)
        .with_shifts(0..23)
        .with_modulus(128)
        .run(REGISTRY)
        .unwrap()
}

#[test]
fn search_over_registry() {
    let out = registry_search();
    assert_eq!(out.params(), HashParams::new(137, 6, 128).unwrap());
    assert_eq!(out.best.metrics.max_collision, 2);
    assert_eq!(out.best.metrics.occupied, 86);
    assert_eq!(out.best.metrics.keys, 90);
    assert!(!out.is_perfect());

    let trail: Vec<(u32, u32, u64, u32)> = out
        .improvements
        .iter()
        .map(|c| {
            (
                c.metrics.max_collision,
                c.metrics.occupied,
                c.params.multiplier,
                c.params.shift,
            )
        })
        .collect();
    assert_eq!(
        trail,
        vec![
            (18, 15, 3, 0),
            (10, 23, 3, 1),
            (6, 37, 3, 2),
            (3, 59, 3, 3),
            (2, 76, 3, 4),
            (2, 80, 7, 5),
            (2, 81, 19, 4),
            (2, 82, 19, 5),
            (2, 83, 93, 5),
            (2, 84, 123, 7),
            (2, 86, 137, 6),
        ]
    );
}

#[test]
fn search_is_stable_across_runs_and_threads() {
    let base = Searcher::new().with_multipliers(1..500).with_modulus(128);
    let seq = Searcher::new()
        .with_config(base.config().clone())
        .parallel(false)
        .run(REGISTRY)
        .unwrap();
    let par = base.run(REGISTRY).unwrap();
    let again = base.run(REGISTRY).unwrap();
    assert_eq!(seq.best, par.best);
    assert_eq!(seq.improvements, par.improvements);
    assert_eq!(par.improvements, again.improvements);
}

#[test]
fn every_name_resolves_to_its_id() {
    let out = registry_search();
    let table = ParamTable::from_search(registry_entries(), &out).unwrap();
    assert_eq!(table.len(), REGISTRY.len());
    for (id, name) in REGISTRY.iter().enumerate() {
        assert_eq!(table.lookup(name), Ok(&id), "{}", name);
    }
}

#[test]
fn table_agrees_with_search() {
    let out = registry_search();
    let table = ParamTable::from_search(registry_entries(), &out).unwrap();
    let stats = table.stats();
    assert_eq!(stats.max_bucket_len as u32, out.best.metrics.max_collision);
    assert_eq!(stats.occupied as u32, out.best.metrics.occupied);
    assert_eq!(stats.keys, 90);
    assert_eq!(stats.max_collisions, 2);
    assert_eq!(stats.avg_collisions, 2.0);

    let keys = KeySet::new(REGISTRY).unwrap();
    let assignment = out.assignment(&keys);
    let mut total = 0;
    for (b, names) in assignment.iter().enumerate() {
        let in_table: Vec<&str> = table.bucket(b).map(|(name, _)| name).collect();
        assert_eq!(&in_table, names);
        total += names.len();
    }
    assert_eq!(total, REGISTRY.len());

    let mut pairs: Vec<Vec<&str>> = assignment.into_iter().filter(|n| n.len() > 1).collect();
    pairs.sort();
    assert_eq!(
        pairs,
        vec![
            vec!["MCM", "Z1CHN"],
            vec!["Z1ENH", "Z1R6TR"],
            vec!["Z1R6OU", "Z1TRB"],
            vec!["Z1R9MP", "Z1TRA"],
        ]
    );
}

#[test]
fn lookalikes_are_not_found() {
    let table = ParamTable::build(registry_entries(), HashParams::new(137, 6, 128).unwrap()).unwrap();
    // Same encoding as real names: first character and past the window are ignored.
    for name in ["XCM", "Z1TYPX", "A1R3DT", "Z1R3DTQ"] {
        assert_eq!(table.lookup(name), Err(TableError::KeyNotFound), "{}", name);
    }
    for name in ["", "Z", "Z1", "z1typ", "Z1R10IN", "Z1R0IN"] {
        assert!(!table.contains(name), "{}", name);
    }
}

#[test]
fn random_probes_only_hit_registry_names() {
    let table = ParamTable::build(registry_entries(), HashParams::new(137, 6, 128).unwrap()).unwrap();
    let known: HashSet<&str> = REGISTRY.iter().copied().collect();
    let alphabet = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789az-";
    let mut rng = StdRng::seed_from_u64(0x5EED_0F_D1A1);

    let mut hits = 0;
    for _ in 0..20_000 {
        let len = rng.gen_range(0..9);
        let probe: String = (0..len)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
            .collect();
        match table.get(&probe) {
            Some(&id) => {
                assert_eq!(REGISTRY[id], probe);
                hits += 1;
            }
            None => assert!(!known.contains(probe.as_str()), "{}", probe),
        }
    }
    // Registry names hardly ever come out of a uniform generator.
    assert!(hits < 5);
}
