//! The six literal boundary scenarios, exercised through the
//! public API only (unlike the white-box invariant checks in
//! `arena`'s own `#[cfg(test)]` module, these only ever see what a caller
//! of the crate would see: return values and `Arena::dump`'s text).

use vmem_arena::{AllocError, Arena, Flags};

/// Parses `Arena::dump`'s segment lines into `(base, end, kind, imported)`
/// tuples, in address order, skipping the header and the allocated-index
/// listing.
fn segments(dump: &str) -> Vec<(usize, usize, String, bool)> {
    dump.lines()
        .filter(|line| line.trim_start().starts_with('['))
        .map(|line| {
            let line = line.trim();
            let imported = line.contains("(imported)");
            let bracket_end = line.find(']').expect("segment line has a closing bracket");
            let bracket = &line[1..bracket_end];
            let mut parts = bracket.split(", ");
            let base = usize::from_str_radix(parts.next().unwrap().trim_start_matches("0x"), 16).unwrap();
            let end = usize::from_str_radix(parts.next().unwrap().trim_start_matches("0x"), 16).unwrap();
            let kind_start = line.find('(').unwrap();
            let kind_end = line[kind_start..].find(')').unwrap() + kind_start;
            let kind = line[kind_start + 1..kind_end].to_string();
            (base, end, kind, imported)
        })
        .collect()
}

#[test]
fn scenario_1_exact_fit_no_split() {
    let arena = Arena::create("s1", 0x1000, 0x1000, 0x1000);
    let addr = arena.alloc(0x1000, Flags::INSTANT_FIT).unwrap();
    assert_eq!(addr, 0x1000);

    let segs = segments(&arena.dump());
    assert_eq!(segs.len(), 1);
    assert_eq!(segs[0], (0x1000, 0x2000, "ALLOCATED".to_string(), false));
}

#[test]
fn scenario_2_head_split() {
    let arena = Arena::create("s2", 0, 0x10000, 0x100);
    let addr = arena.xalloc(0x1000, 0x1000, 0x100, 0, 0, 0, Flags::INSTANT_FIT).unwrap();
    assert_eq!(addr, 0x100);

    let segs = segments(&arena.dump());
    assert_eq!(
        segs,
        vec![
            (0, 0x100, "FREE".to_string(), false),
            (0x100, 0x1100, "ALLOCATED".to_string(), false),
            (0x1100, 0x10000, "FREE".to_string(), false),
        ]
    );
}

#[test]
fn scenario_3_tail_split() {
    let arena = Arena::create("s3", 0, 0x10000, 0x1000);
    let addr = arena.alloc(0x1000, Flags::INSTANT_FIT).unwrap();
    assert_eq!(addr, 0);

    let segs = segments(&arena.dump());
    assert_eq!(
        segs,
        vec![
            (0, 0x1000, "ALLOCATED".to_string(), false),
            (0x1000, 0x10000, "FREE".to_string(), false),
        ]
    );
}

#[test]
fn scenario_4_coalesce_on_free() {
    let arena = Arena::create("s4", 0, 0x10000, 0x100);
    arena.xalloc(0x1000, 0x1000, 0x100, 0, 0, 0, Flags::INSTANT_FIT).unwrap();
    arena.free(0x100, 0x1000);

    let segs = segments(&arena.dump());
    assert_eq!(segs, vec![(0, 0x10000, "FREE".to_string(), false)]);
}

#[test]
fn scenario_5_exhaustion() {
    let arena = Arena::create("s5", 0, 0x1000, 0x1000);
    assert!(arena.alloc(0x1000, Flags::INSTANT_FIT).is_ok());
    assert_eq!(arena.alloc(0x1000, Flags::INSTANT_FIT), Err(AllocError));
}

#[test]
fn scenario_6_best_fit_vs_instant_fit_divergence() {
    // Two identically-laid-out arenas so each policy can be exercised
    // without the first arena's allocation disturbing the second's
    // candidate set.
    let best = Arena::create("s6-best", 0x1000, 0x2000, 0x1000);
    best.add(0x4000, 0x3000, Flags::empty());
    best.add(0x8000, 0x4000, Flags::empty());

    let instant = Arena::create("s6-instant", 0x1000, 0x2000, 0x1000);
    instant.add(0x4000, 0x3000, Flags::empty());
    instant.add(0x8000, 0x4000, Flags::empty());

    let best_addr = best.alloc(0x1800, Flags::BEST_FIT).unwrap();
    assert_eq!(best_addr, 0x1000, "best-fit should consume the smallest admissible (0x2000) segment");

    let instant_addr = instant.alloc(0x1800, Flags::INSTANT_FIT).unwrap();
    assert_eq!(
        instant_addr, 0x4000,
        "instant-fit should take the head of the first guaranteed-large-enough bucket (the 0x3000 segment)"
    );
}
