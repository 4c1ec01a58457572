//! Shared test documents
//!
//! @module graph/fixtures

use super::document::{Document, IdKey, IdMap, Metadata, RawRelation};

pub const V1: u32 = 0;
pub const V2: u32 = 1;
pub const F: u32 = 2;
pub const V3: u32 = 3;

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn map(entries: &[(u32, &[u32])]) -> IdMap {
    entries
        .iter()
        .map(|(k, v)| (IdKey(*k), v.to_vec()))
        .collect()
}

/// Package `p` > class `p.C` > method `p.C.m` holding `v1`, `v2`, field `f`
/// and `v3`; raw graph `v1 -> f -> v2`.
pub fn scenario_document() -> Document {
    Document {
        metadata: Metadata {
            packages: strings(&["p"]),
            classes: strings(&["p.C"]),
            methods: strings(&["p.C.m"]),
            vars_and_fields: strings(&["v1", "v2", "f", "v3"]),
        },
        relation: RawRelation {
            package_to_classes: map(&[(0, &[0])]),
            class_to_methods: map(&[(0, &[0])]),
            class_to_fields: map(&[(0, &[F])]),
            method_to_vars: map(&[(0, &[V1, V2, F, V3])]),
        },
        graph: map(&[(V1, &[F]), (F, &[V2])]),
        source_nodes: vec![V1],
        sink_nodes: vec![V2],
        recommended_paths: vec![vec![V1, F, V2]],
    }
}

/// Variables `a`, `f`, `g`, `b` with fields `f` and `g`; raw `a -> f -> g -> b`.
pub fn field_chain_document() -> Document {
    Document {
        metadata: Metadata {
            packages: strings(&["p"]),
            classes: strings(&["p.C"]),
            methods: strings(&["p.C.m"]),
            vars_and_fields: strings(&["a", "f", "g", "b"]),
        },
        relation: RawRelation {
            package_to_classes: map(&[(0, &[0])]),
            class_to_methods: map(&[(0, &[0])]),
            class_to_fields: map(&[(0, &[1, 2])]),
            method_to_vars: map(&[(0, &[0, 1, 2, 3])]),
        },
        graph: map(&[(0, &[1]), (1, &[2]), (2, &[3])]),
        source_nodes: vec![0],
        sink_nodes: vec![3],
        recommended_paths: vec![],
    }
}

pub mod flow {
    //! Ids of `flow_document`

    pub const INPUT: u32 = 0;
    pub const A: u32 = 1;
    pub const B: u32 = 2;
    pub const JOINED: u32 = 3;
    pub const OUT: u32 = 4;
    pub const FLD: u32 = 5;
    pub const X: u32 = 6;
}

/// Two packages, an unpackaged class and a diamond:
///
/// ```text
/// app > app.Main > main(input, a, b)
/// lib > lib.Util > clean(joined, fld)  sink(out)
///       .Loose   > run(x)
///
/// input -> a -> joined
/// input -> b -> joined
/// joined -> fld -> out      (fld is a field of lib.Util)
/// ```
pub fn flow_document() -> Document {
    use flow::*;

    Document {
        metadata: Metadata {
            packages: strings(&["app", "lib"]),
            classes: strings(&["app.Main", "lib.Util", "Loose"]),
            methods: strings(&["app.Main.main", "lib.Util.clean", "lib.Util.sink", ".Loose.run"]),
            vars_and_fields: strings(&["input", "a", "b", "joined", "out", "fld", "x"]),
        },
        relation: RawRelation {
            package_to_classes: map(&[(0, &[0]), (1, &[1])]),
            class_to_methods: map(&[(0, &[0]), (1, &[1, 2]), (2, &[3])]),
            class_to_fields: map(&[(1, &[FLD])]),
            method_to_vars: map(&[
                (0, &[INPUT, A, B]),
                (1, &[JOINED, FLD]),
                (2, &[OUT]),
                (3, &[X]),
            ]),
        },
        graph: map(&[
            (INPUT, &[A, B]),
            (A, &[JOINED]),
            (B, &[JOINED]),
            (JOINED, &[FLD]),
            (FLD, &[OUT]),
            (X, &[]),
        ]),
        source_nodes: vec![INPUT],
        sink_nodes: vec![OUT],
        recommended_paths: vec![vec![INPUT, A, JOINED, FLD, OUT]],
    }
}

/// Source `s` feeding the cycle `c1 -> c2 -> c1`
pub fn cycle_document() -> Document {
    Document {
        metadata: Metadata {
            packages: strings(&["p"]),
            classes: strings(&["p.Loop"]),
            methods: strings(&["p.Loop.spin"]),
            vars_and_fields: strings(&["s", "c1", "c2"]),
        },
        relation: RawRelation {
            package_to_classes: map(&[(0, &[0])]),
            class_to_methods: map(&[(0, &[0])]),
            class_to_fields: IdMap::new(),
            method_to_vars: map(&[(0, &[0, 1, 2])]),
        },
        graph: map(&[(0, &[1]), (1, &[2]), (2, &[1])]),
        source_nodes: vec![0],
        sink_nodes: vec![],
        recommended_paths: vec![],
    }
}
