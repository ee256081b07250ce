#![allow(dead_code)]

use groupforge::error::GfResult;
use groupforge::relationships::{RelationshipMatrix, Score};
use groupforge::roster::Roster;
use std::sync::Arc;

/// The four-person scenario: Ann/Bob and Cid/Dee clash (5), every other
/// pair scores 1.
pub fn four_person_matrix() -> Arc<RelationshipMatrix> {
    let roster = Roster::new(["Ann", "Bob", "Cid", "Dee"]).unwrap();
    let mut b = RelationshipMatrix::builder(&roster);
    b.set_by_name("Ann", "Bob", 5.0).unwrap();
    b.set_by_name("Ann", "Cid", 1.0).unwrap();
    b.set_by_name("Ann", "Dee", 1.0).unwrap();
    b.set_by_name("Bob", "Cid", 1.0).unwrap();
    b.set_by_name("Bob", "Dee", 1.0).unwrap();
    b.set_by_name("Cid", "Dee", 5.0).unwrap();
    Arc::new(b.build().unwrap())
}

/// Deterministic pseudo-random scores in [0, 10) for a roster of `n`.
pub fn hashed_matrix(n: usize, salt: u64) -> Arc<RelationshipMatrix> {
    let roster = Roster::new((0..n).map(|i| format!("m{:03}", i))).unwrap();
    let source = |a: &str, b: &str| -> GfResult<Score> {
        let mut h = salt.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        for byte in a.bytes().chain(b"|".iter().copied()).chain(b.bytes()) {
            h = (h ^ byte as u64).wrapping_mul(0x0100_0000_01B3);
        }
        Ok((h % 1000) as f64 / 100.0)
    };
    Arc::new(RelationshipMatrix::from_source(&roster, &source).unwrap())
}

pub const FOUR_PERSON_CSV: &str = "\
,Ann,Bob,Cid,Dee
Ann,,5,1,1
Bob,,,1,1
Cid,,,,5
Dee,,,,
";
