use crate::error::{GfResult, GroupForgeError};
use crate::roster::Roster;
use tracing::debug;

pub type Score = f64;

/// On-demand pairwise lookup supplied by an external roster/score source.
/// Unknown pairs must fail rather than default to zero.
pub trait ScoreSource {
    fn get_score(&self, name_a: &str, name_b: &str) -> GfResult<Score>;
}

impl<F> ScoreSource for F
where
    F: Fn(&str, &str) -> GfResult<Score>,
{
    fn get_score(&self, name_a: &str, name_b: &str) -> GfResult<Score> {
        self(name_a, name_b)
    }
}

/// Index of the unordered pair `(a, b)`, `a < b`, in a flattened
/// upper triangle without diagonal.
#[inline(always)]
fn pair_index(n: usize, a: usize, b: usize) -> usize {
    a * n - a * (a + 1) / 2 + (b - a - 1)
}

#[inline(always)]
fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Complete, symmetric pairwise score table for one roster. Read-only once
/// built, so it can be shared across optimizers behind an `Arc`.
#[derive(Debug, Clone)]
pub struct RelationshipMatrix {
    roster: Roster,
    scores: Vec<Score>,
}

impl RelationshipMatrix {
    pub fn builder(roster: &Roster) -> RelationshipBuilder<'_> {
        RelationshipBuilder {
            roster,
            cells: vec![None; pair_count(roster.len())],
        }
    }

    /// Pulls every unordered pair from `source`. Any failing lookup aborts
    /// the build with the source's error.
    pub fn from_source<S: ScoreSource + ?Sized>(roster: &Roster, source: &S) -> GfResult<Self> {
        let mut builder = Self::builder(roster);
        for a in roster.iter() {
            for b in roster.iter().skip(a.slot + 1) {
                let score = source.get_score(&a.name, &b.name)?;
                builder.set(a.slot, b.slot, score)?;
            }
        }
        builder.build()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    pub fn pair_count(&self) -> usize {
        self.scores.len()
    }

    /// Score of the unordered pair of slots `a` and `b`.
    #[inline]
    pub fn get(&self, a: usize, b: usize) -> GfResult<Score> {
        let n = self.roster.len();
        if a == b {
            return Err(GroupForgeError::Data(format!(
                "Slot {} paired with itself has no relationship score",
                a
            )));
        }
        if a >= n || b >= n {
            return Err(GroupForgeError::Data(format!(
                "Pair ({}, {}) is outside a roster of {}",
                a, b, n
            )));
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        Ok(self.scores[pair_index(n, lo, hi)])
    }

    pub fn get_by_name(&self, name_a: &str, name_b: &str) -> GfResult<Score> {
        let a = self.roster.require_slot(name_a)?;
        let b = self.roster.require_slot(name_b)?;
        self.get(a, b)
    }
}

impl ScoreSource for RelationshipMatrix {
    fn get_score(&self, name_a: &str, name_b: &str) -> GfResult<Score> {
        self.get_by_name(name_a, name_b)
    }
}

/// Collects pairwise scores; `build` refuses to produce a matrix with gaps.
pub struct RelationshipBuilder<'a> {
    roster: &'a Roster,
    cells: Vec<Option<Score>>,
}

impl<'a> RelationshipBuilder<'a> {
    /// Records the score for the unordered pair. Setting the same pair twice
    /// is accepted only when both values agree.
    pub fn set(&mut self, a: usize, b: usize, score: Score) -> GfResult<&mut Self> {
        let n = self.roster.len();
        if a == b || a >= n || b >= n {
            return Err(GroupForgeError::Data(format!(
                "Invalid pair ({}, {}) for a roster of {}",
                a, b, n
            )));
        }
        if !score.is_finite() {
            return Err(GroupForgeError::Data(format!(
                "Score for ({}, {}) is not finite: {}",
                self.name(a),
                self.name(b),
                score
            )));
        }

        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let idx = pair_index(n, lo, hi);
        if let Some(existing) = self.cells[idx] {
            if existing != score {
                return Err(GroupForgeError::Data(format!(
                    "Conflicting scores for ({}, {}): {} vs {}",
                    self.name(lo),
                    self.name(hi),
                    existing,
                    score
                )));
            }
        }
        self.cells[idx] = Some(score);
        Ok(self)
    }

    pub fn set_by_name(&mut self, name_a: &str, name_b: &str, score: Score) -> GfResult<&mut Self> {
        let a = self.roster.require_slot(name_a)?;
        let b = self.roster.require_slot(name_b)?;
        self.set(a, b, score)
    }

    pub fn missing(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    pub fn build(self) -> GfResult<RelationshipMatrix> {
        let n = self.roster.len();
        let mut scores = Vec::with_capacity(self.cells.len());

        for a in 0..n {
            for b in (a + 1)..n {
                match self.cells[pair_index(n, a, b)] {
                    Some(score) => scores.push(score),
                    None => {
                        return Err(GroupForgeError::Data(format!(
                            "Missing relationship score for ({}, {}); {} of {} pairs are missing",
                            self.name(a),
                            self.name(b),
                            self.missing(),
                            self.cells.len()
                        )));
                    }
                }
            }
        }

        debug!("Relationship matrix built: {} individuals, {} pairs", n, scores.len());

        Ok(RelationshipMatrix {
            roster: self.roster.clone(),
            scores,
        })
    }

    fn name(&self, slot: usize) -> &str {
        self.roster.get(slot).map(|i| i.name.as_str()).unwrap_or("?")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster4() -> Roster {
        Roster::new(["Ann", "Bob", "Cid", "Dee"]).unwrap()
    }

    #[test]
    fn pair_index_is_dense() {
        let n = 5;
        let mut seen = Vec::new();
        for a in 0..n {
            for b in (a + 1)..n {
                seen.push(pair_index(n, a, b));
            }
        }
        assert_eq!(seen, (0..pair_count(n)).collect::<Vec<_>>());
    }

    #[test]
    fn lookup_is_symmetric() {
        let roster = roster4();
        let mut b = RelationshipMatrix::builder(&roster);
        let mut v = 0.0;
        for i in 0..4 {
            for j in (i + 1)..4 {
                v += 1.0;
                b.set(i, j, v).unwrap();
            }
        }
        let m = b.build().unwrap();
        assert_eq!(m.get(0, 3).unwrap(), m.get(3, 0).unwrap());
        assert_eq!(m.get_by_name("Cid", "Bob").unwrap(), 4.0);
    }

    #[test]
    fn incomplete_matrix_fails() {
        let roster = roster4();
        let mut b = RelationshipMatrix::builder(&roster);
        b.set(0, 1, 1.0).unwrap();
        assert_eq!(b.missing(), 5);
        assert!(b.build().unwrap_err().is_data());
    }

    #[test]
    fn conflicting_mirror_values_fail() {
        let roster = roster4();
        let mut b = RelationshipMatrix::builder(&roster);
        b.set(0, 1, 1.0).unwrap();
        b.set(1, 0, 1.0).unwrap();
        assert!(b.set(1, 0, 2.0).is_err());
    }

    #[test]
    fn self_pair_is_data_error() {
        let roster = Roster::new(["Ann", "Bob"]).unwrap();
        let m = RelationshipMatrix::from_source(&roster, &|_: &str, _: &str| -> GfResult<Score> { Ok(1.0) }).unwrap();
        assert!(m.get(1, 1).unwrap_err().is_data());
        assert!(m.get(0, 2).unwrap_err().is_data());
    }

    #[test]
    fn source_failures_propagate() {
        let roster = roster4();
        let source = |a: &str, b: &str| -> GfResult<Score> {
            if a == "Cid" && b == "Dee" {
                Err(GroupForgeError::Data("unknown pair".into()))
            } else {
                Ok(0.5)
            }
        };
        assert!(RelationshipMatrix::from_source(&roster, &source)
            .unwrap_err()
            .is_data());
    }

    #[test]
    fn single_member_roster_has_no_pairs() {
        let roster = Roster::new(["Solo"]).unwrap();
        let m = RelationshipMatrix::builder(&roster).build().unwrap();
        assert_eq!(m.pair_count(), 0);
    }
}
