//! Match ranking.
//!
//! Scores arrive from the server in `[0, 1]`; nothing here computes them.
//! The engine derives a truncated percentage, a display bucket, and a
//! 1-based rank, and is shared by both matching directions through the
//! `Scored` trait.

use serde::Serialize;

use crate::types::{JobPostingMatch, ResumeMatch};

/// Anything carrying a server-computed compatibility score.
pub trait Scored {
    fn score(&self) -> f64;
}

impl Scored for JobPostingMatch {
    fn score(&self) -> f64 {
        self.score
    }
}

impl Scored for ResumeMatch {
    fn score(&self) -> f64 {
        self.score
    }
}

impl<T: Scored + ?Sized> Scored for &T {
    fn score(&self) -> f64 {
        (**self).score()
    }
}

/// Display color class for a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Red,
    Green,
    Orange,
    Blue,
    Gray,
}

/// Score band. Lower bounds are inclusive and checked high to low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum MatchBucket {
    Low,
    Basic,
    Good,
    High,
    Perfect,
}

impl MatchBucket {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            MatchBucket::Perfect
        } else if score >= 0.8 {
            MatchBucket::High
        } else if score >= 0.7 {
            MatchBucket::Good
        } else if score >= 0.6 {
            MatchBucket::Basic
        } else {
            MatchBucket::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchBucket::Perfect => "완벽 매치",
            MatchBucket::High => "높은 적합도",
            MatchBucket::Good => "양호한 적합도",
            MatchBucket::Basic => "기본 적합도",
            MatchBucket::Low => "낮은 적합도",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            MatchBucket::Perfect => Severity::Red,
            MatchBucket::High => Severity::Green,
            MatchBucket::Good => Severity::Orange,
            MatchBucket::Basic => Severity::Blue,
            MatchBucket::Low => Severity::Gray,
        }
    }
}

/// `floor(score * 100)`, clamped to 0..=100. Truncation, never rounding:
/// 0.599 shows as 59, in the same bucket as its score.
pub fn percentage(score: f64) -> u32 {
    (score * 100.0).floor().clamp(0.0, 100.0) as u32
}

/// A record with its position in one ranking run. The rank lives here,
/// never on the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRecord<T> {
    pub rank: usize,
    pub percentage: u32,
    pub bucket: MatchBucket,
    pub record: T,
}

impl<T> RankedRecord<T> {
    pub fn label(&self) -> &'static str {
        self.bucket.label()
    }

    pub fn severity(&self) -> Severity {
        self.bucket.severity()
    }
}

/// Sort by raw score, descending and stable, then number from 1.
pub fn rank<T: Scored>(mut records: Vec<T>) -> Vec<RankedRecord<T>> {
    records.sort_by(|a, b| b.score().total_cmp(&a.score()));
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let score = record.score();
            RankedRecord {
                rank: index + 1,
                percentage: percentage(score),
                bucket: MatchBucket::from_score(score),
                record,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Fixture {
        id: i64,
        score: f64,
    }

    impl Scored for Fixture {
        fn score(&self) -> f64 {
            self.score
        }
    }

    fn fixtures(pairs: &[(i64, f64)]) -> Vec<Fixture> {
        pairs.iter().map(|&(id, score)| Fixture { id, score }).collect()
    }

    #[test]
    fn ties_keep_input_order() {
        let ranked = rank(fixtures(&[(1, 0.95), (2, 0.72), (3, 0.95)]));
        let order: Vec<_> = ranked.iter().map(|r| (r.record.id, r.rank)).collect();
        assert_eq!(order, vec![(1, 1), (3, 2), (2, 3)]);
    }

    #[test]
    fn sorts_on_raw_score_not_percentage() {
        // Both truncate to 59%; the higher raw score still wins.
        let ranked = rank(fixtures(&[(1, 0.591), (2, 0.599)]));
        assert_eq!(ranked[0].record.id, 2);
        assert_eq!(ranked[0].percentage, 59);
        assert_eq!(ranked[1].percentage, 59);
    }

    #[test]
    fn bucket_boundaries_are_inclusive_at_the_bottom() {
        let cases = [
            (1.0, MatchBucket::Perfect),
            (0.9, MatchBucket::Perfect),
            (0.89, MatchBucket::High),
            (0.8, MatchBucket::High),
            (0.79, MatchBucket::Good),
            (0.7, MatchBucket::Good),
            (0.69, MatchBucket::Basic),
            (0.6, MatchBucket::Basic),
            (0.599, MatchBucket::Low),
            (0.0, MatchBucket::Low),
        ];
        for (score, bucket) in cases {
            assert_eq!(MatchBucket::from_score(score), bucket, "score {score}");
        }
    }

    #[test]
    fn labels_and_colors_follow_bucket() {
        assert_eq!(MatchBucket::Perfect.label(), "완벽 매치");
        assert_eq!(MatchBucket::Perfect.severity(), Severity::Red);
        assert_eq!(MatchBucket::High.severity(), Severity::Green);
        assert_eq!(MatchBucket::Good.severity(), Severity::Orange);
        assert_eq!(MatchBucket::Basic.severity(), Severity::Blue);
        assert_eq!(MatchBucket::Low.label(), "낮은 적합도");
        assert_eq!(MatchBucket::Low.severity(), Severity::Gray);
    }

    #[test]
    fn percentage_truncates() {
        assert_eq!(percentage(0.599), 59);
        assert_eq!(percentage(0.999), 99);
        assert_eq!(percentage(1.0), 100);
        assert_eq!(percentage(0.0), 0);
    }

    #[test]
    fn empty_input_ranks_to_empty_output() {
        assert!(rank(Vec::<Fixture>::new()).is_empty());
    }

    #[test]
    fn ranking_borrowed_records_leaves_input_untouched() {
        let input = fixtures(&[(1, 0.5), (2, 0.9)]);
        let ranked = rank(input.iter().collect());
        assert_eq!(ranked[0].record.id, 2);
        assert_eq!(input[0].id, 1);
    }
}
