//! # Ranking Module
//!
//! Two ranking policies live here, and they deliberately answer different questions:
//!
//! - [`RankByAssessmentMarks`] ranks the results of a **single assessment** by raw
//!   marks (highest first). The caller persists the position on each result row.
//! - [`RankByAggregatePoints`] ranks pupils by their **summed points** across
//!   subjects, once within their stream and once within their class. Nothing is
//!   persisted; it is recomputed every time a marks sheet is loaded.
//!
//! Both policies break ties by ascending pupil id, so repeated runs over the same
//! input always produce the same order.
//!
//! The aggregate policy sorts totals **descending**, so the pupil with the most
//! points is placed first even though fewer points is the better outcome. That is
//! the established behaviour of marks sheets and is kept as is.

use crate::ordinal::ordinal;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// A ranking strategy over a slice of entries.
pub trait RankingPolicy {
    type Entry;
    type Output;

    /// Short name used in logs.
    const NAME: &'static str;

    fn rank(entries: &[Self::Entry]) -> Self::Output;
}

/// One pupil's raw mark on a single assessment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkEntry {
    pub pupil_id: i64,
    pub marks: f64,
}

/// Ranks one assessment's results by marks descending.
///
/// The output pairs each pupil id with its 1-based position, in ranked order.
pub struct RankByAssessmentMarks;

impl RankingPolicy for RankByAssessmentMarks {
    type Entry = MarkEntry;
    type Output = Vec<(i64, u32)>;

    const NAME: &'static str = "assessment-marks";

    fn rank(entries: &[MarkEntry]) -> Vec<(i64, u32)> {
        let mut sorted: Vec<&MarkEntry> = entries.iter().collect();
        // Adding 0.0 folds -0.0 into 0.0 so the two tie on pupil id.
        sorted.sort_by(|a, b| {
            (b.marks + 0.0)
                .total_cmp(&(a.marks + 0.0))
                .then_with(|| a.pupil_id.cmp(&b.pupil_id))
        });

        sorted
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| (entry.pupil_id, idx as u32 + 1))
            .collect()
    }
}

/// A pupil's summed points together with the grouping they are ranked in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateEntry {
    pub pupil_id: i64,
    pub class_name: String,
    pub stream_name: String,
    pub total_points: u32,
}

/// Position of a pupil within one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupPosition {
    pub position: u32,
    pub ordinal: String,
    pub group_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateStanding {
    pub stream: GroupPosition,
    pub class: GroupPosition,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateRanking {
    /// Keyed by pupil id.
    pub standings: HashMap<i64, AggregateStanding>,
    /// Keyed by [`stream_key`].
    pub stream_totals: BTreeMap<String, usize>,
    /// Keyed by class name.
    pub class_totals: BTreeMap<String, usize>,
}

/// Group key for a stream: `"<class_name>_<stream_name>"`.
pub fn stream_key(class_name: &str, stream_name: &str) -> String {
    format!("{class_name}_{stream_name}")
}

/// Ranks pupils by total points, descending, inside stream and class groups.
pub struct RankByAggregatePoints;

impl RankByAggregatePoints {
    fn order(a: &AggregateEntry, b: &AggregateEntry) -> Ordering {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| a.pupil_id.cmp(&b.pupil_id))
    }

    /// Groups entries by `key`, sorts each group and hands out positions.
    fn positions_by<'a, F>(
        entries: &'a [AggregateEntry],
        key: F,
    ) -> (HashMap<i64, GroupPosition>, BTreeMap<String, usize>)
    where
        F: Fn(&'a AggregateEntry) -> String,
    {
        let mut groups: BTreeMap<String, Vec<&'a AggregateEntry>> = BTreeMap::new();
        for entry in entries {
            groups.entry(key(entry)).or_default().push(entry);
        }

        let mut positions = HashMap::with_capacity(entries.len());
        let mut totals = BTreeMap::new();

        for (group, mut members) in groups {
            members.sort_by(|a, b| Self::order(a, b));
            let size = members.len();
            for (idx, entry) in members.into_iter().enumerate() {
                let position = idx as u32 + 1;
                positions.insert(
                    entry.pupil_id,
                    GroupPosition {
                        position,
                        ordinal: ordinal(position),
                        group_size: size,
                    },
                );
            }
            totals.insert(group, size);
        }

        (positions, totals)
    }
}

impl RankingPolicy for RankByAggregatePoints {
    type Entry = AggregateEntry;
    type Output = AggregateRanking;

    const NAME: &'static str = "aggregate-points";

    fn rank(entries: &[AggregateEntry]) -> AggregateRanking {
        let (mut by_stream, stream_totals) =
            Self::positions_by(entries, |e| stream_key(&e.class_name, &e.stream_name));
        let (mut by_class, class_totals) = Self::positions_by(entries, |e| e.class_name.clone());

        let standings = entries
            .iter()
            .filter_map(|e| {
                let stream = by_stream.remove(&e.pupil_id)?;
                let class = by_class.remove(&e.pupil_id)?;
                Some((e.pupil_id, AggregateStanding { stream, class }))
            })
            .collect();

        AggregateRanking {
            standings,
            stream_totals,
            class_totals,
        }
    }
}
