//! Merging of the clipped timelines' boundaries into one sorted, duplicate free sequence.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

use serde::Deserialize;

use crate::fact::Fact;
use crate::normalize::ClippedTimeline;
use crate::time::{Interval, Timestamp};

/// How the per source boundaries are merged.
///
/// `Heap` runs a k-way merge over the already sorted timelines, O(M log N) for M
/// boundary candidates from N sources. `Sort` collects every candidate and sorts
/// them, O(M log M). Both give the same result.
#[derive(Deserialize, PartialEq, Eq, Clone, Copy, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    #[default]
    Heap,
    Sort,
}

// position 2i is the start of fact i, 2i + 1 its end
fn candidate<P>(facts: &[Arc<Fact<P>>], position: usize) -> Option<Timestamp> {
    facts.get(position / 2).map(|fact| {
        if position % 2 == 0 {
            fact.start()
        } else {
            fact.end()
        }
    })
}

fn candidate_count<P>(timelines: &[ClippedTimeline<P>]) -> usize {
    timelines.iter().map(|(_, facts)| 2 * facts.len()).sum::<usize>() + 2
}

/// The strictly increasing boundaries of `range` and every clipped fact in `timelines`.
///
/// The result always starts with `range.start()` and ends with `range.end()`.
pub(crate) fn merge_boundaries<P>(
    range: &Interval,
    timelines: &[ClippedTimeline<P>],
    strategy: MergeStrategy,
) -> Vec<Timestamp> {
    match strategy {
        MergeStrategy::Heap => heap_merge(range, timelines),
        MergeStrategy::Sort => sort_merge(range, timelines),
    }
}

fn heap_merge<P>(range: &Interval, timelines: &[ClippedTimeline<P>]) -> Vec<Timestamp> {
    let mut boundaries = Vec::with_capacity(candidate_count(timelines));
    boundaries.push(range.start());
    // (next candidate, timeline, position within the timeline)
    let mut heap = BinaryHeap::with_capacity(timelines.len());
    for (index, (_, facts)) in timelines.iter().enumerate() {
        if let Some(t) = candidate(facts, 0) {
            heap.push(Reverse((t, index, 0)));
        }
    }
    while let Some(Reverse((t, index, position))) = heap.pop() {
        if boundaries.last() != Some(&t) {
            boundaries.push(t);
        }
        if let Some(next) = candidate(&timelines[index].1, position + 1) {
            heap.push(Reverse((next, index, position + 1)));
        }
    }
    if boundaries.last() != Some(&range.end()) {
        boundaries.push(range.end());
    }
    boundaries
}

fn sort_merge<P>(range: &Interval, timelines: &[ClippedTimeline<P>]) -> Vec<Timestamp> {
    let mut boundaries = Vec::with_capacity(candidate_count(timelines));
    boundaries.push(range.start());
    boundaries.push(range.end());
    for (_, facts) in timelines {
        for fact in facts {
            boundaries.push(fact.start());
            boundaries.push(fact.end());
        }
    }
    boundaries.sort_unstable();
    boundaries.dedup();
    boundaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::SourceName;
    use crate::time::parse_timestamp;

    fn t(s: &str) -> Timestamp {
        parse_timestamp(s).unwrap()
    }

    fn timeline(source: &str, spans: &[(&str, &str)]) -> ClippedTimeline<()> {
        let name: SourceName = source.into();
        let facts = spans
            .iter()
            .map(|(start, end)| Arc::new(Fact::new(Arc::clone(&name), t(start), t(end), ()).unwrap()))
            .collect();
        (name, facts)
    }

    fn day() -> Interval {
        Interval::new(t("2011-11-22 00:00"), t("2011-11-23 00:00")).unwrap()
    }

    fn both(range: &Interval, timelines: &[ClippedTimeline<()>]) -> Vec<Timestamp> {
        let heap = merge_boundaries(range, timelines, MergeStrategy::Heap);
        let sort = merge_boundaries(range, timelines, MergeStrategy::Sort);
        assert_eq!(heap, sort);
        heap
    }

    #[test]
    fn shared_boundaries_appear_once() {
        let timelines = vec![
            timeline("A", &[("2011-11-22 00:00", "2011-11-22 12:00"), ("2011-11-22 12:00", "2011-11-23 00:00")]),
            timeline("B", &[
                ("2011-11-22 00:00", "2011-11-22 08:00"),
                ("2011-11-22 08:00", "2011-11-22 16:00"),
                ("2011-11-22 16:00", "2011-11-23 00:00"),
            ]),
        ];
        let expected: Vec<_> = ["2011-11-22 00:00", "2011-11-22 08:00", "2011-11-22 12:00", "2011-11-22 16:00", "2011-11-23 00:00"]
            .iter()
            .map(|s| t(s))
            .collect();
        assert_eq!(both(&day(), &timelines), expected);
    }

    #[test]
    fn range_edges_are_always_present() {
        let timelines = vec![timeline("A", &[("2011-11-22 06:00", "2011-11-22 09:00")])];
        let boundaries = both(&day(), &timelines);
        assert_eq!(boundaries.len(), 4);
        assert_eq!(boundaries.first(), Some(&t("2011-11-22 00:00")));
        assert_eq!(boundaries.last(), Some(&t("2011-11-23 00:00")));
    }

    #[test]
    fn no_timelines_gives_the_range() {
        let boundaries = both(&day(), &[]);
        assert_eq!(boundaries, vec![t("2011-11-22 00:00"), t("2011-11-23 00:00")]);
        let empty = vec![timeline("A", &[])];
        assert_eq!(both(&day(), &empty).len(), 2);
    }

    #[test]
    fn gaps_contribute_both_sides() {
        let timelines = vec![
            timeline("A", &[("2011-11-22 00:00", "2011-11-22 04:00"), ("2011-11-22 10:00", "2011-11-22 20:00")]),
            timeline("B", &[("2011-11-22 02:00", "2011-11-22 10:00")]),
        ];
        let boundaries = both(&day(), &timelines);
        assert!(boundaries.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(boundaries.len(), 6);
    }
}
