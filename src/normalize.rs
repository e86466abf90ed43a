//! Clipping of a single timeline to the requested range.
//!
//! The partition builder walks every timeline with a cursor that only moves forward,
//! so the facts handed to it must be disjoint and ordered. This is where that is
//! checked, before anything is clipped away.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{trace, warn};

use crate::error::{Result, TimesliceError};
use crate::fact::{Fact, SourceName};
use crate::time::Interval;

/// A source's facts after clipping, in end time order.
pub type ClippedTimeline<P> = (SourceName, Vec<Arc<Fact<P>>>);

fn malformed(source: &str, message: String) -> TimesliceError {
    warn!(source, %message, "malformed timeline");
    TimesliceError::MalformedFact {
        source_name: source.to_string(),
        message,
    }
}

/// Clips the facts of the timeline `source` to `range`.
///
/// Facts that do not overlap the range are dropped, the others are truncated to
/// `[max(start, from), min(end, until))`. The facts must belong to `source`, be
/// ordered by end time and not overlap each other.
pub fn clip_timeline<P>(
    source: &str,
    facts: &[Fact<P>],
    range: &Interval,
) -> Result<Vec<Arc<Fact<P>>>> {
    let mut clipped = Vec::with_capacity(facts.len());
    let mut previous: Option<Interval> = None;
    for fact in facts {
        if fact.source() != source {
            return Err(malformed(
                source,
                format!("fact {} belongs to '{}'", fact.interval(), fact.source()),
            ));
        }
        if let Some(previous) = previous {
            if previous.end() > fact.end() {
                return Err(malformed(
                    source,
                    format!("fact {} is not sorted by end time after {}", fact.interval(), previous),
                ));
            }
            if previous.end() > fact.start() {
                return Err(malformed(
                    source,
                    format!("fact {} overlaps {}", fact.interval(), previous),
                ));
            }
        }
        previous = Some(fact.interval());
        if let Some(fact) = fact.clipped_to(range) {
            clipped.push(Arc::new(fact));
        }
    }
    trace!(source, kept = clipped.len(), dropped = facts.len() - clipped.len(), "clipped timeline");
    Ok(clipped)
}

/// Groups a mixed list of facts into one timeline per source.
///
/// The relative order of each source's facts is kept, and the timelines come out
/// ordered by source name.
pub fn split_by_source<P>(facts: Vec<Fact<P>>) -> Vec<(SourceName, Vec<Fact<P>>)> {
    let mut timelines: BTreeMap<SourceName, Vec<Fact<P>>> = BTreeMap::new();
    for fact in facts {
        timelines
            .entry(Arc::clone(fact.source_name()))
            .or_default()
            .push(fact);
    }
    timelines.into_iter().collect()
}
