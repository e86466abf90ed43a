use std::collections::HashMap;
use std::sync::Arc;

// used to print out readable forms of a partition
use std::fmt;

use crate::fact::{Fact, SourceHasher, SourceName};
use crate::normalize::ClippedTimeline;
use crate::time::{Interval, Timestamp};

// ------------- Partition -------------
/// A slice of the requested range within which every source's applicable fact is constant.
///
/// Sources with a gap in their timeline during the slice have no entry.
#[derive(PartialEq, Eq, Debug)]
pub struct Partition<P> {
    interval: Interval,
    facts: HashMap<SourceName, Arc<Fact<P>>, SourceHasher>,
}

impl<P> Partition<P> {
    pub fn start(&self) -> Timestamp {
        self.interval.start()
    }
    pub fn end(&self) -> Timestamp {
        self.interval.end()
    }
    pub fn interval(&self) -> Interval {
        self.interval
    }
    /// The clipped fact of `source` that applies throughout this partition.
    pub fn fact_for(&self, source: &str) -> Option<&Fact<P>> {
        self.facts.get(source).map(|fact| fact.as_ref())
    }
    pub fn payload_for(&self, source: &str) -> Option<&P> {
        self.fact_for(source).map(|fact| fact.payload())
    }
    /// Names of the sources that have a fact here, sorted.
    pub fn sources(&self) -> Vec<&str> {
        let mut sources: Vec<&str> = self.facts.keys().map(|source| &**source).collect();
        sources.sort_unstable();
        sources
    }
    pub fn len(&self) -> usize {
        self.facts.len()
    }
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

impl<P> Clone for Partition<P> {
    fn clone(&self) -> Self {
        Self {
            interval: self.interval,
            facts: self.facts.clone(),
        }
    }
}

impl<P: fmt::Display> fmt::Display for Partition<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.interval)?;
        for source in self.sources() {
            if let Some(payload) = self.payload_for(source) {
                write!(f, " {}={}", source, payload)?;
            }
        }
        Ok(())
    }
}

/// Builds one partition per pair of consecutive boundaries.
///
/// Every timeline gets a cursor that only ever moves forward, so the sweep is linear in
/// the number of boundaries plus facts. `boundaries` must be sorted ascending, as
/// [`crate::boundary::merge_boundaries`] produces them. A fact is only assigned to a
/// partition it covers entirely; repeated boundaries yield no partition.
pub(crate) fn build_partitions<P>(
    boundaries: &[Timestamp],
    timelines: &[ClippedTimeline<P>],
) -> Vec<Partition<P>> {
    let mut cursors = vec![0usize; timelines.len()];
    let mut partitions = Vec::with_capacity(boundaries.len().saturating_sub(1));
    for pair in boundaries.windows(2) {
        let Ok(interval) = Interval::new(pair[0], pair[1]) else {
            continue;
        };
        let start = interval.start();
        let mut facts = HashMap::with_capacity_and_hasher(timelines.len(), SourceHasher::default());
        for ((source, timeline), cursor) in timelines.iter().zip(cursors.iter_mut()) {
            while *cursor < timeline.len() && timeline[*cursor].end() <= start {
                *cursor += 1;
            }
            if let Some(fact) = timeline.get(*cursor) {
                if fact.start() <= start && fact.end() >= interval.end() {
                    facts.insert(Arc::clone(source), Arc::clone(fact));
                }
            }
        }
        partitions.push(Partition { interval, facts });
    }
    partitions
}
