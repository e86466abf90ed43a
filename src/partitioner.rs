//! Partitioning of a time range across any number of fact sources.
//!
//! The sources are queried one after another, each answer is checked and clipped to the
//! range, then the boundaries of all timelines are merged and swept into partitions.
//! A failing source or a malformed timeline aborts the whole computation.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::boundary::{MergeStrategy, merge_boundaries};
use crate::error::{Result, TimesliceError};
use crate::fact::{Fact, FactSource, SourceHasher, SourceName};
use crate::normalize::{ClippedTimeline, clip_timeline, split_by_source};
use crate::partition::{Partition, build_partitions};
use crate::settings::Settings;
use crate::time::{Interval, Timestamp};

enum Registration<'a, P> {
    // answers for exactly one timeline
    Named(SourceName, Box<dyn FactSource<P> + 'a>),
    // answers for many timelines at once, told apart by their facts' source names
    Combined(String, Box<dyn FactSource<P> + 'a>),
}

pub struct Partitioner<'a, P> {
    registrations: Vec<Registration<'a, P>>,
    strategy: MergeStrategy,
}

impl<'a, P> Partitioner<'a, P> {
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
            strategy: MergeStrategy::default(),
        }
    }
    pub fn with_settings(settings: &Settings) -> Self {
        Self::new().merge_strategy(settings.merge_strategy)
    }
    pub fn merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.strategy = strategy;
        self
    }
    /// Registers the source of the timeline `name`. Names are unique.
    pub fn add_source<S: FactSource<P> + 'a>(&mut self, name: &str, source: S) -> Result<()> {
        if self.source_names().any(|kept| kept == name) {
            return Err(TimesliceError::DuplicateSource(name.to_string()));
        }
        self.registrations
            .push(Registration::Named(SourceName::from(name), Box::new(source)));
        Ok(())
    }
    /// Registers a provider whose answer mixes the facts of several timelines.
    ///
    /// `label` only names the provider in errors and logs. The timelines are whatever
    /// source names its facts carry; they may not collide with other registered names.
    pub fn add_combined<S: FactSource<P> + 'a>(&mut self, label: &str, provider: S) {
        self.registrations
            .push(Registration::Combined(label.to_string(), Box::new(provider)));
    }
    /// Names of the sources registered with [`Partitioner::add_source`].
    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.registrations.iter().filter_map(|registration| match registration {
            Registration::Named(name, _) => Some(&**name),
            Registration::Combined(..) => None,
        })
    }
    /// Partitions `[from, until)` into slices within which every timeline's fact is constant.
    pub fn partition(&self, from: Timestamp, until: Timestamp) -> Result<Vec<Partition<P>>> {
        let range = Interval::new(from, until)?;
        debug!(registrations = self.registrations.len(), %from, %until, "partitioning");

        let mut timelines: Vec<ClippedTimeline<P>> = Vec::with_capacity(self.registrations.len());
        let mut seen: HashSet<SourceName, SourceHasher> = HashSet::default();
        for registration in &self.registrations {
            match registration {
                Registration::Named(name, source) => {
                    let facts = query(name, source.as_ref(), &range)?;
                    timelines.push(clip(name, &facts, &range, &mut seen)?);
                }
                Registration::Combined(label, provider) => {
                    let facts = query(label, provider.as_ref(), &range)?;
                    for (name, facts) in split_by_source(facts) {
                        timelines.push(clip(&name, &facts, &range, &mut seen)?);
                    }
                }
            }
        }

        let boundaries = merge_boundaries(&range, &timelines, self.strategy);
        let partitions = build_partitions(&boundaries, &timelines);
        debug!(
            timelines = timelines.len(),
            boundaries = boundaries.len(),
            partitions = partitions.len(),
            strategy = ?self.strategy,
            "partitioned"
        );
        Ok(partitions)
    }
}

impl<'a, P> Default for Partitioner<'a, P> {
    fn default() -> Self {
        Self::new()
    }
}

fn query<P, S: FactSource<P> + ?Sized>(
    name: &str,
    source: &S,
    range: &Interval,
) -> Result<Vec<Fact<P>>> {
    source
        .facts_sorted_by_end_time(range.start(), range.end())
        .map_err(|cause| {
            warn!(source = name, error = %cause, "fact source query failed");
            TimesliceError::SourceQuery {
                source_name: name.to_string(),
                cause,
            }
        })
}

fn clip<P>(
    name: &SourceName,
    facts: &[Fact<P>],
    range: &Interval,
    seen: &mut HashSet<SourceName, SourceHasher>,
) -> Result<ClippedTimeline<P>> {
    if !seen.insert(Arc::clone(name)) {
        return Err(TimesliceError::DuplicateSource(name.to_string()));
    }
    Ok((Arc::clone(name), clip_timeline(name, facts, range)?))
}

/// Partitions `[from, until)` across `sources`, each given with the name of its timeline.
pub fn partition<P>(
    sources: &[(&str, &dyn FactSource<P>)],
    from: Timestamp,
    until: Timestamp,
) -> Result<Vec<Partition<P>>> {
    let mut partitioner = Partitioner::new();
    for (name, source) in sources {
        partitioner.add_source(name, *source)?;
    }
    partitioner.partition(from, until)
}

/// Partitions `[from, until)` across the timelines of one provider that mixes them.
pub fn partition_combined<P, S: FactSource<P> + ?Sized>(
    provider: &S,
    from: Timestamp,
    until: Timestamp,
) -> Result<Vec<Partition<P>>> {
    let mut partitioner = Partitioner::new();
    partitioner.add_combined("combined", provider);
    partitioner.partition(from, until)
}
