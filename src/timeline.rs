//! In-memory fact sources.
//!
//! A [`Timeline`] keeps the facts of one source, a [`FactKeeper`] keeps any number of
//! timelines and answers for all of them at once, with the facts of every source mixed
//! together and sorted by end time.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{Result, SourceError, TimesliceError};
use crate::fact::{Fact, FactSource, SourceName};
use crate::time::Timestamp;

// ------------- Timeline -------------
#[derive(Debug)]
pub struct Timeline<P> {
    name: SourceName,
    facts: Vec<Fact<P>>,
}

impl<P> Timeline<P> {
    pub fn new(name: impl Into<SourceName>) -> Self {
        Self {
            name: name.into(),
            facts: Vec::new(),
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Keeps a fact at its place in time. It may not overlap any fact already kept.
    pub fn keep(&mut self, start: Timestamp, end: Timestamp, payload: P) -> Result<&Fact<P>> {
        let fact = Fact::new(Arc::clone(&self.name), start, end, payload)?;
        // kept facts are disjoint, so their ends ascend along with their starts
        let position = self.facts.partition_point(|kept| kept.end() <= fact.start());
        if let Some(next) = self.facts.get(position) {
            if next.start() < fact.end() {
                return Err(TimesliceError::MalformedFact {
                    source_name: self.name.to_string(),
                    message: format!("fact {} overlaps {}", fact.interval(), next.interval()),
                });
            }
        }
        self.facts.insert(position, fact);
        Ok(&self.facts[position])
    }
    pub fn facts(&self) -> &[Fact<P>] {
        &self.facts
    }
    pub fn len(&self) -> usize {
        self.facts.len()
    }
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

impl<P> FactSource<P> for Timeline<P> {
    fn facts_sorted_by_end_time(
        &self,
        from: Timestamp,
        until: Timestamp,
    ) -> std::result::Result<Vec<Fact<P>>, SourceError> {
        let first = self.facts.partition_point(|fact| fact.end() <= from);
        Ok(self.facts[first..]
            .iter()
            .take_while(|fact| fact.start() < until)
            .cloned()
            .collect())
    }
}

// ------------- FactKeeper -------------
#[derive(Debug)]
pub struct FactKeeper<P> {
    kept: BTreeMap<SourceName, Timeline<P>>,
}

impl<P> FactKeeper<P> {
    pub fn new() -> Self {
        Self {
            kept: BTreeMap::new(),
        }
    }
    pub fn keep(
        &mut self,
        source: &str,
        start: Timestamp,
        end: Timestamp,
        payload: P,
    ) -> Result<&Fact<P>> {
        self.kept
            .entry(SourceName::from(source))
            .or_insert_with_key(|name| Timeline::new(Arc::clone(name)))
            .keep(start, end, payload)
    }
    pub fn timeline(&self, source: &str) -> Option<&Timeline<P>> {
        self.kept.get(source)
    }
    pub fn timelines(&self) -> impl Iterator<Item = &Timeline<P>> {
        self.kept.values()
    }
    /// Number of timelines kept.
    pub fn len(&self) -> usize {
        self.kept.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}

impl<P> Default for FactKeeper<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> FactSource<P> for FactKeeper<P> {
    fn facts_sorted_by_end_time(
        &self,
        from: Timestamp,
        until: Timestamp,
    ) -> std::result::Result<Vec<Fact<P>>, SourceError> {
        let mut facts = Vec::new();
        for timeline in self.kept.values() {
            facts.extend(timeline.facts_sorted_by_end_time(from, until)?);
        }
        // stable, so equal ends stay in source name order
        facts.sort_by_key(|fact| fact.end());
        Ok(facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_timestamp;

    fn t(s: &str) -> Timestamp {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn keeps_facts_in_time_order() {
        let mut timeline = Timeline::new("A");
        timeline.keep(t("2011-11-22 12:00"), t("2011-11-23 00:00"), "A2").unwrap();
        timeline.keep(t("2011-11-22 00:00"), t("2011-11-22 12:00"), "A1").unwrap();
        let payloads: Vec<_> = timeline.facts().iter().map(|f| *f.payload()).collect();
        assert_eq!(payloads, vec!["A1", "A2"]);
        assert_eq!(timeline.len(), 2);
    }

    #[test]
    fn rejects_overlapping_facts() {
        let mut timeline = Timeline::new("A");
        timeline.keep(t("2011-11-22 00:00"), t("2011-11-22 12:00"), "A1").unwrap();
        assert!(matches!(
            timeline.keep(t("2011-11-22 06:00"), t("2011-11-22 18:00"), "A2"),
            Err(TimesliceError::MalformedFact { .. })
        ));
        assert!(timeline.keep(t("2011-11-21 18:00"), t("2011-11-22 01:00"), "A0").is_err());
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn answers_with_overlapping_facts_only() {
        let mut timeline = Timeline::new("A");
        timeline.keep(t("2011-11-21 00:00"), t("2011-11-22 00:00"), "A0").unwrap();
        timeline.keep(t("2011-11-22 00:00"), t("2011-11-22 12:00"), "A1").unwrap();
        timeline.keep(t("2011-11-22 12:00"), t("2011-11-24 00:00"), "A2").unwrap();
        timeline.keep(t("2011-11-24 00:00"), t("2011-11-25 00:00"), "A3").unwrap();
        let facts = timeline
            .facts_sorted_by_end_time(t("2011-11-22 00:00"), t("2011-11-23 00:00"))
            .unwrap();
        let payloads: Vec<_> = facts.iter().map(|f| *f.payload()).collect();
        assert_eq!(payloads, vec!["A1", "A2"]);
    }

    #[test]
    fn keeper_mixes_sources_by_end_time() {
        let mut keeper = FactKeeper::new();
        keeper.keep("B", t("2011-11-22 00:00"), t("2011-11-22 08:00"), "B1").unwrap();
        keeper.keep("A", t("2011-11-22 00:00"), t("2011-11-22 12:00"), "A1").unwrap();
        keeper.keep("B", t("2011-11-22 08:00"), t("2011-11-22 12:00"), "B2").unwrap();
        assert_eq!(keeper.len(), 2);
        assert_eq!(keeper.timeline("B").map(|timeline| timeline.len()), Some(2));
        let names: Vec<_> = keeper.timelines().map(|timeline| timeline.name()).collect();
        assert_eq!(names, vec!["A", "B"]);
        let facts = keeper
            .facts_sorted_by_end_time(t("2011-11-22 00:00"), t("2011-11-23 00:00"))
            .unwrap();
        let payloads: Vec<_> = facts.iter().map(|f| *f.payload()).collect();
        assert_eq!(payloads, vec!["B1", "A1", "B2"]);
    }
}
