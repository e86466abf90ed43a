use std::sync::Arc;

// we will use a fast hashing algo for hashmaps keyed by source names
use core::hash::BuildHasherDefault;
use seahash::SeaHasher;

// used to print out readable forms of a fact
use std::fmt;

use crate::error::{Result, SourceError, TimesliceError};
use crate::time::{Interval, Timestamp};

// ------------- Source -------------
/// The identity of a timeline. Every fact carries the name of the timeline it belongs to.
pub type SourceName = Arc<str>;

pub type SourceHasher = BuildHasherDefault<SeaHasher>;

/// Anything that can answer which facts of a timeline overlap `[from, until)`.
///
/// Implementations must return the facts ordered by end time ascending. How they are
/// retrieved is up to the implementation; failures are reported as a [`SourceError`]
/// and abort the partitioning that asked for them.
pub trait FactSource<P> {
    fn facts_sorted_by_end_time(
        &self,
        from: Timestamp,
        until: Timestamp,
    ) -> std::result::Result<Vec<Fact<P>>, SourceError>;
}

impl<P, S: FactSource<P> + ?Sized> FactSource<P> for &S {
    fn facts_sorted_by_end_time(
        &self,
        from: Timestamp,
        until: Timestamp,
    ) -> std::result::Result<Vec<Fact<P>>, SourceError> {
        (**self).facts_sorted_by_end_time(from, until)
    }
}

impl<P, S: FactSource<P> + ?Sized> FactSource<P> for Box<S> {
    fn facts_sorted_by_end_time(
        &self,
        from: Timestamp,
        until: Timestamp,
    ) -> std::result::Result<Vec<Fact<P>>, SourceError> {
        (**self).facts_sorted_by_end_time(from, until)
    }
}

// ------------- Fact -------------
/// A payload valid over a half-open interval, belonging to one named timeline.
///
/// The payload sits behind an `Arc` so that clipped copies of a fact share it.
#[derive(Debug)]
pub struct Fact<P> {
    source: SourceName,
    interval: Interval,
    payload: Arc<P>,
}

impl<P> Fact<P> {
    pub fn new(
        source: impl Into<SourceName>,
        start: Timestamp,
        end: Timestamp,
        payload: P,
    ) -> Result<Self> {
        let source = source.into();
        let interval = Interval::new(start, end).map_err(|_| TimesliceError::MalformedFact {
            source_name: source.to_string(),
            message: format!("empty interval [{}, {})", start, end),
        })?;
        Ok(Self::with_interval(source, interval, payload))
    }
    pub fn with_interval(source: impl Into<SourceName>, interval: Interval, payload: P) -> Self {
        Self {
            source: source.into(),
            interval,
            payload: Arc::new(payload),
        }
    }
    pub fn source(&self) -> &str {
        &self.source
    }
    pub fn source_name(&self) -> &SourceName {
        &self.source
    }
    pub fn interval(&self) -> Interval {
        self.interval
    }
    pub fn start(&self) -> Timestamp {
        self.interval.start()
    }
    pub fn end(&self) -> Timestamp {
        self.interval.end()
    }
    pub fn payload(&self) -> &P {
        &self.payload
    }
    /// The same fact truncated to `range`, or `None` if it lies entirely outside.
    pub fn clipped_to(&self, range: &Interval) -> Option<Fact<P>> {
        self.interval.intersect(range).map(|interval| Fact {
            source: Arc::clone(&self.source),
            interval,
            payload: Arc::clone(&self.payload),
        })
    }
}

// shares the payload, no P: Clone required
impl<P> Clone for Fact<P> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            interval: self.interval,
            payload: Arc::clone(&self.payload),
        }
    }
}

impl<P: PartialEq> PartialEq for Fact<P> {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.interval == other.interval
            && self.payload == other.payload
    }
}
impl<P: Eq> Eq for Fact<P> {}

impl<P: fmt::Display> fmt::Display for Fact<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}: {}", self.source, self.interval, self.payload)
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
    fn empty_fact_is_malformed() {
        let noon = t("2011-11-22 12:00");
        match Fact::new("A", noon, noon, "A1") {
            Err(TimesliceError::MalformedFact { source_name, .. }) => assert_eq!(source_name, "A"),
            other => panic!("expected a malformed fact, got {:?}", other),
        }
    }

    #[test]
    fn clipping_keeps_identity_and_payload() {
        let fact = Fact::new("A", t("2011-11-21"), t("2011-11-22 12:00"), "A1".to_string()).unwrap();
        let range = Interval::new(t("2011-11-22"), t("2011-11-23")).unwrap();
        let clipped = fact.clipped_to(&range).unwrap();
        assert_eq!(clipped.source(), "A");
        assert_eq!(clipped.payload(), "A1");
        assert_eq!(clipped.start(), t("2011-11-22"));
        assert_eq!(clipped.end(), t("2011-11-22 12:00"));
        assert!(Arc::ptr_eq(&fact.payload, &clipped.payload));

        let outside = Fact::new("A", t("2011-11-20"), t("2011-11-21"), "A0".to_string()).unwrap();
        assert!(outside.clipped_to(&range).is_none());
    }

    #[test]
    fn displays_source_interval_and_payload() {
        let fact = Fact::new("B", t("2011-11-22 08:00"), t("2011-11-22 16:00"), "B2").unwrap();
        assert_eq!(
            fact.to_string(),
            "B [2011-11-22 08:00:00 UTC, 2011-11-22 16:00:00 UTC): B2"
        );
    }
}
