//! Timeslice – partitioning of a time range across several independent timelines.
//!
//! A *timeline* is an ordered sequence of non-overlapping *facts*, each a payload valid
//! over a half-open interval `[start, end)`. Given a requested range `[from, until)` and
//! any number of timelines, timeslice cuts the range into the fewest contiguous slices
//! such that, within every slice, each timeline's applicable fact stays the same.
//!
//! * A [`fact::Fact`] couples a source name, an [`time::Interval`] and a payload.
//! * A [`fact::FactSource`] answers which facts of a timeline overlap a range.
//! * A [`partition::Partition`] is one resulting slice plus the fact of every timeline
//!   that applies throughout it.
//!
//! ## Modules
//! * [`time`] – timestamps, half-open intervals and a small timestamp parser.
//! * [`fact`] – facts and the [`fact::FactSource`] trait.
//! * [`timeline`] – in-memory sources: a single [`timeline::Timeline`] and the
//!   multi-source [`timeline::FactKeeper`].
//! * [`normalize`] – clipping of a timeline to the range, including the checks that
//!   it is ordered and disjoint.
//! * [`boundary`] – merging of all timelines' boundaries (k-way heap merge or sort).
//! * [`partition`] – the sweep building partitions from the boundaries.
//! * [`partitioner`] – the [`partitioner::Partitioner`] tying the steps together.
//! * [`settings`] and [`logging`] – configuration and `tracing` setup.
//!
//! ## Quick Start
//! ```
//! use timeslice::{FactSource, partition, time::parse_timestamp, timeline::Timeline};
//! let t = |s| parse_timestamp(s).unwrap();
//! let mut a = Timeline::new("A");
//! a.keep(t("2011-11-22 00:00"), t("2011-11-22 12:00"), "A1").unwrap();
//! a.keep(t("2011-11-22 12:00"), t("2011-11-23 00:00"), "A2").unwrap();
//! let mut b = Timeline::new("B");
//! b.keep(t("2011-11-22 00:00"), t("2011-11-22 08:00"), "B1").unwrap();
//! b.keep(t("2011-11-22 08:00"), t("2011-11-23 00:00"), "B2").unwrap();
//! let sources: [(&str, &dyn FactSource<&str>); 2] = [("A", &a), ("B", &b)];
//! let partitions = partition(&sources, t("2011-11-22"), t("2011-11-23")).unwrap();
//! assert_eq!(partitions.len(), 3);
//! assert_eq!(partitions[1].payload_for("A"), Some(&"A1"));
//! assert_eq!(partitions[1].payload_for("B"), Some(&"B2"));
//! ```
//!
//! ## Gaps
//! A timeline need not cover the whole range. Where it has no fact, partitions simply
//! have no entry for it.

pub mod boundary;
pub mod error;
pub mod fact;
pub mod logging;
pub mod normalize;
pub mod partition;
pub mod partitioner;
pub mod settings;
pub mod time;
pub mod timeline;

pub use error::{Result, SourceError, TimesliceError};
pub use fact::{Fact, FactSource, SourceName};
pub use partition::Partition;
pub use partitioner::{Partitioner, partition, partition_combined};
pub use time::{Interval, Timestamp};
