//! Traffic-period overlap algebra: rather than branching over the
//! exhaustive relative orderings of two half-open intervals, every
//! insertion splits both intervals at the union of their endpoints and
//! unions the traffic sets over each atomic sub-interval.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::types::ModeS;

/// A half-open time interval `[begin, end)` carrying the mode-S addresses
/// present during it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficPeriod {
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub addresses: BTreeSet<ModeS>,
}

impl TrafficPeriod {
    pub fn new(begin: DateTime<Utc>, end: DateTime<Utc>, addresses: BTreeSet<ModeS>) -> Self {
        assert!(begin < end, "traffic period must be non-empty");
        Self { begin, end, addresses }
    }

    pub fn duration_secs(&self) -> f64 {
        (self.end - self.begin).num_milliseconds() as f64 / 1000.0
    }
}

/// A disjoint, chronologically sorted sequence of `TrafficPeriod`s.
#[derive(Debug, Clone, Default)]
pub struct TrafficPeriodCollection {
    periods: Vec<TrafficPeriod>,
}

impl TrafficPeriodCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn periods(&self) -> &[TrafficPeriod] {
        &self.periods
    }

    /// Insert a period, splitting at endpoints and merging traffic sets so
    /// the collection remains disjoint and sorted.
    pub fn insert(&mut self, period: TrafficPeriod) {
        let mut endpoints: BTreeSet<DateTime<Utc>> = BTreeSet::new();
        endpoints.insert(period.begin);
        endpoints.insert(period.end);
        for p in &self.periods {
            endpoints.insert(p.begin);
            endpoints.insert(p.end);
        }

        let marks: Vec<DateTime<Utc>> = endpoints.into_iter().collect();
        let mut rebuilt = Vec::new();
        for window in marks.windows(2) {
            let (begin, end) = (window[0], window[1]);
            let mut addresses = BTreeSet::new();
            if period.begin <= begin && end <= period.end {
                addresses.extend(&period.addresses);
            }
            for p in &self.periods {
                if p.begin <= begin && end <= p.end {
                    addresses.extend(&p.addresses);
                }
            }
            if !addresses.is_empty() {
                rebuilt.push(TrafficPeriod::new(begin, end, addresses));
            }
        }
        self.periods = rebuilt;
    }

    /// Number of distinct addresses ever present, summed period durations
    /// weighted by simultaneous traffic count (used by the Smr PFD
    /// expected-update baseline).
    pub fn traffic_weighted_duration_secs(&self) -> f64 {
        self.periods
            .iter()
            .map(|p| p.duration_secs() * p.addresses.len() as f64)
            .sum()
    }

    pub fn total_duration_secs(&self) -> f64 {
        self.periods.iter().map(|p| p.duration_secs()).sum()
    }
}
