//! Per-area metric accumulators. Each counter is a plain value type;
//! aggregating areas into groups is a fold over these values, never pointer
//! arithmetic over a shared mutable structure.

use chrono::{DateTime, Utc};

/// Clamp a ratio into `[0, 1]`, leaving NaN (0/0) untouched so it can be
/// rendered explicitly downstream.
fn clamp_ratio(n: f64, d: f64) -> f64 {
    if d == 0.0 {
        return f64::NAN;
    }
    (n / d).clamp(0.0, 1.0)
}

/// Update rate: observed vs. expected test samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ur {
    pub n_tr: u64,
    pub n_etr: u64,
}

impl Ur {
    pub fn add(&mut self, other: Ur) {
        self.n_tr += other.n_tr;
        self.n_etr += other.n_etr;
    }

    pub fn percentage(&self) -> f64 {
        clamp_ratio(self.n_tr as f64, self.n_etr as f64)
    }
}

/// Probability of detection: valid vs. total intervals.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pd {
    pub n_tr: u64,
    pub n_up: u64,
}

impl Pd {
    pub fn add(&mut self, other: Pd) {
        self.n_tr += other.n_tr;
        self.n_up += other.n_up;
    }

    pub fn percentage(&self) -> f64 {
        clamp_ratio(self.n_tr as f64, self.n_up as f64)
    }
}

/// Probability of false detection, Mlat variant (distance-based).
#[derive(Debug, Clone, Copy, Default)]
pub struct Pfd {
    pub n_ftr: u64,
    pub n_tr: u64,
}

impl Pfd {
    pub fn add(&mut self, other: Pfd) {
        self.n_ftr += other.n_ftr;
        self.n_tr += other.n_tr;
    }

    pub fn percentage(&self) -> f64 {
        clamp_ratio(self.n_ftr as f64, self.n_tr as f64)
    }
}

/// Probability of false detection, Smr variant (expected-traffic based).
#[derive(Debug, Clone, Copy, Default)]
pub struct Pfd2 {
    pub n_tr: u64,
    pub n_etr: u64,
    pub n_u: u64,
}

impl Pfd2 {
    pub fn add(&mut self, other: Pfd2) {
        self.n_tr += other.n_tr;
        self.n_etr += other.n_etr;
        self.n_u += other.n_u;
    }

    pub fn percentage(&self) -> f64 {
        if self.n_u == 0 {
            return f64::NAN;
        }
        ((self.n_tr as f64 - self.n_etr as f64) / self.n_u as f64).max(0.0)
    }
}

/// Probability of (correct) identification.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pid {
    pub n_citr: u64,
    pub n_itr: u64,
}

impl Pid {
    pub fn add(&mut self, other: Pid) {
        self.n_citr += other.n_citr;
        self.n_itr += other.n_itr;
    }

    pub fn percentage(&self) -> f64 {
        clamp_ratio(self.n_citr as f64, self.n_itr as f64)
    }
}

/// Probability of false identification.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pfid {
    pub n_eitr: u64,
    pub n_itr: u64,
}

impl Pfid {
    pub fn add(&mut self, other: Pfid) {
        self.n_eitr += other.n_eitr;
        self.n_itr += other.n_itr;
    }

    pub fn percentage(&self) -> f64 {
        clamp_ratio(self.n_eitr as f64, self.n_itr as f64)
    }
}

/// Probability of (exceeding) the largest allowed gap.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plg {
    pub n_g: u64,
    pub n_tr: u64,
}

impl Plg {
    pub fn add(&mut self, other: Plg) {
        self.n_g += other.n_g;
        self.n_tr += other.n_tr;
    }

    pub fn percentage(&self) -> f64 {
        clamp_ratio(self.n_g as f64, self.n_tr as f64)
    }
}

/// Relative position accuracy: the raw distance samples (percentiles are
/// computed at reporting time via `astmops_core::stats`).
#[derive(Debug, Clone, Default)]
pub struct Rpa {
    pub distances: Vec<f64>,
}

impl Rpa {
    pub fn add(&mut self, other: &Rpa) {
        self.distances.extend_from_slice(&other.distances);
    }
}

/// A sliding-interval state machine for probability of detection: each
/// interval of width `period` is marked valid if any sample lands in it.
#[derive(Debug, Clone)]
pub struct IntervalCounter {
    period_secs: f64,
    interval_start: DateTime<Utc>,
    interval_idx: u64,
    valid: u64,
    current_valid: bool,
    finished: bool,
}

impl IntervalCounter {
    pub fn new(period_secs: f64, begin: DateTime<Utc>) -> Self {
        Self {
            period_secs,
            interval_start: begin,
            interval_idx: 0,
            valid: 0,
            current_valid: false,
            finished: false,
        }
    }

    fn advance_to(&mut self, t: DateTime<Utc>) {
        let elapsed = (t - self.interval_start).num_milliseconds() as f64 / 1000.0;
        if elapsed < self.period_secs {
            return;
        }
        let crossed = (elapsed / self.period_secs).floor() as u64;
        if self.current_valid {
            self.valid += 1;
        }
        self.current_valid = false;
        self.interval_idx += crossed;
        self.interval_start = self.interval_start
            + chrono::Duration::milliseconds((crossed as f64 * self.period_secs * 1000.0) as i64);
    }

    pub fn update(&mut self, t: DateTime<Utc>) {
        assert!(!self.finished, "IntervalCounter updated after finish()");
        self.advance_to(t);
        self.current_valid = true;
    }

    /// Close out the counter, returning (valid intervals, total intervals).
    pub fn finish(mut self, end: DateTime<Utc>) -> (u64, u64) {
        if self.current_valid {
            self.valid += 1;
            self.current_valid = false;
        }
        let elapsed = (end - self.interval_start).num_milliseconds() as f64 / 1000.0;
        let total = self.interval_idx + elapsed.max(0.0).div_euclid(self.period_secs) as u64
            + if elapsed.max(0.0).rem_euclid(self.period_secs) > 0.0 { 1 } else { 0 };
        self.finished = true;
        (self.valid, total.max(self.interval_idx))
    }
}
