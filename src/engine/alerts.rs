//! Alert dedup state.
//!
//! `AlertBook` owns the set of currently-alerted instruments and decides,
//! per observation, whether a score crossing warrants a fresh
//! notification. Two thresholds form a hysteresis dead band: entry at or
//! above the alert threshold, exit strictly below the clear threshold.
//! In between, nothing changes — an alerted symbol stays quiet, an
//! unalerted one stays eligible for nothing.
//!
//! The book is owned by the orchestrator and mutated on its single
//! logical thread only. It lives for the process lifetime and is never
//! persisted; a restart starts every symbol unalerted.

use rand::Rng;
use std::collections::HashSet;

/// Outcome of observing one score for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Crossed the alert threshold while unalerted — send exactly one
    /// notification and remember it.
    Notify,
    /// Still at or above the clear threshold while alerted — suppress.
    Hold,
    /// Dropped below the clear threshold — forget, re-arm for later.
    Clear,
    /// Unalerted and staying that way.
    Idle,
}

/// The set of instruments that have already fired in the current episode.
#[derive(Debug)]
pub struct AlertBook {
    alerted: HashSet<String>,
    alert_threshold: u8,
    clear_threshold: u8,
}

impl AlertBook {
    pub fn new(alert_threshold: u8, clear_threshold: u8) -> Self {
        debug_assert!(clear_threshold < alert_threshold);
        Self {
            alerted: HashSet::new(),
            alert_threshold,
            clear_threshold,
        }
    }

    /// Score at or above which a symbol alerts (and is published).
    pub fn alert_threshold(&self) -> u8 {
        self.alert_threshold
    }

    /// Feed one cycle's score for one instrument through the state
    /// machine and report what the orchestrator should do.
    pub fn observe(&mut self, name: &str, score: u8) -> Transition {
        let alerted = self.alerted.contains(name);

        if score >= self.alert_threshold {
            if alerted {
                Transition::Hold
            } else {
                self.alerted.insert(name.to_string());
                Transition::Notify
            }
        } else if score < self.clear_threshold {
            if alerted {
                self.alerted.remove(name);
                Transition::Clear
            } else {
                Transition::Idle
            }
        } else if alerted {
            // dead band: suppressed but not yet cleared
            Transition::Hold
        } else {
            Transition::Idle
        }
    }

    /// Independent per-cycle low-probability full reset: one draw per
    /// cycle, wiping the book so strong repeat signals can re-notify
    /// without a score dip. Deliberately stochastic rather than a fixed
    /// period — a timer would reset every symbol in synchronised bursts.
    pub fn maybe_reset<R: Rng>(&mut self, rng: &mut R, probability: f64) -> bool {
        if probability > 0.0 && rng.gen::<f64>() < probability {
            self.alerted.clear();
            true
        } else {
            false
        }
    }

    /// Whether an instrument is currently alerted.
    pub fn is_alerted(&self, name: &str) -> bool {
        self.alerted.contains(name)
    }

    /// Number of currently-alerted instruments.
    pub fn len(&self) -> usize {
        self.alerted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerted.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
