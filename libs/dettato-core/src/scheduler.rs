//! Position-relative SM-2 scheduling.
//!
//! Intervals are offsets from the session's logical clock instead of
//! calendar days. A card graded at level 7 that earns an offset of 6 comes
//! back once the clock reaches 13.
//!
//! The grade is the number of mistyped characters, so it is unbounded above
//! even though the ease update was designed for a 0-5 quality scale. Past 5
//! the quadratic turns around: 6 to 14 mistakes leave the ease higher than
//! a single mistake would, and 16 or more drive it to the floor.

use crate::types::SchedulingState;

/// Ease factor assigned to cards on load.
pub const INITIAL_EASE: f64 = 2.5;

/// Floor for the ease factor.
pub const MINIMUM_EASE: f64 = 1.3;

/// Highest grade still counted as a successful recall.
pub const PASSING_GRADE: i64 = 1;

/// Calculate the next scheduling state after a card has been graded.
///
/// Total over its inputs: any grade and clock value is accepted.
pub fn schedule(state: &SchedulingState, grade: i64, clock: i64) -> SchedulingState {
    let (interval, repetition) = if grade <= PASSING_GRADE {
        match state.repetition {
            0 => (clock.saturating_add(2), 1),
            1 => (clock.saturating_add(6), 2),
            n => {
                let offset = round_half_up(state.interval as f64 * state.efactor);
                (clock.saturating_add(offset), n.saturating_add(1))
            }
        }
    } else {
        (clock.saturating_add(2), 0)
    };

    SchedulingState {
        interval,
        repetition,
        efactor: next_efactor(state.efactor, grade),
    }
}

/// Nearest integer, halves toward positive infinity (`-6.5` becomes `-6`).
fn round_half_up(x: f64) -> i64 {
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor as i64 + 1
    } else {
        floor as i64
    }
}

fn next_efactor(efactor: f64, grade: i64) -> f64 {
    let q = 5.0 - grade as f64;
    (efactor + (0.1 - q * (0.08 + q * 0.02))).max(MINIMUM_EASE)
}
