//! Rate-limit gates for the opportunistic ticks.
//!
//! There is no background scheduler; player commands drive every tick. A `SimClock`
//! remembers when each tick last ran so a burst of commands does not advance the
//! world faster than the configured interval. The host owns the value and passes it in.

use crate::settings::TickSettings;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimClock {
    pub last_goomba_tick_ms: Option<i64>,
    pub last_mystery_box_tick_ms: Option<i64>,
    pub last_prune_ms: Option<i64>,
}

/// Opens the gate when at least `min_interval_ms` elapsed since `last`, recording `now_ms`.
/// Returns the elapsed time since the previous pass (`None` on the first pass).
fn gate(last: &mut Option<i64>, now_ms: i64, min_interval_ms: i64) -> Option<Option<i64>> {
    match *last {
        Some(prev) if now_ms - prev < min_interval_ms => None,
        prev => {
            *last = Some(now_ms);
            Some(prev.map(|p| now_ms - p))
        }
    }
}

impl SimClock {
    pub const fn new() -> Self {
        Self {
            last_goomba_tick_ms: None,
            last_mystery_box_tick_ms: None,
            last_prune_ms: None,
        }
    }

    /// `Some(dt_ms)` when a goomba tick may run now; `dt_ms` is clamped to `max_tick_dt_ms`.
    /// The first tick uses the minimum interval as its step.
    pub fn try_goomba_tick(&mut self, now_ms: i64, ticks: &TickSettings) -> Option<i64> {
        let elapsed = gate(&mut self.last_goomba_tick_ms, now_ms, ticks.goomba_min_interval_ms)?;
        let dt = elapsed.unwrap_or(ticks.goomba_min_interval_ms);
        Some(dt.clamp(0, ticks.max_tick_dt_ms))
    }

    pub fn try_mystery_box_tick(&mut self, now_ms: i64, ticks: &TickSettings) -> bool {
        gate(
            &mut self.last_mystery_box_tick_ms,
            now_ms,
            ticks.mystery_box_min_interval_ms,
        )
        .is_some()
    }

    pub fn try_prune(&mut self, now_ms: i64, ticks: &TickSettings) -> bool {
        gate(&mut self.last_prune_ms, now_ms, ticks.prune_min_interval_ms).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goomba_gate_rate_limits_and_clamps_dt() {
        let ticks = TickSettings::default();
        let mut clock = SimClock::new();
        assert_eq!(clock.try_goomba_tick(1_000, &ticks), Some(ticks.goomba_min_interval_ms));
        assert_eq!(clock.try_goomba_tick(1_020, &ticks), None);
        assert_eq!(clock.try_goomba_tick(1_060, &ticks), Some(60));
        // A long gap is clamped.
        assert_eq!(clock.try_goomba_tick(10_000, &ticks), Some(ticks.max_tick_dt_ms));
    }

    #[test]
    fn prune_runs_at_most_once_per_interval() {
        let ticks = TickSettings::default();
        let mut clock = SimClock::new();
        assert!(clock.try_prune(0, &ticks));
        assert!(!clock.try_prune(999, &ticks));
        assert!(clock.try_prune(1_000, &ticks));
        assert_eq!(clock.last_prune_ms, Some(1_000));
    }

    #[test]
    fn rejected_pass_does_not_move_the_gate() {
        let ticks = TickSettings::default();
        let mut clock = SimClock::new();
        assert!(clock.try_mystery_box_tick(0, &ticks));
        assert!(!clock.try_mystery_box_tick(50, &ticks));
        assert_eq!(clock.last_mystery_box_tick_ms, Some(0));
    }
}
