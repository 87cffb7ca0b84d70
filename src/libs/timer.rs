//! Area-switching session timer.
//!
//! The timer is a two-state machine owned by exactly one host session:
//!
//! ```text
//!   Inactive --start--> Active(idle, now)
//!   Active(a, t) --switch_area(b != a, now)--> Active(b, now)   emits [a, t, now)
//!   Active(a, t) --stop(now)--> Inactive (a kept for display)    emits [a, t, now)
//! ```
//!
//! Every other call is a no-op: starting while active, switching or stopping
//! while inactive, and switching to the area already current. Transitions
//! consume the state and hand back the next one together with at most one
//! completed interval, which the caller passes to the interval recorder.
//!
//! `now` must come from a single non-decreasing clock per session. The timer
//! does not check it; a negative interval is rejected by the recorder.

use chrono::{Duration, NaiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    Inactive,
    Active { since: NaiveDateTime },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTimerState {
    current_area: String,
    idle_label: String,
    phase: TimerPhase,
}

/// A closed `[entry_time, exit_time)` span spent in one area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedInterval {
    pub area_name: String,
    pub entry_time: NaiveDateTime,
    pub exit_time: NaiveDateTime,
}

impl CompletedInterval {
    pub fn duration(&self) -> Duration {
        self.exit_time - self.entry_time
    }
}

/// Result of applying a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SessionTimerState,
    pub completed: Option<CompletedInterval>,
}

impl Transition {
    fn unchanged(state: SessionTimerState) -> Self {
        Self { state, completed: None }
    }
}

impl SessionTimerState {
    /// Fresh state for a new session: idle and inactive.
    pub fn new(idle_label: impl Into<String>) -> Self {
        let idle_label = idle_label.into();
        Self {
            current_area: idle_label.clone(),
            idle_label,
            phase: TimerPhase::Inactive,
        }
    }

    /// Rebuilds a state persisted by a host between process runs.
    pub fn restore(idle_label: impl Into<String>, current_area: impl Into<String>, since: Option<NaiveDateTime>) -> Self {
        Self {
            current_area: current_area.into(),
            idle_label: idle_label.into(),
            phase: match since {
                Some(since) => TimerPhase::Active { since },
                None => TimerPhase::Inactive,
            },
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, TimerPhase::Active { .. })
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn current_area(&self) -> &str {
        &self.current_area
    }

    pub fn idle_label(&self) -> &str {
        &self.idle_label
    }

    /// Start of the open interval, `None` while inactive.
    pub fn interval_started_at(&self) -> Option<NaiveDateTime> {
        match self.phase {
            TimerPhase::Active { since } => Some(since),
            TimerPhase::Inactive => None,
        }
    }

    /// Time spent in the current area so far. Zero while inactive.
    pub fn elapsed(&self, now: NaiveDateTime) -> Duration {
        match self.phase {
            TimerPhase::Active { since } if now > since => now - since,
            _ => Duration::zero(),
        }
    }

    pub fn start(self, now: NaiveDateTime) -> Transition {
        if self.is_active() {
            return Transition::unchanged(self);
        }

        Transition {
            state: Self {
                current_area: self.idle_label.clone(),
                idle_label: self.idle_label,
                phase: TimerPhase::Active { since: now },
            },
            completed: None,
        }
    }

    pub fn switch_area(self, new_area: &str, now: NaiveDateTime) -> Transition {
        let since = match self.phase {
            TimerPhase::Active { since } => since,
            TimerPhase::Inactive => return Transition::unchanged(self),
        };
        if new_area == self.current_area {
            return Transition::unchanged(self);
        }

        let completed = CompletedInterval {
            area_name: self.current_area,
            entry_time: since,
            exit_time: now,
        };

        Transition {
            state: Self {
                current_area: new_area.to_string(),
                idle_label: self.idle_label,
                phase: TimerPhase::Active { since: now },
            },
            completed: Some(completed),
        }
    }

    pub fn stop(self, now: NaiveDateTime) -> Transition {
        let since = match self.phase {
            TimerPhase::Active { since } => since,
            TimerPhase::Inactive => return Transition::unchanged(self),
        };

        let completed = CompletedInterval {
            area_name: self.current_area.clone(),
            entry_time: since,
            exit_time: now,
        };

        Transition {
            state: Self {
                current_area: self.current_area,
                idle_label: self.idle_label,
                phase: TimerPhase::Inactive,
            },
            completed: Some(completed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const IDLE: &str = "Untracked (Idle)";

    fn at(seconds: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap().and_hms_opt(8, 0, 0).unwrap() + Duration::seconds(seconds)
    }

    #[test]
    fn new_state_is_idle_and_inactive() {
        let state = SessionTimerState::new(IDLE);
        assert!(!state.is_active());
        assert_eq!(state.current_area(), IDLE);
        assert_eq!(state.interval_started_at(), None);
        assert_eq!(state.elapsed(at(100)), Duration::zero());
    }

    #[test]
    fn start_opens_idle_interval() {
        let t = SessionTimerState::new(IDLE).start(at(0));
        assert!(t.completed.is_none());
        assert!(t.state.is_active());
        assert_eq!(t.state.current_area(), IDLE);
        assert_eq!(t.state.interval_started_at(), Some(at(0)));
    }

    #[test]
    fn start_is_idempotent() {
        let active = SessionTimerState::new(IDLE).start(at(0)).state;
        let again = active.clone().start(at(30));
        assert_eq!(again.state, active);
        assert!(again.completed.is_none());
    }

    #[test]
    fn switch_emits_previous_area() {
        let active = SessionTimerState::new(IDLE).start(at(0)).state;
        let t = active.switch_area("Training", at(600));

        assert_eq!(
            t.completed,
            Some(CompletedInterval {
                area_name: IDLE.to_string(),
                entry_time: at(0),
                exit_time: at(600),
            })
        );
        assert_eq!(t.state.current_area(), "Training");
        assert_eq!(t.state.interval_started_at(), Some(at(600)));
    }

    #[test]
    fn switch_to_current_area_is_noop() {
        let active = SessionTimerState::new(IDLE).start(at(0)).state.switch_area("Breaks", at(10)).state;
        let t = active.clone().switch_area("Breaks", at(20));
        assert_eq!(t.state, active);
        assert!(t.completed.is_none());
    }

    #[test]
    fn switch_while_inactive_is_noop() {
        let state = SessionTimerState::new(IDLE);
        let t = state.clone().switch_area("Training", at(5));
        assert_eq!(t.state, state);
        assert!(t.completed.is_none());
    }

    #[test]
    fn stop_emits_and_keeps_area_for_display() {
        let active = SessionTimerState::new(IDLE).start(at(0)).state.switch_area("Breaks", at(60)).state;
        let t = active.stop(at(90));

        assert!(!t.state.is_active());
        assert_eq!(t.state.current_area(), "Breaks");
        let completed = t.completed.unwrap();
        assert_eq!(completed.area_name, "Breaks");
        assert_eq!(completed.duration(), Duration::seconds(30));
    }

    #[test]
    fn stop_while_inactive_is_noop() {
        let state = SessionTimerState::new(IDLE);
        let t = state.clone().stop(at(5));
        assert_eq!(t.state, state);
        assert!(t.completed.is_none());
    }

    #[test]
    fn restart_after_stop_returns_to_idle() {
        let stopped = SessionTimerState::new(IDLE).start(at(0)).state.switch_area("Training", at(5)).state.stop(at(10)).state;
        let t = stopped.start(at(20));
        assert_eq!(t.state.current_area(), IDLE);
        assert_eq!(t.state.interval_started_at(), Some(at(20)));
    }

    #[test]
    fn start_then_stop_at_same_instant_gives_zero_interval() {
        let t = SessionTimerState::new(IDLE).start(at(0)).state.stop(at(0));
        assert_eq!(t.completed.unwrap().duration(), Duration::zero());
    }

    #[test]
    fn intervals_never_overlap_for_increasing_clock() {
        let areas = ["Training", "Breaks", "Training", "ESS Chambers", "Breaks"];
        let mut state = SessionTimerState::new(IDLE);
        let mut intervals = Vec::new();
        let mut t = 0;

        for round in 0..3 {
            t += 7;
            let tr = state.start(at(t));
            state = tr.state;
            intervals.extend(tr.completed);
            for area in areas.iter().skip(round) {
                t += 13;
                let tr = state.switch_area(area, at(t));
                state = tr.state;
                intervals.extend(tr.completed);
            }
            t += 11;
            let tr = state.stop(at(t));
            state = tr.state;
            intervals.extend(tr.completed);
        }

        assert!(!intervals.is_empty());
        for pair in intervals.windows(2) {
            assert!(pair[0].exit_time <= pair[1].entry_time);
        }
        for interval in &intervals {
            assert!(interval.entry_time < interval.exit_time);
        }
    }

    #[test]
    fn restore_round_trips_phase() {
        let state = SessionTimerState::restore(IDLE, "Training", Some(at(42)));
        assert!(state.is_active());
        assert_eq!(state.phase(), TimerPhase::Active { since: at(42) });
        assert_eq!(state.elapsed(at(50)), Duration::seconds(8));

        let state = SessionTimerState::restore(IDLE, "Training", None);
        assert!(!state.is_active());
        assert_eq!(state.current_area(), "Training");
    }
}
