use crate::next_deadline;
use crate::supervisor::SupervisionState;
use crate::tests::{at, health};

use chrono::{Local, TimeDelta, Timelike};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Step {
    Reachable,
    Unreachable,
    Restart,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Reachable),
        Just(Step::Unreachable),
        Just(Step::Restart),
    ]
}

// =========================================================================
// Property-Based Tests - Failure Counter
// =========================================================================

proptest! {
    #[test]
    fn given_any_outcome_sequence_when_recorded_then_counter_equals_trailing_failures(
        steps in prop::collection::vec(step(), 0..64)
    ) {
        let mut state = SupervisionState::new(Local::now());
        let mut expected = 0u32;

        for step in steps {
            match step {
                Step::Reachable => {
                    state.record_success(health("Public #1"));
                    expected = 0;
                }
                Step::Unreachable => {
                    state.record_failure();
                    expected += 1;
                }
                Step::Restart => {
                    state.record_restart();
                    expected = 0;
                }
            }
            prop_assert_eq!(state.consecutive_failures(), expected);
        }
    }
}

// =========================================================================
// Property-Based Tests - Restart Deadline
// =========================================================================

proptest! {
    #[test]
    fn given_any_instant_when_next_deadline_then_within_following_day(
        offset_secs in 0i64..(400 * 86_400),
        hour in 0u8..24
    ) {
        let now = at(2024, 1, 1, 0, 0, 0) + TimeDelta::seconds(offset_secs);

        let deadline = next_deadline(&now, hour);

        prop_assert!(deadline > now);
        prop_assert!(deadline <= now + TimeDelta::hours(24));
        prop_assert_eq!(deadline.hour(), u32::from(hour));
        prop_assert_eq!(deadline.minute(), 0);
        prop_assert_eq!(deadline.second(), 0);
    }
}
