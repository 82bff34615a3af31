use std::error::Error;
use std::time::{Duration, Instant};

use hotswap::watch::DebounceGate;
use proptest::prelude::*;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn bursts_inside_the_window_collapse_to_one_trigger() -> TestResult {
    let t0 = Instant::now();
    let mut gate = DebounceGate::new(t0);
    gate.calibrate(Duration::from_secs(2));
    assert_eq!(gate.window(), Duration::from_secs(3));

    // A write right after startup is absorbed against the reference time.
    assert!(!gate.should_trigger(t0 + Duration::from_millis(500)));

    // 10s after startup: accepted.
    assert!(gate.should_trigger(t0 + Duration::from_secs(10)));

    // 0.5s after the accepted trigger: collapsed.
    assert!(!gate.should_trigger(t0 + Duration::from_millis(10_500)));

    // 4s after the accepted trigger: accepted again.
    assert!(gate.should_trigger(t0 + Duration::from_secs(14)));

    Ok(())
}

#[test]
fn rejected_events_do_not_move_the_reference() -> TestResult {
    let t0 = Instant::now();
    // Uncalibrated gate: window is the 1s baseline.
    let mut gate = DebounceGate::new(t0);

    assert!(!gate.should_trigger(t0 + Duration::from_millis(900)));
    // One second after t0 -- not after the rejected event at t0+900ms.
    assert!(gate.should_trigger(t0 + Duration::from_secs(1)));

    Ok(())
}

#[test]
fn zero_tolerance_accepts_one_second_spacing() -> TestResult {
    let t0 = Instant::now();
    let mut gate = DebounceGate::new(t0);
    gate.calibrate(Duration::ZERO);

    assert!(gate.should_trigger(t0 + Duration::from_secs(1)));
    assert!(gate.should_trigger(t0 + Duration::from_secs(2)));
    assert!(gate.should_trigger(t0 + Duration::from_secs(3)));

    Ok(())
}

#[test]
fn calibration_widens_the_window() -> TestResult {
    let t0 = Instant::now();
    let mut gate = DebounceGate::new(t0);
    assert_eq!(gate.tolerance(), Duration::ZERO);

    gate.calibrate(Duration::from_millis(750));
    assert_eq!(gate.tolerance(), Duration::from_millis(750));
    assert_eq!(gate.window(), Duration::from_millis(1_750));

    Ok(())
}

proptest! {
    /// Any burst of writes landing within one window of an accepted trigger
    /// is fully collapsed: only the accepted trigger fires.
    #[test]
    fn only_the_first_of_a_burst_triggers(
        tolerance_ms in 0u64..5_000,
        offsets in proptest::collection::vec(1u64..1_000, 1..20),
    ) {
        let t0 = Instant::now();
        let mut gate = DebounceGate::new(t0);
        gate.calibrate(Duration::from_millis(tolerance_ms));

        let window_ms = 1_000 + tolerance_ms;
        let accepted_at = t0 + Duration::from_millis(window_ms);
        prop_assert!(gate.should_trigger(accepted_at));

        for offset in offsets {
            // Scale each raw offset into (0, window).
            let within = offset * window_ms / 1_000;
            let at = accepted_at + Duration::from_millis(within.min(window_ms - 1));
            prop_assert!(!gate.should_trigger(at));
        }
    }

    /// Events spaced at least one window apart each trigger independently.
    #[test]
    fn spaced_events_each_trigger(
        tolerance_ms in 0u64..5_000,
        slack_ms in proptest::collection::vec(0u64..2_000, 1..20),
    ) {
        let t0 = Instant::now();
        let mut gate = DebounceGate::new(t0);
        gate.calibrate(Duration::from_millis(tolerance_ms));

        let window = gate.window();
        let mut at = t0 + window;
        for slack in slack_ms {
            prop_assert!(gate.should_trigger(at));
            at += window + Duration::from_millis(slack);
        }
    }
}
