#![no_main]

use arbitrary::Arbitrary;
use gbs_integrate::{
    BulirschStoerConfig, MAX_ORDER, MIN_ORDER, validate_initial_state, validate_time_span,
};
use gbs_runtime::RuntimeMode;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct ValidateInput {
    t0: f64,
    tf: f64,
    y0: Vec<f64>,
    delta: f64,
    max_val: f64,
    max_order: u8,
    min_width: f64,
    hardened: bool,
}

fuzz_target!(|input: ValidateInput| {
    let mode = if input.hardened {
        RuntimeMode::Hardened
    } else {
        RuntimeMode::Strict
    };
    if let Ok(width) = validate_time_span(input.t0, input.tf) {
        assert!(width >= 0.0 && width.is_finite());
    }
    let y0 = input.y0.iter().copied().take(16).collect::<Vec<_>>();
    if let Ok(n) = validate_initial_state(&y0) {
        assert_eq!(n, y0.len());
    }
    let config = BulirschStoerConfig {
        delta: input.delta,
        max_val: input.max_val,
        max_order: usize::from(input.max_order),
        min_width: input.min_width,
        mode,
        ..BulirschStoerConfig::default()
    };
    if let Ok(validated) = config.validate() {
        assert!(validated.delta >= 0.0 && validated.delta.is_finite());
        assert!(validated.max_val > 0.0);
        assert!((MIN_ORDER..=MAX_ORDER).contains(&config.max_order));
    }
});
