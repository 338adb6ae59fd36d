#![no_main]

use arbitrary::Arbitrary;
use gbs_integrate::{BulirschStoerConfig, ExhaustionPolicy, integrate};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct IntegrateInput {
    t0: f64,
    width: f64,
    y0: [f64; 2],
    coupling: f64,
    delta: f64,
    max_depth: u8,
    best_estimate: bool,
}

// Linear two-component system with an arbitrary coupling; the depth cap is
// kept small so every input terminates quickly.
fuzz_target!(|input: IntegrateInput| {
    let exhaustion = if input.best_estimate {
        ExhaustionPolicy::AcceptBestEstimate
    } else {
        ExhaustionPolicy::Fail
    };
    let config = BulirschStoerConfig::default()
        .with_delta(input.delta.abs())
        .with_max_depth(usize::from(input.max_depth % 6))
        .with_exhaustion(exhaustion);
    let k = input.coupling;
    let t_span = (input.t0, input.t0 + input.width.abs());
    if let Ok(result) = integrate(|_t, y| vec![y[1], -k * y[0]], &input.y0, t_span, &config) {
        let times = result.trajectory.times();
        assert!(times.windows(2).all(|w| w[1] > w[0]));
        assert_eq!(times.len(), result.accepted + 1);
    }
});
