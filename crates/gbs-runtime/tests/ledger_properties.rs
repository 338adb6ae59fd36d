//! Property tests for the bounded evidence ledger and the mode enum.
//!
//! Convention: test_{module}_{function}_{scenario}

use gbs_runtime::{EvidenceLedger, RuntimeMode, TestLogEntry, TestResult, within_tolerance};
use proptest::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Decision {
    index: usize,
    error: f64,
}

// ═══════════════════════════════════════════════════════════════
// Property 1: the ledger never exceeds capacity and keeps the newest entries
// ═══════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn test_evidence_record_bounded_fifo(
        capacity in 0usize..32,
        count in 0usize..128,
    ) {
        let mut ledger = EvidenceLedger::new(capacity);
        for index in 0..count {
            ledger.record(Decision { index, error: index as f64 });
        }
        let effective = capacity.max(1);
        prop_assert_eq!(ledger.capacity(), effective);
        prop_assert_eq!(ledger.len(), count.min(effective));
        prop_assert_eq!(ledger.len() + ledger.evicted(), count);

        let kept: Vec<usize> = ledger.iter().map(|d| d.index).collect();
        let expected: Vec<usize> = (count.saturating_sub(effective)..count).collect();
        prop_assert_eq!(kept, expected);
        prop_assert_eq!(ledger.latest().map(|d| d.index), count.checked_sub(1));
    }

    #[test]
    fn test_evidence_jsonl_one_line_per_entry(
        count in 1usize..40,
    ) {
        let mut ledger = EvidenceLedger::new(16);
        for index in 0..count {
            ledger.record(Decision { index, error: 0.5 });
        }
        let jsonl = ledger.serialize_jsonl();
        let lines: Vec<&str> = jsonl.lines().collect();
        prop_assert_eq!(lines.len(), ledger.len());
        for line in lines {
            let parsed: serde_json::Value = serde_json::from_str(line).expect("valid JSON");
            prop_assert_eq!(&parsed["error"], 0.5);
        }
    }
}

// ═══════════════════════════════════════════════════════════════
// Property 2: tolerance check is symmetric in its absolute part
// ═══════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn test_tolerance_within_absolute_symmetric(
        a in -1e6f64..1e6,
        b in -1e6f64..1e6,
        atol in 0.0f64..10.0,
    ) {
        prop_assert_eq!(
            within_tolerance(a, b, atol, 0.0),
            within_tolerance(b, a, atol, 0.0)
        );
    }
}

#[test]
fn test_mode_serde_names() {
    for (mode, name) in [
        (RuntimeMode::Strict, "\"Strict\""),
        (RuntimeMode::Hardened, "\"Hardened\""),
    ] {
        assert_eq!(serde_json::to_string(&mode).expect("serializable"), name);
        let back: RuntimeMode = serde_json::from_str(name).expect("deserializable");
        assert_eq!(back, mode);
    }
}

#[test]
fn test_runtime_structured_log_convention() {
    let entry = TestLogEntry::new(
        "test_evidence_record_bounded_fifo",
        "gbs_runtime",
        "property test: ledger stays within capacity",
    )
    .with_result(TestResult::Pass)
    .with_seed(42);
    let parsed: serde_json::Value =
        serde_json::from_str(&entry.to_json_line()).expect("valid JSON");
    assert_eq!(parsed["module"], "gbs_runtime");
    assert_eq!(parsed["seed"], 42);
}
