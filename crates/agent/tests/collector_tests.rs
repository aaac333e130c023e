//! Integration tests for the host metrics collector.
//!
//! These run against the real host, so they only assert invariants that
//! hold on any machine able to run the test suite.

use pulse_agent::{MetricsSource, SampleError, SystemCollector};

// ---------------------------------------------------------------------------
// Test: a sample reports sane figures
// ---------------------------------------------------------------------------

#[test]
fn sample_reports_consistent_figures() {
    let collector = SystemCollector::new();
    let snapshot = collector.sample().expect("host should report memory");

    assert!(snapshot.memory_total > 0);
    assert!(snapshot.memory_used <= snapshot.memory_total);
    assert!(snapshot.disk_used <= snapshot.disk_total);
    assert!(snapshot.cpu_usage >= 0.0);
    assert!(snapshot.load_avg >= 0.0);
}

// ---------------------------------------------------------------------------
// Test: repeated sampling reuses the collector state
// ---------------------------------------------------------------------------

#[test]
fn collector_can_sample_repeatedly() {
    let collector = SystemCollector::default();

    for _ in 0..3 {
        let snapshot = collector.sample().expect("sample should succeed");
        assert!(
            snapshot.cpu_usage.is_finite() && snapshot.cpu_usage >= 0.0,
            "cpu_usage out of range: {}",
            snapshot.cpu_usage
        );
    }
}

// ---------------------------------------------------------------------------
// Test: the collector is usable as a trait object across threads
// ---------------------------------------------------------------------------

#[test]
fn collector_is_a_shareable_metrics_source() {
    let source: std::sync::Arc<dyn MetricsSource> = std::sync::Arc::new(SystemCollector::new());

    let handle = std::thread::spawn({
        let source = std::sync::Arc::clone(&source);
        move || source.sample().map(|s| s.memory_total)
    });

    let total = handle.join().unwrap().expect("sample from another thread");
    assert!(total > 0);
}

// ---------------------------------------------------------------------------
// Test: snapshot JSON uses the wire field names
// ---------------------------------------------------------------------------

#[test]
fn snapshot_serializes_with_wire_field_names() {
    let snapshot = SystemCollector::new().sample().unwrap();
    let json = serde_json::to_value(snapshot).unwrap();

    for field in [
        "cpu_usage",
        "memory_used",
        "memory_total",
        "load_avg",
        "disk_used",
        "disk_total",
    ] {
        assert!(json.get(field).is_some(), "missing field {field}");
    }
}

#[test]
fn sample_error_names_the_missing_figure() {
    assert_eq!(
        SampleError::Unavailable("memory").to_string(),
        "memory unavailable on this host"
    );
}
