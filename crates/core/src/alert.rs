//! Threshold rules applied to every host snapshot before it is broadcast.
//!
//! Pure logic; the producer decides whether to log or publish the result.

use crate::metrics::SystemSnapshot;

/// CPU usage (percent) above which a snapshot carries an alert.
pub const CPU_ALERT_PERCENT: f64 = 80.0;

/// Memory used/total ratio above which a snapshot carries an alert.
pub const MEMORY_ALERT_RATIO: f64 = 0.85;

/// Return the alert text for a snapshot, if any threshold is exceeded.
///
/// Memory pressure takes precedence over CPU when both thresholds are
/// crossed, so at most one alert is reported per snapshot.
pub fn evaluate(snapshot: &SystemSnapshot) -> Option<String> {
    if snapshot.memory_ratio() > MEMORY_ALERT_RATIO {
        return Some("⚠️ High Memory Usage!".to_string());
    }
    if snapshot.cpu_usage > CPU_ALERT_PERCENT {
        return Some(format!("⚠️ High CPU Usage: {:.2}%", snapshot.cpu_usage));
    }
    None
}
