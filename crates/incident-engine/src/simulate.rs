//! Simulated alerts for drills and demos

use incident_types::{Alert, Severity};

/// Alert kinds understood by [`simulate_alert`]
pub const ALERT_KINDS: [&str; 5] = [
    "pod_failure",
    "high_cpu",
    "memory_leak",
    "network_error",
    "database_timeout",
];

/// Build an alert of `kind` for `service`.
///
/// Unknown kinds produce a generic low-severity alert.
pub fn simulate_alert(service: &str, kind: &str) -> Alert {
    let (description, severity) = match kind {
        "pod_failure" => (
            format!("{} pod crashed due to OOM (Out of Memory)", service),
            Severity::High,
        ),
        "high_cpu" => (
            format!("{} experiencing high CPU usage (95%+)", service),
            Severity::High,
        ),
        "memory_leak" => (
            format!("{} memory usage at 98%, potential memory leak", service),
            Severity::Critical,
        ),
        "network_error" => (
            format!("{} network connectivity issues", service),
            Severity::Medium,
        ),
        "database_timeout" => (
            format!("{} database connection timeouts", service),
            Severity::Medium,
        ),
        _ => (format!("{} incident detected", service), Severity::Low),
    };

    let alert = Alert::new(service, description)
        .with_type(kind)
        .with_severity(severity);

    match kind {
        "pod_failure" => alert.with_metric("restarts", 5.0),
        "high_cpu" => alert.with_metric("cpu", 95.0),
        "memory_leak" => alert.with_metric("memory", 98.0),
        "network_error" => alert.with_metric("error_rate", 0.25),
        "database_timeout" => alert.with_metric("latency_ms", 5000.0),
        _ => alert,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_kinds() {
        let alert = simulate_alert("auth-service", "pod_failure");
        assert_eq!(alert.description, "auth-service pod crashed due to OOM (Out of Memory)");
        assert_eq!(alert.alert_type, "pod_failure");
        assert_eq!(alert.severity, Severity::High);

        let alert = simulate_alert("cache-service", "memory_leak");
        assert_eq!(alert.metric("memory"), 98.0);
        assert_eq!(alert.severity, Severity::Critical);

        for kind in ALERT_KINDS {
            assert!(!simulate_alert("api", kind).description.ends_with("incident detected"));
        }
    }

    #[test]
    fn test_unknown_kind() {
        let alert = simulate_alert("api", "solar_flare");
        assert_eq!(alert.description, "api incident detected");
        assert_eq!(alert.severity, Severity::Low);
        assert!(alert.metrics.is_empty());
    }
}
