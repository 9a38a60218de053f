//! Metric names emitted by the booking-conflict core.

/// Counter: conflicts recorded by the detector.
pub const CONFLICTS_DETECTED_TOTAL: &str = "conflicts_detected_total";

/// Counter: waiting list joins. Labels: outcome (`created` | `existing`).
pub const WAITING_LIST_JOINS_TOTAL: &str = "waiting_list_joins_total";

/// Counter: waiting entries promoted to confirmed bookings.
pub const WAITING_LIST_CONFIRMATIONS_TOTAL: &str = "waiting_list_confirmations_total";

/// Counter: waiting entries expired by the sweeper.
pub const WAITING_LIST_EXPIRED_TOTAL: &str = "waiting_list_expired_total";

/// Counter: confirmation notifications that failed to deliver.
pub const NOTIFICATIONS_FAILED_TOTAL: &str = "notifications_failed_total";

/// Register descriptions with the installed recorder.
pub fn describe() {
    metrics::describe_counter!(CONFLICTS_DETECTED_TOTAL, "Booking conflicts recorded");
    metrics::describe_counter!(WAITING_LIST_JOINS_TOTAL, "Waiting list join requests");
    metrics::describe_counter!(
        WAITING_LIST_CONFIRMATIONS_TOTAL,
        "Waiting entries promoted to confirmed bookings"
    );
    metrics::describe_counter!(WAITING_LIST_EXPIRED_TOTAL, "Waiting entries expired by sweeps");
    metrics::describe_counter!(
        NOTIFICATIONS_FAILED_TOTAL,
        "Confirmation notifications that failed to deliver"
    );
}
