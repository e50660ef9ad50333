use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};

lazy_static! {
    pub static ref ANNOUNCEMENT_WRITES_COUNTER: IntCounterVec = register_int_counter_vec!(
        "api_announcement_writes_total",
        "Announcement mutations by action and outcome",
        &["action", "outcome"]
    ).unwrap();
}

/// Record the outcome of a create/update/delete call.
pub fn record_write<T, E>(action: &str, result: &Result<T, E>) {
    let outcome = if result.is_ok() { "ok" } else { "error" };
    ANNOUNCEMENT_WRITES_COUNTER
        .with_label_values(&[action, outcome])
        .inc();
}
