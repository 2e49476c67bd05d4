//! Notification payloads for queue mutations

use shared::Notification;
use shared::queue::QueueStatus;

pub fn entry_created(code: &str, position: u32) -> Notification {
    Notification::new(
        "You're in line",
        format!("Your code is {}. You are number {} in the queue.", code, position),
    )
    .with_data("public_code", code)
    .with_data("position", position)
}

pub fn entry_cancelled(code: &str) -> Notification {
    Notification::new("Entry cancelled", format!("Your entry {} was cancelled.", code))
        .with_data("public_code", code)
}

pub fn status_advanced(code: &str, status: QueueStatus) -> Notification {
    let body = match status {
        QueueStatus::InProgress => format!("Entry {}: it's your turn now.", code),
        QueueStatus::Completed => format!("Entry {}: your service is complete. Thank you!", code),
        _ => format!("Entry {} is now {}.", code, status),
    };
    Notification::new("Queue update", body)
        .with_data("public_code", code)
        .with_data("status", status.to_string())
}

pub fn moved_down(code: &str, position: u32) -> Notification {
    Notification::new(
        "Queue position changed",
        format!("Entry {} moved to position {}.", code, position),
    )
    .with_data("public_code", code)
    .with_data("position", position)
}
