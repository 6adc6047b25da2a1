use crate::application::poller::StatusUpdate;
use crate::domain::order::{CreatedOrder, QrInfo};
use crate::domain::status::PaymentStatus;
use crate::error::{OrderError, PosError};

/// Short label shown next to the current payment status.
pub fn status_label(status: &PaymentStatus) -> String {
    match status {
        PaymentStatus::Pending => "⏳ Pending".to_string(),
        PaymentStatus::InProcess => "🔄 Processing".to_string(),
        PaymentStatus::Approved => "✅ Approved".to_string(),
        PaymentStatus::Rejected => "❌ Rejected".to_string(),
        PaymentStatus::Cancelled => "❌ Cancelled".to_string(),
        PaymentStatus::Authorized => "✅ Authorized".to_string(),
        PaymentStatus::Other(raw) => raw.clone(),
    }
}

/// Operator message for a status update, if the status warrants one.
pub fn update_message(update: &StatusUpdate) -> Option<String> {
    match update.status {
        PaymentStatus::Approved => Some(format!(
            "Payment confirmed! Amount of ${} received.",
            update.amount
        )),
        PaymentStatus::Rejected | PaymentStatus::Cancelled => {
            Some("The payment was rejected or cancelled.".to_string())
        }
        PaymentStatus::Pending | PaymentStatus::InProcess => Some(format!(
            "Amount of ${} loaded. Waiting for payment confirmation...",
            update.amount
        )),
        PaymentStatus::Authorized | PaymentStatus::Other(_) => None,
    }
}

pub fn order_message(order: &CreatedOrder) -> String {
    format!(
        "Amount of ${} loaded. Scan the fixed QR to pay!",
        order.amount
    )
}

/// The gateway's own note on an accepted order, when it sent a non-empty one.
pub fn gateway_note(order: &CreatedOrder) -> Option<String> {
    order
        .message
        .as_deref()
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(|message| format!("Gateway: {message}"))
}

pub fn error_message(error: &PosError) -> String {
    match error {
        PosError::Order(OrderError::Rejected(message)) => format!("Error: {message}"),
        PosError::Order(OrderError::ConnectionFailure(_)) | PosError::Http(_) => {
            "Error connecting to the server".to_string()
        }
        other => format!("Error: {other}"),
    }
}

pub fn qr_block(info: &QrInfo) -> String {
    format!(
        "Scan here to pay\n  QR: {}\n  Till ID: {}",
        info.qr_image, info.external_pos_id
    )
}
