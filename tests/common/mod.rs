#![allow(dead_code)]

use qrpos::application::poller::{StatusPoller, StatusUpdate};
use qrpos::application::terminal::Terminal;
use qrpos::config::GatewayConfig;
use qrpos::infrastructure::in_memory::InMemoryGateway;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub const INTERVAL: Duration = Duration::from_millis(3000);

/// Update callback that forwards every update into a channel.
pub fn recorder() -> (
    impl Fn(StatusUpdate) + Send + Sync + 'static,
    mpsc::UnboundedReceiver<StatusUpdate>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let callback = move |update: StatusUpdate| {
        let _ = tx.send(update);
    };
    (callback, rx)
}

pub fn poller(gateway: &InMemoryGateway) -> StatusPoller {
    StatusPoller::new(Arc::new(gateway.clone()), INTERVAL).unwrap()
}

pub fn terminal(gateway: &InMemoryGateway) -> Terminal {
    let config = GatewayConfig::default().with_poll_interval(INTERVAL).unwrap();
    Terminal::new(Arc::new(gateway.clone()), &config).unwrap()
}
