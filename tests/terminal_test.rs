mod common;

use common::{INTERVAL, recorder, terminal};
use qrpos::application::poller::SessionState;
use qrpos::domain::order::OrderRef;
use qrpos::domain::status::PaymentStatus;
use qrpos::error::{OrderError, PosError};
use qrpos::infrastructure::in_memory::{CreateBehavior, InMemoryGateway};
use rust_decimal_macros::dec;
use tokio::time::sleep;

#[tokio::test(start_paused = true)]
async fn test_pending_then_approved_scenario() {
    let gateway = InMemoryGateway::new();
    gateway
        .set_create(CreateBehavior::Fixed(OrderRef::new("ORD123")))
        .await;
    gateway.push_status("pending").await;
    gateway.push_status("approved").await;
    let mut terminal = terminal(&gateway);
    let (callback, mut rx) = recorder();

    let order = terminal.submit("150.50", callback).await.unwrap();
    assert_eq!(order.reference, Some(OrderRef::new("ORD123")));
    assert_eq!(gateway.create_calls().await, 1);
    assert_eq!(gateway.created_amounts().await[0].value(), dec!(150.50));

    let first = rx.recv().await.unwrap();
    assert_eq!(first.status, PaymentStatus::Pending);
    assert_eq!(first.reference, OrderRef::new("ORD123"));
    assert_eq!(first.amount.value(), dec!(150.50));

    sleep(INTERVAL).await;
    let second = rx.recv().await.unwrap();
    assert_eq!(second.status, PaymentStatus::Approved);

    sleep(INTERVAL * 4).await;
    assert_eq!(gateway.checks_for(&OrderRef::new("ORD123")).await, 2);
    assert_eq!(
        terminal.session().unwrap().state(),
        SessionState::Terminal(PaymentStatus::Approved)
    );
}

#[tokio::test(start_paused = true)]
async fn test_missing_reference_starts_no_session() {
    let gateway = InMemoryGateway::new();
    gateway.set_create(CreateBehavior::NoReference).await;
    let mut terminal = terminal(&gateway);
    let (callback, mut rx) = recorder();

    let order = terminal.submit("42", callback).await.unwrap();
    assert!(!order.is_trackable());
    assert!(terminal.session().is_none());

    sleep(INTERVAL * 5).await;
    assert_eq!(gateway.check_calls().await, 0);
    // The callback was dropped unused.
    assert!(rx.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_new_order_cancels_previous_session() {
    let gateway = InMemoryGateway::new();
    gateway
        .set_create(CreateBehavior::Fixed(OrderRef::new("FIRST")))
        .await;
    let mut terminal = terminal(&gateway);
    let (first_callback, mut first_rx) = recorder();

    terminal.submit("10", first_callback).await.unwrap();
    sleep(INTERVAL + INTERVAL / 2).await;
    assert_eq!(gateway.checks_for(&OrderRef::new("FIRST")).await, 2);

    gateway
        .set_create(CreateBehavior::Fixed(OrderRef::new("SECOND")))
        .await;
    let (second_callback, mut second_rx) = recorder();
    terminal.submit("20", second_callback).await.unwrap();

    sleep(INTERVAL * 3).await;
    assert_eq!(gateway.checks_for(&OrderRef::new("FIRST")).await, 2);
    assert!(gateway.checks_for(&OrderRef::new("SECOND")).await >= 3);
    assert_eq!(terminal.session().unwrap().reference().as_str(), "SECOND");

    // The first session delivered its two updates and then went quiet.
    let mut first_updates = 0;
    while first_rx.recv().await.is_some() {
        first_updates += 1;
    }
    assert_eq!(first_updates, 2);

    let update = second_rx.recv().await.unwrap();
    assert_eq!(update.amount.value(), dec!(20));
}

#[tokio::test(start_paused = true)]
async fn test_dropping_terminal_stops_polling() {
    let gateway = InMemoryGateway::new();
    let mut terminal = terminal(&gateway);
    let (callback, _rx) = recorder();

    terminal.submit("10", callback).await.unwrap();
    sleep(INTERVAL / 2).await;
    drop(terminal);

    sleep(INTERVAL * 5).await;
    assert_eq!(gateway.check_calls().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_order_errors_surface_to_caller() {
    let gateway = InMemoryGateway::new();
    let mut terminal = terminal(&gateway);

    gateway
        .set_create(CreateBehavior::Reject("Monto es requerido".to_string()))
        .await;
    let (callback, _rx) = recorder();
    let err = terminal.submit("10", callback).await.unwrap_err();
    assert!(matches!(
        err,
        PosError::Order(OrderError::Rejected(ref msg)) if msg == "Monto es requerido"
    ));

    gateway.set_create(CreateBehavior::Unreachable).await;
    let (callback, _rx) = recorder();
    let err = terminal.submit("10", callback).await.unwrap_err();
    assert!(matches!(err, PosError::Order(OrderError::ConnectionFailure(_))));

    assert_eq!(gateway.create_calls().await, 2);
    assert_eq!(gateway.check_calls().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_qr_info_comes_from_gateway() {
    let gateway = InMemoryGateway::new();
    let terminal = terminal(&gateway);

    let info = terminal.qr_info().await.unwrap();
    assert_eq!(info.external_pos_id, "POS002");
}
