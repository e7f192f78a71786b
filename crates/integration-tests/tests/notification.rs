//! Change propagation between views of one session.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use breeze_core::Product;
use breeze_integration_tests::{TestProfile, product};

#[test]
fn test_views_share_one_cart() {
    let profile = TestProfile::new();
    let session = profile.session();
    let header_badge = session.clone();
    let product_card = session.clone();

    product_card.cart().add(&product("A", 100, Some(3)), 2);

    assert_eq!(header_badge.cart().total_items(), 2);
    assert!(session.cart().contains(&product("A", 100, Some(3)).id));
}

#[test]
fn test_receiver_sees_persisted_snapshot() {
    let profile = TestProfile::new();
    let session = profile.session();
    let mut badge = session.cart().subscribe();
    assert!(!badge.has_changed().unwrap());

    session.cart().add(&product("A", 100, None), 1);

    assert!(badge.has_changed().unwrap());
    let seen = badge.borrow_and_update().clone();
    assert_eq!(seen, session.cart().entries());
    // Already on disk when the receiver is notified
    assert_eq!(profile.session().cart().entries(), seen);
}

#[test]
fn test_noops_do_not_notify() {
    let profile = TestProfile::new();
    let session = profile.session();
    session.compare().add(&Product::new("A"));

    let mut rx = session.compare().subscribe();
    rx.borrow_and_update();

    session.compare().add(&Product::new("A"));
    session.compare().remove(&breeze_core::ProductId::new("missing"));
    assert!(!rx.has_changed().unwrap());

    session.compare().add(&Product::new("B"));
    assert!(rx.has_changed().unwrap());
}

#[tokio::test]
async fn test_async_subscriber_wakes_on_change() {
    let profile = TestProfile::new();
    let session = profile.session();
    let mut rx = session.favorites().subscribe();

    let watcher = tokio::spawn(async move {
        rx.changed().await.unwrap();
        rx.borrow().len()
    });

    session.favorites().add(&Product::new("split-18k"));

    let seen = tokio::time::timeout(Duration::from_secs(5), watcher)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(seen, 1);
}
