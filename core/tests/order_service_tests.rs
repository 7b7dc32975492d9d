// tests/order_service_tests.rs
mod common;
use common::*;
use flowers_core::{Fault, OrderStatus, ShopError};
use std::collections::HashSet;
use uuid::Uuid;

#[tokio::test]
async fn create_order_stores_one_order_and_all_items() {
  setup_tracing();
  let (service, store) = memory_service();

  for item_count in [1usize, 3, 7] {
    let before = store.snapshot().await;
    let order_id = service.create_order(sample_order("Anna", item_count)).await.unwrap();
    let after = store.snapshot().await;

    assert_eq!(after.orders.len(), before.orders.len() + 1);
    let stored = after.orders.iter().find(|o| o.id == order_id).expect("order is stored");
    assert_eq!(stored.status, OrderStatus::Pending);
    assert!(!stored.is_sent);

    let own_items: Vec<_> = after.items.iter().filter(|i| i.order_id == order_id).collect();
    assert_eq!(own_items.len(), item_count);
    assert_eq!(after.items.len(), before.items.len() + item_count);
  }
}

#[tokio::test]
async fn item_failure_leaves_no_trace_of_the_order() {
  setup_tracing();
  let (service, store) = memory_service();
  service.create_order(sample_order("Existing", 2)).await.unwrap();

  store.inject(Fault::ItemInsert { after: 1 });
  let err = service.create_order(sample_order("Broken", 3)).await.unwrap_err();
  assert!(matches!(err, ShopError::Storage(_)), "got {:?}", err);
  assert!(err.to_string().contains("injected failure inserting item 2"));

  let snapshot = store.snapshot().await;
  assert_eq!(snapshot.orders.len(), 1);
  assert_eq!(snapshot.orders[0].full_name, "Existing");
  assert_eq!(snapshot.items.len(), 2);
  assert_eq!(store.rollbacks(), 1);
}

#[tokio::test]
async fn commit_failure_is_reported_and_nothing_is_visible() {
  setup_tracing();
  let (service, store) = memory_service();

  store.inject(Fault::Commit);
  assert!(service.create_order(sample_order("Anna", 2)).await.is_err());

  let snapshot = store.snapshot().await;
  assert!(snapshot.orders.is_empty());
  assert!(snapshot.items.is_empty());
}

#[tokio::test]
async fn invalid_payload_never_opens_a_transaction() {
  setup_tracing();
  let (service, store) = memory_service();

  let mut no_items = sample_order("Anna", 1);
  no_items.items.clear();
  assert!(matches!(service.create_order(no_items).await, Err(ShopError::Validation(_))));

  let mut zero_quantity = sample_order("Anna", 2);
  zero_quantity.items[1].quantity = 0;
  assert!(matches!(service.create_order(zero_quantity).await, Err(ShopError::Validation(_))));

  let mut no_phone = sample_order("Anna", 1);
  no_phone.phone_number = String::new();
  assert!(matches!(service.create_order(no_phone).await, Err(ShopError::Validation(_))));

  assert!(store.snapshot().await.orders.is_empty());
  assert_eq!(store.commits(), 0);
  assert_eq!(store.rollbacks(), 0);
}

#[tokio::test]
async fn unsent_orders_are_delivered_once() {
  setup_tracing();
  let (service, _store) = memory_service();
  let first = service.create_order(sample_order("Anna", 2)).await.unwrap();
  let second = service.create_order(sample_order("Boris", 1)).await.unwrap();

  let claimed = service.list_unsent_orders().await.unwrap();
  let ids: Vec<Uuid> = claimed.iter().map(|o| o.id).collect();
  assert_eq!(ids, vec![first, second]);
  assert!(claimed.iter().all(|o| o.is_sent));
  assert_eq!(claimed[0].items.len(), 2);
  assert_eq!(claimed[0].items[0].product_id, 100);
  assert_eq!(claimed[1].items.len(), 1);

  assert!(service.list_unsent_orders().await.unwrap().is_empty());

  let third = service.create_order(sample_order("Vera", 1)).await.unwrap();
  let claimed = service.list_unsent_orders().await.unwrap();
  assert_eq!(claimed.len(), 1);
  assert_eq!(claimed[0].id, third);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_claims_never_share_an_order() {
  setup_tracing();
  let (service, _store) = memory_service();
  let mut created = HashSet::new();
  for i in 0..20 {
    created.insert(service.create_order(sample_order(&format!("Customer {}", i), 1)).await.unwrap());
  }

  let handles: Vec<_> = (0..8)
    .map(|_| {
      let service = service.clone();
      tokio::spawn(async move { service.list_unsent_orders().await })
    })
    .collect();

  let mut seen = HashSet::new();
  for handle in handles {
    for order in handle.await.unwrap().unwrap() {
      assert!(seen.insert(order.id), "order {} delivered twice", order.id);
    }
  }
  assert_eq!(seen, created);
}

#[tokio::test]
async fn failed_claim_marks_nothing_sent() {
  setup_tracing();
  let (service, store) = memory_service();
  service.create_order(sample_order("Anna", 1)).await.unwrap();
  service.create_order(sample_order("Boris", 1)).await.unwrap();

  store.inject(Fault::Claim);
  assert!(service.list_unsent_orders().await.is_err());
  assert_eq!(store.rollbacks(), 1);
  assert!(store.snapshot().await.orders.iter().all(|o| !o.is_sent));

  assert_eq!(service.list_unsent_orders().await.unwrap().len(), 2);
}

#[tokio::test]
async fn status_filter_is_exact_and_read_only() {
  setup_tracing();
  let (service, store) = memory_service();
  let a = service.create_order(sample_order("Anna", 1)).await.unwrap();
  let b = service.create_order(sample_order("Boris", 2)).await.unwrap();
  let c = service.create_order(sample_order("Vera", 1)).await.unwrap();
  service.update_order_status(b, OrderStatus::Confirmed).await.unwrap();

  let before = store.snapshot().await;

  let pending: Vec<Uuid> = service
    .list_orders_by_status(OrderStatus::Pending)
    .await
    .unwrap()
    .iter()
    .map(|o| o.id)
    .collect();
  assert_eq!(pending, vec![a, c]);

  let confirmed = service.list_orders_by_status(OrderStatus::Confirmed).await.unwrap();
  assert_eq!(confirmed.len(), 1);
  assert_eq!(confirmed[0].id, b);
  assert_eq!(confirmed[0].items.len(), 2);

  assert!(service.list_orders_by_status(OrderStatus::Delivered).await.unwrap().is_empty());

  assert_eq!(store.snapshot().await.orders, before.orders);
}

#[tokio::test]
async fn status_update_keeps_sent_flag() {
  setup_tracing();
  let (service, _store) = memory_service();
  let id = service.create_order(sample_order("Anna", 1)).await.unwrap();
  service.list_unsent_orders().await.unwrap();

  let updated = service.update_order_status(id, OrderStatus::InDelivery).await.unwrap();
  assert_eq!(updated.status, OrderStatus::InDelivery);
  assert!(updated.is_sent);
  assert!(service.list_unsent_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn status_update_of_unknown_order_is_not_found() {
  setup_tracing();
  let (service, store) = memory_service();
  let missing = Uuid::new_v4();
  match service.update_order_status(missing, OrderStatus::Cancelled).await {
    Err(ShopError::OrderNotFound(id)) => assert_eq!(id, missing),
    other => panic!("expected OrderNotFound, got {:?}", other),
  }
  assert_eq!(store.rollbacks(), 1);
}
