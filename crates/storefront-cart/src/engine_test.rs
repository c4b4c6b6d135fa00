use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex as StdMutex;

use storefront_core::RemoteLine;

use super::*;

/// In-memory store that behaves like the commerce backend and can be told to
/// fail, stall or slow down.
#[derive(Default)]
struct FakeStore {
    lines: StdMutex<Vec<RemoteLine>>,
    next_id: AtomicU64,
    fetch_down: AtomicBool,
    mutate_down: AtomicBool,
    hang: AtomicBool,
    delay_ms: AtomicU64,
    reject_product: StdMutex<Option<ProductId>>,
    fetches: AtomicUsize,
    mutations: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeStore {
    fn online() -> Self {
        Self {
            next_id: AtomicU64::new(100),
            ..Self::default()
        }
    }

    fn offline() -> Self {
        let store = Self::online();
        store.set_down(true);
        store
    }

    fn with_lines(lines: Vec<RemoteLine>) -> Self {
        let store = Self::online();
        *store.lines.lock().unwrap() = lines;
        store
    }

    fn set_down(&self, down: bool) {
        self.fetch_down.store(down, Ordering::SeqCst);
        self.mutate_down.store(down, Ordering::SeqCst);
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn mutations(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    fn remote_quantity(&self, product_id: ProductId) -> Option<u32> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.product_id == product_id)
            .map(|l| l.quantity.get())
    }

    async fn enter(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    fn check_mutate(&self) -> Result<(), StoreError> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        if self.mutate_down.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

impl RemoteCartStore for FakeStore {
    async fn fetch_cart(&self) -> Result<Vec<RemoteLine>, StoreError> {
        self.enter().await;
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let result = if self.fetch_down.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("connection refused".to_string()))
        } else {
            Ok(self.lines.lock().unwrap().clone())
        };
        self.leave();
        result
    }

    async fn add_item(&self, product_id: ProductId, quantity: Quantity) -> Result<(), StoreError> {
        self.enter().await;
        let result = self.check_mutate().and_then(|()| {
            if *self.reject_product.lock().unwrap() == Some(product_id) {
                return Err(StoreError::InvalidInput("Product not found".to_string()));
            }
            let mut lines = self.lines.lock().unwrap();
            if let Some(line) = lines.iter_mut().find(|l| l.product_id == product_id) {
                line.quantity = line.quantity.saturating_add(quantity);
            } else {
                let id = i64::try_from(self.next_id.fetch_add(1, Ordering::SeqCst)).unwrap();
                lines.push(RemoteLine {
                    id: LineId(id),
                    product_id,
                    quantity,
                    product: None,
                });
            }
            Ok(())
        });
        self.leave();
        result
    }

    async fn update_item(&self, line_id: LineId, quantity: Quantity) -> Result<(), StoreError> {
        self.enter().await;
        let result = self.check_mutate().and_then(|()| {
            let mut lines = self.lines.lock().unwrap();
            let line = lines
                .iter_mut()
                .find(|l| l.id == line_id)
                .ok_or_else(|| StoreError::InvalidInput("Item not found in cart".to_string()))?;
            line.quantity = quantity;
            Ok(())
        });
        self.leave();
        result
    }

    async fn remove_item(&self, line_id: LineId) -> Result<(), StoreError> {
        self.enter().await;
        let result = self.check_mutate().and_then(|()| {
            let mut lines = self.lines.lock().unwrap();
            let before = lines.len();
            lines.retain(|l| l.id != line_id);
            if lines.len() == before {
                return Err(StoreError::InvalidInput("Item not found in cart".to_string()));
            }
            Ok(())
        });
        self.leave();
        result
    }
}

fn qty(n: u32) -> Quantity {
    Quantity::new(n).unwrap()
}

fn remote_line(id: i64, product_id: i64, quantity: u32, price: i64) -> RemoteLine {
    RemoteLine {
        id: LineId(id),
        product_id: ProductId(product_id),
        quantity: qty(quantity),
        product: Some(ProductSnapshot {
            name: Some(format!("Product {product_id}")),
            price: Some(Decimal::from(price)),
            image_url: None,
        }),
    }
}

fn snapshot(price: i64) -> Option<ProductSnapshot> {
    Some(ProductSnapshot {
        name: Some("Phone".to_string()),
        price: Some(Decimal::from(price)),
        image_url: None,
    })
}

fn fast_config() -> EngineConfig {
    EngineConfig {
        remote_timeout: Duration::from_millis(200),
    }
}

// ---------------------------------------------------------------------------
// Start-up and refresh
// ---------------------------------------------------------------------------

#[tokio::test]
async fn start_loads_remote_cart() {
    let store = FakeStore::with_lines(vec![remote_line(1, 42, 2, 100)]);
    let engine = CartEngine::start(store, fast_config()).await;

    assert_eq!(engine.mode(), Mode::Remote);
    assert_eq!(engine.total_items(), 2);
    assert_eq!(engine.total_price(), Decimal::from(200));
    assert!(engine.last_error().is_none());
    assert!(!engine.is_loading());
}

#[tokio::test]
async fn start_with_unreachable_store_enters_local_mode_with_empty_cart() {
    let engine = CartEngine::start(FakeStore::offline(), fast_config()).await;

    assert_eq!(engine.mode(), Mode::Local);
    assert!(engine.lines().is_empty());
    assert!(engine.last_error().is_some());
}

#[tokio::test]
async fn new_does_not_touch_store() {
    let engine = CartEngine::new(FakeStore::online(), EngineConfig::default());
    assert_eq!(engine.store().fetches(), 0);
    assert_eq!(engine.mode(), Mode::Remote);
}

#[tokio::test]
async fn failed_refresh_keeps_existing_cart() {
    let store = FakeStore::with_lines(vec![remote_line(1, 42, 1, 100)]);
    let engine = CartEngine::start(store, fast_config()).await;

    engine.store().set_down(true);
    assert!(!engine.refresh().await);

    assert_eq!(engine.mode(), Mode::Local);
    assert_eq!(engine.lines().len(), 1);
}

#[tokio::test]
async fn successful_refresh_returns_to_remote_and_replaces_cart() {
    let engine = CartEngine::start(FakeStore::offline(), fast_config()).await;
    engine
        .add_to_cart(ProductId(7), 1, snapshot(10))
        .await
        .unwrap();
    assert_eq!(engine.mode(), Mode::Local);

    engine.store().set_down(false);
    *engine.store().lines.lock().unwrap() = vec![remote_line(1, 42, 3, 100)];
    assert!(engine.refresh().await);

    assert_eq!(engine.mode(), Mode::Remote);
    assert!(engine.last_error().is_none());
    let lines = engine.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].product_id(), ProductId(42));
    assert!(!lines[0].is_local());
}

// ---------------------------------------------------------------------------
// Add
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_in_remote_mode_is_confirmed_by_refetch() {
    let engine = CartEngine::start(FakeStore::online(), fast_config()).await;
    let fetches_before = engine.store().fetches();

    let outcome = engine
        .add_to_cart(ProductId(42), 2, snapshot(100))
        .await
        .unwrap();

    assert_eq!(outcome, SyncOutcome::Confirmed);
    assert_eq!(engine.store().fetches(), fetches_before + 1);
    assert_eq!(engine.store().remote_quantity(ProductId(42)), Some(2));
    let lines = engine.lines();
    assert_eq!(lines.len(), 1);
    assert!(!lines[0].is_local());
    assert_eq!(lines[0].quantity().get(), 2);
}

#[tokio::test]
async fn add_failure_falls_back_to_local_line() {
    let engine = CartEngine::start(FakeStore::online(), fast_config()).await;
    engine.store().set_down(true);

    let outcome = engine
        .add_to_cart(ProductId(42), 1, snapshot(100))
        .await
        .unwrap();

    assert_eq!(outcome, SyncOutcome::Local);
    assert_eq!(engine.mode(), Mode::Local);
    assert!(engine.last_error().is_some());
    let lines = engine.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].is_local());
    assert_eq!(lines[0].name(), Some("Phone"));
    assert_eq!(engine.total_price(), Decimal::from(100));
}

#[tokio::test]
async fn adds_in_local_mode_merge_and_skip_the_store() {
    let engine = CartEngine::start(FakeStore::offline(), fast_config()).await;
    let mutations_before = engine.store().mutations();

    engine
        .add_to_cart(ProductId(42), 1, snapshot(100))
        .await
        .unwrap();
    engine
        .add_to_cart(ProductId(42), 2, snapshot(100))
        .await
        .unwrap();

    assert_eq!(engine.store().mutations(), mutations_before);
    let lines = engine.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity().get(), 3);
    assert_eq!(engine.total_price(), Decimal::from(300));
}

#[tokio::test]
async fn local_lines_get_distinct_ids() {
    let engine = CartEngine::start(FakeStore::offline(), fast_config()).await;
    for product in 1..=5 {
        engine
            .add_to_cart(ProductId(product), 1, None)
            .await
            .unwrap();
    }

    let ids: BTreeSet<_> = engine.lines().iter().map(CartLine::id).collect();
    assert_eq!(ids.len(), 5);
}

#[tokio::test]
async fn zero_quantity_is_rejected_before_any_change() {
    let engine = CartEngine::start(FakeStore::online(), fast_config()).await;
    let mutations_before = engine.store().mutations();

    let err = engine
        .add_to_cart(ProductId(42), 0, None)
        .await
        .unwrap_err();
    assert_eq!(err, CartError::InvalidQuantity(0));

    let err = engine.update_quantity(LineId(1), 0).await.unwrap_err();
    assert_eq!(err, CartError::InvalidQuantity(0));

    assert_eq!(engine.store().mutations(), mutations_before);
    assert!(engine.lines().is_empty());
}

#[tokio::test]
async fn accepted_add_with_failed_resync_is_applied_locally() {
    let engine = CartEngine::start(FakeStore::online(), fast_config()).await;
    engine.store().fetch_down.store(true, Ordering::SeqCst);

    let outcome = engine
        .add_to_cart(ProductId(42), 1, snapshot(100))
        .await
        .unwrap();

    assert_eq!(outcome, SyncOutcome::Local);
    assert_eq!(engine.mode(), Mode::Local);
    assert_eq!(engine.store().remote_quantity(ProductId(42)), Some(1));
    assert_eq!(engine.total_items(), 1);
}

// ---------------------------------------------------------------------------
// Update and remove
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_in_remote_mode_is_confirmed() {
    let store = FakeStore::with_lines(vec![remote_line(1, 42, 1, 100)]);
    let engine = CartEngine::start(store, fast_config()).await;

    let outcome = engine.update_quantity(LineId(1), 4).await.unwrap();

    assert_eq!(outcome, SyncOutcome::Confirmed);
    assert_eq!(engine.total_items(), 4);
    assert_eq!(engine.total_price(), Decimal::from(400));
}

#[tokio::test]
async fn update_failure_applies_locally_and_enters_local_mode() {
    let store = FakeStore::with_lines(vec![remote_line(1, 42, 1, 100)]);
    let engine = CartEngine::start(store, fast_config()).await;
    engine.store().mutate_down.store(true, Ordering::SeqCst);

    let outcome = engine.update_quantity(LineId(1), 3).await.unwrap();

    assert_eq!(outcome, SyncOutcome::Local);
    assert_eq!(engine.mode(), Mode::Local);
    assert!(engine.last_error().is_some());
    assert_eq!(engine.total_items(), 3);
}

#[tokio::test]
async fn update_of_unknown_line_leaves_cart_unchanged() {
    let engine = CartEngine::start(FakeStore::offline(), fast_config()).await;
    engine
        .add_to_cart(ProductId(42), 2, snapshot(100))
        .await
        .unwrap();
    let before = engine.lines();

    engine.update_quantity(LineId(-1), 9).await.unwrap();

    assert_eq!(engine.lines(), before);
}

#[tokio::test]
async fn remove_in_remote_mode_is_confirmed() {
    let store = FakeStore::with_lines(vec![remote_line(1, 42, 1, 100), remote_line(2, 7, 1, 5)]);
    let engine = CartEngine::start(store, fast_config()).await;

    let outcome = engine.remove_from_cart(LineId(1)).await;

    assert_eq!(outcome, SyncOutcome::Confirmed);
    let lines = engine.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].id(), LineId(2));
}

#[tokio::test]
async fn remove_failure_removes_locally_and_enters_local_mode() {
    let store = FakeStore::with_lines(vec![remote_line(1, 42, 1, 100)]);
    let engine = CartEngine::start(store, fast_config()).await;
    engine.store().mutate_down.store(true, Ordering::SeqCst);

    let outcome = engine.remove_from_cart(LineId(1)).await;

    assert_eq!(outcome, SyncOutcome::Local);
    assert_eq!(engine.mode(), Mode::Local);
    assert!(engine.lines().is_empty());
}

#[tokio::test]
async fn remove_of_unknown_line_is_a_no_op() {
    let engine = CartEngine::start(FakeStore::offline(), fast_config()).await;
    engine
        .add_to_cart(ProductId(42), 1, None)
        .await
        .unwrap();

    engine.remove_from_cart(LineId(-5)).await;

    assert_eq!(engine.lines().len(), 1);
}

// ---------------------------------------------------------------------------
// Clear
// ---------------------------------------------------------------------------

#[tokio::test]
async fn clear_cart_is_local_and_immediate() {
    let store = FakeStore::with_lines(vec![remote_line(1, 42, 2, 100)]);
    let engine = CartEngine::start(store, fast_config()).await;
    let (fetches, mutations) = (engine.store().fetches(), engine.store().mutations());

    engine.clear_cart();

    assert!(engine.lines().is_empty());
    assert_eq!(engine.total_items(), 0);
    assert_eq!(engine.total_price(), Decimal::ZERO);
    assert_eq!(engine.mode(), Mode::Remote);
    assert_eq!(engine.store().fetches(), fetches);
    assert_eq!(engine.store().mutations(), mutations);
}

// ---------------------------------------------------------------------------
// Timeouts, loading flag and ordering
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stalled_store_counts_as_unavailable() {
    let engine = CartEngine::new(
        FakeStore::online(),
        EngineConfig {
            remote_timeout: Duration::from_millis(50),
        },
    );
    engine.store().hang.store(true, Ordering::SeqCst);

    let outcome = engine
        .add_to_cart(ProductId(42), 1, snapshot(100))
        .await
        .unwrap();

    assert_eq!(outcome, SyncOutcome::Local);
    assert_eq!(engine.mode(), Mode::Local);
    assert!(
        engine.last_error().unwrap().contains("did not answer"),
        "expected timeout error"
    );
    assert!(!engine.is_loading());
}

#[tokio::test]
async fn is_loading_is_set_while_a_remote_call_is_in_flight() {
    let engine = CartEngine::start(FakeStore::online(), fast_config()).await;
    engine.store().delay_ms.store(60, Ordering::SeqCst);

    let probe = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        engine.is_loading()
    };
    let (outcome, loading_mid_flight) =
        futures::join!(engine.add_to_cart(ProductId(1), 1, None), probe);

    assert!(loading_mid_flight);
    assert_eq!(outcome.unwrap(), SyncOutcome::Confirmed);
    assert!(!engine.is_loading());
}

#[tokio::test]
async fn concurrent_mutations_are_serialized() {
    let engine = CartEngine::start(FakeStore::online(), fast_config()).await;
    engine.store().delay_ms.store(10, Ordering::SeqCst);
    engine.store().max_in_flight.store(0, Ordering::SeqCst);

    let (a, b, c) = futures::join!(
        engine.add_to_cart(ProductId(1), 1, None),
        engine.add_to_cart(ProductId(2), 1, None),
        engine.add_to_cart(ProductId(1), 2, None),
    );

    assert_eq!(a.unwrap(), SyncOutcome::Confirmed);
    assert_eq!(b.unwrap(), SyncOutcome::Confirmed);
    assert_eq!(c.unwrap(), SyncOutcome::Confirmed);
    assert_eq!(engine.store().max_in_flight.load(Ordering::SeqCst), 1);
    assert_eq!(engine.store().remote_quantity(ProductId(1)), Some(3));
    assert_eq!(engine.total_items(), 4);
}

#[tokio::test]
async fn reads_do_not_wait_for_in_flight_operations() {
    let engine = CartEngine::start(FakeStore::online(), fast_config()).await;
    engine.store().delay_ms.store(50, Ordering::SeqCst);

    let reader = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        let started = std::time::Instant::now();
        let _ = engine.view();
        started.elapsed()
    };
    let (_, read_took) = futures::join!(engine.refresh(), reader);

    assert!(read_took < Duration::from_millis(40), "read blocked for {read_took:?}");
}

// ---------------------------------------------------------------------------
// Reconcile
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reconcile_replays_local_lines_and_returns_to_remote() {
    let engine = CartEngine::start(FakeStore::offline(), fast_config()).await;
    engine
        .add_to_cart(ProductId(42), 2, snapshot(100))
        .await
        .unwrap();
    engine
        .add_to_cart(ProductId(7), 1, snapshot(5))
        .await
        .unwrap();

    engine.store().set_down(false);
    let report = engine.reconcile().await;

    assert_eq!(
        report,
        ReconcileReport {
            replayed: 2,
            pending: 0,
            mode: Mode::Remote,
        }
    );
    assert_eq!(engine.store().remote_quantity(ProductId(42)), Some(2));
    assert_eq!(engine.store().remote_quantity(ProductId(7)), Some(1));
    assert!(engine.lines().iter().all(|l| !l.is_local()));
    assert_eq!(engine.total_items(), 3);
}

#[tokio::test]
async fn reconcile_while_still_offline_changes_nothing() {
    let engine = CartEngine::start(FakeStore::offline(), fast_config()).await;
    engine
        .add_to_cart(ProductId(42), 1, None)
        .await
        .unwrap();
    let mutations_before = engine.store().mutations();

    let report = engine.reconcile().await;

    assert_eq!(report.mode, Mode::Local);
    assert_eq!(report.replayed, 0);
    assert_eq!(report.pending, 1);
    assert_eq!(engine.store().mutations(), mutations_before);
}

#[tokio::test]
async fn reconcile_keeps_lines_whose_replay_failed() {
    let engine = CartEngine::start(FakeStore::offline(), fast_config()).await;
    engine
        .add_to_cart(ProductId(42), 1, snapshot(100))
        .await
        .unwrap();
    engine
        .add_to_cart(ProductId(99), 1, snapshot(1))
        .await
        .unwrap();

    engine.store().set_down(false);
    *engine.store().reject_product.lock().unwrap() = Some(ProductId(99));
    let report = engine.reconcile().await;

    assert_eq!(report.replayed, 1);
    assert_eq!(report.pending, 1);
    assert_eq!(report.mode, Mode::Local);
    let lines = engine.lines();
    assert_eq!(lines.len(), 2);
    let kept = lines
        .iter()
        .find(|l| l.product_id() == ProductId(99))
        .unwrap();
    assert!(kept.is_local());
    assert!(lines
        .iter()
        .any(|l| l.product_id() == ProductId(42) && !l.is_local()));
}

#[tokio::test]
async fn reconcile_replays_offline_increment_of_remote_line() {
    let store = FakeStore::with_lines(vec![remote_line(5, 7, 1, 50)]);
    let engine = CartEngine::start(store, fast_config()).await;

    engine.store().set_down(true);
    let outcome = engine.add_to_cart(ProductId(7), 4, None).await.unwrap();
    assert_eq!(outcome, SyncOutcome::Local);
    assert_eq!(engine.total_price(), Decimal::from(250));

    engine.store().set_down(false);
    let report = engine.reconcile().await;

    assert_eq!(
        report,
        ReconcileReport {
            replayed: 1,
            pending: 0,
            mode: Mode::Remote,
        }
    );
    assert_eq!(engine.store().remote_quantity(ProductId(7)), Some(5));
    assert_eq!(engine.total_items(), 5);
    assert_eq!(engine.total_price(), Decimal::from(250));
}

#[tokio::test]
async fn reconcile_replays_offline_removal_of_remote_line() {
    let store = FakeStore::with_lines(vec![remote_line(5, 7, 1, 50), remote_line(6, 8, 1, 10)]);
    let engine = CartEngine::start(store, fast_config()).await;

    engine.store().set_down(true);
    assert_eq!(engine.remove_from_cart(LineId(5)).await, SyncOutcome::Local);

    engine.store().set_down(false);
    let report = engine.reconcile().await;

    assert_eq!(report.replayed, 1);
    assert_eq!(report.pending, 0);
    assert_eq!(report.mode, Mode::Remote);
    assert_eq!(engine.store().remote_quantity(ProductId(7)), None);
    let lines = engine.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].id(), LineId(6));
}

#[tokio::test]
async fn failed_quantity_replay_stays_pending_until_it_lands() {
    let store = FakeStore::with_lines(vec![remote_line(5, 7, 1, 50)]);
    let engine = CartEngine::start(store, fast_config()).await;

    engine.store().set_down(true);
    engine.update_quantity(LineId(5), 3).await.unwrap();

    engine.store().fetch_down.store(false, Ordering::SeqCst);
    let report = engine.reconcile().await;

    assert_eq!(report.replayed, 0);
    assert_eq!(report.pending, 1);
    assert_eq!(report.mode, Mode::Local);
    assert_eq!(engine.store().remote_quantity(ProductId(7)), Some(1));
    assert_eq!(engine.total_items(), 3, "offline edit stays visible");

    engine.store().mutate_down.store(false, Ordering::SeqCst);
    let report = engine.reconcile().await;

    assert_eq!(
        report,
        ReconcileReport {
            replayed: 1,
            pending: 0,
            mode: Mode::Remote,
        }
    );
    assert_eq!(engine.store().remote_quantity(ProductId(7)), Some(3));
    assert_eq!(engine.total_items(), 3);
}

#[tokio::test]
async fn clear_discards_offline_edits() {
    let store = FakeStore::with_lines(vec![remote_line(5, 7, 1, 50)]);
    let engine = CartEngine::start(store, fast_config()).await;

    engine.store().set_down(true);
    engine.update_quantity(LineId(5), 3).await.unwrap();
    engine.clear_cart();

    engine.store().set_down(false);
    let mutations_before = engine.store().mutations();
    let report = engine.reconcile().await;

    assert_eq!(report.replayed, 0);
    assert_eq!(report.pending, 0);
    assert_eq!(engine.store().mutations(), mutations_before);
    assert_eq!(engine.store().remote_quantity(ProductId(7)), Some(1));
}

#[tokio::test]
async fn reconcile_in_remote_mode_is_a_refresh() {
    let store = FakeStore::with_lines(vec![remote_line(1, 42, 1, 100)]);
    let engine = CartEngine::start(store, fast_config()).await;
    let mutations_before = engine.store().mutations();

    let report = engine.reconcile().await;

    assert_eq!(report.mode, Mode::Remote);
    assert_eq!(report.replayed, 0);
    assert_eq!(engine.store().mutations(), mutations_before);
}

// ---------------------------------------------------------------------------
// Change notifications
// ---------------------------------------------------------------------------

#[tokio::test]
async fn subscribers_observe_state_changes() {
    let engine = CartEngine::start(FakeStore::offline(), fast_config()).await;
    let mut rx = engine.subscribe();
    assert_eq!(rx.borrow().mode, Mode::Local);

    engine
        .add_to_cart(ProductId(42), 2, snapshot(100))
        .await
        .unwrap();

    assert!(rx.has_changed().unwrap());
    let view = rx.borrow_and_update().clone();
    assert_eq!(view.total_items(), 2);
    assert!(!view.is_loading);

    engine.clear_cart();
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().lines().is_empty());
}

#[test]
fn engine_config_reads_cart_timeout() {
    let config = AppConfig {
        api_url: "http://localhost:8000/api".to_string(),
        env: storefront_core::Environment::Test,
        log_level: "info".to_string(),
        request_timeout_secs: 10,
        user_agent: "ua".to_string(),
        max_retries: 2,
        retry_backoff_base_ms: 250,
        cart_timeout_ms: 1500,
        payment_method: "card".to_string(),
    };
    assert_eq!(
        EngineConfig::from_app_config(&config).remote_timeout,
        Duration::from_millis(1500)
    );
    assert_eq!(EngineConfig::default().remote_timeout, Duration::from_secs(5));
}
