//! The cart synchronization engine.
//!
//! Every mutation follows the same shape: attempt the remote store, reconcile
//! with a full re-fetch on success, and on any failure apply the equivalent
//! local mutation so the caller's action is still visible.
//!
//! Remote-facing operations are serialized through a single async gate, so
//! two quick clicks run one after the other instead of racing each other's
//! re-fetch. Reads never wait on that gate.

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rust_decimal::Decimal;
use storefront_core::{
    AppConfig, Cart, CartLine, CartView, LineId, Mode, ProductId, ProductSnapshot, Quantity,
    RemoteLine,
};
use tokio::sync::watch;

use crate::error::{CartError, StoreError};
use crate::local::{self, LocalIdGenerator};
use crate::store::RemoteCartStore;

const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Upper bound for one store call; expiry counts as a remote failure.
    pub remote_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            remote_timeout: Duration::from_millis(config.cart_timeout_ms),
        }
    }
}

/// How a mutation ended up being applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The store accepted the change and the cart was re-fetched from it.
    Confirmed,
    /// The change was applied to the local cart only.
    Local,
}

/// Result of [`CartEngine::reconcile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Offline changes successfully pushed to the remote store.
    pub replayed: usize,
    /// Offline changes the remote store has not seen yet: local lines plus
    /// edits and removals of remote lines.
    pub pending: usize,
    pub mode: Mode,
}

#[derive(Debug, Default)]
struct EngineState {
    cart: Cart,
    mode: Mode,
    is_loading: bool,
    last_error: Option<String>,
    ids: LocalIdGenerator,
    /// Quantities set offline on lines the remote store already holds.
    edits: BTreeMap<LineId, Quantity>,
    /// Remote lines removed offline.
    removals: BTreeSet<LineId>,
}

impl EngineState {
    fn view(&self) -> CartView {
        CartView {
            cart: self.cart.clone(),
            mode: self.mode,
            is_loading: self.is_loading,
            last_error: self.last_error.clone(),
        }
    }

    /// Records an offline change to `line_id` when it is a remote line.
    fn track_edit(&mut self, line_id: LineId) {
        if let Some(CartLine::Remote(line)) = self.cart.find_line(line_id) {
            let quantity = line.quantity;
            self.edits.insert(line_id, quantity);
        }
    }

    fn track_removal(&mut self, removed: Option<CartLine>) {
        if let Some(CartLine::Remote(line)) = removed {
            self.edits.remove(&line.id);
            self.removals.insert(line.id);
        }
    }

    fn pending_changes(&self) -> usize {
        self.cart.local_lines().count() + self.edits.len() + self.removals.len()
    }

    /// Replaces the cart with the remote one. Nothing offline survives.
    fn install_remote(&mut self, lines: Vec<RemoteLine>) {
        self.cart = Cart::from_lines(lines.into_iter().map(CartLine::Remote).collect());
        self.edits.clear();
        self.removals.clear();
    }
}

/// Owns the cart and decides whether the remote store or the local fallback
/// is the system of record.
///
/// Presentation code reads through [`CartEngine::view`] or
/// [`CartEngine::subscribe`] and mutates only through engine methods.
pub struct CartEngine<S> {
    store: S,
    config: EngineConfig,
    state: Mutex<EngineState>,
    gate: tokio::sync::Mutex<()>,
    updates: watch::Sender<CartView>,
}

impl<S: RemoteCartStore> CartEngine<S> {
    /// Creates an engine with an empty cart in remote mode, without touching
    /// the store. Most callers want [`CartEngine::start`].
    pub fn new(store: S, config: EngineConfig) -> Self {
        let (updates, _) = watch::channel(CartView::default());
        Self {
            store,
            config,
            state: Mutex::new(EngineState::default()),
            gate: tokio::sync::Mutex::new(()),
            updates,
        }
    }

    /// Creates an engine and performs the initial [`CartEngine::refresh`].
    pub async fn start(store: S, config: EngineConfig) -> Self {
        let engine = Self::new(store, config);
        engine.refresh().await;
        engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ----- reads -------------------------------------------------------

    /// Snapshot of the current cart, mode and loading state.
    pub fn view(&self) -> CartView {
        self.state().view()
    }

    /// Receiver that observes a fresh [`CartView`] after every state change.
    pub fn subscribe(&self) -> watch::Receiver<CartView> {
        self.updates.subscribe()
    }

    pub fn mode(&self) -> Mode {
        self.state().mode
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.state().last_error.clone()
    }

    pub fn lines(&self) -> Vec<CartLine> {
        self.state().cart.lines().to_vec()
    }

    pub fn total_items(&self) -> u64 {
        self.state().cart.total_items()
    }

    pub fn total_price(&self) -> Decimal {
        self.state().cart.total_price()
    }

    // ----- operations --------------------------------------------------

    /// Re-fetches the full cart from the store.
    ///
    /// On success the local cart is replaced wholesale and the mode returns to
    /// [`Mode::Remote`]. On failure the mode becomes [`Mode::Local`] and the
    /// cart is left as it was. Never fails to the caller; returns whether the
    /// store answered.
    pub async fn refresh(&self) -> bool {
        let _gate = self.gate.lock().await;
        let _loading = self.begin_loading();
        self.refresh_locked().await
    }

    /// Adds `quantity` of a product, merging into an existing line for it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for a zero quantity, before any
    /// state change. Remote failures are absorbed by the local fallback.
    pub async fn add_to_cart(
        &self,
        product_id: ProductId,
        quantity: u32,
        snapshot: Option<ProductSnapshot>,
    ) -> Result<SyncOutcome, CartError> {
        let quantity = Quantity::new(quantity).map_err(|_| CartError::InvalidQuantity(quantity))?;
        let _gate = self.gate.lock().await;
        let _loading = self.begin_loading();

        let mut accepted = false;
        if self.mode() == Mode::Remote {
            match self.call(self.store.add_item(product_id, quantity)).await {
                Ok(()) => {
                    if self.refresh_locked().await {
                        return Ok(SyncOutcome::Confirmed);
                    }
                    accepted = true;
                    tracing::warn!(%product_id, "add accepted remotely but resync failed, applying locally");
                }
                Err(err) => {
                    tracing::warn!(%product_id, error = %err, "add failed remotely, switching to local cart");
                    self.fall_back(&err);
                }
            }
        }

        self.update(|s| {
            let line_id = local::merge_add(&mut s.cart, &mut s.ids, product_id, quantity, snapshot);
            if !accepted {
                s.track_edit(line_id);
            }
        });
        Ok(SyncOutcome::Local)
    }

    /// Removes a line. Removing an unknown line is a no-op.
    pub async fn remove_from_cart(&self, line_id: LineId) -> SyncOutcome {
        let _gate = self.gate.lock().await;
        let _loading = self.begin_loading();

        let mut accepted = false;
        if self.mode() == Mode::Remote {
            match self.call(self.store.remove_item(line_id)).await {
                Ok(()) => {
                    if self.refresh_locked().await {
                        return SyncOutcome::Confirmed;
                    }
                    accepted = true;
                    tracing::warn!(%line_id, "remove accepted remotely but resync failed, applying locally");
                }
                Err(err) => {
                    tracing::warn!(%line_id, error = %err, "remove failed remotely, switching to local cart");
                    self.fall_back(&err);
                }
            }
        }

        self.update(|s| {
            let removed = s.cart.remove_line(line_id);
            if !accepted {
                s.track_removal(removed);
            }
        });
        SyncOutcome::Local
    }

    /// Sets the quantity of a line. An unknown line leaves the cart unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for zero; callers clamp or use
    /// [`CartEngine::remove_from_cart`] instead.
    pub async fn update_quantity(
        &self,
        line_id: LineId,
        quantity: u32,
    ) -> Result<SyncOutcome, CartError> {
        let quantity = Quantity::new(quantity).map_err(|_| CartError::InvalidQuantity(quantity))?;
        let _gate = self.gate.lock().await;
        let _loading = self.begin_loading();

        let mut accepted = false;
        if self.mode() == Mode::Remote {
            match self.call(self.store.update_item(line_id, quantity)).await {
                Ok(()) => {
                    if self.refresh_locked().await {
                        return Ok(SyncOutcome::Confirmed);
                    }
                    accepted = true;
                    tracing::warn!(%line_id, "update accepted remotely but resync failed, applying locally");
                }
                Err(err) => {
                    tracing::warn!(%line_id, error = %err, "update failed remotely, switching to local cart");
                    self.fall_back(&err);
                }
            }
        }

        self.update(|s| {
            if s.cart.set_quantity(line_id, quantity) && !accepted {
                s.track_edit(line_id);
            }
        });
        Ok(SyncOutcome::Local)
    }

    /// Empties the cart immediately. Local only; no remote call is made.
    /// Offline edits waiting for [`CartEngine::reconcile`] are dropped too.
    pub fn clear_cart(&self) {
        self.update(|s| {
            s.cart.clear();
            s.edits.clear();
            s.removals.clear();
        });
        tracing::debug!("cart cleared");
    }

    /// Runs `submit` against a snapshot of the cart while holding the
    /// operation gate, and clears the cart when it succeeds.
    ///
    /// No other engine operation can change the cart between the snapshot and
    /// the clear, so a line added concurrently is either part of the snapshot
    /// or added after the clear.
    ///
    /// # Errors
    ///
    /// Returns whatever `submit` returns; the cart is untouched in that case.
    pub async fn checkout_with<T, E, F, Fut>(&self, submit: F) -> Result<T, E>
    where
        F: FnOnce(Cart) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let _gate = self.gate.lock().await;
        let _loading = self.begin_loading();
        let cart = self.state().cart.clone();
        let result = submit(cart).await;
        if result.is_ok() {
            self.clear_cart();
        }
        result
    }

    /// Leaves local mode by pushing offline changes to the store.
    ///
    /// In remote mode this is a plain refresh. In local mode the store is
    /// probed first; if it answers, removals and quantity edits of remote
    /// lines are replayed, every local line is replayed as an add, and the
    /// cart is re-fetched. Changes whose replay failed are laid back on top of
    /// the fetched cart and the engine stays in local mode.
    pub async fn reconcile(&self) -> ReconcileReport {
        let _gate = self.gate.lock().await;
        let _loading = self.begin_loading();

        if self.mode() == Mode::Remote {
            self.refresh_locked().await;
            return self.report(0);
        }

        if let Err(err) = self.call(self.store.fetch_cart()).await {
            tracing::debug!(error = %err, "reconcile: remote cart still unavailable");
            self.update(|s| s.last_error = Some(err.to_string()));
            return self.report(0);
        }

        let (local_lines, edits, removals) = {
            let state = self.state();
            let lines: Vec<_> = state.cart.local_lines().cloned().collect();
            (lines, state.edits.clone(), state.removals.clone())
        };
        let mut replayed = 0;

        let mut failed_removals = BTreeSet::new();
        for line_id in removals {
            match self.call(self.store.remove_item(line_id)).await {
                Ok(()) => replayed += 1,
                Err(StoreError::InvalidInput(detail)) => {
                    tracing::debug!(%line_id, %detail, "reconcile: removed line already gone remotely");
                    replayed += 1;
                }
                Err(err) => {
                    tracing::warn!(%line_id, error = %err, "reconcile: removal replay failed");
                    failed_removals.insert(line_id);
                }
            }
        }

        let mut failed_edits = BTreeMap::new();
        for (line_id, quantity) in edits {
            match self.call(self.store.update_item(line_id, quantity)).await {
                Ok(()) => replayed += 1,
                Err(err) => {
                    tracing::warn!(%line_id, error = %err, "reconcile: quantity replay failed");
                    failed_edits.insert(line_id, quantity);
                }
            }
        }

        let mut pushed = Vec::new();
        let mut failed_lines = Vec::new();
        for line in local_lines {
            match self.call(self.store.add_item(line.product_id, line.quantity)).await {
                Ok(()) => pushed.push(line.id),
                Err(err) => {
                    tracing::warn!(line_id = %line.id, error = %err, "reconcile: replay failed, keeping line local");
                    failed_lines.push(line);
                }
            }
        }
        replayed += pushed.len();

        match self.call(self.store.fetch_cart()).await {
            Ok(lines) => self.update(|s| {
                s.install_remote(lines);
                // Edits and removals of lines the store no longer holds have
                // nothing left to apply to.
                failed_edits.retain(|id, quantity| s.cart.set_quantity(*id, *quantity));
                failed_removals.retain(|id| s.cart.remove_line(*id).is_some());
                s.edits = failed_edits;
                s.removals = failed_removals;
                for line in failed_lines {
                    let line_id = local::restore_line(&mut s.cart, &mut s.ids, line);
                    s.track_edit(line_id);
                }
                if s.pending_changes() == 0 {
                    s.mode = Mode::Remote;
                    s.last_error = None;
                }
            }),
            Err(err) => {
                // Replayed changes now exist remotely; forget them so a later
                // reconcile does not apply them twice.
                tracing::warn!(error = %err, replayed, "reconcile: resync after replay failed");
                self.update(|s| {
                    for id in &pushed {
                        s.cart.remove_line(*id);
                    }
                    s.edits = failed_edits;
                    s.removals = failed_removals;
                    s.last_error = Some(err.to_string());
                });
            }
        }

        let report = self.report(replayed);
        tracing::info!(
            replayed = report.replayed,
            pending = report.pending,
            mode = %report.mode,
            "reconcile finished"
        );
        report
    }

    // ----- internals ---------------------------------------------------

    /// Fetches and installs the remote cart. Caller must hold the gate.
    async fn refresh_locked(&self) -> bool {
        match self.call(self.store.fetch_cart()).await {
            Ok(lines) => {
                let count = lines.len();
                self.update(|s| {
                    s.install_remote(lines);
                    if s.mode == Mode::Local {
                        tracing::info!("remote cart reachable again, leaving local mode");
                    }
                    s.mode = Mode::Remote;
                    s.last_error = None;
                });
                tracing::debug!(lines = count, "cart refreshed from remote store");
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "cart refresh failed, using local cart");
                self.fall_back(&err);
                false
            }
        }
    }

    /// Bounds a store call by the configured timeout.
    async fn call<T>(
        &self,
        fut: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        tokio::time::timeout(self.config.remote_timeout, fut)
            .await
            .unwrap_or(Err(StoreError::TimedOut(self.config.remote_timeout)))
    }

    /// Enters local mode after a failed store call.
    fn fall_back(&self, err: &StoreError) {
        self.update(|s| {
            s.mode = Mode::Local;
            s.last_error = Some(err.to_string());
        });
    }

    fn report(&self, replayed: usize) -> ReconcileReport {
        let state = self.state();
        ReconcileReport {
            replayed,
            pending: state.pending_changes(),
            mode: state.mode,
        }
    }

    fn begin_loading(&self) -> LoadingGuard<'_, S> {
        self.update(|s| s.is_loading = true);
        LoadingGuard { engine: self }
    }

    fn state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `f` to the state and publishes the resulting view.
    fn update<F: FnOnce(&mut EngineState)>(&self, f: F) {
        let view = {
            let mut state = self.state();
            f(&mut state);
            state.view()
        };
        self.updates.send_replace(view);
    }
}

/// Clears `is_loading` when an operation ends, including when its future is
/// dropped mid-flight.
struct LoadingGuard<'a, S: RemoteCartStore> {
    engine: &'a CartEngine<S>,
}

impl<S: RemoteCartStore> Drop for LoadingGuard<'_, S> {
    fn drop(&mut self) {
        self.engine.update(|s| s.is_loading = false);
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
