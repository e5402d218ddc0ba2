//! # Cart State Store
//!
//! Single source of truth for the page's cart.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           CartStore::add                                │
//! │                                                                         │
//! │  busy? ──yes──► Skipped(Busy)          (dropped, never queued)          │
//! │    │ no                                                                 │
//! │  validate ──err──► error! + Skipped(Invalid)   (no request)             │
//! │    │                                                                    │
//! │  BusyGuard::try_acquire ─► control loading on                           │
//! │    │                                                                    │
//! │  gateway.add_line ──err──► notify(AddFailed) ──► Failed                 │
//! │    │ ok                                                                 │
//! │  last_added = variant ─► fetch_cart ─► publish ─► notify(AddedToCart)   │
//! │    │                                          ─► open_drawer            │
//! │    ▼                                                                    │
//! │  Applied       (guards drop: loading off, busy cleared on every path)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store never hands an error to its caller. Outcomes are reported as
//! [`MutationOutcome`] and effects go out through a [`CartEventSink`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, error, info, warn};

use beautican_core::i18n::keys;
use beautican_core::validation::check_add_quantity;
use beautican_core::{CartSnapshot, ControlId, LineKey, ValidationError, VariantId};

use crate::gateway::CartGateway;
use crate::notify::NotificationKind;

// =============================================================================
// Events
// =============================================================================

/// A user-facing message the store asks the page to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    AddedToCart,
    AddFailed,
    UpdateFailed,
}

impl Notice {
    /// Translation key of the message.
    pub fn key(&self) -> &'static str {
        match self {
            Notice::AddedToCart => keys::CART_ADDED,
            Notice::AddFailed => keys::CART_ADD_ERROR,
            Notice::UpdateFailed => keys::CART_UPDATE_ERROR,
        }
    }

    pub fn kind(&self) -> NotificationKind {
        match self {
            Notice::AddedToCart => NotificationKind::Success,
            Notice::AddFailed | Notice::UpdateFailed => NotificationKind::Error,
        }
    }
}

/// Trait for receiving store effects (render, loading state, drawer, toasts).
pub trait CartEventSink: Send + Sync {
    /// A new authoritative snapshot replaced the old one.
    fn cart_updated(&self, snapshot: &CartSnapshot, last_added: Option<VariantId>);

    /// The triggering control entered or left its loading state.
    fn control_loading(&self, control: &ControlId, loading: bool);

    /// The drawer should open.
    fn open_drawer(&self);

    /// A notification should be shown.
    fn notify(&self, notice: Notice);
}

/// No-op event sink for testing.
pub struct NoOpSink;

impl CartEventSink for NoOpSink {
    fn cart_updated(&self, _snapshot: &CartSnapshot, _last_added: Option<VariantId>) {}
    fn control_loading(&self, _control: &ControlId, _loading: bool) {}
    fn open_drawer(&self) {}
    fn notify(&self, _notice: Notice) {}
}

// =============================================================================
// Outcomes
// =============================================================================

/// Why an operation issued no request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another mutation is in flight.
    Busy,
    /// Input failed validation.
    Invalid,
    /// No snapshot has been loaded yet.
    NoSnapshot,
    /// The line key is not in the current snapshot.
    UnknownLine,
    /// The change would take the quantity below zero.
    BelowZero,
}

/// Observable result of a store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The request succeeded and the snapshot was replaced.
    Applied,
    /// No request was made.
    Skipped(SkipReason),
    /// The request failed; the snapshot is unchanged.
    Failed,
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied)
    }
}

// =============================================================================
// Guards
// =============================================================================

/// Holds the busy flag; clears it when dropped.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Keeps a control in its loading state until dropped.
struct LoadingGuard<'a> {
    sink: &'a dyn CartEventSink,
    control: &'a ControlId,
}

impl<'a> LoadingGuard<'a> {
    fn start(sink: &'a dyn CartEventSink, control: &'a ControlId) -> Self {
        sink.control_loading(control, true);
        LoadingGuard { sink, control }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.sink.control_loading(self.control, false);
    }
}

// =============================================================================
// Cart Store
// =============================================================================

/// Holds the cart snapshot and serializes mutations against the backend.
pub struct CartStore {
    gateway: Arc<dyn CartGateway>,
    sink: Arc<dyn CartEventSink>,
    snapshot: RwLock<Option<CartSnapshot>>,
    last_added: Mutex<Option<VariantId>>,
    busy: AtomicBool,
}

impl CartStore {
    /// Creates a store with a no-op sink.
    pub fn new(gateway: Arc<dyn CartGateway>) -> Self {
        Self::with_sink(gateway, Arc::new(NoOpSink))
    }

    /// Creates a store with a custom event sink.
    pub fn with_sink(gateway: Arc<dyn CartGateway>, sink: Arc<dyn CartEventSink>) -> Self {
        CartStore {
            gateway,
            sink,
            snapshot: RwLock::new(None),
            last_added: Mutex::new(None),
            busy: AtomicBool::new(false),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The last server-confirmed snapshot, if any was loaded.
    pub fn snapshot(&self) -> Option<CartSnapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_added(&self) -> Option<VariantId> {
        *self.last_added.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn clear_last_added(&self) {
        self.set_last_added(None);
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn set_last_added(&self, variant_id: Option<VariantId>) {
        *self.last_added.lock().unwrap_or_else(PoisonError::into_inner) = variant_id;
    }

    /// Replaces the snapshot wholesale and emits `cart_updated`.
    fn publish(&self, snapshot: CartSnapshot) {
        debug!(
            item_count = snapshot.item_count,
            total = snapshot.total_price.cents(),
            lines = snapshot.items.len(),
            "cart snapshot replaced"
        );
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        self.sink.cart_updated(&snapshot, self.last_added());
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Fetches the cart and replaces the snapshot.
    ///
    /// Skipped while a mutation is in flight. Failures are logged and leave
    /// the previous snapshot in place.
    pub async fn load(&self) -> MutationOutcome {
        if self.is_busy() {
            debug!("cart load skipped, mutation in flight");
            return MutationOutcome::Skipped(SkipReason::Busy);
        }

        match self.gateway.fetch_cart().await {
            Ok(snapshot) => {
                info!(item_count = snapshot.item_count, "cart loaded");
                self.publish(snapshot);
                MutationOutcome::Applied
            }
            Err(e) => {
                warn!(error = %e, endpoint = e.endpoint(), "failed to load cart");
                MutationOutcome::Failed
            }
        }
    }

    /// Adds units of a variant, then refreshes and opens the drawer.
    pub async fn add(
        &self,
        variant_id: Option<VariantId>,
        quantity: u32,
        control: Option<ControlId>,
    ) -> MutationOutcome {
        if self.is_busy() {
            debug!(?variant_id, "add skipped, mutation in flight");
            return MutationOutcome::Skipped(SkipReason::Busy);
        }

        let (variant_id, quantity) = match validate_add(variant_id, quantity) {
            Ok(valid) => valid,
            Err(e) => {
                error!(error = %e, "add to cart rejected");
                return MutationOutcome::Skipped(SkipReason::Invalid);
            }
        };

        let Some(_busy) = BusyGuard::try_acquire(&self.busy) else {
            return MutationOutcome::Skipped(SkipReason::Busy);
        };
        let _loading = control
            .as_ref()
            .map(|control| LoadingGuard::start(self.sink.as_ref(), control));

        debug!(%variant_id, quantity, "adding to cart");
        match self.gateway.add_line(variant_id, quantity).await {
            Ok(()) => {
                self.set_last_added(Some(variant_id));
                self.refresh().await;
                info!(%variant_id, quantity, "added to cart");
                self.sink.notify(Notice::AddedToCart);
                self.sink.open_drawer();
                MutationOutcome::Applied
            }
            Err(e) => {
                error!(error = %e, %variant_id, retryable = e.is_retryable(), "add to cart failed");
                self.sink.notify(Notice::AddFailed);
                MutationOutcome::Failed
            }
        }
    }

    /// Re-fetch after a successful add. Runs under the caller's busy guard.
    async fn refresh(&self) {
        match self.gateway.fetch_cart().await {
            Ok(snapshot) => self.publish(snapshot),
            Err(e) => warn!(error = %e, "cart refresh after add failed"),
        }
    }

    /// Changes a line's quantity by `delta`.
    ///
    /// A result of zero removes the line; a negative result is ignored.
    pub async fn change_quantity_by(&self, line_key: &LineKey, delta: i64) -> MutationOutcome {
        if self.is_busy() {
            debug!(%line_key, delta, "quantity change skipped, mutation in flight");
            return MutationOutcome::Skipped(SkipReason::Busy);
        }

        let current = {
            let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
            let Some(snapshot) = guard.as_ref() else {
                return MutationOutcome::Skipped(SkipReason::NoSnapshot);
            };
            match snapshot.line(line_key) {
                Some(line) => line.quantity,
                None => {
                    debug!(%line_key, "quantity change for unknown line");
                    return MutationOutcome::Skipped(SkipReason::UnknownLine);
                }
            }
        };

        let target = i64::from(current) + delta;
        if target < 0 {
            return MutationOutcome::Skipped(SkipReason::BelowZero);
        }
        if target == 0 {
            return self.remove(line_key).await;
        }
        let Ok(target) = u32::try_from(target) else {
            return MutationOutcome::Skipped(SkipReason::Invalid);
        };

        self.apply_change(line_key, target).await
    }

    pub async fn increase(&self, line_key: &LineKey) -> MutationOutcome {
        self.change_quantity_by(line_key, 1).await
    }

    pub async fn decrease(&self, line_key: &LineKey) -> MutationOutcome {
        self.change_quantity_by(line_key, -1).await
    }

    /// Removes a line by setting its quantity to zero.
    pub async fn remove(&self, line_key: &LineKey) -> MutationOutcome {
        if self.is_busy() {
            debug!(%line_key, "remove skipped, mutation in flight");
            return MutationOutcome::Skipped(SkipReason::Busy);
        }
        self.apply_change(line_key, 0).await
    }

    async fn apply_change(&self, line_key: &LineKey, quantity: u32) -> MutationOutcome {
        let Some(_busy) = BusyGuard::try_acquire(&self.busy) else {
            return MutationOutcome::Skipped(SkipReason::Busy);
        };

        debug!(%line_key, quantity, "changing cart line");
        match self.gateway.change_line(line_key, quantity).await {
            Ok(snapshot) => {
                self.publish(snapshot);
                MutationOutcome::Applied
            }
            Err(e) => {
                error!(error = %e, %line_key, quantity, "cart line change failed");
                self.sink.notify(Notice::UpdateFailed);
                MutationOutcome::Failed
            }
        }
    }
}

fn validate_add(variant_id: Option<VariantId>, quantity: u32) -> Result<(VariantId, u32), ValidationError> {
    let variant_id = variant_id.ok_or_else(|| ValidationError::Required {
        field: "variant_id".to_string(),
    })?;
    Ok((variant_id, check_add_quantity(quantity)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::gateway::{CartPayload, GatewayCall, GatewayOp, MemoryCartGateway, CHANGE_PATH};
    use async_trait::async_trait;
    use tokio::sync::Notify;

    // =========================================================================
    // Test doubles
    // =========================================================================

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Updated(u32, Option<VariantId>),
        Loading(String, bool),
        OpenDrawer,
        Notice(Notice),
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<Event>>,
    }

    impl RecordingSink {
        fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }
    }

    impl CartEventSink for RecordingSink {
        fn cart_updated(&self, snapshot: &CartSnapshot, last_added: Option<VariantId>) {
            self.events
                .lock()
                .unwrap()
                .push(Event::Updated(snapshot.item_count, last_added));
        }
        fn control_loading(&self, control: &ControlId, loading: bool) {
            self.events
                .lock()
                .unwrap()
                .push(Event::Loading(control.as_str().to_string(), loading));
        }
        fn open_drawer(&self) {
            self.events.lock().unwrap().push(Event::OpenDrawer);
        }
        fn notify(&self, notice: Notice) {
            self.events.lock().unwrap().push(Event::Notice(notice));
        }
    }

    /// Serves fetches from an inner gateway, fails every mutation.
    struct FailingGateway {
        inner: MemoryCartGateway,
    }

    #[async_trait]
    impl CartGateway for FailingGateway {
        async fn fetch_cart(&self) -> Result<CartSnapshot, TransportError> {
            self.inner.fetch_cart().await
        }
        async fn add_line(&self, _variant_id: VariantId, _quantity: u32) -> Result<(), TransportError> {
            Err(TransportError::Network {
                endpoint: "/cart/add.js".into(),
                message: "connection reset".into(),
            })
        }
        async fn change_line(&self, _line_key: &LineKey, _quantity: u32) -> Result<CartSnapshot, TransportError> {
            Err(TransportError::Status {
                endpoint: "/cart/change.js".into(),
                status: 500,
            })
        }
    }

    /// Holds mutations until released.
    struct GatedGateway {
        inner: MemoryCartGateway,
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl CartGateway for GatedGateway {
        async fn fetch_cart(&self) -> Result<CartSnapshot, TransportError> {
            self.inner.fetch_cart().await
        }
        async fn add_line(&self, variant_id: VariantId, quantity: u32) -> Result<(), TransportError> {
            self.entered.notify_one();
            self.release.notified().await;
            self.inner.add_line(variant_id, quantity).await
        }
        async fn change_line(&self, line_key: &LineKey, quantity: u32) -> Result<CartSnapshot, TransportError> {
            self.entered.notify_one();
            self.release.notified().await;
            self.inner.change_line(line_key, quantity).await
        }
    }

    /// Answers changes with a cart-level discount of 10.00 off the line sum.
    struct DiscountingGateway {
        inner: MemoryCartGateway,
    }

    #[async_trait]
    impl CartGateway for DiscountingGateway {
        async fn fetch_cart(&self) -> Result<CartSnapshot, TransportError> {
            self.inner.fetch_cart().await
        }
        async fn add_line(&self, variant_id: VariantId, quantity: u32) -> Result<(), TransportError> {
            self.inner.add_line(variant_id, quantity).await
        }
        async fn change_line(&self, line_key: &LineKey, quantity: u32) -> Result<CartSnapshot, TransportError> {
            let cart = self.inner.change_line(line_key, quantity).await?;
            let items: Vec<_> = cart
                .items
                .iter()
                .map(|i| {
                    serde_json::json!({
                        "key": i.key.as_str(),
                        "variant_id": i.variant_id.get(),
                        "quantity": i.quantity,
                        "final_line_price": i.line_price.cents(),
                    })
                })
                .collect();
            let body = serde_json::json!({
                "item_count": cart.item_count,
                "total_price": cart.total_price.cents() - 1000,
                "items": items,
            });
            let payload: CartPayload = serde_json::from_value(body).unwrap();
            payload.into_snapshot(CHANGE_PATH)
        }
    }

    fn vid(id: u64) -> VariantId {
        VariantId::new(id).unwrap()
    }

    async fn seeded(lines: &[(u64, u32)]) -> MemoryCartGateway {
        let gateway = MemoryCartGateway::demo();
        for &(variant, quantity) in lines {
            gateway.add_line(vid(variant), quantity).await.unwrap();
        }
        gateway
    }

    fn store_with(gateway: Arc<dyn CartGateway>) -> (CartStore, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        (CartStore::with_sink(gateway, sink.clone()), sink)
    }

    // =========================================================================
    // Tests
    // =========================================================================

    #[tokio::test]
    async fn test_load_replaces_snapshot() {
        let (store, sink) = store_with(Arc::new(seeded(&[(501, 2)]).await));
        assert!(store.snapshot().is_none());

        assert_eq!(store.load().await, MutationOutcome::Applied);
        assert_eq!(store.snapshot().unwrap().item_count, 2);
        assert_eq!(sink.events(), vec![Event::Updated(2, None)]);
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_snapshot() {
        let gateway = Arc::new(seeded(&[(501, 1)]).await);
        let (store, _sink) = store_with(gateway.clone());
        store.load().await;

        gateway.fail_next(GatewayOp::FetchCart, 503);
        assert_eq!(store.load().await, MutationOutcome::Failed);
        assert_eq!(store.snapshot().unwrap().item_count, 1);
        assert!(!store.is_busy());
    }

    #[tokio::test]
    async fn test_add_success_opens_drawer_and_marks_variant() {
        let (store, sink) = store_with(Arc::new(MemoryCartGateway::demo()));
        store.load().await;

        let outcome = store
            .add(Some(vid(501)), 1, Some(ControlId::new("btn-501")))
            .await;

        assert_eq!(outcome, MutationOutcome::Applied);
        let snapshot = store.snapshot().unwrap();
        assert!(snapshot.contains_variant(vid(501)));
        assert_eq!(store.last_added(), Some(vid(501)));
        assert!(!store.is_busy());
        assert_eq!(
            sink.events(),
            vec![
                Event::Updated(0, None),
                Event::Loading("btn-501".into(), true),
                Event::Updated(1, Some(vid(501))),
                Event::Notice(Notice::AddedToCart),
                Event::OpenDrawer,
                Event::Loading("btn-501".into(), false),
            ]
        );
    }

    #[tokio::test]
    async fn test_add_failure_leaves_snapshot_and_drawer() {
        let inner = seeded(&[(502, 1)]).await;
        let (store, sink) = store_with(Arc::new(FailingGateway { inner }));
        store.load().await;
        let before = store.snapshot();

        let outcome = store
            .add(Some(vid(501)), 1, Some(ControlId::new("btn")))
            .await;

        assert_eq!(outcome, MutationOutcome::Failed);
        assert!(!store.is_busy());
        assert_eq!(store.snapshot(), before);
        assert_eq!(store.last_added(), None);
        let events = sink.events();
        assert!(events.contains(&Event::Notice(Notice::AddFailed)));
        assert!(!events.contains(&Event::OpenDrawer));
        assert_eq!(events.last(), Some(&Event::Loading("btn".into(), false)));
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_input_without_request() {
        let gateway = Arc::new(MemoryCartGateway::demo());
        let (store, sink) = store_with(gateway.clone());

        assert_eq!(
            store.add(None, 1, None).await,
            MutationOutcome::Skipped(SkipReason::Invalid)
        );
        assert_eq!(
            store.add(Some(vid(501)), 0, None).await,
            MutationOutcome::Skipped(SkipReason::Invalid)
        );
        assert!(gateway.calls().is_empty());
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn test_large_add_quantity_is_left_to_the_backend() {
        let gateway = Arc::new(MemoryCartGateway::demo());
        let (store, sink) = store_with(gateway.clone());
        store.load().await;

        assert_eq!(store.add(Some(vid(503)), 2500, None).await, MutationOutcome::Applied);
        assert_eq!(store.snapshot().unwrap().quantity_of(vid(503)), 2500);
        assert!(gateway.calls().contains(&GatewayCall::AddLine {
            variant_id: vid(503),
            quantity: 2500
        }));

        gateway.fail_next(GatewayOp::AddLine, 422);
        assert_eq!(store.add(Some(vid(503)), 100_000, None).await, MutationOutcome::Failed);
        assert!(sink.events().contains(&Event::Notice(Notice::AddFailed)));
    }

    #[tokio::test]
    async fn test_decrease_to_zero_issues_single_remove() {
        let gateway = Arc::new(seeded(&[(501, 1)]).await);
        let (store, _sink) = store_with(gateway.clone());
        store.load().await;
        let key = store.snapshot().unwrap().items[0].key.clone();

        assert_eq!(store.decrease(&key).await, MutationOutcome::Applied);

        let changes: Vec<_> = gateway
            .calls()
            .into_iter()
            .filter(|c| matches!(c, GatewayCall::ChangeLine { .. }))
            .collect();
        assert_eq!(
            changes,
            vec![GatewayCall::ChangeLine {
                line_key: key.clone(),
                quantity: 0
            }]
        );
        assert!(store.snapshot().unwrap().line(&key).is_none());
    }

    #[tokio::test]
    async fn test_change_below_zero_is_ignored() {
        let gateway = Arc::new(seeded(&[(501, 1)]).await);
        let (store, _sink) = store_with(gateway.clone());
        store.load().await;
        let key = store.snapshot().unwrap().items[0].key.clone();
        let calls_before = gateway.calls().len();

        assert_eq!(
            store.change_quantity_by(&key, -2).await,
            MutationOutcome::Skipped(SkipReason::BelowZero)
        );
        assert_eq!(gateway.calls().len(), calls_before);
    }

    #[tokio::test]
    async fn test_increase_updates_totals_consistently() {
        let gateway = Arc::new(seeded(&[(501, 1), (502, 2)]).await);
        let (store, _sink) = store_with(gateway);
        store.load().await;
        let key = store.snapshot().unwrap().items[1].key.clone();

        assert_eq!(store.increase(&key).await, MutationOutcome::Applied);
        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.line(&key).unwrap().quantity, 3);
        assert_eq!(snapshot.item_count, 4);
        assert!(snapshot.validate().is_ok());
    }

    #[tokio::test]
    async fn test_discounted_change_is_applied_with_reported_total() {
        let inner = seeded(&[(501, 1)]).await;
        let (store, sink) = store_with(Arc::new(DiscountingGateway { inner }));
        store.load().await;
        let key = store.snapshot().unwrap().items[0].key.clone();

        assert_eq!(store.increase(&key).await, MutationOutcome::Applied);
        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.line(&key).unwrap().quantity, 2);
        assert_eq!(snapshot.items[0].line_price.cents(), 9000);
        assert_eq!(snapshot.total_price.cents(), 8000);
        assert!(!sink.events().contains(&Event::Notice(Notice::UpdateFailed)));
    }

    #[tokio::test]
    async fn test_change_without_snapshot_or_line_is_skipped() {
        let (store, _sink) = store_with(Arc::new(MemoryCartGateway::demo()));
        let key = LineKey::new("missing");
        assert_eq!(
            store.increase(&key).await,
            MutationOutcome::Skipped(SkipReason::NoSnapshot)
        );
        store.load().await;
        assert_eq!(
            store.increase(&key).await,
            MutationOutcome::Skipped(SkipReason::UnknownLine)
        );
    }

    #[tokio::test]
    async fn test_change_failure_notifies_and_clears_busy() {
        let inner = seeded(&[(501, 2)]).await;
        let (store, sink) = store_with(Arc::new(FailingGateway { inner }));
        store.load().await;
        let key = store.snapshot().unwrap().items[0].key.clone();

        assert_eq!(store.remove(&key).await, MutationOutcome::Failed);
        assert!(!store.is_busy());
        assert_eq!(store.snapshot().unwrap().item_count, 2);
        assert!(sink.events().contains(&Event::Notice(Notice::UpdateFailed)));
    }

    #[tokio::test]
    async fn test_calls_while_busy_are_dropped() {
        let gateway = Arc::new(GatedGateway {
            inner: seeded(&[(501, 1)]).await,
            entered: Notify::new(),
            release: Notify::new(),
        });
        let store = Arc::new(CartStore::new(gateway.clone()));
        store.load().await;
        let key = store.snapshot().unwrap().items[0].key.clone();

        let in_flight = {
            let store = store.clone();
            let key = key.clone();
            tokio::spawn(async move { store.increase(&key).await })
        };
        gateway.entered.notified().await;
        assert!(store.is_busy());

        assert_eq!(
            store.increase(&key).await,
            MutationOutcome::Skipped(SkipReason::Busy)
        );
        assert_eq!(
            store.add(Some(vid(502)), 1, None).await,
            MutationOutcome::Skipped(SkipReason::Busy)
        );
        assert_eq!(store.load().await, MutationOutcome::Skipped(SkipReason::Busy));

        gateway.release.notify_one();
        assert_eq!(in_flight.await.unwrap(), MutationOutcome::Applied);
        assert!(!store.is_busy());

        // Rapid double click: one increment, not two.
        assert_eq!(store.snapshot().unwrap().line(&key).unwrap().quantity, 2);
        let changes = gateway
            .inner
            .calls()
            .into_iter()
            .filter(|c| matches!(c, GatewayCall::ChangeLine { .. }))
            .count();
        assert_eq!(changes, 1);
    }

    #[test]
    fn test_notice_keys_and_kinds() {
        assert_eq!(Notice::AddedToCart.key(), "cart.addedToCart");
        assert_eq!(Notice::AddedToCart.kind(), NotificationKind::Success);
        assert_eq!(Notice::UpdateFailed.kind(), NotificationKind::Error);
    }
}
