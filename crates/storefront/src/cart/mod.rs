//! The cart store: canonical in-memory cart plus persistence.
//!
//! [`CartStore`] owns the current [`Cart`] and is the only place it changes.
//! Every mutation follows the same sequence:
//!
//! 1. build the complete next cart (lines and both aggregates)
//! 2. publish it to subscribers as an immutable `Arc<Cart>` snapshot
//! 3. write it through [`CartPersistence`]
//!
//! Mutations that leave the cart unchanged skip steps 2 and 3, except
//! [`CartStore::clear_cart`], which always overwrites the stored cart.
//!
//! The store is a plain value with `&mut self` mutations. Share it behind a
//! lock (see [`crate::state::AppState`]) and hold the lock for one call at a
//! time. Relative changes should use [`CartStore::adjust_quantity`] so the
//! read and write happen under the same lock.

mod persistence;

pub use persistence::{CART_STORAGE_KEY, CartPersistence, LocalCartPersistence};

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};
use vitrine_core::{Cart, Product, ProductId};

/// Owner of the canonical cart.
pub struct CartStore {
    cart: Arc<Cart>,
    persistence: Box<dyn CartPersistence>,
    snapshots: watch::Sender<Arc<Cart>>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("subscribers", &self.snapshots.receiver_count())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Open the store, restoring the persisted cart if there is a valid one.
    ///
    /// Nothing is written during startup.
    pub fn open(persistence: impl CartPersistence + 'static) -> Self {
        let cart = persistence.load().unwrap_or_default();
        info!(
            lines = cart.len(),
            total_items = cart.total_items(),
            "cart store opened"
        );

        let cart = Arc::new(cart);
        let (snapshots, _) = watch::channel(Arc::clone(&cart));
        Self {
            cart,
            persistence: Box::new(persistence),
            snapshots,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The current snapshot.
    #[must_use]
    pub fn cart(&self) -> Arc<Cart> {
        Arc::clone(&self.cart)
    }

    /// Receive every future snapshot.
    ///
    /// The receiver starts at the current snapshot and always holds a
    /// complete cart; intermediate snapshots may be skipped by slow readers.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Cart>> {
        self.snapshots.subscribe()
    }

    /// Quantity of `product_id` in the cart, or 0.
    #[must_use]
    pub fn item_quantity(&self, product_id: ProductId) -> u32 {
        self.cart.item_quantity(product_id)
    }

    /// Whether `product_id` has a line in the cart.
    #[must_use]
    pub fn is_in_cart(&self, product_id: ProductId) -> bool {
        self.cart.contains(product_id)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` units of `product`.
    ///
    /// A product with a negative price or an out-of-range rating is refused
    /// and the cart is left as it was.
    pub fn add_to_cart(&mut self, product: &Product, quantity: u32) -> Arc<Cart> {
        if !product.is_well_formed() {
            warn!(product_id = %product.id, "Refusing malformed product");
            return self.cart();
        }
        self.commit("add_to_cart", |cart| cart.add(product, quantity))
    }

    /// Add a single unit of `product`.
    pub fn add_one(&mut self, product: &Product) -> Arc<Cart> {
        self.add_to_cart(product, 1)
    }

    /// Remove the line for `product_id`, if any.
    pub fn remove_from_cart(&mut self, product_id: ProductId) -> Arc<Cart> {
        self.commit("remove_from_cart", |cart| cart.remove(product_id))
    }

    /// Set the quantity of `product_id`; zero or below removes the line.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> Arc<Cart> {
        self.commit("update_quantity", |cart| {
            cart.set_quantity(product_id, quantity)
        })
    }

    /// Change the quantity of `product_id` by `delta` against the current
    /// value.
    pub fn adjust_quantity(&mut self, product_id: ProductId, delta: i64) -> Arc<Cart> {
        self.commit("adjust_quantity", |cart| {
            cart.adjust_quantity(product_id, delta)
        })
    }

    /// Empty the cart and overwrite the stored copy.
    pub fn clear_cart(&mut self) -> Arc<Cart> {
        self.commit("clear_cart", |cart| {
            cart.clear();
            true
        })
    }

    /// Apply `mutate` to a copy of the cart; publish and persist when it
    /// reports a change.
    fn commit(&mut self, operation: &str, mutate: impl FnOnce(&mut Cart) -> bool) -> Arc<Cart> {
        let mut next = Cart::clone(&self.cart);
        if !mutate(&mut next) {
            debug!(operation, "cart unchanged");
            return self.cart();
        }

        self.cart = Arc::new(next);
        self.snapshots.send_replace(Arc::clone(&self.cart));
        self.persistence.save(&self.cart);

        debug!(
            operation,
            lines = self.cart.len(),
            total_items = self.cart.total_items(),
            "cart updated"
        );
        self.cart()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Mutex;

    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use vitrine_core::Rating;

    use super::*;
    use crate::storage::{KeyValueStorage, MemoryStorage};

    /// Records every save so tests can assert on write counts.
    #[derive(Default, Clone)]
    struct RecordingPersistence {
        stored: Arc<Mutex<Option<Cart>>>,
        saves: Arc<Mutex<usize>>,
    }

    impl RecordingPersistence {
        fn with_cart(cart: Cart) -> Self {
            let persistence = Self::default();
            *persistence.stored.lock().unwrap() = Some(cart);
            persistence
        }

        fn saves(&self) -> usize {
            *self.saves.lock().unwrap()
        }

        fn stored(&self) -> Option<Cart> {
            self.stored.lock().unwrap().clone()
        }
    }

    impl CartPersistence for RecordingPersistence {
        fn load(&self) -> Option<Cart> {
            self.stored()
        }

        fn save(&self, cart: &Cart) {
            *self.stored.lock().unwrap() = Some(cart.clone());
            *self.saves.lock().unwrap() += 1;
        }
    }

    fn product(id: i32, price: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: price.parse().unwrap(),
            description: String::new(),
            category: "men's clothing".to_string(),
            image: format!("https://fakestoreapi.com/img/{id}.jpg"),
            rating: Rating {
                rate: 3.9,
                count: 120,
            },
        }
    }

    fn store() -> (CartStore, RecordingPersistence) {
        let persistence = RecordingPersistence::default();
        (CartStore::open(persistence.clone()), persistence)
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_starts_empty_without_saving() {
        let (store, persistence) = store();
        let cart = store.cart();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
        assert_eq!(cart.total_items(), 0);
        assert_eq!(persistence.saves(), 0);
    }

    #[test]
    fn test_add_new_product() {
        let (mut store, persistence) = store();
        let cart = store.add_to_cart(&product(1, "29.99"), 2);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.total(), dec("59.98"));
        assert_eq!(cart.total_items(), 2);
        assert_eq!(persistence.stored().unwrap(), *cart);
    }

    #[test]
    fn test_add_merges_existing_line() {
        let (mut store, _) = store();
        store.add_one(&product(1, "29.99"));
        let cart = store.add_to_cart(&product(1, "29.99"), 3);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 4);
        assert_eq!(cart.total(), dec("119.96"));
        assert_eq!(cart.total_items(), 4);
    }

    #[test]
    fn test_update_to_zero_removes() {
        let (mut store, _) = store();
        store.add_to_cart(&product(1, "29.99"), 2);
        store.add_to_cart(&product(2, "10.00"), 1);
        let cart = store.update_quantity(ProductId::new(1), 0);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].id, ProductId::new(2));
        assert_eq!(cart.total(), dec("10.00"));
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_update_negative_matches_remove() {
        let (mut updated, _) = store();
        let (mut removed, _) = store();
        for store in [&mut updated, &mut removed] {
            store.add_to_cart(&product(1, "5.00"), 2);
            store.add_to_cart(&product(2, "7.50"), 1);
        }

        let a = updated.update_quantity(ProductId::new(1), -3);
        let b = removed.remove_from_cart(ProductId::new(1));
        assert_eq!(a, b);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let (mut store, persistence) = store();
        store.add_to_cart(&product(1, "29.99"), 1);
        let before = store.cart();

        let after = store.remove_from_cart(ProductId::new(99));
        assert_eq!(after, before);
        assert_eq!(persistence.saves(), 1);
    }

    #[test]
    fn test_malformed_product_leaves_cart_untouched() {
        let (mut store, persistence) = store();
        store.add_to_cart(&product(1, "29.99"), 1);
        let before = store.cart();

        let mut bad_rating = product(2, "10.00");
        bad_rating.rating.rate = 7.5;
        let after = store.add_to_cart(&product(3, "-1.00"), 1);
        assert_eq!(after, before);
        let after = store.add_to_cart(&bad_rating, 1);
        assert_eq!(after, before);
        assert_eq!(persistence.saves(), 1);
    }

    #[test]
    fn test_update_absent_is_noop() {
        let (mut store, persistence) = store();
        let cart = store.update_quantity(ProductId::new(5), 3);
        assert!(cart.is_empty());
        assert_eq!(persistence.saves(), 0);
    }

    #[test]
    fn test_clear_always_persists() {
        let (mut store, persistence) = store();
        store.add_to_cart(&product(1, "29.99"), 1);
        store.clear_cart();
        let cart = store.clear_cart();

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
        assert_eq!(cart.total_items(), 0);
        assert_eq!(persistence.saves(), 3);
        assert_eq!(persistence.stored().unwrap(), Cart::new());
    }

    #[test]
    fn test_queries() {
        let (mut store, _) = store();
        store.add_to_cart(&product(3, "1.00"), 4);

        assert_eq!(store.item_quantity(ProductId::new(3)), 4);
        assert!(store.is_in_cart(ProductId::new(3)));
        assert_eq!(store.item_quantity(ProductId::new(4)), 0);
        assert!(!store.is_in_cart(ProductId::new(4)));
    }

    #[test]
    fn test_adjust_quantity() {
        let (mut store, _) = store();
        store.add_to_cart(&product(1, "2.50"), 3);

        assert_eq!(store.adjust_quantity(ProductId::new(1), -1).total_items(), 2);
        assert_eq!(store.adjust_quantity(ProductId::new(1), 5).total_items(), 7);
        assert!(store.adjust_quantity(ProductId::new(1), -7).is_empty());
    }

    #[test]
    fn test_restores_on_open() {
        let mut cart = Cart::new();
        cart.add(&product(1, "29.99"), 2);
        let persistence = RecordingPersistence::with_cart(cart.clone());

        let store = CartStore::open(persistence.clone());
        assert_eq!(*store.cart(), cart);
        assert_eq!(persistence.saves(), 0);
    }

    #[test]
    fn test_reopen_round_trip() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let mut store = CartStore::open(LocalCartPersistence::new(Arc::clone(&storage)));
        store.add_to_cart(&product(1, "29.99"), 2);
        store.add_to_cart(&product(2, "109.95"), 1);
        let saved = store.cart();

        let reopened = CartStore::open(LocalCartPersistence::new(storage));
        assert_eq!(reopened.cart(), saved);
    }

    #[test]
    fn test_corrupted_blob_opens_empty() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        storage.set(CART_STORAGE_KEY, "%%%not-json").unwrap();

        let store = CartStore::open(LocalCartPersistence::new(Arc::clone(&storage)));
        assert!(store.cart().is_empty());
        // The bad blob stays until the next mutation overwrites it
        assert_eq!(
            storage.get(CART_STORAGE_KEY).unwrap().as_deref(),
            Some("%%%not-json")
        );
    }

    #[test]
    fn test_storage_failure_keeps_memory_state() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::with_quota(16));
        let mut store = CartStore::open(LocalCartPersistence::new(Arc::clone(&storage)));

        let cart = store.add_to_cart(&product(1, "29.99"), 2);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(store.item_quantity(ProductId::new(1)), 2);
        assert!(storage.get(CART_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_subscribers_see_each_snapshot() {
        let (mut store, _) = store();
        let mut rx = store.subscribe();
        assert!(rx.borrow_and_update().is_empty());

        store.add_to_cart(&product(1, "10.00"), 2);
        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.total(), dec("20.00"));
        assert_eq!(snapshot.total_items(), 2);

        store.remove_from_cart(ProductId::new(42));
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_old_snapshots_are_unaffected() {
        let (mut store, _) = store();
        let first = store.add_to_cart(&product(1, "10.00"), 1);
        store.add_to_cart(&product(1, "10.00"), 1);

        assert_eq!(first.total_items(), 1);
        assert_eq!(store.cart().total_items(), 2);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(i32, u32),
        Remove(i32),
        Update(i32, i64),
        Adjust(i32, i64),
        Clear,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (1..6i32, 0..5u32).prop_map(|(id, q)| Op::Add(id, q)),
            2 => (1..6i32).prop_map(Op::Remove),
            2 => (1..6i32, -2..6i64).prop_map(|(id, q)| Op::Update(id, q)),
            2 => (1..6i32, -4..4i64).prop_map(|(id, d)| Op::Adjust(id, d)),
            1 => Just(Op::Clear),
        ]
    }

    proptest! {
        #[test]
        fn prop_store_matches_persisted_state(ops in prop::collection::vec(op_strategy(), 0..40)) {
            let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
            let mut store = CartStore::open(LocalCartPersistence::new(Arc::clone(&storage)));

            for op in ops {
                let cart = match op {
                    Op::Add(id, q) => store.add_to_cart(&product(id, "3.25"), q),
                    Op::Remove(id) => store.remove_from_cart(ProductId::new(id)),
                    Op::Update(id, q) => store.update_quantity(ProductId::new(id), q),
                    Op::Adjust(id, d) => store.adjust_quantity(ProductId::new(id), d),
                    Op::Clear => store.clear_cart(),
                };

                let units: u64 = cart.items().iter().map(|line| u64::from(line.quantity)).sum();
                prop_assert_eq!(cart.total_items(), units);
                prop_assert_eq!(cart.total(), dec("3.25") * Decimal::from(units));
                prop_assert!(cart.items().iter().all(|line| line.quantity >= 1));
            }

            let reopened = CartStore::open(LocalCartPersistence::new(storage));
            prop_assert_eq!(reopened.cart(), store.cart());
        }
    }
}
