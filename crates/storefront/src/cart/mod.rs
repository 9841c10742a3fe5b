//! Cart store.
//!
//! The cart is an ordered list of line items owned by a single [`CartStore`].
//! All mutation goes through four operations (`add`, `remove`,
//! `update_quantity`, `clear`), which keep these invariants:
//!
//! - no two items share a `(product, variant)` identity key
//! - every item has `quantity >= 1`
//! - merging into an existing key updates it in place, so insertion order is
//!   preserved
//!
//! After every mutation the full list is written to durable storage under a
//! single fixed key, then registered listeners are notified synchronously.
//! Storage failures are logged and absorbed; the in-memory list stays
//! authoritative for the rest of the session.

mod line;
mod storage;

pub use line::{CartLineItem, CartSnapshot, DEFAULT_VARIANT, LineKey, NewLineItem};
pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};

use std::fmt;

use tracing::{debug, warn};

use mamiejago_core::{ProductId, Rupiah};

/// Storage key the cart is persisted under.
pub const STORAGE_KEY: &str = "mamiejago-cart";

/// Receives a snapshot after every cart mutation.
pub trait CartListener: Send {
    fn cart_changed(&self, snapshot: &CartSnapshot);
}

impl<F> CartListener for F
where
    F: Fn(&CartSnapshot) + Send,
{
    fn cart_changed(&self, snapshot: &CartSnapshot) {
        self(snapshot);
    }
}

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The single authoritative cart for a session.
///
/// Construct one with [`CartStore::load`] and pass it to whatever needs it;
/// there is no global instance.
pub struct CartStore<S> {
    items: Vec<CartLineItem>,
    storage: S,
    key: String,
    persisted: bool,
    listeners: Vec<(SubscriptionId, Box<dyn CartListener>)>,
    next_subscription: u64,
}

impl<S: CartStorage> CartStore<S> {
    /// Load the cart from `storage` under [`STORAGE_KEY`].
    ///
    /// A missing, unreadable or unparseable stored value yields an empty
    /// cart.
    #[must_use]
    pub fn load(storage: S) -> Self {
        Self::load_with_key(storage, STORAGE_KEY)
    }

    /// Load the cart from `storage` under a custom key.
    #[must_use]
    pub fn load_with_key(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let items = read_items(&storage, &key);
        debug!(key = %key, items = items.len(), "cart loaded");

        Self {
            items,
            storage,
            key,
            persisted: true,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` of an item.
    ///
    /// If a line with the same identity key exists its quantity is increased
    /// in place; otherwise the item is appended. A quantity of 0 is treated
    /// as 1.
    pub fn add(&mut self, item: NewLineItem, quantity: u32) {
        let quantity = quantity.max(1);

        if let Some(existing) = self.items.iter_mut().find(|i| i.key() == item.key()) {
            existing.quantity = existing.quantity.saturating_add(quantity);
            debug!(
                product_id = %existing.product_id,
                variant = existing.variant_label(),
                quantity = existing.quantity,
                "cart line merged"
            );
        } else {
            debug!(
                product_id = %item.product_id,
                variant = item.variant.as_deref().unwrap_or("-"),
                quantity,
                "cart line added"
            );
            self.items.push(item.into_line(quantity));
        }

        self.commit();
    }

    /// Add a single unit of an item.
    pub fn add_one(&mut self, item: NewLineItem) {
        self.add(item, 1);
    }

    /// Remove the line matching `(product_id, variant)`, if any.
    pub fn remove(&mut self, product_id: &ProductId, variant: Option<&str>) {
        let key = LineKey::new(product_id, variant);
        let before = self.items.len();
        self.items.retain(|i| i.key() != key);

        if self.items.len() < before {
            debug!(product_id = %product_id, variant = key.variant(), "cart line removed");
        }

        self.commit();
    }

    /// Set the quantity of the matching line.
    ///
    /// A quantity of zero or less removes the line. Unknown keys are a no-op.
    pub fn update_quantity(&mut self, product_id: &ProductId, variant: Option<&str>, quantity: i64) {
        if quantity <= 0 {
            self.remove(product_id, variant);
        } else {
            let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            let key = LineKey::new(product_id, variant);
            if let Some(item) = self.items.iter_mut().find(|i| i.key() == key) {
                item.quantity = quantity;
                debug!(product_id = %product_id, variant = key.variant(), quantity, "cart line updated");
            }
            self.commit();
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
        debug!("cart cleared");
        self.commit();
    }

    // =========================================================================
    // Derived values
    // =========================================================================

    /// Sum of all quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of `unit_price × quantity` over all lines.
    #[must_use]
    pub fn total_price(&self) -> Rupiah {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The line matching `(product_id, variant)`.
    #[must_use]
    pub fn get(&self, product_id: &ProductId, variant: Option<&str>) -> Option<&CartLineItem> {
        let key = LineKey::new(product_id, variant);
        self.items.iter().find(|i| i.key() == key)
    }

    /// Owned copy of the current lines and total.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            total_price: self.total_price(),
        }
    }

    /// Whether the last write to durable storage succeeded.
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.persisted
    }

    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Register a listener called after every mutation.
    pub fn subscribe<L>(&mut self, listener: L) -> SubscriptionId
    where
        L: CartListener + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() < before
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn commit(&mut self) {
        self.persist();
        self.notify();
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.items)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                self.storage
                    .write(&self.key, &json)
                    .map_err(|e| e.to_string())
            });

        match result {
            Ok(()) => self.persisted = true,
            Err(error) => {
                warn!(key = %self.key, %error, "failed to persist cart");
                self.persisted = false;
            }
        }
    }

    fn notify(&self) {
        if self.listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, listener) in &self.listeners {
            listener.cart_changed(&snapshot);
        }
    }
}

impl<S> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("items", &self.items)
            .field("persisted", &self.persisted)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

/// Read and parse the stored cart, falling back to empty on any failure.
fn read_items<S: CartStorage>(storage: &S, key: &str) -> Vec<CartLineItem> {
    let raw = match storage.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key, "no stored cart");
            return Vec::new();
        }
        Err(error) => {
            warn!(key, %error, "failed to read stored cart, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<CartLineItem>>(&raw) {
        Ok(stored) => normalize(stored),
        Err(error) => {
            warn!(key, %error, "stored cart is corrupt, starting empty");
            Vec::new()
        }
    }
}

/// Re-establish the store invariants on data read from storage.
///
/// Zero-quantity lines are dropped and duplicate keys are merged into the
/// first occurrence.
fn normalize(stored: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let stored_len = stored.len();
    let mut items: Vec<CartLineItem> = Vec::with_capacity(stored_len);

    for item in stored {
        if item.quantity == 0 {
            continue;
        }
        if let Some(existing) = items.iter_mut().find(|i| i.key() == item.key()) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            items.push(item);
        }
    }

    if items.len() != stored_len {
        warn!(
            stored = stored_len,
            kept = items.len(),
            "stored cart violated invariants, normalized"
        );
    }
    items
}
