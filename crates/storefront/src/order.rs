//! WhatsApp order submission channel.
//!
//! Orders are not stored anywhere by the storefront. The cart snapshot and
//! the customer's contact details are rendered into a single text message
//! and handed off as a `wa.me` deep link; the seller confirms the order in
//! the chat. After a successful hand-off the cart is cleared.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use thiserror::Error;
use tracing::info;

use mamiejago_core::{Phone, PhoneError};

use crate::cart::{CartSnapshot, CartStorage, CartStore};
use crate::catalog::Product;

/// Prefix of every order number.
pub const ORDER_ID_PREFIX: &str = "MJ-";

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Errors that prevent an order from being sent.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// Customer name left blank.
    #[error("customer name is required")]
    MissingName,

    /// Customer WhatsApp number missing or malformed.
    #[error("invalid customer phone: {0}")]
    InvalidPhone(#[from] PhoneError),
}

/// Order number shown on the receipt and in the message, e.g. `MJ-M6Z1K2QXA7F`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderId(String);

impl OrderId {
    /// Generate an order number from the current time and three random
    /// characters.
    #[must_use]
    pub fn generate() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));

        let mut rng = rand::rng();
        let suffix: String = (0..3)
            .map(|_| {
                BASE36
                    .get(rng.random_range(0..BASE36.len()))
                    .copied()
                    .map_or('0', char::from)
            })
            .collect();

        Self(format!("{ORDER_ID_PREFIX}{}{suffix}", to_base36(millis)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Uppercase base-36 rendering of `n`.
fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        // n % 36 is always a valid index
        #[allow(clippy::cast_possible_truncation)]
        let d = (n % 36) as usize;
        digits.push(BASE36.get(d).copied().map_or('0', char::from));
        n /= 36;
    }
    digits.iter().rev().collect()
}

/// Contact fields from the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderContact {
    pub customer_name: String,
    pub customer_phone: String,
    pub note: Option<String>,
}

/// Checked contact details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidContact {
    pub name: String,
    pub phone: Phone,
    pub note: Option<String>,
}

impl OrderContact {
    /// Check the form: a non-blank name and a usable WhatsApp number.
    /// A blank note is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::MissingName`] or [`OrderError::InvalidPhone`].
    pub fn validate(&self) -> Result<ValidContact, OrderError> {
        let name = self.customer_name.trim();
        if name.is_empty() {
            return Err(OrderError::MissingName);
        }
        let phone = Phone::parse(&self.customer_phone)?;
        let note = self
            .note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Ok(ValidContact {
            name: name.to_string(),
            phone,
            note,
        })
    }
}

/// One line of the order receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    /// `"{name} ({variant}) x{qty}"`.
    pub label: String,
    /// Formatted line total.
    pub amount: String,
}

/// Receipt preview shown before the order is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub customer_name: String,
    pub customer_phone: String,
    pub lines: Vec<ReceiptLine>,
    pub total: String,
    pub note: Option<String>,
}

impl OrderReceipt {
    fn new(order_id: OrderId, snapshot: &CartSnapshot, contact: &ValidContact) -> Self {
        Self {
            order_id,
            customer_name: contact.name.clone(),
            customer_phone: contact.phone.to_string(),
            lines: snapshot
                .items
                .iter()
                .map(|i| ReceiptLine {
                    label: format!("{} ({}) x{}", i.name, i.variant_label(), i.quantity),
                    amount: i.line_total().to_string(),
                })
                .collect(),
            total: snapshot.total_price.to_string(),
            note: contact.note.clone(),
        }
    }
}

/// Everything produced by sending an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDispatch {
    pub order_id: OrderId,
    pub message: String,
    /// `https://wa.me/...` link to open.
    pub url: String,
}

/// Renders orders for a seller's WhatsApp number.
#[derive(Debug, Clone)]
pub struct OrderChannel {
    seller: Phone,
}

impl OrderChannel {
    #[must_use]
    pub const fn new(seller: Phone) -> Self {
        Self { seller }
    }

    #[must_use]
    pub const fn seller(&self) -> &Phone {
        &self.seller
    }

    /// Receipt for the current cart without sending anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is empty or the contact is invalid.
    pub fn preview(
        &self,
        order_id: &OrderId,
        snapshot: &CartSnapshot,
        contact: &OrderContact,
    ) -> Result<OrderReceipt, OrderError> {
        if snapshot.is_empty() {
            return Err(OrderError::EmptyCart);
        }
        let contact = contact.validate()?;
        Ok(OrderReceipt::new(order_id.clone(), snapshot, &contact))
    }

    /// Render message and link for a snapshot. Pure; does not touch the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is empty or the contact is invalid.
    pub fn prepare(
        &self,
        order_id: &OrderId,
        snapshot: &CartSnapshot,
        contact: &OrderContact,
    ) -> Result<OrderDispatch, OrderError> {
        if snapshot.is_empty() {
            return Err(OrderError::EmptyCart);
        }
        let contact = contact.validate()?;
        let message = render_order_message(order_id, snapshot, &contact);
        let url = whatsapp_link(&self.seller, &message);

        Ok(OrderDispatch {
            order_id: order_id.clone(),
            message,
            url,
        })
    }

    /// Send the cart under a fresh order number and clear it.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is empty or the contact is invalid; the
    /// cart is left untouched in that case.
    pub fn submit<S: CartStorage>(
        &self,
        cart: &mut CartStore<S>,
        contact: &OrderContact,
    ) -> Result<OrderDispatch, OrderError> {
        self.submit_with_id(cart, contact, &OrderId::generate())
    }

    /// Send the cart under an order number already shown on a receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is empty or the contact is invalid; the
    /// cart is left untouched in that case.
    pub fn submit_with_id<S: CartStorage>(
        &self,
        cart: &mut CartStore<S>,
        contact: &OrderContact,
        order_id: &OrderId,
    ) -> Result<OrderDispatch, OrderError> {
        let snapshot = cart.snapshot();
        let dispatch = self.prepare(order_id, &snapshot, contact)?;

        info!(
            order_id = %dispatch.order_id,
            items = snapshot.total_items(),
            total = snapshot.total_price.amount(),
            "order dispatched to WhatsApp"
        );
        cart.clear();
        Ok(dispatch)
    }

    /// Link asking about a single product straight from its page.
    #[must_use]
    pub fn quick_order_link(
        &self,
        product: &Product,
        variant: Option<&str>,
        spice_level: Option<&str>,
    ) -> String {
        whatsapp_link(
            &self.seller,
            &render_quick_order_message(product, variant, spice_level),
        )
    }
}

/// The order message sent to the seller.
#[must_use]
pub fn render_order_message(
    order_id: &OrderId,
    snapshot: &CartSnapshot,
    contact: &ValidContact,
) -> String {
    let item_lines = snapshot
        .items
        .iter()
        .map(|i| {
            format!(
                "• {} ({}) x{} = {}",
                i.name,
                i.variant_label(),
                i.quantity,
                i.line_total()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let note = contact
        .note
        .as_ref()
        .map(|n| format!("\n📝 Catatan: {n}"))
        .unwrap_or_default();

    format!(
        "📦 *Pesanan MamieJago*\n🆔 {order_id}\n\n👤 {}\n📱 {}\n\n{item_lines}\n\n💰 *Total: {}*{note}\n\nTerima kasih! 🙏",
        contact.name, contact.phone, snapshot.total_price
    )
}

/// Message for a single-product enquiry.
#[must_use]
pub fn render_quick_order_message(
    product: &Product,
    variant: Option<&str>,
    spice_level: Option<&str>,
) -> String {
    let spice = spice_level
        .filter(|s| !s.is_empty())
        .map(|s| format!("\n🌶️ Level: {s}"))
        .unwrap_or_default();

    format!(
        "Halo MamieJago! Saya mau pesan:\n\n📦 {}\n🔸 Varian: {}{spice}\n💰 {}\n\nTerima kasih!",
        product.name,
        variant.unwrap_or("-"),
        product.price
    )
}

/// `https://wa.me/{number}?text={percent-encoded message}`.
#[must_use]
pub fn whatsapp_link(number: &Phone, message: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        number.as_str(),
        urlencoding::encode(message)
    )
}
