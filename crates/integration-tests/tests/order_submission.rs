//! Checkout flow: catalog product to cart to WhatsApp order.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use mamiejago_core::{Phone, Rupiah};
use mamiejago_integration_tests::{init_tracing, line_item};
use mamiejago_storefront::cart::{CartSnapshot, CartStore, FileStorage, MemoryStorage};
use mamiejago_storefront::order::{OrderChannel, OrderContact, OrderError, OrderId};

fn channel() -> OrderChannel {
    OrderChannel::new(Phone::parse("62881023406838").unwrap())
}

fn contact() -> OrderContact {
    OrderContact {
        customer_name: "Sari".to_string(),
        customer_phone: "0812-3456-7890".to_string(),
        note: Some("Tanpa sayur".to_string()),
    }
}

#[test]
fn test_submit_renders_and_clears_persisted_cart() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let mut cart = CartStore::load(FileStorage::new(dir.path()));
    cart.add(line_item("p1", "Mie Jebew Original", 15_000, Some("Original")), 2);
    cart.add(line_item("p7", "Es Teh Manis", 5_000, None), 1);

    let dispatch = channel()
        .submit_with_id(&mut cart, &contact(), &OrderId::from("MJ-TEST123"))
        .unwrap();

    assert_eq!(
        dispatch.message,
        "📦 *Pesanan MamieJago*\n\
         🆔 MJ-TEST123\n\
         \n\
         👤 Sari\n\
         📱 6281234567890\n\
         \n\
         • Mie Jebew Original (Original) x2 = Rp 30.000\n\
         • Es Teh Manis (-) x1 = Rp 5.000\n\
         \n\
         💰 *Total: Rp 35.000*\n\
         📝 Catatan: Tanpa sayur\n\
         \n\
         Terima kasih! 🙏"
    );
    assert!(dispatch.url.starts_with("https://wa.me/62881023406838?text="));
    assert!(cart.is_empty());

    let reloaded = CartStore::load(FileStorage::new(dir.path()));
    assert!(reloaded.is_empty());
}

#[test]
fn test_rejected_order_keeps_cart() {
    let mut cart = CartStore::load(MemoryStorage::new());
    cart.add(line_item("p3", "Dimsum Ayam", 12_000, None), 1);

    let mut bad = contact();
    bad.customer_name = "  ".to_string();
    let err = channel().submit(&mut cart, &bad).unwrap_err();

    assert!(matches!(err, OrderError::MissingName));
    assert_eq!(cart.total_price(), Rupiah::new(12_000));
}

#[test]
fn test_empty_cart_is_rejected() {
    let mut cart = CartStore::load(MemoryStorage::new());
    let err = channel().submit(&mut cart, &contact()).unwrap_err();
    assert!(matches!(err, OrderError::EmptyCart));
}

#[test]
fn test_preview_matches_submitted_order() {
    let mut cart = CartStore::load(MemoryStorage::new());
    cart.add(line_item("p5", "Wonton Kuah", 13_000, Some("Kuah")), 3);

    let channel = channel();
    let order_id = OrderId::generate();
    let receipt = channel
        .preview(&order_id, &cart.snapshot(), &contact())
        .unwrap();
    assert_eq!(receipt.lines[0].label, "Wonton Kuah (Kuah) x3");
    assert_eq!(receipt.total, "Rp 39.000");

    let dispatch = channel
        .submit_with_id(&mut cart, &contact(), &receipt.order_id)
        .unwrap();
    assert_eq!(dispatch.order_id, order_id);
}

#[test]
fn test_listener_sees_checkout_clear() {
    use std::sync::{Arc, Mutex};

    let seen: Arc<Mutex<Vec<CartSnapshot>>> = Arc::default();
    let mut cart = CartStore::load(MemoryStorage::new());
    let sink = Arc::clone(&seen);
    cart.subscribe(move |snapshot: &CartSnapshot| {
        sink.lock().unwrap().push(snapshot.clone());
    });

    cart.add(line_item("p1", "Mie Jebew Original", 15_000, None), 1);
    channel().submit(&mut cart, &contact()).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].total_items(), 1);
    assert!(seen[1].is_empty());
}
