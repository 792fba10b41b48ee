//! Cart command: build a cart from catalog ids and print the bill.

use sweet_home_client::CatalogStore;
use sweet_home_client::api::SweetQuery;
use sweet_home_client::cart::Cart;
use sweet_home_client::catalog::LOAD_FAILED;
use sweet_home_core::SweetId;

use super::{CommandError, Store};

/// Add one unit per id (in order), drop the `remove` ids, and print the cart.
pub async fn price(store: &Store, ids: &[String], remove: &[String]) -> Result<(), CommandError> {
    let mut catalog = CatalogStore::new();
    let query = SweetQuery::first(SweetQuery::ADMIN_LIMIT);
    if !catalog.refresh(store.api(), &query, store.state().token()).await {
        let message = catalog.error().unwrap_or(LOAD_FAILED);
        return Err(CommandError::Failed(message.to_owned()));
    }

    let mut cart = Cart::new();
    for id in ids {
        let Some(sweet) = catalog.items().iter().find(|s| s.id.as_str() == id) else {
            return Err(CommandError::UnknownSweet(id.clone()));
        };
        if !sweet.in_stock() {
            tracing::warn!("{} is out of stock", sweet.name);
        }
        cart.add(sweet);
    }
    for id in remove {
        cart.remove(&SweetId::new(id.as_str()));
    }

    print_cart(&cart);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Cart is empty");
        return;
    }
    for line in cart.items() {
        println!(
            "{:>3} x {:<28} {:>9} {:>10}",
            line.quantity(),
            line.name(),
            line.price().to_string(),
            line.line_total().to_string()
        );
    }
    println!(
        "{} items, {} units, subtotal {}",
        cart.len(),
        cart.total_quantity(),
        cart.subtotal()
    );
}
