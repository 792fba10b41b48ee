//! Cart Store: the in-memory list of items a shopper has picked.
//!
//! Every operation is total. Lines are unique by item id and keep the order
//! in which items were first added. Nothing here is persisted.

use sweet_home_core::{Price, SweetId};

use crate::api::Sweet;

/// What the cart needs to know about an item when it is added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemInput {
    pub item_id: SweetId,
    pub name: String,
    pub price: Price,
}

impl From<&Sweet> for CartItemInput {
    fn from(sweet: &Sweet) -> Self {
        Self {
            item_id: sweet.id.clone(),
            name: sweet.name.clone(),
            price: sweet.price,
        }
    }
}

/// One cart line. `quantity` is never zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    item_id: SweetId,
    name: String,
    price: Price,
    quantity: u32,
}

impl CartItem {
    #[must_use]
    pub const fn item_id(&self) -> &SweetId {
        &self.item_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price.
    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// The cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of an item.
    ///
    /// An item already in the cart gets its quantity bumped; its stored name
    /// and price are left as first added.
    pub fn add(&mut self, item: impl Into<CartItemInput>) {
        let item = item.into();
        if let Some(line) = self.items.iter_mut().find(|l| l.item_id == item.item_id) {
            line.quantity = line.quantity.saturating_add(1);
            return;
        }

        self.items.push(CartItem {
            item_id: item.item_id,
            name: item.name,
            price: item.price,
            quantity: 1,
        });
    }

    /// Drop an item's line entirely. Unknown ids are ignored.
    pub fn remove(&mut self, item_id: &SweetId) {
        self.items.retain(|l| &l.item_id != item_id);
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Line for `item_id`, if present.
    #[must_use]
    pub fn get(&self, item_id: &SweetId) -> Option<&CartItem> {
        self.items.iter().find(|l| &l.item_id == item_id)
    }

    /// Number of distinct items (the badge count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, cents: i64) -> CartItemInput {
        CartItemInput {
            item_id: SweetId::new(id),
            name: format!("Sweet {id}"),
            price: Price::from_cents(cents),
        }
    }

    fn quantities(cart: &Cart) -> Vec<(&str, u32)> {
        cart.items()
            .iter()
            .map(|l| (l.item_id().as_str(), l.quantity()))
            .collect()
    }

    #[test]
    fn test_add_merges_by_id() {
        let mut cart = Cart::new();
        cart.add(item("a", 100));
        cart.add(item("a", 100));
        cart.add(item("b", 200));

        assert_eq!(quantities(&cart), vec![("a", 2), ("b", 1)]);
    }

    #[test]
    fn test_repeated_adds_count_calls_without_duplicates() {
        let ids = ["x", "y", "x", "z", "x", "y"];
        let mut cart = Cart::new();
        for id in ids {
            cart.add(item(id, 50));
        }

        for id in ["x", "y", "z"] {
            let calls = ids.iter().filter(|&&i| i == id).count();
            let line = cart.get(&SweetId::new(id)).map(CartItem::quantity);
            assert_eq!(line, Some(u32::try_from(calls).unwrap_or(u32::MAX)));
        }
        assert_eq!(cart.len(), 3);
    }

    #[test]
    fn test_add_keeps_first_name_and_price() {
        let mut cart = Cart::new();
        cart.add(item("a", 100));
        cart.add(CartItemInput {
            item_id: SweetId::new("a"),
            name: "Renamed".to_string(),
            price: Price::from_cents(999),
        });

        let line = cart.get(&SweetId::new("a"));
        assert_eq!(line.map(CartItem::name), Some("Sweet a"));
        assert_eq!(line.map(CartItem::price), Some(Price::from_cents(100)));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = Cart::new();
        cart.add(item("a", 100));
        cart.add(item("b", 100));

        cart.remove(&SweetId::new("a"));
        let after_first = cart.clone();
        cart.remove(&SweetId::new("a"));

        assert_eq!(cart, after_first);
        assert_eq!(quantities(&cart), vec![("b", 1)]);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut cart = Cart::new();
        cart.add(item("a", 100));
        cart.remove(&SweetId::new("zzz"));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_clear_always_empties() {
        let mut cart = Cart::new();
        cart.clear();
        assert!(cart.is_empty());

        cart.add(item("a", 100));
        cart.add(item("a", 100));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Price::ZERO);
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add(item("a", 150));
        cart.add(item("a", 150));
        cart.add(item("b", 225));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.subtotal(), Price::from_cents(525));
        assert_eq!(
            cart.get(&SweetId::new("a")).map(CartItem::line_total),
            Some(Price::from_cents(300))
        );
    }

    #[test]
    fn test_add_from_sweet() {
        let sweet = Sweet {
            id: SweetId::new("s1"),
            name: "Nougat bar".to_string(),
            category: "Nougat".to_string(),
            price: Price::from_cents(275),
            quantity: 8,
            image_url: None,
            ingredients: Vec::new(),
            description: None,
        };
        let mut cart = Cart::new();
        cart.add(&sweet);
        assert_eq!(cart.items().first().map(CartItem::name), Some("Nougat bar"));
    }
}
