//! Catalog commands.
//!
//! # Usage
//!
//! ```bash
//! sh-cli sweets list --name gummy --category Gummies
//! sh-cli sweets list --admin --sort quantity --descending
//! sh-cli sweets add -n "Sea Salt Caramel" -c Caramel --price 1.75 -q 120 \
//!     --ingredients "sugar, cream, butter, salt"
//! sh-cli sweets update 64f0c2 --price 1.95
//! sh-cli sweets delete 64f0c2
//! ```

use clap::Args;
use sweet_home_client::CatalogStore;
use sweet_home_client::api::{Sweet, SweetInput, SweetQuery, parse_ingredients};
use sweet_home_client::catalog::{InventoryTotals, LOAD_FAILED, SortDirection, SortField, SortState};
use sweet_home_core::{Price, SweetId};

use super::{CommandError, Store, authorize};

/// Options for `sweets list`.
#[derive(Debug, Default)]
pub struct ListView {
    pub name: Option<String>,
    pub category: Option<String>,
    pub admin: bool,
    pub sort: Option<SortField>,
    pub descending: bool,
}

/// Fields of a new sweet.
#[derive(Debug, Args)]
pub struct SweetFields {
    #[arg(short, long)]
    pub name: String,

    #[arg(short, long)]
    pub category: String,

    /// Unit price, e.g. `2.99`
    #[arg(long)]
    pub price: String,

    #[arg(short, long)]
    pub quantity: u32,

    #[arg(long)]
    pub description: Option<String>,

    /// Comma-separated list
    #[arg(long)]
    pub ingredients: Option<String>,

    #[arg(long)]
    pub image_url: Option<String>,
}

/// Fields to change on an existing sweet; unset ones keep their value.
#[derive(Debug, Default, Args)]
pub struct SweetPatch {
    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(short, long)]
    pub category: Option<String>,

    #[arg(long)]
    pub price: Option<String>,

    #[arg(short, long)]
    pub quantity: Option<u32>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub ingredients: Option<String>,

    #[arg(long)]
    pub image_url: Option<String>,
}

fn parse_price(raw: &str) -> Result<Price, CommandError> {
    match raw.parse::<Price>() {
        Ok(price) if !price.is_negative() => Ok(price),
        _ => Err(CommandError::InvalidPrice(raw.to_owned())),
    }
}

impl SweetFields {
    fn into_input(self) -> Result<SweetInput, CommandError> {
        let price = parse_price(&self.price)?;
        Ok(SweetInput {
            description: self.description,
            ingredients: self.ingredients.as_deref().map(parse_ingredients),
            image_url: self.image_url,
            ..SweetInput::new(self.name, self.category, price, self.quantity)
        })
    }
}

impl SweetPatch {
    fn apply(self, input: &mut SweetInput) -> Result<(), CommandError> {
        if let Some(name) = self.name {
            input.name = name;
        }
        if let Some(category) = self.category {
            input.category = category;
        }
        if let Some(price) = self.price {
            input.price = parse_price(&price)?;
        }
        if let Some(quantity) = self.quantity {
            input.quantity = quantity;
        }
        if let Some(description) = self.description {
            input.description = Some(description);
        }
        if let Some(ingredients) = self.ingredients {
            input.ingredients = Some(parse_ingredients(&ingredients));
        }
        if let Some(image_url) = self.image_url {
            input.image_url = Some(image_url);
        }
        Ok(())
    }
}

/// Print the catalog, either as the shop sees it or as the admin table.
pub async fn list(store: &Store, view: &ListView) -> Result<(), CommandError> {
    let (bearer, limit) = if view.admin {
        (Some(authorize(store, true)?), SweetQuery::ADMIN_LIMIT)
    } else {
        (store.state().token(), SweetQuery::STOREFRONT_LIMIT)
    };

    let mut catalog = CatalogStore::new();
    if !catalog
        .refresh(store.api(), &SweetQuery::first(limit), bearer)
        .await
    {
        let message = catalog.error().unwrap_or(LOAD_FAILED);
        return Err(CommandError::Failed(message.to_owned()));
    }

    let visible = catalog.visible(
        view.name.as_deref().unwrap_or_default(),
        view.category.as_deref(),
    );
    let rows = match view.sort {
        Some(field) => SortState {
            field,
            direction: if view.descending {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            },
        }
        .sorted(visible),
        None => visible,
    };

    print_rows(&rows, view.admin);
    if view.admin {
        print_totals(&InventoryTotals::of(catalog.items()));
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_rows(rows: &[&Sweet], admin: bool) {
    if rows.is_empty() {
        println!("No sweets found");
        return;
    }
    for sweet in rows {
        let stock = if sweet.in_stock() {
            format!("{} in stock", sweet.quantity)
        } else {
            "Out of stock".to_owned()
        };
        if admin {
            println!(
                "{:<26} {:<28} {:<14} {:>9} {}",
                sweet.id.as_str(),
                sweet.name,
                sweet.category,
                sweet.price.to_string(),
                stock
            );
        } else {
            println!(
                "{:<28} {:<14} {:>9}  {}",
                sweet.name,
                sweet.category,
                sweet.price.to_string(),
                stock
            );
        }
    }
}

#[allow(clippy::print_stdout)]
fn print_totals(totals: &InventoryTotals) {
    println!(
        "{} sweets, {} units, stock value {}",
        totals.count, totals.inventory, totals.value
    );
}

pub async fn add(store: &Store, fields: SweetFields) -> Result<(), CommandError> {
    let bearer = authorize(store, true)?;
    let input = fields.into_input()?;
    store.api().create_sweet(&input, bearer).await?;
    tracing::info!("Added {}", input.name);
    Ok(())
}

/// Load the sweet, apply the changes, and send the full record back.
pub async fn update(store: &Store, id: &str, patch: SweetPatch) -> Result<(), CommandError> {
    let bearer = authorize(store, true)?;
    let id = SweetId::new(id);
    let Some(sweet) = store.api().find_sweet(&id, Some(bearer)).await? else {
        return Err(CommandError::UnknownSweet(id.into_inner()));
    };

    let mut input = SweetInput::from(&sweet);
    patch.apply(&mut input)?;
    store.api().update_sweet(&id, &input, bearer).await?;
    tracing::info!("Updated {}", input.name);
    Ok(())
}

pub async fn delete(store: &Store, id: &str) -> Result<(), CommandError> {
    let bearer = authorize(store, true)?;
    store.api().delete_sweet(&SweetId::new(id), bearer).await?;
    tracing::info!("Deleted {id}");
    Ok(())
}
