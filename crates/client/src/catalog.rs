//! Catalog state and the list helpers behind the shop and admin screens.

use std::cmp::Ordering;

use sweet_home_core::{Price, SweetId};

use crate::api::{Sweet, SweetQuery, SweetsClient};
use crate::token::AuthToken;

/// Message shown when the catalog cannot be fetched.
pub const LOAD_FAILED: &str = "Failed to load sweets";

/// Fetched catalog plus load status.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    items: Vec<Sweet>,
    loading: bool,
    error: Option<String>,
}

impl CatalogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[Sweet] {
        &self.items
    }

    #[must_use]
    pub const fn loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetch a page of the catalog and replace the held items.
    ///
    /// On failure the previous items stay and [`LOAD_FAILED`] is set.
    /// Returns whether the fetch succeeded.
    pub async fn refresh(
        &mut self,
        api: &SweetsClient,
        query: &SweetQuery,
        bearer: Option<&AuthToken>,
    ) -> bool {
        self.loading = true;
        let result = api.list_sweets(query, bearer).await;
        self.loading = false;

        match result {
            Ok(items) => {
                self.items = items;
                self.error = None;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Catalog fetch failed");
                self.error = Some(LOAD_FAILED.to_string());
                false
            }
        }
    }

    /// Drop an item locally after it was deleted on the server.
    pub fn forget(&mut self, id: &SweetId) {
        self.items.retain(|s| &s.id != id);
    }

    /// Items matching a name search and optional category.
    #[must_use]
    pub fn visible(&self, query: &str, category: Option<&str>) -> Vec<&Sweet> {
        filter_sweets(&self.items, query, category)
    }
}

/// Case-insensitive name substring match plus exact category match.
///
/// An empty or absent category matches everything.
#[must_use]
pub fn filter_sweets<'a>(items: &'a [Sweet], query: &str, category: Option<&str>) -> Vec<&'a Sweet> {
    let needle = query.to_lowercase();
    let category = category.filter(|c| !c.is_empty());
    items
        .iter()
        .filter(|s| s.name.to_lowercase().contains(&needle))
        .filter(|s| category.is_none_or(|c| s.category == c))
        .collect()
}

/// Column the admin table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Name,
    Category,
    Price,
    Quantity,
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "category" => Ok(Self::Category),
            "price" => Ok(Self::Price),
            "quantity" => Ok(Self::Quantity),
            _ => Err(format!("invalid sort field: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Current sort of the admin table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortState {
    /// Clicking the current column flips direction; clicking another column
    /// selects it and keeps the direction.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
        }
    }

    fn compare(self, a: &Sweet, b: &Sweet) -> Ordering {
        let ordering = match self.field {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Category => a.category.cmp(&b.category),
            SortField::Price => a.price.cmp(&b.price),
            SortField::Quantity => a.quantity.cmp(&b.quantity),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    /// Sorted copy of `items`; ties keep their input order.
    #[must_use]
    pub fn sorted<'a>(self, items: impl IntoIterator<Item = &'a Sweet>) -> Vec<&'a Sweet> {
        let mut sorted: Vec<&Sweet> = items.into_iter().collect();
        sorted.sort_by(|a, b| self.compare(a, b));
        sorted
    }
}

/// Summary row of the admin table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryTotals {
    /// Number of distinct sweets.
    pub count: usize,
    /// Units in stock across all sweets.
    pub inventory: u64,
    /// Stock value, rounded to cents.
    pub value: Price,
}

impl InventoryTotals {
    #[must_use]
    pub fn of(items: &[Sweet]) -> Self {
        Self {
            count: items.len(),
            inventory: items.iter().map(|s| u64::from(s.quantity)).sum(),
            value: items
                .iter()
                .map(|s| s.price.times(s.quantity))
                .sum::<Price>()
                .rounded(),
        }
    }
}
