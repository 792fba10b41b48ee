//! Wire types for the shop API.

use serde::{Deserialize, Serialize};

use sweet_home_core::{Price, SweetId};

/// Image shown when a sweet has none of its own.
pub const FALLBACK_IMAGE_URL: &str = "/sweets.jpg";

/// A catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sweet {
    /// Document id.
    #[serde(rename = "_id")]
    pub id: SweetId,
    pub name: String,
    pub category: String,
    pub price: Price,
    /// Units in stock.
    pub quantity: u32,
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<String>,
    /// Free-form (HTML) description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Sweet {
    /// Image to display, falling back to the shop's default picture.
    #[must_use]
    pub fn display_image_url(&self) -> &str {
        self.image_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(FALLBACK_IMAGE_URL)
    }

    /// Whether any units are left.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// Response body of `GET /sweets`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SweetPage {
    #[serde(default)]
    pub items: Vec<Sweet>,
}

/// Query parameters for `GET /sweets`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweetQuery {
    pub page: u32,
    pub limit: u32,
    /// Server-side name filter.
    pub name: Option<String>,
}

impl SweetQuery {
    /// Page size the storefront grid uses.
    pub const STOREFRONT_LIMIT: u32 = 24;
    /// Page size the admin table uses.
    pub const ADMIN_LIMIT: u32 = 50;

    /// First page with the given size.
    #[must_use]
    pub const fn first(limit: u32) -> Self {
        Self {
            page: 1,
            limit,
            name: None,
        }
    }

    /// Restrict the query to names containing `name`.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Default for SweetQuery {
    fn default() -> Self {
        Self::first(Self::STOREFRONT_LIMIT)
    }
}

/// Body of `POST /sweets` and `PUT /sweets/:id`.
///
/// Optional fields are omitted from the body when unset, which is how the
/// create form talks to the API; the edit form sets all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweetInput {
    pub name: String,
    pub category: String,
    pub price: Price,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl SweetInput {
    /// A minimal create payload.
    #[must_use]
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: Price, quantity: u32) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            price,
            quantity,
            description: None,
            ingredients: None,
            image_url: None,
        }
    }
}

impl From<&Sweet> for SweetInput {
    fn from(sweet: &Sweet) -> Self {
        Self {
            name: sweet.name.clone(),
            category: sweet.category.clone(),
            price: sweet.price,
            quantity: sweet.quantity,
            description: Some(sweet.description.clone().unwrap_or_default()),
            ingredients: Some(sweet.ingredients.clone()),
            image_url: Some(sweet.image_url.clone().unwrap_or_default()),
        }
    }
}

/// Split a comma-separated ingredient list, trimming blanks away.
#[must_use]
pub fn parse_ingredients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Body of the credential endpoints.
#[derive(Serialize)]
pub(crate) struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Response body of `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}
