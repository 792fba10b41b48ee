//! Catalog endpoints.

use reqwest::Method;
use tracing::instrument;

use sweet_home_core::SweetId;

use super::types::{Sweet, SweetInput, SweetPage, SweetQuery};
use super::{ApiError, SweetsClient};
use crate::token::AuthToken;

/// Most pages [`SweetsClient::find_sweet`] will request.
pub const MAX_SCAN_PAGES: u32 = 100;

impl SweetsClient {
    /// Fetch one page of the catalog.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the body is not a page.
    #[instrument(skip(self, bearer), fields(page = query.page, limit = query.limit))]
    pub async fn list_sweets(
        &self,
        query: &SweetQuery,
        bearer: Option<&AuthToken>,
    ) -> Result<Vec<Sweet>, ApiError> {
        let mut url = self.endpoint("sweets")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &query.page.to_string());
            pairs.append_pair("limit", &query.limit.to_string());
            if let Some(name) = &query.name {
                pairs.append_pair("name", name);
            }
        }

        let response = self.request(Method::GET, url, bearer).send().await?;
        let page: SweetPage = Self::check(response).await?.json().await?;
        tracing::debug!(count = page.items.len(), "Fetched sweets");
        Ok(page.items)
    }

    /// Add a sweet to the catalog. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the server refuses the payload or the token.
    #[instrument(skip(self, input, bearer), fields(name = %input.name))]
    pub async fn create_sweet(&self, input: &SweetInput, bearer: &AuthToken) -> Result<(), ApiError> {
        let url = self.endpoint("sweets")?;
        let response = self
            .request(Method::POST, url, Some(bearer))
            .json(input)
            .send()
            .await?;

        Self::check(response).await?;
        tracing::info!("Sweet created");
        Ok(())
    }

    /// Replace a sweet's fields. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the server refuses the update.
    #[instrument(skip(self, input, bearer), fields(id = %id))]
    pub async fn update_sweet(
        &self,
        id: &SweetId,
        input: &SweetInput,
        bearer: &AuthToken,
    ) -> Result<(), ApiError> {
        let url = self.item_endpoint("sweets", id.as_str())?;
        let response = self
            .request(Method::PUT, url, Some(bearer))
            .json(input)
            .send()
            .await?;

        Self::check(response).await?;
        tracing::info!("Sweet updated");
        Ok(())
    }

    /// Remove a sweet from the catalog. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the server refuses the deletion.
    #[instrument(skip(self, bearer), fields(id = %id))]
    pub async fn delete_sweet(&self, id: &SweetId, bearer: &AuthToken) -> Result<(), ApiError> {
        let url = self.item_endpoint("sweets", id.as_str())?;
        let response = self.request(Method::DELETE, url, Some(bearer)).send().await?;

        Self::check(response).await?;
        tracing::info!("Sweet deleted");
        Ok(())
    }

    /// Look a sweet up by id, paging through the catalog.
    ///
    /// The API has no single-item endpoint, so this is what the edit screen
    /// does to pre-fill its form. Scanning stops at the first short page or
    /// after [`MAX_SCAN_PAGES`] pages.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if a listing fails.
    pub async fn find_sweet(
        &self,
        id: &SweetId,
        bearer: Option<&AuthToken>,
    ) -> Result<Option<Sweet>, ApiError> {
        let mut query = SweetQuery::first(SweetQuery::ADMIN_LIMIT);
        for _ in 0..MAX_SCAN_PAGES {
            let items = self.list_sweets(&query, bearer).await?;
            let short_page = items.len() < usize::try_from(query.limit).unwrap_or(usize::MAX);
            if let Some(sweet) = items.into_iter().find(|s| &s.id == id) {
                return Ok(Some(sweet));
            }
            if short_page {
                return Ok(None);
            }
            query.page += 1;
        }

        tracing::warn!(pages = MAX_SCAN_PAGES, "Gave up scanning the catalog");
        Ok(None)
    }
}
