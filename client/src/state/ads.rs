//! Row-level ad actions from the ads table.

#[cfg(test)]
#[path = "ads_test.rs"]
mod ads_test;

use super::cache::{QueryCache, QueryKey};
use crate::net::ApiError;

/// Delete an ad and invalidate the cached ad list.
///
/// # Errors
///
/// Returns the API error; the cache is left untouched on failure.
pub async fn delete_ad(cache: &QueryCache, ad_id: &str) -> Result<(), ApiError> {
    cache.api().delete_ad(ad_id).await?;
    cache.invalidate(QueryKey::Ads).await;
    Ok(())
}
