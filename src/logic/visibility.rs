use anyhow::Result;

use crate::model::Endpoint;
use crate::store::traits::Store;

/// An endpoint can be browsed or played only while its proxy is published and live
pub async fn endpoint_is_visible<S: Store>(store: &S, endpoint: &Endpoint) -> Result<bool> {
    if endpoint.is_deleted {
        return Ok(false);
    }

    Ok(store
        .get_proxy(endpoint.proxy_id)
        .await?
        .map(|proxy| proxy.is_visible())
        .unwrap_or(false))
}
