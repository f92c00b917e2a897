use crate::error::SandboxResult;
use crate::model::{ExampleSchema, Id};
use crate::store::traits::Store;

pub struct UnauthorizedFallback;

impl UnauthorizedFallback {
    /// The endpoint's canonical 401 example, if one is recorded.
    ///
    /// A miss is not synthesized into a 401 here; the caller keeps going.
    pub async fn resolve<S: Store>(
        store: &S,
        endpoint_id: Id,
    ) -> SandboxResult<Option<ExampleSchema>> {
        Ok(store.get_unauthorized_schema(endpoint_id).await?)
    }
}
