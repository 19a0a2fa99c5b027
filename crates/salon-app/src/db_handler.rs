use std::sync::Arc;

use salvo::async_trait;

use crate::error::AppResult;
use salon_core::error::CoreError;
use salon_db::db::DbProvider;

/// Database handle shared by every request.
pub type SharedDb = Arc<dyn DbProvider + Send + Sync>;

/// Injects the [`SharedDb`] into each request's depot.
pub struct DbProviderHandler {
    provider: SharedDb,
}

impl DbProviderHandler {
    #[must_use]
    pub fn new(provider: impl DbProvider + Send + Sync + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }
}

#[async_trait]
impl salvo::Handler for DbProviderHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.provider));
    }
}

/// ## Summary
/// Retrieves the database provider from the depot.
///
/// ## Errors
/// Returns an error if no provider was injected.
pub fn get_db_from_depot(depot: &salvo::Depot) -> AppResult<SharedDb> {
    depot
        .obtain::<SharedDb>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Database provider not found in depot").into())
}
