use std::sync::Arc;

use salvo::async_trait;

use crate::error::AppResult;
use salon_core::error::CoreError;
use salon_service::notify::Notifier;

/// Makes the installed [`Notifier`] available to handlers.
pub struct NotifierHandler {
    pub notifier: Arc<dyn Notifier>,
}

#[async_trait]
impl salvo::Handler for NotifierHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.notifier));
    }
}

/// ## Errors
/// Returns an error if no notifier was injected.
pub fn get_notifier_from_depot(depot: &salvo::Depot) -> AppResult<Arc<dyn Notifier>> {
    depot
        .obtain::<Arc<dyn Notifier>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Notifier not found in depot").into())
}
