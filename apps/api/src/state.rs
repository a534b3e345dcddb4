use std::sync::Arc;

use crate::fetcher::PageFetcher;
use crate::outreach::OutreachModel;
use crate::portfolio::Portfolio;

/// Shared application state injected into all route handlers via Axum
/// extractors. Every collaborator sits behind a trait object so tests can
/// swap in doubles; all are constructed once at startup.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn PageFetcher>,
    pub model: Arc<dyn OutreachModel>,
    pub portfolio: Arc<Portfolio>,
}
