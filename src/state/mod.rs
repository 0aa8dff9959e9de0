//! Shared application state
//!
//! Cloned into every request handler by axum.

use std::sync::Arc;
use crate::config::Settings;
use crate::database::DatabaseService;
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

#[derive(Clone)]
pub struct AppState {
    pub services: Arc<ServiceFactory>,
    pub db: DatabaseService,
    /// Hide internal error detail from clients
    pub production: bool,
}

impl AppState {
    pub fn new(settings: &Settings, db: DatabaseService) -> Result<Self> {
        let services = ServiceFactory::new(settings, db.clone())?;
        Ok(Self {
            services: Arc::new(services),
            db,
            production: settings.app.is_production(),
        })
    }
}
