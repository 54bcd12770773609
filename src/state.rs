//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::{DefinitionService, ListSettings, PaginationService};
use crate::domain::repositories::DefinitionRepository;
use crate::validation::CreateRules;

/// Services shared by every request; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub definition_service: Arc<DefinitionService>,
    pub pagination_service: Arc<PaginationService>,
}

impl AppState {
    /// Builds the services on top of a single repository.
    pub fn new(
        repository: Arc<dyn DefinitionRepository>,
        rules: CreateRules,
        settings: ListSettings,
    ) -> Self {
        Self {
            definition_service: Arc::new(DefinitionService::new(repository.clone(), rules)),
            pagination_service: Arc::new(PaginationService::new(repository, settings)),
        }
    }
}
