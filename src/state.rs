use std::sync::Arc;

use crate::auth::TokenKeys;
use crate::config::AppConfig;
use crate::database::models::{AdminUser, ContactMessage, Project};
use crate::database::{Database, Repository};
use crate::services::{ImageStore, LocalImageStore};

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Database,
    pub tokens: Arc<TokenKeys>,
    pub images: Arc<dyn ImageStore>,
}

impl AppState {
    pub fn new(config: AppConfig, db: Database) -> Self {
        let tokens = TokenKeys::new(&config.security.jwt_secret, config.security.jwt_expiry_hours);
        let images = LocalImageStore::new(config.uploads.dir.clone(), config.uploads.public_prefix.clone());

        Self {
            config: Arc::new(config),
            db,
            tokens: Arc::new(tokens),
            images: Arc::new(images),
        }
    }

    pub fn with_image_store(mut self, images: Arc<dyn ImageStore>) -> Self {
        self.images = images;
        self
    }

    pub fn messages(&self) -> Repository<ContactMessage> {
        Repository::new(self.db.pool().clone())
    }

    pub fn projects(&self) -> Repository<Project> {
        Repository::new(self.db.pool().clone())
    }

    pub fn admins(&self) -> Repository<AdminUser> {
        Repository::new(self.db.pool().clone())
    }
}
