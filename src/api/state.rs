//! API server state

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::AppConfig;

/// Name reported by the health endpoint
pub const SERVICE_NAME: &str = "blackSwan-backend";

/// Default location of the manual API test page
pub const DEFAULT_TEST_PAGE: &str = "./web/api-test.html";

/// API server state
#[derive(Clone)]
pub struct AppState {
    /// Settings loaded at startup, never mutated afterwards
    pub config: Arc<AppConfig>,

    /// HTML page served at `/test`
    pub test_page: PathBuf,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            config,
            test_page: PathBuf::from(DEFAULT_TEST_PAGE),
        }
    }

    pub fn with_test_page(mut self, path: impl AsRef<Path>) -> Self {
        self.test_page = path.as_ref().to_path_buf();
        self
    }

    pub fn service_name(&self) -> &'static str {
        SERVICE_NAME
    }
}
