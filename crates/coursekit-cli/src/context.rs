//! Wiring from command-line configuration to the client services.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing::debug;

use coursekit_core::{ApiUrl, SessionState};
use coursekit_file::FileCredentialStore;
use coursekit_http::{ApiClient, Courseware};

use crate::cli::ConfigArgs;

/// Services shared by one command invocation.
pub struct AppContext {
    config: ConfigArgs,
    session: SessionState,
}

impl AppContext {
    /// Open the credential store. No network is touched.
    pub fn new(config: ConfigArgs) -> Result<Self> {
        let path = match &config.credentials {
            Some(path) => path.clone(),
            None => default_credentials_path()?,
        };
        debug!(path = %path.display(), "Using credential file");

        let store = Arc::new(FileCredentialStore::new(path));
        let session = SessionState::new(store);

        Ok(Self { config, session })
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Build the backend client. Fails when no API URL is configured.
    pub fn courseware(&self) -> Result<Courseware> {
        let raw = self
            .config
            .api_url
            .as_deref()
            .context("No API URL configured. Pass --api-url or set COURSEKIT_API_URL.")?;
        let api = ApiUrl::new(raw).context("Invalid API URL")?;

        let client = match self.config.timeout_secs {
            Some(secs) => ApiClient::with_timeout(api, self.session.clone(), Duration::from_secs(secs)),
            None => ApiClient::new(api, self.session.clone()),
        }
        .context("Failed to build HTTP client")?;

        Ok(Courseware::new(client))
    }
}

/// `credentials.json` in the platform data directory.
fn default_credentials_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "coursekit").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("credentials.json"))
}
