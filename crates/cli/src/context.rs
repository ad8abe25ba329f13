//! Application context - wires configuration, credentials and the schedule
//! client together

use std::sync::Arc;

use crewconnect_core::ScheduleClient;
use crewconnect_domain::Config;
use crewconnect_infra::{Authenticator, FileTokenStore};
use tracing::info;

use crate::prompt::ConsolePrompt;

pub struct AppContext {
    pub schedule: ScheduleClient,
}

impl AppContext {
    /// Authenticate against the configured backend, prompting on the console
    /// when no stored credentials exist.
    pub async fn connect(config: Config) -> anyhow::Result<Self> {
        let store = Arc::new(FileTokenStore::new(&config.storage.token_path));
        let authenticator = Authenticator::from_config(&config, store)?;

        let session = authenticator.connect(&ConsolePrompt::stdio()).await?;
        info!(host = %config.host, user = %session.user_id(), "connected");

        Ok(Self { schedule: ScheduleClient::new(Arc::new(session)) })
    }
}
