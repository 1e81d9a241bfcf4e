use anyhow::Result;
use tracing::{debug, info, trace};

use crate::config::{initialize_app_state, Settings};

use super::initdb::apply_migrations;
use super::seed_admin::seed_if_enabled;
use super::serve::run_server;

pub async fn migrate_and_serve(settings: &Settings) -> Result<()> {
    trace!("Entering migrate_and_serve function");
    info!("Applying database migrations and starting server");
    debug!("Database URL: {}", settings.database_url);
    debug!("Bind address: {}", settings.bind_address);

    let state = initialize_app_state(settings).await?;
    apply_migrations(&state.db).await?;

    seed_if_enabled(&state, settings).await?;
    run_server(state, &settings.bind_address).await
}
