use anyhow::{Context, Result};
use domain::AdminSeed;
use tracing::{debug, info, warn};

use crate::config::{initialize_app_state, Settings};
use crate::schemas::AppState;

/// Create the default administrator unless one exists. Runs regardless of
/// `bootstrap.seed_admin`, which only governs startup seeding.
pub async fn seed_admin(settings: &Settings) -> Result<()> {
    let state = initialize_app_state(settings).await?;
    seed(&state, &settings.bootstrap.admin_password).await
}

pub(crate) async fn seed_if_enabled(state: &AppState, settings: &Settings) -> Result<()> {
    if !settings.bootstrap.seed_admin {
        debug!("Admin seeding disabled");
        return Ok(());
    }
    seed(state, &settings.bootstrap.admin_password).await
}

async fn seed(state: &AppState, password: &str) -> Result<()> {
    let outcome = state
        .auth
        .ensure_default_admin(password)
        .await
        .context("Failed to seed the default admin user")?;

    match outcome {
        AdminSeed::Created(admin) => {
            info!("Default admin user '{}' created", admin.username);
            if password == "admin123" {
                warn!("The default admin password is in use; set bootstrap.admin_password");
            }
        }
        AdminSeed::AlreadyPresent => info!("Admin user already exists; nothing to seed"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::build_app_state;
    use crate::test_utils::test_utils::{setup_test_db, test_settings};
    use model::entities::user::Role;

    #[tokio::test]
    async fn test_seed_if_enabled_respects_flag() {
        let mut settings = test_settings();
        let state = build_app_state(setup_test_db().await, &settings).unwrap();
        settings.bootstrap.seed_admin = false;

        seed_if_enabled(&state, &settings).await.unwrap();
        assert!(state.auth.resolve_current_user("admin").await.is_err());

        settings.bootstrap.seed_admin = true;
        settings.bootstrap.admin_password = "s3cret-admin".to_string();
        seed_if_enabled(&state, &settings).await.unwrap();
        seed_if_enabled(&state, &settings).await.unwrap();

        let admin = state.auth.authenticate("admin", "s3cret-admin").await.unwrap();
        assert_eq!(admin.role, Role::Admin);
    }
}
