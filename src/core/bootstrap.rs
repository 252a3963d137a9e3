use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories::users;

/// Ensure a default admin account exists so a fresh deployment can be
/// administered. Skipped entirely when no bootstrap password is configured.
pub(crate) async fn ensure_admin(state: &AppState) -> anyhow::Result<()> {
    let admin = state.settings().admin();
    if admin.bootstrap_password.is_empty() {
        tracing::warn!("FIRST_ADMIN_PASSWORD not configured; skipping admin creation");
        return Ok(());
    }

    if users::find_by_username(state.db(), &admin.bootstrap_username).await?.is_some() {
        tracing::info!(username = %admin.bootstrap_username, "Default admin already exists");
        return Ok(());
    }

    let password_hash = security::hash_password(&admin.bootstrap_password)?;

    let created = users::create(
        state.db(),
        users::CreateUser {
            username: &admin.bootstrap_username,
            email: &admin.bootstrap_email,
            password_hash,
            role: UserRole::Admin,
            full_name: Some("Administrator"),
            cohort: None,
            created_at: primitive_now_utc(),
        },
    )
    .await?;

    match created {
        Some(user) => tracing::info!(id = user.id, username = %user.username, "Created default admin"),
        None => tracing::warn!(
            username = %admin.bootstrap_username,
            "Default admin email or username already taken; skipping"
        ),
    }

    Ok(())
}
