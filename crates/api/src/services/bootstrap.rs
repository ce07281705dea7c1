//! Superadmin bootstrap at startup.
//!
//! A fresh deployment has no admin accounts and no way to create one
//! through the API, so the first superadmin is seeded from environment
//! credentials when none exists yet.

use persistence::repositories::AdminUserRepository;
use sqlx::PgPool;

/// Environment variable holding the bootstrap superadmin email.
pub const BOOTSTRAP_EMAIL_VAR: &str = "MEEWARP_BOOTSTRAP_EMAIL";
/// Environment variable holding the bootstrap superadmin password.
pub const BOOTSTRAP_PASSWORD_VAR: &str = "MEEWARP_BOOTSTRAP_PASSWORD";

/// Create the initial superadmin if none exists and credentials are
/// provided. A no-op on every subsequent startup.
pub async fn ensure_superadmin(pool: &PgPool) -> anyhow::Result<()> {
    let repo = AdminUserRepository::new(pool.clone());

    if repo.superadmin_exists().await? {
        return Ok(());
    }

    let (Ok(email), Ok(password)) = (
        std::env::var(BOOTSTRAP_EMAIL_VAR),
        std::env::var(BOOTSTRAP_PASSWORD_VAR),
    ) else {
        tracing::warn!(
            "No superadmin account exists and {} / {} are not set; admin login is impossible",
            BOOTSTRAP_EMAIL_VAR,
            BOOTSTRAP_PASSWORD_VAR
        );
        return Ok(());
    };

    let password_hash = shared::password::hash_password(&password)?;
    let admin = repo
        .create(None, &email, &password_hash, "superadmin")
        .await?;

    tracing::info!(admin_id = %admin.id, email = %admin.email, "Bootstrapped superadmin account");
    Ok(())
}
