use anyhow::{bail, Context};
use clap::Args;
use tracing::info;

use crate::auth::hash_password;
use crate::config::AppConfig;
use crate::database::models::AdminUser;
use crate::database::{Database, Repository};

#[derive(Args, Debug)]
pub struct SeedAdminArgs {
    #[arg(long, help = "Admin username (case-sensitive)")]
    pub username: String,

    #[arg(long, help = "Plaintext password; stored as an argon2 hash")]
    pub password: String,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub full_name: Option<String>,
}

pub async fn handle(args: SeedAdminArgs) -> anyhow::Result<()> {
    if args.username.trim().is_empty() || args.password.is_empty() {
        bail!("username and password must not be empty");
    }

    let config = AppConfig::from_env();
    let db = Database::connect(&config.database)
        .await
        .context("failed to connect to the database")?;
    db.migrate().await.context("failed to create the database schema")?;

    let password = args.password;
    let hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

    let admin = Repository::<AdminUser>::new(db.pool().clone())
        .upsert(
            args.username.trim(),
            &hash,
            args.email.as_deref(),
            args.full_name.as_deref(),
        )
        .await?;

    info!("Admin {} (id {}) is ready", admin.username, admin.id);
    println!("Admin '{}' created (id {})", admin.username, admin.id);

    db.close().await;
    Ok(())
}
