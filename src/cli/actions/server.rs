use crate::cli::actions::Action;
use crate::shiplog::{self, auth::TokenService, store::pg::PgStore, AppState};
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tracing::info;
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            token_secret,
        } => {
            let parsed = Url::parse(&dsn).context("Invalid database DSN")?;
            info!(
                "Connecting to {}:{}{}",
                parsed.host_str().unwrap_or("localhost"),
                parsed.port().unwrap_or(5432),
                parsed.path()
            );

            let pool = PgPoolOptions::new()
                .min_connections(1)
                .max_connections(5)
                .max_lifetime(Duration::from_secs(60 * 2))
                .test_before_acquire(true)
                .connect(&dsn)
                .await
                .context("Failed to connect to database")?;

            let state = AppState {
                store: Arc::new(PgStore::new(pool)),
                tokens: TokenService::new(&token_secret),
            };

            shiplog::new(port, state).await?;
        }
    }

    Ok(())
}
