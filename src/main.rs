use std::sync::Arc;

use taskboard::config::{init_db, Config};
use taskboard::modules::admin::service::ensure_bootstrap_admin;
use taskboard::services::clock::DefaultClock;
use taskboard::services::jwt::JwtService;
use taskboard::services::mailer::{LogMailer, Mailer, SmtpMailer};
use taskboard::services::metrics::MetricsRegistry;
use taskboard::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let db = init_db(&config.database_url).await?;
    tracing::info!("Connected to MySQL");

    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(smtp) => {
            tracing::info!(host = %smtp.host, "Sending mail over SMTP");
            Arc::new(SmtpMailer::new(smtp)?)
        }
        None => {
            tracing::warn!("SMTP_HOST not set; outgoing mail is written to the log");
            Arc::new(LogMailer)
        }
    };

    let jwt_service = JwtService::new(config.jwt_secret.clone(), config.jwt_expiry_minutes);
    let metrics = MetricsRegistry::new()?;
    let state = AppState::with_mysql(db, mailer, jwt_service, config.mail_from.clone(), metrics);

    if let Some(admin) = &config.admin {
        ensure_bootstrap_admin(state.users.as_ref(), admin, &DefaultClock).await?;
    }

    let app = taskboard::create_app(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!("Server running on http://{}", config.bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}
