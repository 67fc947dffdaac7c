use std::env;

/// Environment configuration
/// Loads and validates environment variables
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiry_minutes: i64,
    pub bind_address: String,
    pub mail_from: String,
    pub smtp: Option<SmtpConfig>,
    pub admin: Option<AdminBootstrap>,
}

#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Account created at startup when no user with the same username exists.
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET must be set".to_string())?;

        let jwt_expiry_minutes = match env::var("JWT_EXPIRY_MINUTES") {
            Ok(raw) => raw
                .parse::<i64>()
                .map_err(|_| format!("JWT_EXPIRY_MINUTES must be an integer, got '{}'", raw))?,
            Err(_) => 24 * 60,
        };

        let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let mail_from =
            env::var("MAIL_FROM").unwrap_or_else(|_| "noreply@taskboard.local".to_string());

        let smtp = match env::var("SMTP_HOST") {
            Ok(host) if !host.is_empty() => {
                let port = match env::var("SMTP_PORT") {
                    Ok(raw) => Some(
                        raw.parse::<u16>()
                            .map_err(|_| format!("SMTP_PORT must be a port number, got '{}'", raw))?,
                    ),
                    Err(_) => None,
                };
                Some(SmtpConfig {
                    host,
                    port,
                    username: env::var("SMTP_USERNAME").ok(),
                    password: env::var("SMTP_PASSWORD").ok(),
                })
            }
            _ => None,
        };

        let admin = match (
            env::var("ADMIN_USERNAME"),
            env::var("ADMIN_EMAIL"),
            env::var("ADMIN_PASSWORD"),
        ) {
            (Ok(username), Ok(email), Ok(password)) => Some(AdminBootstrap {
                username,
                email,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiry_minutes,
            bind_address,
            mail_from,
            smtp,
            admin,
        })
    }
}
