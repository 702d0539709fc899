use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub url: String,
    pub server_key: String,
    pub pro_price: i64,
    pub subscription_days: i64,
}

#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub casbin_model: String,
    pub casbin_policy: String,
    pub ai: AiConfig,
    pub payment: PaymentConfig,
    pub admin: Option<AdminSeed>,
}

fn optional(key: &str) -> Option<String> {
    dotenv::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn or_default(key: &str, default: &str) -> String {
    optional(key).unwrap_or_else(|| default.to_owned())
}

fn parsed<T: FromStr>(key: &str, default: T) -> Result<T, Error> {
    match optional(key) {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| Error::ConfigError(format!("invalid value for {}: {}", key, v))),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        let admin = match (optional("ADMIN_EMAIL"), optional("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed { email, password }),
            (None, None) => None,
            _ => return Err(Error::ConfigError("ADMIN_EMAIL and ADMIN_PASSWORD must be set together".into())),
        };
        let payment = PaymentConfig {
            url: dotenv::var("PAYMENT_API_URL")?,
            server_key: dotenv::var("PAYMENT_SERVER_KEY")?,
            pro_price: parsed("PRO_PRICE", 99_000)?,
            subscription_days: parsed("SUBSCRIPTION_DAYS", 30)?,
        };
        if payment.pro_price <= 0 || payment.subscription_days <= 0 {
            return Err(Error::ConfigError("PRO_PRICE and SUBSCRIPTION_DAYS must be positive".into()));
        }
        Ok(Config {
            database_url: dotenv::var("DATABASE_URL")?,
            bind_addr: or_default("BIND_ADDR", "0.0.0.0:8000"),
            db_max_connections: parsed("DB_MAX_CONNECTIONS", 5)?,
            jwt_secret: dotenv::var("JWT_SECRET")?,
            casbin_model: or_default("CASBIN_MODEL", "src/privilege/casbin.conf"),
            casbin_policy: or_default("CASBIN_POLICY", "src/privilege/policies.csv"),
            ai: AiConfig {
                url: dotenv::var("AI_API_URL")?,
                api_key: optional("AI_API_KEY"),
                model: or_default("AI_MODEL", "kampus-default"),
            },
            payment,
            admin,
        })
    }
}
