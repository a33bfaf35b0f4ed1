use std::env;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreConfig {
    MySql { url: String, max_connections: u32 },
    Rest { url: String, key: String },
    Missing,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub jwt_secret: String,
    pub admin_username: String,
    pub admin_password_hash: Option<String>,
    pub admin_roles: Vec<String>,
    pub default_role: String,
    pub public_site_url: String,
    pub cors_origin: String,
    pub bind_addr: String,
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn var_or(key: &str, default: &str) -> String {
    var(key).unwrap_or_else(|| default.to_string())
}

impl Config {
    /// Reads the environment; call `dotenv().ok()` first.
    pub fn from_env() -> Self {
        let store = if let Some(url) = var("DATABASE_URL") {
            let max_connections = var("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(5);
            StoreConfig::MySql {
                url,
                max_connections,
            }
        } else {
            match (var("CONTENT_STORE_URL"), var("CONTENT_STORE_KEY")) {
                (Some(url), Some(key)) => StoreConfig::Rest { url, key },
                _ => StoreConfig::Missing,
            }
        };

        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|| {
            log::warn!("JWT_SECRET tidak ditemukan di .env, memakai secret pengembangan");
            "desa-suntenjaya-dev-secret".to_string()
        });

        Self {
            store,
            jwt_secret,
            admin_username: var_or("ADMIN_USERNAME", "admin"),
            admin_password_hash: var("ADMIN_PASSWORD_HASH"),
            admin_roles: parse_roles(&var_or("ADMIN_ROLES", "admin,superadmin")),
            default_role: var_or("DEFAULT_ROLE", "admin"),
            public_site_url: var_or("PUBLIC_SITE_URL", "/"),
            cors_origin: var_or("CORS_ORIGIN", "http://localhost:3000"),
            bind_addr: var_or("BIND_ADDR", "127.0.0.1:8000"),
        }
    }

    pub fn is_admin_role(&self, role: &str) -> bool {
        self.admin_roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::Missing,
            jwt_secret: "desa-suntenjaya-dev-secret".to_string(),
            admin_username: "admin".to_string(),
            admin_password_hash: None,
            admin_roles: vec!["admin".to_string(), "superadmin".to_string()],
            default_role: "admin".to_string(),
            public_site_url: "/".to_string(),
            cors_origin: "http://localhost:3000".to_string(),
            bind_addr: "127.0.0.1:8000".to_string(),
        }
    }
}

fn parse_roles(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}
