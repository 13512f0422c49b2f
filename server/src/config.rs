use anyhow::{Result, bail};

/// Which `EmployeeStore` implementation gets wired in at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Database,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::Database => "database",
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage: StorageBackend,
    pub audit_actor: String,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let storage = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "database".into())
            .to_lowercase()
            .as_str()
        {
            "database" | "db" => StorageBackend::Database,
            "memory" | "in-memory" => StorageBackend::Memory,
            other => bail!("unsupported STORAGE_BACKEND {other:?}"),
        };

        let audit_actor = std::env::var("AUDIT_ACTOR").unwrap_or_else(|_| "system".into());

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();

        Ok(Self {
            storage,
            audit_actor,
            cors_allowed_origins,
        })
    }
}
