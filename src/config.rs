//! # Configuración
//!
//! Todo se lee de variables de entorno (o de un `.env` cargado con
//! `dotenvy` antes de llamar a [`Config::from_env`]):
//!
//! ```env
//! BIND_ADDRESS=0.0.0.0:8080
//! STORAGE_BACKEND=file          # memory | file | mongodb
//! STORAGE_DIR=./data
//! STORAGE_QUOTA_BYTES=5242880   # sólo memory
//! STORAGE_KEY_PREFIX=bosco:v1
//! MONGODB_URI=mongodb://localhost:27017
//! MONGODB_DATABASE=bosco_tables
//! STATIC_DIR=./static
//! RUST_LOG=debug
//! ```

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::db::{
    FileStorage, KeyValueStorage, MemoryStorage, MongoStorage, StorageResult, DEFAULT_KEY_PREFIX,
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Valor inválido para {var}: '{value}' ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Medio de persistencia elegido
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory { quota_bytes: Option<usize> },
    File { dir: PathBuf },
    MongoDb { uri: String, database: String },
}

impl StorageBackend {
    /// Abre el medio. Con `mongodb` conecta y bloquea hasta el `ping`.
    pub fn open(&self) -> StorageResult<Box<dyn KeyValueStorage>> {
        let storage: Box<dyn KeyValueStorage> = match self {
            StorageBackend::Memory { quota_bytes: Some(quota) } => {
                Box::new(MemoryStorage::with_quota(*quota))
            }
            StorageBackend::Memory { quota_bytes: None } => Box::new(MemoryStorage::new()),
            StorageBackend::File { dir } => Box::new(FileStorage::open(dir)?),
            StorageBackend::MongoDb { uri, database } => {
                Box::new(MongoStorage::connect(uri, database)?)
            }
        };
        Ok(storage)
    }

    pub fn name(&self) -> &'static str {
        match self {
            StorageBackend::Memory { .. } => "memory",
            StorageBackend::File { .. } => "file",
            StorageBackend::MongoDb { .. } => "mongodb",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_address: String,
    pub storage: StorageBackend,
    pub key_prefix: String,
    pub static_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Igual que [`from_env`](Self::from_env) pero leyendo de `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let backend = var("STORAGE_BACKEND", "file");
        let backend_name = backend.trim().to_lowercase();
        let storage = match backend_name.as_str() {
            "memory" => StorageBackend::Memory {
                quota_bytes: lookup("STORAGE_QUOTA_BYTES")
                    .map(|raw| parse_var("STORAGE_QUOTA_BYTES", &raw))
                    .transpose()?,
            },
            "file" => StorageBackend::File {
                dir: PathBuf::from(var("STORAGE_DIR", "./data")),
            },
            "mongodb" | "mongo" => StorageBackend::MongoDb {
                uri: var("MONGODB_URI", "mongodb://localhost:27017"),
                database: var("MONGODB_DATABASE", "bosco_tables"),
            },
            _ => {
                return Err(ConfigError::InvalidValue {
                    var: "STORAGE_BACKEND",
                    value: backend,
                    reason: "se esperaba memory, file o mongodb".to_string(),
                })
            }
        };

        Ok(Config {
            bind_address: var("BIND_ADDRESS", "0.0.0.0:8080"),
            storage,
            key_prefix: var("STORAGE_KEY_PREFIX", DEFAULT_KEY_PREFIX),
            static_dir: lookup("STATIC_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        var,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
