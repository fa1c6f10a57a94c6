//! # Medios de persistencia clave-valor
//!
//! El tablero guarda cada día como una cadena JSON bajo una clave. Cualquier
//! medio que sepa leer, escribir y borrar una cadena completa por clave sirve:
//!
//! - [`MemoryStorage`] - mapa en memoria, opcionalmente con cuota de bytes
//! - [`FileStorage`] - un fichero JSON por clave dentro de un directorio
//! - [`MongoStorage`](super::mongodb::MongoStorage) - colección de MongoDB

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errores que puede devolver un medio de persistencia
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Error de E/S con la clave '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("Error de base de datos en operación '{operation}': {source}")]
    Database {
        operation: String,
        #[source]
        source: mongodb::error::Error,
    },

    /// El medio está lleno, como la cuota de `localStorage` de un navegador
    #[error("Cuota excedida al escribir '{key}': se necesitan {needed} bytes, hay {available}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },
}

impl StorageError {
    pub fn io(key: &str, source: io::Error) -> Self {
        Self::Io {
            key: key.to_string(),
            source,
        }
    }

    pub fn database(operation: &str, source: mongodb::error::Error) -> Self {
        Self::Database {
            operation: operation.to_string(),
            source,
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Medio clave-valor de cadenas completas
///
/// Las llamadas son síncronas: cuando vuelven, la escritura ya se hizo (o
/// falló).
pub trait KeyValueStorage: Send {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&mut self, key: &str) -> StorageResult<()>;

    /// Nombre corto del medio, para los logs
    fn backend_name(&self) -> &'static str;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    writes: usize,
    quota: Option<usize>,
}

impl MemoryInner {
    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

/// Almacenamiento en memoria
///
/// Los clones comparten el mismo mapa, así que se puede conservar un handle
/// para inspeccionar lo que escribió el tablero.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limita el total de bytes (claves + valores) que se pueden guardar
    pub fn with_quota(bytes: usize) -> Self {
        let storage = Self::default();
        storage.lock().quota = Some(bytes);
        storage
    }

    /// Cambia la cuota en caliente; `None` la elimina
    pub fn set_quota(&self, quota: Option<usize>) {
        self.lock().quota = quota;
    }

    /// Número de escrituras correctas desde la creación
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().entries.contains_key(key)
    }

    /// Escribe un valor sin pasar por la cuota ni el contador
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.lock()
            .entries
            .insert(key.to_string(), value.to_string());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        // un panic con el lock tomado no deja el mapa a medias
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.lock().entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let mut inner = self.lock();

        if let Some(quota) = inner.quota {
            let used = inner.used_bytes_without(key);
            let needed = key.len() + value.len();
            let available = quota.saturating_sub(used);
            if needed > available {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    available,
                });
            }
        }

        inner.entries.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.lock().entries.remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Un fichero `<clave>.json` por clave dentro de `dir`
///
/// Todo byte de la clave que no sea alfanumérico ASCII o `-` se escribe como
/// `%XX` (`bosco:v1:Jueves` -> `bosco%3Av1%3AJueves.json`), así que dos claves
/// distintas nunca comparten fichero.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Abre (y crea si hace falta) el directorio de datos
    pub fn open(dir: impl AsRef<Path>) -> StorageResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir.to_string_lossy(), e))?;
        tracing::info!(dir = %dir.display(), "Almacenamiento en ficheros listo");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut file_name = String::with_capacity(key.len() + 5);
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                file_name.push(byte as char);
            } else {
                let _ = write!(file_name, "%{:02X}", byte);
            }
        }
        file_name.push_str(".json");
        self.dir.join(file_name)
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(key, e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        // fichero temporal en el mismo directorio y `persist`: nunca queda un
        // snapshot a medias, y si algo falla el temporal se borra al soltarlo
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| StorageError::io(key, e))?;
        tmp.write_all(value.as_bytes())
            .map_err(|e| StorageError::io(key, e))?;
        tmp.persist(self.path_for(key))
            .map_err(|e| StorageError::io(key, e.error))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(key, e)),
        }
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
