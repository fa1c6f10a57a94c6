//! # Bosco Tables
//!
//! Tablero de reservas de mesas para los tres días de un evento. Cada día
//! guarda un snapshot con las reservas por mesa y una lista de invitados
//! independiente; el snapshot se escribe entero en cada cambio.
//!
//! - [`db`] - Tablero por día, modelos y medios de persistencia
//! - [`api`] - Rutas HTTP que usa la vista web
//! - [`config`] - Configuración desde variables de entorno
//! - [`error_log`] - Logging de cadenas de errores

pub mod api;
pub mod config;
pub mod db;
pub mod error_log;

pub use config::{Config, ConfigError, StorageBackend};
pub use db::{Day, DayStore, Field, Reservation, TableState};
