//! # Módulo API
//!
//! Frontera HTTP entre la vista web y el tablero. Cada ruta lleva el día en
//! el path; si no es el día activo, se selecciona antes de operar.
//!
//! ## Módulos principales
//!
//! - [`day`] - Días del evento (listar, ver snapshot, borrar día)
//! - [`table`] - Reservas de mesa (ver, editar campo, liberar)
//! - [`guest`] - Lista de invitados del día
//! - [`errors`] - Manejo de errores de la aplicación

pub mod day;
pub mod errors;
pub mod guest;
pub mod table;

// Re-exportar tipos comunes para facilitar su uso
pub use errors::{AppError, AppResult, ErrorResponse};
pub use crate::error_log::ErrorLogExt;

use actix_web::web;
use std::sync::Mutex;

use crate::db::{is_known_table, Day, DayStore};

/// Estado compartido: un único tablero, serializado por el mutex
pub type BoardData = web::Data<Mutex<DayStore>>;

/// Configura todas las rutas de la API
///
/// - `/days/*` - Ver [`day::routes`]
/// - `/days/{day}/tables/*` - Ver [`table::routes`]
/// - `/days/{day}/guests/*` - Ver [`guest::routes`]
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    day::routes(cfg);
    table::routes(cfg);
    guest::routes(cfg);
}

pub(crate) fn parse_day(raw: &str) -> AppResult<Day> {
    raw.parse()
        .map_err(|_| AppError::not_found_id("Día", raw))
}

pub(crate) fn check_table(table: u32) -> AppResult<u32> {
    if is_known_table(table) {
        Ok(table)
    } else {
        Err(AppError::not_found_id("Mesa", &table.to_string()))
    }
}

/// Ejecuta `f` sobre el tablero con `day` como día activo.
///
/// El medio de persistencia puede bloquear (ficheros, driver síncrono de
/// MongoDB), así que todo corre en el pool bloqueante de actix.
pub(crate) async fn with_day<R, F>(board: BoardData, day: Day, f: F) -> AppResult<R>
where
    F: FnOnce(&mut DayStore) -> R + Send + 'static,
    R: Send + 'static,
{
    web::block(move || {
        let mut store = board
            .lock()
            .map_err(|_| AppError::internal_trace("Mutex del tablero envenenado", None))?;

        if store.day() != day {
            store.select_day(day);
        }

        Ok(f(&mut *store))
    })
    .await?
}
