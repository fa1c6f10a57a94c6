//! # Tablero por día
//!
//! [`DayStore`] es el único dueño de las reservas y de la lista de invitados
//! del día activo. La vista nunca los modifica directamente: llama a las
//! operaciones de este módulo, que actualizan el snapshot en memoria y lo
//! escriben entero en el medio de persistencia antes de volver.
//!
//! Los fallos del medio nunca llegan al llamador. Un snapshot que no se puede
//! leer se trata como vacío y una escritura fallida se registra en el log sin
//! deshacer el cambio en memoria, así el tablero sigue siendo usable aunque
//! la persistencia deje de funcionar.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use super::models::{DaySnapshot, Day, Field, Reservation, TableState, TABLES};
use super::storage::KeyValueStorage;
use crate::error_log::ErrorLogExt;

pub const DEFAULT_KEY_PREFIX: &str = "bosco:v1";

/// Fila de la vista de lista: una por mesa del plano
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub table: u32,
    pub name: String,
    pub state: TableState,
    pub color: &'static str,
}

pub struct DayStore {
    storage: Box<dyn KeyValueStorage>,
    key_prefix: String,
    day: Day,
    snapshot: DaySnapshot,
}

impl DayStore {
    /// Crea el tablero con el prefijo de claves por defecto y carga el
    /// primer día.
    pub fn new(storage: impl KeyValueStorage + 'static) -> Self {
        Self::with_prefix(storage, DEFAULT_KEY_PREFIX)
    }

    pub fn with_prefix(storage: impl KeyValueStorage + 'static, key_prefix: &str) -> Self {
        let mut store = Self {
            storage: Box::new(storage),
            key_prefix: key_prefix.to_string(),
            day: Day::default(),
            snapshot: DaySnapshot::default(),
        };
        store.select_day(Day::default());
        store
    }

    pub fn day(&self) -> Day {
        self.day
    }

    pub fn snapshot(&self) -> &DaySnapshot {
        &self.snapshot
    }

    pub fn guest_list(&self) -> &[String] {
        &self.snapshot.guest_list
    }

    pub fn storage_key(&self, day: Day) -> String {
        day.storage_key(&self.key_prefix)
    }

    /// Carga el snapshot de `day` y lo convierte en el día activo.
    ///
    /// Si no hay nada guardado, o lo guardado no se puede leer, el día
    /// arranca vacío.
    pub fn select_day(&mut self, day: Day) {
        let key = self.storage_key(day);
        self.day = day;
        self.snapshot = self.load(&key).unwrap_or_default();

        tracing::debug!(
            day = %day,
            reservations = self.snapshot.reservations.len(),
            guests = self.snapshot.guest_list.len(),
            "Día cargado"
        );
    }

    fn load(&self, key: &str) -> Option<DaySnapshot> {
        let raw = self
            .storage
            .get(key)
            .log_error_level(tracing::Level::WARN)
            .ok()??;

        DaySnapshot::from_json(&raw)
            .log_error_level(tracing::Level::WARN)
            .ok()
    }

    /// Reserva guardada de la mesa o, si no existe, un registro vacío
    pub fn reservation(&self, table: u32) -> Reservation {
        self.snapshot
            .reservations
            .get(&table)
            .cloned()
            .unwrap_or_else(|| Reservation::empty(table))
    }

    pub fn table_state(&self, table: u32) -> TableState {
        TableState::of(self.snapshot.reservations.get(&table))
    }

    /// Resumen de todas las mesas del plano, en el orden del plano
    pub fn tables(&self) -> Vec<TableSummary> {
        TABLES
            .iter()
            .map(|&table| {
                let state = self.table_state(table);
                TableSummary {
                    table,
                    name: self
                        .snapshot
                        .reservations
                        .get(&table)
                        .map(|r| r.name.clone())
                        .unwrap_or_default(),
                    state,
                    color: state.fill_color(),
                }
            })
            .collect()
    }

    /// Asigna un campo de la reserva, creándola si no existía.
    ///
    /// El valor se guarda tal cual. Un registro que queda en blanco no se
    /// borra: sólo [`clear_table`](Self::clear_table) elimina reservas.
    pub fn set_field(&mut self, table: u32, field: Field, value: impl Into<String>) {
        self.snapshot
            .reservations
            .entry(table)
            .or_insert_with(|| Reservation::empty(table))
            .set(field, value.into());

        tracing::debug!(day = %self.day, table, field = %field, "Campo actualizado");
        self.persist();
    }

    /// Elimina la reserva de la mesa. Sin reserva no hace nada.
    pub fn clear_table(&mut self, table: u32) {
        if self.snapshot.reservations.remove(&table).is_none() {
            return;
        }

        tracing::debug!(day = %self.day, table, "Mesa liberada");
        self.persist();
    }

    /// Añade nombres a la lista de invitados.
    ///
    /// `text` se parte por saltos de línea o comas; cada trozo se recorta y
    /// los vacíos se descartan. Devuelve cuántos nombres se añadieron; si son
    /// cero no se escribe nada.
    pub fn add_guests(&mut self, text: &str) -> usize {
        let names: Vec<String> = split_guest_names(text).collect();
        if names.is_empty() {
            return 0;
        }

        let added = names.len();
        self.snapshot.guest_list.extend(names);

        tracing::debug!(day = %self.day, added, "Invitados añadidos");
        self.persist();
        added
    }

    /// Quita el invitado en `index`. Un índice fuera de rango no hace nada.
    pub fn remove_guest(&mut self, index: usize) -> Option<String> {
        if index >= self.snapshot.guest_list.len() {
            return None;
        }

        let removed = self.snapshot.guest_list.remove(index);
        tracing::debug!(day = %self.day, index, "Invitado eliminado");
        self.persist();
        Some(removed)
    }

    /// Borra todo lo guardado para `day` y deja ese día activo y vacío.
    ///
    /// La confirmación del usuario es cosa de la vista.
    pub fn clear_day(&mut self, day: Day) {
        let key = self.storage_key(day);
        self.storage
            .remove(&key)
            .log_error_context("borrando el snapshot del día")
            .ok();

        self.day = day;
        self.snapshot = DaySnapshot::default();
        tracing::info!(day = %day, "Día borrado");
    }

    // Un único intento por mutación; el fallo se registra y se sigue
    fn persist(&mut self) {
        self.snapshot.saved_at = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));

        let key = self.storage_key(self.day);
        let raw = match self.snapshot.to_json().log_error_context("serializando el snapshot") {
            Ok(raw) => raw,
            Err(_) => return,
        };

        if self
            .storage
            .set(&key, &raw)
            .log_error_context("guardando el snapshot del día")
            .is_ok()
        {
            tracing::debug!(
                key = %key,
                backend = self.storage.backend_name(),
                bytes = raw.len(),
                "Snapshot guardado"
            );
        }
    }
}

/// Parte un bloque de texto en nombres de invitados
pub fn split_guest_names(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(['\n', ','])
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
