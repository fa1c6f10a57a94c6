//! # Modelos del tablero
//!
//! Tipos persistidos por día: reservas de mesa, lista de invitados y el
//! snapshot que los agrupa. Los nombres de campo en JSON son camelCase para
//! que un snapshot guardado por la vista web se pueda leer sin conversión.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Mesas del plano del local
pub const TABLES: [u32; 21] = [
    10, 11, 12, 13, 20, 21, 22, 23, 30, 31, 32, 33, 40, 41, 42, 43, 50, 51, 60, 61, 70,
];

pub const STATUS_CONFIRMED: &str = "confirmada";
pub const STATUS_PENDING: &str = "pendiente";

/// Devuelve `true` si la mesa existe en el plano
pub fn is_known_table(table: u32) -> bool {
    TABLES.contains(&table)
}

// `null` en el JSON almacenado se trata igual que un campo ausente
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Día del evento. Cada día tiene su propio snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Day {
    #[default]
    Jueves,
    Viernes,
    Sabado,
}

impl Day {
    pub const ALL: [Day; 3] = [Day::Jueves, Day::Viernes, Day::Sabado];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Jueves => "Jueves",
            Day::Viernes => "Viernes",
            Day::Sabado => "Sabado",
        }
    }

    /// Clave de almacenamiento del día, p. ej. `bosco:v1:Jueves`
    pub fn storage_key(&self, prefix: &str) -> String {
        format!("{}:{}", prefix, self.as_str())
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Día desconocido: '{0}'")]
pub struct UnknownDay(pub String);

impl FromStr for Day {
    type Err = UnknownDay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Day::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDay(s.to_string()))
    }
}

/// Campos editables de una reserva
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    PartySize,
    Rp,
    Notes,
    Status,
    GuestsText,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::PartySize,
        Field::Rp,
        Field::Notes,
        Field::Status,
        Field::GuestsText,
    ];

    /// Nombre del campo tal como aparece en el JSON persistido
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::PartySize => "partySize",
            Field::Rp => "rp",
            Field::Notes => "notes",
            Field::Status => "status",
            Field::GuestsText => "guestsText",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Campo desconocido: '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Reserva de una mesa para un día
///
/// Sólo existe en el snapshot si alguna vez se editó. Todos los campos de
/// texto se guardan tal cual los escribe el usuario, sin validación.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reservation {
    pub table: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub party_size: String,
    #[serde(deserialize_with = "null_as_default")]
    pub rp: String,
    #[serde(deserialize_with = "null_as_default")]
    pub notes: String,
    /// `""`, `"confirmada"` o `"pendiente"`
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    /// Invitados de esta mesa, separados por comas. No tiene relación con
    /// la lista de invitados del día.
    #[serde(deserialize_with = "null_as_default")]
    pub guests_text: String,
}

impl Reservation {
    /// Registro por defecto: todos los textos vacíos y estado sin asignar
    pub fn empty(table: u32) -> Self {
        Self {
            table,
            ..Self::default()
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::PartySize => &self.party_size,
            Field::Rp => &self.rp,
            Field::Notes => &self.notes,
            Field::Status => &self.status,
            Field::GuestsText => &self.guests_text,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::PartySize => &mut self.party_size,
            Field::Rp => &mut self.rp,
            Field::Notes => &mut self.notes,
            Field::Status => &mut self.status,
            Field::GuestsText => &mut self.guests_text,
        };
        *slot = value;
    }

    /// `true` si algún campo tiene contenido distinto de espacios
    pub fn has_content(&self) -> bool {
        Field::ALL
            .into_iter()
            .any(|field| !self.get(field).trim().is_empty())
    }

    pub fn state(&self) -> TableState {
        if !self.has_content() {
            TableState::Empty
        } else if self.status.to_lowercase() == STATUS_CONFIRMED {
            TableState::Confirmed
        } else {
            TableState::Pending
        }
    }
}

/// Estado derivado de una mesa, usado sólo para pintarla
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableState {
    Empty,
    Pending,
    Confirmed,
}

impl TableState {
    pub fn of(reservation: Option<&Reservation>) -> Self {
        reservation.map_or(TableState::Empty, Reservation::state)
    }

    /// Color de relleno de la mesa en el plano
    pub fn fill_color(&self) -> &'static str {
        match self {
            TableState::Empty => "white",
            TableState::Pending => "#fde047",
            TableState::Confirmed => "#34d399",
        }
    }
}

/// Estado persistido de un día completo
///
/// Se escribe entero en cada mutación; `saved_at` registra la última
/// escritura en ISO-8601.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySnapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub reservations: BTreeMap<u32, Reservation>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub guest_list: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
}

impl DaySnapshot {
    /// Parsea un snapshot almacenado. Las reservas sin `table` lo toman de
    /// la clave del mapa.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        let mut snapshot: DaySnapshot = serde_json::from_str(raw)?;
        for (table, reservation) in snapshot.reservations.iter_mut() {
            reservation.table = *table;
        }
        Ok(snapshot)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty() && self.guest_list.is_empty()
    }
}
