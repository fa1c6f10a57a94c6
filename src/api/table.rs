//! # API de mesas
//!
//! Edición de la reserva de una mesa en un día. Los valores se guardan tal
//! cual llegan; el nombre del campo sí tiene que ser uno de los conocidos.

use actix_web::{delete, get, put, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use super::{check_table, parse_day, with_day, AppError, AppResult, BoardData};
use crate::db::{Field, Reservation, TableState};

#[derive(Serialize)]
struct TableDetail {
    reservation: Reservation,
    state: TableState,
    color: &'static str,
}

impl TableDetail {
    fn of(reservation: Reservation, state: TableState) -> Self {
        Self {
            reservation,
            state,
            color: state.fill_color(),
        }
    }
}

#[derive(Deserialize)]
struct SetFieldBody {
    value: String,
}

/// Resumen de todas las mesas para la vista de lista y el plano
#[get("/days/{day}/tables")]
async fn list_tables(board: BoardData, path: web::Path<String>) -> AppResult<impl Responder> {
    let day = parse_day(&path)?;
    let tables = with_day(board, day, |store| store.tables()).await?;

    Ok(HttpResponse::Ok().json(tables))
}

#[get("/days/{day}/tables/{table}")]
async fn get_table(
    board: BoardData,
    path: web::Path<(String, u32)>,
) -> AppResult<impl Responder> {
    let (day, table) = path.into_inner();
    let day = parse_day(&day)?;
    let table = check_table(table)?;

    let detail = with_day(board, day, move |store| {
        TableDetail::of(store.reservation(table), store.table_state(table))
    })
    .await?;

    Ok(HttpResponse::Ok().json(detail))
}

#[put("/days/{day}/tables/{table}/{field}")]
async fn set_field(
    board: BoardData,
    path: web::Path<(String, u32, String)>,
    body: web::Json<SetFieldBody>,
) -> AppResult<impl Responder> {
    let (day, table, field) = path.into_inner();
    let day = parse_day(&day)?;
    let table = check_table(table)?;
    let field = field
        .parse::<Field>()
        .map_err(|e| AppError::validation_field("field", &e.to_string()))?;
    let value = body.into_inner().value;

    let detail = with_day(board, day, move |store| {
        store.set_field(table, field, value);
        TableDetail::of(store.reservation(table), store.table_state(table))
    })
    .await?;

    Ok(HttpResponse::Ok().json(detail))
}

#[delete("/days/{day}/tables/{table}")]
async fn clear_table(
    board: BoardData,
    path: web::Path<(String, u32)>,
) -> AppResult<impl Responder> {
    let (day, table) = path.into_inner();
    let day = parse_day(&day)?;
    let table = check_table(table)?;

    let detail = with_day(board, day, move |store| {
        store.clear_table(table);
        TableDetail::of(store.reservation(table), store.table_state(table))
    })
    .await?;

    Ok(HttpResponse::Ok().json(detail))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_tables);
    cfg.service(get_table);
    cfg.service(set_field);
    cfg.service(clear_table);
}
