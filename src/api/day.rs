//! # API de días
//!
//! - `GET /days` - Días del evento y cuál está activo
//! - `GET /days/{day}` - Snapshot completo del día
//! - `DELETE /days/{day}?confirm=true` - Borra todo lo guardado del día

use actix_web::{delete, get, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use super::{parse_day, with_day, AppError, AppResult, BoardData};
use crate::db::{Day, DaySnapshot};

#[derive(Serialize)]
struct DayInfo {
    day: Day,
    key: String,
    active: bool,
}

#[derive(Serialize)]
struct DayView {
    day: Day,
    #[serde(flatten)]
    snapshot: DaySnapshot,
}

#[derive(Deserialize)]
struct ClearDayQuery {
    #[serde(default)]
    confirm: bool,
}

#[get("/days")]
async fn list_days(board: BoardData) -> AppResult<impl Responder> {
    let days = web::block(move || {
        let store = board
            .lock()
            .map_err(|_| AppError::internal_trace("Mutex del tablero envenenado", None))?;

        Ok::<_, AppError>(
            Day::ALL
                .into_iter()
                .map(|day| DayInfo {
                    day,
                    key: store.storage_key(day),
                    active: store.day() == day,
                })
                .collect::<Vec<_>>(),
        )
    })
    .await??;

    Ok(HttpResponse::Ok().json(days))
}

#[get("/days/{day}")]
async fn get_day(board: BoardData, path: web::Path<String>) -> AppResult<impl Responder> {
    let day = parse_day(&path)?;
    let snapshot = with_day(board, day, |store| store.snapshot().clone()).await?;

    Ok(HttpResponse::Ok().json(DayView { day, snapshot }))
}

/// Borra el día. La vista debe pedir confirmación al usuario y mandar
/// `confirm=true`; sin ella la petición se rechaza.
#[delete("/days/{day}")]
async fn clear_day(
    board: BoardData,
    path: web::Path<String>,
    query: web::Query<ClearDayQuery>,
) -> AppResult<impl Responder> {
    let day = parse_day(&path)?;

    if !query.confirm {
        return Err(AppError::validation_field(
            "confirm",
            "Borrar un día requiere confirm=true",
        ));
    }

    let snapshot = with_day(board, day, move |store| {
        store.clear_day(day);
        store.snapshot().clone()
    })
    .await?;

    Ok(HttpResponse::Ok().json(DayView { day, snapshot }))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_days);
    cfg.service(get_day);
    cfg.service(clear_day);
}
