//! # API de la lista de invitados
//!
//! Lista independiente de las reservas de mesa ("podium").

use actix_web::{delete, get, post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use super::{parse_day, with_day, AppResult, BoardData};

#[derive(Deserialize)]
struct AddGuestsBody {
    /// Uno o varios nombres separados por comas o saltos de línea
    text: String,
}

#[derive(Serialize)]
struct GuestListResponse {
    guests: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    added: Option<usize>,
}

#[derive(Serialize)]
struct RemoveGuestResponse {
    removed: Option<String>,
    guests: Vec<String>,
}

#[get("/days/{day}/guests")]
async fn get_guests(board: BoardData, path: web::Path<String>) -> AppResult<impl Responder> {
    let day = parse_day(&path)?;
    let guests = with_day(board, day, |store| store.guest_list().to_vec()).await?;

    Ok(HttpResponse::Ok().json(GuestListResponse {
        guests,
        added: None,
    }))
}

#[post("/days/{day}/guests")]
async fn add_guests(
    board: BoardData,
    path: web::Path<String>,
    body: web::Json<AddGuestsBody>,
) -> AppResult<impl Responder> {
    let day = parse_day(&path)?;
    let text = body.into_inner().text;

    let (added, guests) = with_day(board, day, move |store| {
        let added = store.add_guests(&text);
        (added, store.guest_list().to_vec())
    })
    .await?;

    Ok(HttpResponse::Ok().json(GuestListResponse {
        guests,
        added: Some(added),
    }))
}

/// Quita un invitado por posición. Un índice fuera de rango devuelve
/// `removed: null` y la lista sin cambios.
#[delete("/days/{day}/guests/{index}")]
async fn remove_guest(
    board: BoardData,
    path: web::Path<(String, usize)>,
) -> AppResult<impl Responder> {
    let (day, index) = path.into_inner();
    let day = parse_day(&day)?;

    let (removed, guests) = with_day(board, day, move |store| {
        let removed = store.remove_guest(index);
        (removed, store.guest_list().to_vec())
    })
    .await?;

    Ok(HttpResponse::Ok().json(RemoveGuestResponse { removed, guests }))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_guests);
    cfg.service(add_guests);
    cfg.service(remove_guest);
}
