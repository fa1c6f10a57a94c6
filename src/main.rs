//! # Bosco Tables Server
//!
//! Servidor del tablero de reservas construido con Rust y Actix Web.
//!
//! ## Configuración
//!
//! Variables de entorno (archivo `.env`), ver [`bosco_tables::config`]:
//!
//! ```env
//! STORAGE_BACKEND=file
//! STORAGE_DIR=./data
//! BIND_ADDRESS=0.0.0.0:8080
//! RUST_LOG=debug
//! ```
//!
//! ## Arquitectura
//!
//! ```text
//! Vista web (plano, lista, invitados)
//!     ↓ HTTP/JSON
//! API REST (Actix Web)
//!     ↓ DayStore (un snapshot por día)
//! Memoria | Ficheros JSON | MongoDB
//! ```

use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::sync::Mutex;

use bosco_tables::{api, Config, DayStore};

/// Arranca el servidor
///
/// 1. Carga variables de entorno desde `.env`
/// 2. Configura el logging con tracing
/// 3. Abre el medio de persistencia configurado
/// 4. Carga el primer día y levanta el servidor HTTP
///
/// # Errores
///
/// Retorna `std::io::Error` si la configuración es inválida, si el medio de
/// persistencia no se puede abrir o si no se puede bindear la dirección.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "bosco_tables=debug".parse::<tracing_subscriber::filter::Directive>() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env().map_err(|e| {
        tracing::error!("Configuración inválida: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    tracing::info!(backend = config.storage.name(), "Iniciando Bosco Tables...");

    // El driver síncrono de MongoDB no puede correr dentro del runtime
    let backend = config.storage.clone();
    let key_prefix = config.key_prefix.clone();
    let store = tokio::task::spawn_blocking(move || {
        backend
            .open()
            .map(|storage| DayStore::with_prefix(storage, &key_prefix))
    })
    .await
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?
    .map_err(|e| {
        tracing::error!("Error abriendo el almacenamiento: {}", e);
        std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Error de almacenamiento: {}", e),
        )
    })?;

    let board = web::Data::new(Mutex::new(store));
    let static_dir = config.static_dir.clone().filter(|dir| {
        let exists = dir.is_dir();
        if !exists {
            tracing::warn!(dir = %dir.display(), "STATIC_DIR no existe, no se sirven estáticos");
        }
        exists
    });

    tracing::info!("Servidor iniciando en {}", config.bind_address);

    HttpServer::new(move || {
        let mut app = App::new()
            .app_data(board.clone())
            .wrap(Logger::default())
            .configure(api::init_routes);

        if let Some(dir) = &static_dir {
            app = app
                .service(Files::new("/static", dir).index_file("index.html"))
                .route("/", web::get().to(|| async {
                    actix_web::HttpResponse::PermanentRedirect()
                        .append_header(("Location", "/static/index.html"))
                        .finish()
                }));
        }

        app
    })
    .bind(&config.bind_address)?
    .run()
    .await
}
