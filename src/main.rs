use std::io;

use actix_web::{web, HttpServer};
use env_logger::Env;
use log::info;

use taskhub::{build_app, config::Config, store, AppState};

fn to_io_error(err: taskhub::error::AppError) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(to_io_error)?;
    let store = store::connect(&config).await.map_err(to_io_error)?;
    let state = web::Data::new(AppState::new(store.clone(), &config));

    info!(
        "Starting server at {} ({} store)",
        config.server_url(),
        store.kind()
    );
    HttpServer::new(move || build_app(state.clone()))
        .bind((config.server_host.as_str(), config.server_port))?
        .run()
        .await?;

    info!("Server stopped, closing store");
    store.close().await;
    Ok(())
}
