use actix_web::{App, HttpServer, middleware::Logger};
use anyhow::Context;
use dotenv::dotenv;
use env_logger::Env;

use mentorhub_backend::{
    app::AppServices,
    config::{
        app_config::AppConfig,
        cors::configure_cors,
        database::{connect_to_database, create_indexes},
    },
    repositories::Repositories,
    routes::configure_routes,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;

    let client = connect_to_database(&config.mongodb_uri)
        .await
        .context("Failed to connect to MongoDB")?;
    let database = client.database(&config.db_name);
    create_indexes(&database)
        .await
        .context("Failed to create indexes")?;

    let services = AppServices::new(&config, Repositories::mongo(&client, &database));

    let bind_addr = config.bind_address();
    log::info!("Listening on {}:{}", bind_addr.0, bind_addr.1);

    let client_url = config.client_url.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(configure_cors(&client_url))
            .configure(|cfg| configure_routes(cfg, &services))
    })
    .bind(bind_addr)
    .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?
    .run()
    .await
    .context("Server terminated unexpectedly")?;

    Ok(())
}
