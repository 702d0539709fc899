#![allow(async_fn_in_trait)]

mod config;
mod context;
mod core;
mod database;
mod error;
mod handlers;
mod impls;
mod middlewares;
mod privilege;
mod request;
mod response;

use actix_web::middleware::Logger;
use actix_web::web::{delete, get, post, put, scope, Data};
use actix_web::{App, HttpServer};
use anyhow::Context as _;
use env_logger::Env;
use log::info;
use sqlx::postgres::PgPoolOptions;

use crate::config::Config;
use crate::core::services::auth::seed_admin;
use crate::database::postgres::PgSqlxManager;
use crate::impls::gateway::snap::SnapGateway;
use crate::impls::generator::http::HttpGenerator;
use crate::middlewares::jwt::Jwt;
use crate::privilege::Privilege;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let config = Config::from_env().context("failed to load configuration")?;
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    sqlx::migrate!("./migrations").run(&pool).await.context("failed to run migrations")?;
    let manager = Data::new(PgSqlxManager::new(pool));
    if let Some(seed) = &config.admin {
        seed_admin(manager.begin().await?, seed).await?;
    }
    let privilege = Data::new(Privilege::new(&config.casbin_model, &config.casbin_policy).await?);
    let generator = Data::new(HttpGenerator::new(&config.ai)?);
    let gateway = Data::new(SnapGateway::new(&config.payment)?);
    let bind_addr = config.bind_addr.clone();
    let jwt_secret = config.jwt_secret.clone();
    let config = Data::new(config);
    info!("listening on {}", bind_addr);
    HttpServer::new(move || {
        App::new()
            .wrap(Jwt::new(&jwt_secret))
            .wrap(Logger::default())
            .app_data(manager.clone())
            .app_data(privilege.clone())
            .app_data(generator.clone())
            .app_data(gateway.clone())
            .app_data(config.clone())
            .service(
                scope("auth")
                    .route("signup", post().to(handlers::signup))
                    .route("login", post().to(handlers::login))
                    .route("logout", post().to(handlers::logout))
                    .route("me", get().to(handlers::me)),
            )
            .service(
                scope("skills")
                    .route("", get().to(handlers::skill::list))
                    .route("", post().to(handlers::skill::create))
                    .route("{skill_id}", delete().to(handlers::skill::delete)),
            )
            .service(
                scope("organisasi")
                    .route("", get().to(handlers::organisasi::list))
                    .route("", post().to(handlers::organisasi::create))
                    .service(
                        scope("me")
                            .route("", get().to(handlers::organisasi::mine))
                            .route("", put().to(handlers::organisasi::update))
                            .route("subscription", get().to(handlers::organisasi::subscription))
                            .route("payments", get().to(handlers::subscription::mine))
                            .route("checkout", post().to(handlers::subscription::checkout::<SnapGateway>))
                            .route("aspirasi", get().to(handlers::aspirasi::inbox))
                            .route("ai/recommendation", post().to(handlers::recommendation::ai_recommendation::<HttpGenerator>))
                            .route("ai/report", post().to(handlers::recommendation::ai_report::<HttpGenerator>)),
                    )
                    .service(
                        scope("{organisasi_id}")
                            .route("", get().to(handlers::organisasi::detail))
                            .route("aspirasi", post().to(handlers::aspirasi::submit)),
                    ),
            )
            .service(
                scope("aspirasi/{aspirasi_id}")
                    .route("review", put().to(handlers::aspirasi::review))
                    .route("respond", put().to(handlers::aspirasi::respond)),
            )
            .service(
                scope("events")
                    .route("", get().to(handlers::event::list))
                    .route("", post().to(handlers::event::create))
                    .service(
                        scope("{event_id}")
                            .route("", get().to(handlers::event::detail))
                            .route("", put().to(handlers::event::update))
                            .route("", delete().to(handlers::event::delete))
                            .route("conflicts", get().to(handlers::event::conflicts))
                            .route("register", post().to(handlers::participant::register))
                            .route("register", delete().to(handlers::participant::cancel))
                            .route("participants", get().to(handlers::participant::list))
                            .route("participants/{participant_id}", put().to(handlers::participant::set_status))
                            .route("feedback", get().to(handlers::feedback::list))
                            .route("feedback", post().to(handlers::feedback::submit)),
                    ),
            )
            .service(
                scope("me")
                    .route("jadwal", get().to(handlers::jadwal::list))
                    .route("jadwal", post().to(handlers::jadwal::create))
                    .route("jadwal/{jadwal_id}", put().to(handlers::jadwal::update))
                    .route("jadwal/{jadwal_id}", delete().to(handlers::jadwal::delete))
                    .route("registrations", get().to(handlers::participant::mine))
                    .route("aspirasi", get().to(handlers::aspirasi::mine))
                    .route("interests", get().to(handlers::skill::interests))
                    .route("interests", put().to(handlers::skill::set_interests))
                    .route("recommendations", get().to(handlers::recommendation::events)),
            )
            .service(scope("payments").route("notification", post().to(handlers::subscription::notification)))
            .service(
                scope("admin")
                    .route("dashboard", get().to(handlers::admin::dashboard))
                    .route("payments", get().to(handlers::subscription::list))
                    .route("payments/{payment_id}/confirm", put().to(handlers::subscription::confirm))
                    .route("payments/{payment_id}/reject", put().to(handlers::subscription::reject)),
            )
    })
    .bind(bind_addr)?
    .run()
    .await?;
    Ok(())
}
