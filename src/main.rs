use actix_web::{middleware, web::Data, App, HttpServer};
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;
use diesel_migrations::MigrationHarness;
use log::info;
use minipress::error::SiteError;
use minipress::settings::Settings;
use minipress::{blocking, routes, MIGRATIONS};

#[actix_web::main]
async fn main() -> Result<(), SiteError> {
  env_logger::init();
  let settings = Settings::get();

  let db_url = settings.get_database_url();
  let manager = ConnectionManager::<PgConnection>::new(&db_url);
  let pool = Pool::builder()
    .max_size(settings.database.pool_size)
    .build(manager)
    .unwrap_or_else(|_| panic!("Error connecting to {}", db_url));

  blocking(&pool, |conn| {
    conn
      .run_pending_migrations(MIGRATIONS)
      .map(|_| ())
      .map_err(|e| anyhow::anyhow!("Couldn't run migrations: {}", e))
  })
  .await??;

  info!(
    "Starting http server at {}:{}",
    settings.bind, settings.port
  );

  HttpServer::new(move || {
    App::new()
      .wrap(middleware::Logger::default())
      .app_data(Data::new(pool.clone()))
      .configure(routes::posts::config)
      .configure(routes::categories::config)
      .configure(routes::profiles::config)
      .configure(routes::comments::config)
      .configure(routes::auth::config)
      .configure(routes::feeds::config)
  })
  .bind((settings.bind, settings.port))?
  .run()
  .await?;

  Ok(())
}
