#[macro_use]
pub extern crate lazy_static;

pub mod claims;
pub mod db;
pub mod error;
pub mod routes;
pub mod schema;
pub mod session;
pub mod settings;
pub mod templates;

use crate::error::SiteError;
use diesel_migrations::{embed_migrations, EmbeddedMigrations};

pub type DbPool = diesel::r2d2::Pool<diesel::r2d2::ConnectionManager<diesel::PgConnection>>;
pub type PostId = i32;
pub type CommentId = i32;
pub type UserId = i32;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Runs a diesel closure on the actix blocking thread pool.
pub async fn blocking<F, T>(pool: &DbPool, f: F) -> Result<T, SiteError>
where
  F: FnOnce(&mut diesel::PgConnection) -> T + Send + 'static,
  T: Send + 'static,
{
  let pool = pool.clone();
  let res = actix_web::web::block(move || {
    let mut conn = pool.get()?;
    let res = (f)(&mut conn);
    Ok(res) as Result<T, SiteError>
  })
  .await??;

  Ok(res)
}
