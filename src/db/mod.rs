use diesel::{result::Error, PgConnection};
use serde::Serialize;

pub mod category;
pub mod comment;
pub mod comment_view;
pub mod location;
pub mod post;
pub mod post_view;
pub mod user;

pub trait Crud<T> {
  fn create(conn: &mut PgConnection, form: &T) -> Result<Self, Error>
  where
    Self: Sized;
  fn read(conn: &mut PgConnection, id: i32) -> Result<Self, Error>
  where
    Self: Sized;
  fn update(conn: &mut PgConnection, id: i32, form: &T) -> Result<Self, Error>
  where
    Self: Sized;
  fn delete(conn: &mut PgConnection, id: i32) -> Result<usize, Error>
  where
    Self: Sized;
}

pub trait MaybeOptional<T> {
  fn get_optional(self) -> Option<T>;
}

impl<T> MaybeOptional<T> for T {
  fn get_optional(self) -> Option<T> {
    Some(self)
  }
}

impl<T> MaybeOptional<T> for Option<T> {
  fn get_optional(self) -> Option<T> {
    self
  }
}

pub fn limit_and_offset(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
  let page = page.unwrap_or(1);
  let limit = limit.unwrap_or(10);
  let offset = limit * (page - 1);
  (limit, offset)
}

/// One page of results plus the numbers the templates need to draw the
/// pager. Mirrors the page object the listing templates iterate over.
#[derive(Serialize, Debug, PartialEq)]
pub struct Paginated<T: Serialize> {
  pub items: Vec<T>,
  pub page: i64,
  pub total_pages: i64,
  pub has_previous: bool,
  pub has_next: bool,
}

impl<T: Serialize> Paginated<T> {
  pub fn new(items: Vec<T>, page: i64, total_pages: i64) -> Self {
    Paginated {
      items,
      page,
      total_pages,
      has_previous: page > 1,
      has_next: page < total_pages,
    }
  }
}

pub fn total_pages(count: i64, per_page: i64) -> i64 {
  // A page holds at least one item, whatever the config says.
  let per_page = per_page.max(1);
  std::cmp::max(1, (count + per_page - 1) / per_page)
}

/// Out-of-range pages land on the nearest valid one, anything unparseable
/// lands on the first.
pub fn clamp_page(requested: Option<i64>, total_pages: i64) -> i64 {
  requested.unwrap_or(1).clamp(1, total_pages)
}

#[cfg(test)]
pub fn establish_unpooled_connection() -> PgConnection {
  use crate::settings::Settings;
  use diesel::Connection;
  let db_url = Settings::get().get_database_url();
  PgConnection::establish(&db_url)
    .unwrap_or_else(|_| panic!("Error connecting to {}", db_url))
}
