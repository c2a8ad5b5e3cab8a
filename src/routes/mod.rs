use actix_web::http::header::LOCATION;
use actix_web::HttpResponse;
use serde::Deserialize;

pub mod auth;
pub mod categories;
pub mod comments;
pub mod feeds;
pub mod posts;
pub mod profiles;

pub fn redirect(location: &str) -> HttpResponse {
  HttpResponse::SeeOther()
    .insert_header((LOCATION, location))
    .finish()
}

#[derive(Deserialize)]
pub struct PageParams {
  pub page: Option<String>,
}

impl PageParams {
  /// `?page=banana` counts as page 1, like the paginator the templates were
  /// written against.
  pub fn number(&self) -> Option<i64> {
    self.page.as_deref().and_then(|p| p.parse().ok())
  }
}
