use crate::db::user::User_;
use crate::error::SiteError;
use crate::settings::Settings;
use actix_web::HttpResponse;
use tera::{Context, Tera};

lazy_static! {
  pub static ref TEMPLATES: Tera = match Tera::new("templates/**/*.html") {
    Ok(t) => t,
    Err(e) => panic!("Template parsing error: {}", e),
  };
}

/// Context with everything the base layout expects.
pub fn base_context(user: &Option<User_>) -> Context {
  let mut context = Context::new();
  context.insert("site_name", &Settings::get().site_name);
  context.insert("user", user);
  context
}

pub fn render(name: &str, context: &Context) -> Result<HttpResponse, SiteError> {
  let body = TEMPLATES.render(name, context)?;
  Ok(
    HttpResponse::Ok()
      .content_type("text/html; charset=utf-8")
      .body(body),
  )
}
