use crate::claims::Claims;
use crate::db::user::User_;
use crate::db::Crud;
use crate::error::{SiteError, SiteErrorType};
use crate::{blocking, DbPool};
use actix_web::cookie::{time::Duration, Cookie};
use actix_web::HttpRequest;

pub static AUTH_COOKIE: &str = "auth";

pub fn auth_cookie(jwt: String) -> Cookie<'static> {
  Cookie::build(AUTH_COOKIE, jwt)
    .path("/")
    .http_only(true)
    .finish()
}

pub fn logout_cookie() -> Cookie<'static> {
  Cookie::build(AUTH_COOKIE, "")
    .path("/")
    .max_age(Duration::ZERO)
    .finish()
}

fn jwt_user_id(req: &HttpRequest) -> Option<i32> {
  let cookie = req.cookie(AUTH_COOKIE)?;
  Claims::decode(cookie.value()).ok().map(|t| t.claims.id)
}

/// Resolves the session cookie to a user row. A missing, garbled or stale
/// token is simply an anonymous request, never an error.
pub async fn current_user(req: &HttpRequest, pool: &DbPool) -> Result<Option<User_>, SiteError> {
  let user_id = match jwt_user_id(req) {
    Some(id) => id,
    None => return Ok(None),
  };
  Ok(blocking(pool, move |conn| User_::read(conn, user_id)).await?.ok())
}

pub async fn require_user(req: &HttpRequest, pool: &DbPool) -> Result<User_, SiteError> {
  current_user(req, pool)
    .await?
    .ok_or_else(|| SiteErrorType::NotLoggedIn.into())
}
