use crate::claims::Claims;
use crate::db::user::{UserForm, User_};
use crate::error::SiteError;
use crate::session::{auth_cookie, logout_cookie};
use crate::settings::Settings;
use crate::templates::{base_context, render};
use crate::{blocking, DbPool};
use actix_web::http::header::LOCATION;
use actix_web::web::{self, Data, Form};
use actix_web::HttpResponse;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::{Deserialize, Serialize};

pub fn config(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/register", web::get().to(register_get))
    .route("/register", web::post().to(register_post))
    .route("/login", web::get().to(login_get))
    .route("/login", web::post().to(login_post))
    .route("/logout", web::get().to(logout));
}

#[derive(Deserialize, Serialize, Clone)]
pub struct RegisterFormData {
  pub username: String,
  pub email: Option<String>,
  pub password: String,
  pub password_verify: String,
}

#[derive(Deserialize, Serialize, Clone)]
pub struct LoginFormData {
  pub username: String,
  pub password: String,
}

fn logged_in(user_id: i32) -> Result<HttpResponse, SiteError> {
  let jwt = Claims::jwt(user_id, Settings::get().hostname)?;
  Ok(
    HttpResponse::SeeOther()
      .insert_header((LOCATION, "/"))
      .cookie(auth_cookie(jwt))
      .finish(),
  )
}

fn register_error(data: &RegisterFormData, message: &str) -> Result<HttpResponse, SiteError> {
  let mut context = base_context(&None);
  context.insert("form", data);
  context.insert("error", message);
  render("register.html", &context)
}

async fn register_get() -> Result<HttpResponse, SiteError> {
  let mut context = base_context(&None);
  context.insert(
    "form",
    &RegisterFormData {
      username: String::new(),
      email: None,
      password: String::new(),
      password_verify: String::new(),
    },
  );
  render("register.html", &context)
}

async fn register_post(
  pool: Data<DbPool>,
  data: Form<RegisterFormData>,
) -> Result<HttpResponse, SiteError> {
  let data = data.into_inner();

  let username = data.username.trim().to_owned();
  if username.is_empty() {
    return register_error(&data, "A username is required.");
  }
  if data.password.is_empty() || data.password != data.password_verify {
    return register_error(&data, "Passwords do not match.");
  }

  let form = UserForm {
    name: username,
    first_name: None,
    last_name: None,
    email: data
      .email
      .as_deref()
      .map(str::trim)
      .filter(|e| !e.is_empty())
      .map(Into::into),
    password_encrypted: data.password.to_owned(),
  };

  let registered = blocking(&pool, move |conn| User_::register(conn, &form)).await?;
  match registered {
    Ok(user) => logged_in(user.id),
    Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
      register_error(&data, "That username or email is already taken.")
    }
    Err(e) => Err(e.into()),
  }
}

async fn login_get() -> Result<HttpResponse, SiteError> {
  let mut context = base_context(&None);
  context.insert(
    "form",
    &LoginFormData {
      username: String::new(),
      password: String::new(),
    },
  );
  render("login.html", &context)
}

async fn login_post(
  pool: Data<DbPool>,
  data: Form<LoginFormData>,
) -> Result<HttpResponse, SiteError> {
  let data = data.into_inner();

  let username = data.username.trim().to_owned();
  let found = blocking(&pool, move |conn| User_::find_by_username(conn, &username)).await?;

  // Same message whether the name or the password was wrong.
  let user = match found {
    Ok(user) if user.verify_password(&data.password) => user,
    _ => {
      let mut context = base_context(&None);
      context.insert("form", &data);
      context.insert("error", "Incorrect username or password.");
      return render("login.html", &context);
    }
  };

  logged_in(user.id)
}

async fn logout() -> HttpResponse {
  HttpResponse::SeeOther()
    .insert_header((LOCATION, "/"))
    .cookie(logout_cookie())
    .finish()
}
