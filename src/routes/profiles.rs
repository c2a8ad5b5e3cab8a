use super::{redirect, PageParams};
use crate::db::post_view::PostQueryBuilder;
use crate::db::user::User_;
use crate::error::SiteError;
use crate::session::{current_user, require_user};
use crate::settings::Settings;
use crate::templates::{base_context, render};
use crate::{blocking, DbPool};
use actix_web::web::{self, Data, Form, Path, Query};
use actix_web::{HttpRequest, HttpResponse};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::{Deserialize, Serialize};

pub fn config(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/profile-edit", web::get().to(edit_get))
    .route("/profile-edit", web::post().to(edit_post))
    .route("/profile/{username}", web::get().to(profile));
}

#[derive(Deserialize, Serialize, Clone)]
pub struct ProfileFormData {
  pub username: String,
  pub first_name: Option<String>,
  pub last_name: Option<String>,
  pub email: Option<String>,
}

fn optional(value: &Option<String>) -> Option<String> {
  value
    .as_deref()
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .map(Into::into)
}

async fn profile(
  req: HttpRequest,
  pool: Data<DbPool>,
  path: Path<String>,
  query: Query<PageParams>,
) -> Result<HttpResponse, SiteError> {
  let user = current_user(&req, &pool).await?;
  let username = path.into_inner();

  let profile = blocking(&pool, move |conn| User_::find_by_username(conn, &username)).await??;

  // The owner sees their whole archive, everyone else the public subset.
  let is_owner = user.as_ref().map(|u| u.id) == Some(profile.id);
  let requested = query.number();
  let per_page = Settings::get().posts_per_page;
  let author_id = profile.id;
  let page_obj = blocking(&pool, move |conn| {
    PostQueryBuilder::create()
      .for_author_id(author_id)
      .show_unpublished(is_owner)
      .page(requested)
      .limit(per_page)
      .load_page(conn)
  })
  .await??;

  let mut context = base_context(&user);
  context.insert("profile", &profile);
  context.insert("is_owner", &is_owner);
  context.insert("page_obj", &page_obj);
  render("profile.html", &context)
}

async fn edit_get(req: HttpRequest, pool: Data<DbPool>) -> Result<HttpResponse, SiteError> {
  let user = require_user(&req, &pool).await?;

  let form = ProfileFormData {
    username: user.name.to_owned(),
    first_name: user.first_name.to_owned(),
    last_name: user.last_name.to_owned(),
    email: user.email.to_owned(),
  };

  let mut context = base_context(&Some(user));
  context.insert("form", &form);
  render("user.html", &context)
}

async fn edit_post(
  req: HttpRequest,
  pool: Data<DbPool>,
  data: Form<ProfileFormData>,
) -> Result<HttpResponse, SiteError> {
  let user = require_user(&req, &pool).await?;
  let data = data.into_inner();

  let username = data.username.trim().to_owned();
  if username.is_empty() {
    let mut context = base_context(&Some(user));
    context.insert("form", &data);
    context.insert("error", "A username is required.");
    return render("user.html", &context);
  }

  let user_id = user.id;
  let form = data.clone();
  let updated = blocking(&pool, move |conn| {
    User_::update_profile(
      conn,
      user_id,
      &username,
      optional(&form.first_name),
      optional(&form.last_name),
      optional(&form.email),
    )
  })
  .await?;

  match updated {
    Ok(updated) => Ok(redirect(&format!("/profile/{}", updated.name))),
    Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
      let mut context = base_context(&Some(user));
      context.insert("form", &data);
      context.insert("error", "That username or email is already taken.");
      render("user.html", &context)
    }
    Err(e) => Err(e.into()),
  }
}
