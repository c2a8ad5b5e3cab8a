use super::{redirect, PageParams};
use crate::db::category::Category;
use crate::db::comment_view::CommentView;
use crate::db::location::Location;
use crate::db::post::{Post, PostForm};
use crate::db::post_view::{PostQueryBuilder, PostView};
use crate::db::Crud;
use crate::error::{SiteError, SiteErrorType};
use crate::session::{current_user, require_user};
use crate::settings::Settings;
use crate::templates::{base_context, render};
use crate::{blocking, DbPool, PostId};
use actix_web::web::{self, Data, Form, Path, Query};
use actix_web::{HttpRequest, HttpResponse};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub fn config(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/", web::get().to(index))
    .route("/posts/create", web::get().to(create_get))
    .route("/posts/create", web::post().to(create_post))
    .route("/posts/{id}", web::get().to(detail))
    .route("/posts/{id}/edit", web::get().to(edit_get))
    .route("/posts/{id}/edit", web::post().to(edit_post))
    .route("/posts/{id}/delete", web::get().to(delete_get))
    .route("/posts/{id}/delete", web::post().to(delete_post));
}

/// Raw fields of the post form. Selects post empty strings for the blank
/// choice, and datetime-local gives a minute-resolution timestamp.
#[derive(Deserialize, Serialize, Clone)]
pub struct PostFormData {
  pub title: String,
  pub body: String,
  pub pub_date: String,
  pub image_url: Option<String>,
  pub category_id: Option<String>,
  pub location_id: Option<String>,
}

fn parse_pub_date(input: &str) -> Option<NaiveDateTime> {
  NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M")
    .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S"))
    .ok()
}

fn parse_select(value: &Option<String>) -> Option<i32> {
  value.as_deref().and_then(|v| v.parse().ok())
}

fn build_form(data: &PostFormData, author_id: i32) -> Result<PostForm, &'static str> {
  let title = data.title.trim();
  if title.is_empty() {
    return Err("A title is required.");
  }
  if data.body.trim().is_empty() {
    return Err("A body is required.");
  }
  let pub_date = parse_pub_date(data.pub_date.trim()).ok_or("Enter a valid publication date.")?;

  Ok(PostForm {
    title: title.into(),
    body: data.body.trim().into(),
    author_id,
    category_id: parse_select(&data.category_id),
    location_id: parse_select(&data.location_id),
    image_url: data
      .image_url
      .as_deref()
      .map(str::trim)
      .filter(|u| !u.is_empty())
      .map(Into::into),
    pub_date,
  })
}

fn form_data(post: &Post) -> PostFormData {
  PostFormData {
    title: post.title.to_owned(),
    body: post.body.to_owned(),
    pub_date: post.pub_date.format("%Y-%m-%dT%H:%M").to_string(),
    image_url: post.image_url.to_owned(),
    category_id: post.category_id.map(|id| id.to_string()),
    location_id: post.location_id.map(|id| id.to_string()),
  }
}

async fn load_selects(pool: &DbPool) -> Result<(Vec<Category>, Vec<Location>), SiteError> {
  let categories = blocking(pool, Category::list_published).await??;
  let locations = blocking(pool, Location::list_published).await??;
  Ok((categories, locations))
}

async fn index(
  req: HttpRequest,
  pool: Data<DbPool>,
  query: Query<PageParams>,
) -> Result<HttpResponse, SiteError> {
  let user = current_user(&req, &pool).await?;
  let requested = query.number();
  let per_page = Settings::get().posts_per_page;

  let page_obj = blocking(&pool, move |conn| {
    PostQueryBuilder::create()
      .page(requested)
      .limit(per_page)
      .load_page(conn)
  })
  .await??;

  let mut context = base_context(&user);
  context.insert("page_obj", &page_obj);
  render("index.html", &context)
}

async fn detail(
  req: HttpRequest,
  pool: Data<DbPool>,
  path: Path<PostId>,
) -> Result<HttpResponse, SiteError> {
  let user = current_user(&req, &pool).await?;
  let post_id = path.into_inner();
  let my_user_id = user.as_ref().map(|u| u.id);

  let post_view = blocking(&pool, move |conn| PostView::read(conn, post_id, my_user_id)).await??;
  let comments = blocking(&pool, move |conn| CommentView::for_post(conn, post_id)).await??;

  let mut context = base_context(&user);
  context.insert("post", &post_view);
  context.insert("comments", &comments);
  render("detail.html", &context)
}

async fn create_get(req: HttpRequest, pool: Data<DbPool>) -> Result<HttpResponse, SiteError> {
  let user = require_user(&req, &pool).await?;
  let (categories, locations) = load_selects(&pool).await?;

  let mut context = base_context(&Some(user));
  context.insert("categories", &categories);
  context.insert("locations", &locations);
  context.insert(
    "form",
    &PostFormData {
      title: String::new(),
      body: String::new(),
      pub_date: String::new(),
      image_url: None,
      category_id: None,
      location_id: None,
    },
  );
  render("create.html", &context)
}

async fn create_post(
  req: HttpRequest,
  pool: Data<DbPool>,
  data: Form<PostFormData>,
) -> Result<HttpResponse, SiteError> {
  let user = require_user(&req, &pool).await?;

  let form = match build_form(&data, user.id) {
    Ok(form) => form,
    Err(message) => {
      let (categories, locations) = load_selects(&pool).await?;
      let mut context = base_context(&Some(user));
      context.insert("categories", &categories);
      context.insert("locations", &locations);
      context.insert("form", &data.into_inner());
      context.insert("error", message);
      return render("create.html", &context);
    }
  };

  blocking(&pool, move |conn| Post::create(conn, &form)).await??;
  Ok(redirect(&format!("/profile/{}", user.name)))
}

async fn edit_get(
  req: HttpRequest,
  pool: Data<DbPool>,
  path: Path<PostId>,
) -> Result<HttpResponse, SiteError> {
  let user = current_user(&req, &pool).await?;
  let post_id = path.into_inner();
  let post = blocking(&pool, move |conn| Post::read(conn, post_id)).await??;

  // Non-authors get bounced to the detail page rather than a 403.
  if user.as_ref().map(|u| u.id) != Some(post.author_id) {
    return Ok(redirect(&format!("/posts/{}", post_id)));
  }

  let (categories, locations) = load_selects(&pool).await?;
  let mut context = base_context(&user);
  context.insert("categories", &categories);
  context.insert("locations", &locations);
  context.insert("form", &form_data(&post));
  context.insert("editing_id", &post.id);
  render("create.html", &context)
}

async fn edit_post(
  req: HttpRequest,
  pool: Data<DbPool>,
  path: Path<PostId>,
  data: Form<PostFormData>,
) -> Result<HttpResponse, SiteError> {
  let user = current_user(&req, &pool).await?;
  let post_id = path.into_inner();
  let post = blocking(&pool, move |conn| Post::read(conn, post_id)).await??;

  if user.as_ref().map(|u| u.id) != Some(post.author_id) {
    return Ok(redirect(&format!("/posts/{}", post_id)));
  }

  let form = match build_form(&data, post.author_id) {
    Ok(form) => form,
    Err(message) => {
      let (categories, locations) = load_selects(&pool).await?;
      let mut context = base_context(&user);
      context.insert("categories", &categories);
      context.insert("locations", &locations);
      context.insert("form", &data.into_inner());
      context.insert("editing_id", &post.id);
      context.insert("error", message);
      return render("create.html", &context);
    }
  };

  blocking(&pool, move |conn| Post::update(conn, post_id, &form)).await??;
  Ok(redirect(&format!("/posts/{}", post_id)))
}

async fn delete_get(
  req: HttpRequest,
  pool: Data<DbPool>,
  path: Path<PostId>,
) -> Result<HttpResponse, SiteError> {
  let user = current_user(&req, &pool).await?;
  let post_id = path.into_inner();
  let post = blocking(&pool, move |conn| Post::read(conn, post_id)).await??;

  // Only the author even learns the delete page exists.
  if user.as_ref().map(|u| u.id) != Some(post.author_id) {
    return Err(SiteErrorType::NotFound.into());
  }

  let mut context = base_context(&user);
  context.insert("form", &form_data(&post));
  context.insert("deleting_id", &post.id);
  render("create.html", &context)
}

async fn delete_post(
  req: HttpRequest,
  pool: Data<DbPool>,
  path: Path<PostId>,
) -> Result<HttpResponse, SiteError> {
  let user = current_user(&req, &pool).await?;
  let post_id = path.into_inner();
  let post = blocking(&pool, move |conn| Post::read(conn, post_id)).await??;

  let user = match user {
    Some(user) if user.id == post.author_id => user,
    _ => return Err(SiteErrorType::NotFound.into()),
  };

  blocking(&pool, move |conn| Post::delete(conn, post_id)).await??;
  Ok(redirect(&format!("/profile/{}", user.name)))
}
