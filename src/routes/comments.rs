use super::redirect;
use crate::db::comment::{Comment, CommentForm};
use crate::db::post::Post;
use crate::db::Crud;
use crate::error::{SiteError, SiteErrorType};
use crate::session::{current_user, require_user};
use crate::templates::{base_context, render};
use crate::{blocking, CommentId, DbPool, PostId};
use actix_web::web::{self, Data, Form, Path};
use actix_web::{HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

pub fn config(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/posts/{id}/comment", web::post().to(add))
    .route(
      "/posts/{id}/edit_comment/{comment_id}",
      web::get().to(edit_get),
    )
    .route(
      "/posts/{id}/edit_comment/{comment_id}",
      web::post().to(edit_post),
    )
    .route(
      "/posts/{id}/delete_comment/{comment_id}",
      web::get().to(delete_get),
    )
    .route(
      "/posts/{id}/delete_comment/{comment_id}",
      web::post().to(delete_post),
    );
}

#[derive(Deserialize, Serialize, Clone)]
pub struct CommentFormData {
  pub content: String,
}

/// Loads the comment addressed by the path, checking it actually hangs off
/// the routed post.
async fn read_routed_comment(
  pool: &DbPool,
  post_id: PostId,
  comment_id: CommentId,
) -> Result<Comment, SiteError> {
  let comment = blocking(pool, move |conn| Comment::read(conn, comment_id)).await??;
  if comment.post_id != post_id {
    return Err(SiteErrorType::NotFound.into());
  }
  Ok(comment)
}

async fn add(
  req: HttpRequest,
  pool: Data<DbPool>,
  path: Path<PostId>,
  data: Form<CommentFormData>,
) -> Result<HttpResponse, SiteError> {
  let user = require_user(&req, &pool).await?;
  let post_id = path.into_inner();

  // The post only has to exist; commenting is allowed from the detail page
  // the author can see, so no visibility check here.
  blocking(&pool, move |conn| Post::read(conn, post_id)).await??;

  let content = data.content.trim().to_owned();
  if !content.is_empty() {
    let form = CommentForm {
      content,
      post_id,
      author_id: user.id,
    };
    blocking(&pool, move |conn| Comment::create(conn, &form)).await??;
  }

  Ok(redirect(&format!("/posts/{}", post_id)))
}

async fn edit_get(
  req: HttpRequest,
  pool: Data<DbPool>,
  path: Path<(PostId, CommentId)>,
) -> Result<HttpResponse, SiteError> {
  let user = current_user(&req, &pool).await?;
  let (post_id, comment_id) = path.into_inner();
  let comment = read_routed_comment(&pool, post_id, comment_id).await?;

  if user.as_ref().map(|u| u.id) != Some(comment.author_id) {
    return Ok(redirect(&format!("/posts/{}", post_id)));
  }

  let mut context = base_context(&user);
  context.insert("comment", &comment);
  context.insert("editing", &true);
  render("comment.html", &context)
}

async fn edit_post(
  req: HttpRequest,
  pool: Data<DbPool>,
  path: Path<(PostId, CommentId)>,
  data: Form<CommentFormData>,
) -> Result<HttpResponse, SiteError> {
  let user = current_user(&req, &pool).await?;
  let (post_id, comment_id) = path.into_inner();
  let comment = read_routed_comment(&pool, post_id, comment_id).await?;

  if user.as_ref().map(|u| u.id) != Some(comment.author_id) {
    return Ok(redirect(&format!("/posts/{}", post_id)));
  }

  let content = data.content.trim().to_owned();
  if content.is_empty() {
    let mut context = base_context(&user);
    context.insert("comment", &comment);
    context.insert("editing", &true);
    context.insert("error", "A comment can't be empty.");
    return render("comment.html", &context);
  }

  blocking(&pool, move |conn| {
    Comment::update_content(conn, comment_id, &content)
  })
  .await??;
  Ok(redirect(&format!("/posts/{}", post_id)))
}

async fn delete_get(
  req: HttpRequest,
  pool: Data<DbPool>,
  path: Path<(PostId, CommentId)>,
) -> Result<HttpResponse, SiteError> {
  let user = current_user(&req, &pool).await?;
  let (post_id, comment_id) = path.into_inner();
  let comment = read_routed_comment(&pool, post_id, comment_id).await?;

  if user.as_ref().map(|u| u.id) != Some(comment.author_id) {
    return Ok(redirect(&format!("/posts/{}", post_id)));
  }

  let mut context = base_context(&user);
  context.insert("comment", &comment);
  context.insert("deleting", &true);
  render("comment.html", &context)
}

async fn delete_post(
  req: HttpRequest,
  pool: Data<DbPool>,
  path: Path<(PostId, CommentId)>,
) -> Result<HttpResponse, SiteError> {
  let user = current_user(&req, &pool).await?;
  let (post_id, comment_id) = path.into_inner();
  let comment = read_routed_comment(&pool, post_id, comment_id).await?;

  if user.as_ref().map(|u| u.id) != Some(comment.author_id) {
    return Ok(redirect(&format!("/posts/{}", post_id)));
  }

  blocking(&pool, move |conn| Comment::delete(conn, comment_id)).await??;
  Ok(redirect(&format!("/posts/{}", post_id)))
}
