use super::PageParams;
use crate::db::category::Category;
use crate::db::post_view::PostQueryBuilder;
use crate::error::SiteError;
use crate::session::current_user;
use crate::settings::Settings;
use crate::templates::{base_context, render};
use crate::{blocking, DbPool};
use actix_web::web::{self, Data, Path, Query};
use actix_web::{HttpRequest, HttpResponse};

pub fn config(cfg: &mut web::ServiceConfig) {
  cfg.route("/category/{slug}", web::get().to(category_posts));
}

async fn category_posts(
  req: HttpRequest,
  pool: Data<DbPool>,
  path: Path<String>,
  query: Query<PageParams>,
) -> Result<HttpResponse, SiteError> {
  let user = current_user(&req, &pool).await?;
  let slug = path.into_inner();

  let category =
    blocking(&pool, move |conn| Category::read_published_from_slug(conn, &slug)).await??;

  let requested = query.number();
  let per_page = Settings::get().posts_per_page;
  let category_id = category.id;
  let page_obj = blocking(&pool, move |conn| {
    PostQueryBuilder::create()
      .for_category_id(category_id)
      .page(requested)
      .limit(per_page)
      .load_page(conn)
  })
  .await??;

  let mut context = base_context(&user);
  context.insert("category", &category);
  context.insert("page_obj", &page_obj);
  render("category.html", &context)
}
