use crate::db::category::Category;
use crate::db::post_view::{PostQueryBuilder, PostView};
use crate::error::SiteError;
use crate::settings::Settings;
use crate::{blocking, DbPool};
use actix_web::web::{self, Data, Path};
use actix_web::HttpResponse;
use chrono::{TimeZone, Utc};
use rss::{Channel, ChannelBuilder, GuidBuilder, Item, ItemBuilder};

static RSS_FETCH_LIMIT: i64 = 20;

pub fn config(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/feeds/all.xml", web::get().to(get_all_feed))
    .route("/feeds/c/{slug}.xml", web::get().to(get_category_feed));
}

async fn get_all_feed(pool: Data<DbPool>) -> HttpResponse {
  match get_feed_all_data(&pool).await {
    Ok(rss) => HttpResponse::Ok()
      .content_type("application/rss+xml")
      .body(rss.to_string()),
    Err(_) => HttpResponse::NotFound().finish(),
  }
}

async fn get_category_feed(pool: Data<DbPool>, path: Path<String>) -> HttpResponse {
  let slug = path.into_inner();
  match get_feed_category_data(&pool, slug).await {
    Ok(rss) => HttpResponse::Ok()
      .content_type("application/rss+xml")
      .body(rss.to_string()),
    Err(_) => HttpResponse::NotFound().finish(),
  }
}

async fn get_feed_all_data(pool: &DbPool) -> Result<Channel, SiteError> {
  let settings = Settings::get();

  let posts = blocking(pool, move |conn| {
    PostQueryBuilder::create().limit(RSS_FETCH_LIMIT).list(conn)
  })
  .await??;

  let channel = ChannelBuilder::default()
    .title(settings.site_name.to_owned())
    .link(format!("http://{}", settings.hostname))
    .items(create_post_items(posts, &settings.hostname))
    .build();

  Ok(channel)
}

async fn get_feed_category_data(pool: &DbPool, slug: String) -> Result<Channel, SiteError> {
  let settings = Settings::get();

  let category =
    blocking(pool, move |conn| Category::read_published_from_slug(conn, &slug)).await??;

  let category_id = category.id;
  let posts = blocking(pool, move |conn| {
    PostQueryBuilder::create()
      .for_category_id(category_id)
      .limit(RSS_FETCH_LIMIT)
      .list(conn)
  })
  .await??;

  let channel = ChannelBuilder::default()
    .title(format!("{} - {}", settings.site_name, category.title))
    .link(format!("http://{}/category/{}", settings.hostname, category.slug))
    .description(category.description.to_owned())
    .items(create_post_items(posts, &settings.hostname))
    .build();

  Ok(channel)
}

fn create_post_items(posts: Vec<PostView>, hostname: &str) -> Vec<Item> {
  let mut items: Vec<Item> = Vec::new();

  for p in posts {
    let post_url = format!("http://{}/posts/{}", hostname, p.id);
    let pub_date = Utc.from_utc_datetime(&p.pub_date).to_rfc2822();

    let guid = GuidBuilder::default()
      .value(post_url.to_owned())
      .permalink(true)
      .build();

    let item = ItemBuilder::default()
      .title(p.title.to_owned())
      .link(post_url)
      .author(p.author_name.to_owned())
      .guid(guid)
      .pub_date(pub_date)
      .description(p.body.to_owned())
      .build();

    items.push(item);
  }

  items
}
