use super::Crud;
use crate::schema::post;
use crate::schema::post::dsl::*;
use diesel::prelude::*;
use diesel::result::Error;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Identifiable, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = post)]
pub struct Post {
  pub id: i32,
  pub title: String,
  pub body: String,
  pub author_id: i32,
  pub category_id: Option<i32>,
  pub location_id: Option<i32>,
  pub image_url: Option<String>,
  pub is_published: bool,
  pub pub_date: chrono::NaiveDateTime,
  pub created_at: chrono::NaiveDateTime,
}

#[derive(Insertable, AsChangeset, Clone)]
#[diesel(table_name = post)]
#[diesel(treat_none_as_null = true)]
pub struct PostForm {
  pub title: String,
  pub body: String,
  pub author_id: i32,
  pub category_id: Option<i32>,
  pub location_id: Option<i32>,
  pub image_url: Option<String>,
  pub pub_date: chrono::NaiveDateTime,
}

impl Crud<PostForm> for Post {
  fn read(conn: &mut PgConnection, post_id: i32) -> Result<Self, Error> {
    post.find(post_id).first::<Self>(conn)
  }

  fn delete(conn: &mut PgConnection, post_id: i32) -> Result<usize, Error> {
    diesel::delete(post.find(post_id)).execute(conn)
  }

  fn create(conn: &mut PgConnection, new_post: &PostForm) -> Result<Self, Error> {
    diesel::insert_into(post)
      .values(new_post)
      .get_result::<Self>(conn)
  }

  fn update(conn: &mut PgConnection, post_id: i32, new_post: &PostForm) -> Result<Self, Error> {
    diesel::update(post.find(post_id))
      .set(new_post)
      .get_result::<Self>(conn)
  }
}
