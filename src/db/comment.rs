use super::Crud;
use crate::schema::comment;
use crate::schema::comment::dsl::*;
use diesel::prelude::*;
use diesel::result::Error;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Identifiable, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = comment)]
pub struct Comment {
  pub id: i32,
  pub content: String,
  pub post_id: i32,
  pub author_id: i32,
  pub created_at: chrono::NaiveDateTime,
}

#[derive(Insertable, AsChangeset, Clone)]
#[diesel(table_name = comment)]
pub struct CommentForm {
  pub content: String,
  pub post_id: i32,
  pub author_id: i32,
}

impl Crud<CommentForm> for Comment {
  fn read(conn: &mut PgConnection, comment_id: i32) -> Result<Self, Error> {
    comment.find(comment_id).first::<Self>(conn)
  }

  fn delete(conn: &mut PgConnection, comment_id: i32) -> Result<usize, Error> {
    diesel::delete(comment.find(comment_id)).execute(conn)
  }

  fn create(conn: &mut PgConnection, new_comment: &CommentForm) -> Result<Self, Error> {
    diesel::insert_into(comment)
      .values(new_comment)
      .get_result::<Self>(conn)
  }

  fn update(
    conn: &mut PgConnection,
    comment_id: i32,
    new_comment: &CommentForm,
  ) -> Result<Self, Error> {
    diesel::update(comment.find(comment_id))
      .set(new_comment)
      .get_result::<Self>(conn)
  }
}

impl Comment {
  pub fn update_content(
    conn: &mut PgConnection,
    comment_id: i32,
    new_content: &str,
  ) -> Result<Self, Error> {
    diesel::update(comment.find(comment_id))
      .set(content.eq(new_content))
      .get_result::<Self>(conn)
  }
}
