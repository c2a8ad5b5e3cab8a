use crate::schema::{comment, user_};
use diesel::prelude::*;
use diesel::result::Error;
use serde::Serialize;

#[derive(Queryable, PartialEq, Debug, Serialize, Clone)]
pub struct CommentView {
  pub id: i32,
  pub content: String,
  pub post_id: i32,
  pub author_id: i32,
  pub author_name: String,
  pub created_at: chrono::NaiveDateTime,
}

impl CommentView {
  /// All comments on a post, oldest first, the way the detail page shows
  /// them.
  pub fn for_post(conn: &mut PgConnection, from_post_id: i32) -> Result<Vec<Self>, Error> {
    comment::table
      .inner_join(user_::table)
      .select((
        comment::id,
        comment::content,
        comment::post_id,
        comment::author_id,
        user_::name,
        comment::created_at,
      ))
      .filter(comment::post_id.eq(from_post_id))
      .order_by(comment::created_at.asc())
      .load::<CommentView>(conn)
  }
}

#[cfg(test)]
mod tests {
  use super::super::comment::{Comment, CommentForm};
  use super::super::establish_unpooled_connection;
  use super::super::post::{Post, PostForm};
  use super::super::user::{UserForm, User_};
  use super::super::Crud;
  use super::*;
  use pretty_assertions::assert_eq;
  use serial_test::serial;

  #[test]
  #[serial]
  #[ignore = "needs a running postgres"]
  fn test_for_post() {
    let conn = &mut establish_unpooled_connection();

    let author = User_::create(
      conn,
      &UserForm {
        name: "carol".into(),
        first_name: None,
        last_name: None,
        email: None,
        password_encrypted: "nope".into(),
      },
    )
    .unwrap();

    let inserted_post = Post::create(
      conn,
      &PostForm {
        title: "With comments".into(),
        body: "body".into(),
        author_id: author.id,
        category_id: None,
        location_id: None,
        image_url: None,
        pub_date: chrono::Utc::now().naive_utc(),
      },
    )
    .unwrap();

    for text in ["one", "two"] {
      Comment::create(
        conn,
        &CommentForm {
          content: text.into(),
          post_id: inserted_post.id,
          author_id: author.id,
        },
      )
      .unwrap();
    }

    let comments = CommentView::for_post(conn, inserted_post.id).unwrap();
    assert_eq!(
      comments.iter().map(|c| c.content.as_str()).collect::<Vec<_>>(),
      vec!["one", "two"]
    );
    assert!(comments.iter().all(|c| c.author_name == "carol"));

    User_::delete(conn, author.id).unwrap();
  }
}
