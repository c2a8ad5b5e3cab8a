use super::{clamp_page, limit_and_offset, total_pages, MaybeOptional, Paginated};
use crate::schema::{category, location, post, user_};
use diesel::dsl::{count_star, now};
use diesel::prelude::*;
use diesel::result::Error;
use serde::Serialize;

/// A post joined with its author, category and location names, which is
/// what every listing and detail template renders.
#[derive(Queryable, PartialEq, Debug, Serialize, Clone)]
pub struct PostView {
  pub id: i32,
  pub title: String,
  pub body: String,
  pub author_id: i32,
  pub author_name: String,
  pub category_id: Option<i32>,
  pub category_title: Option<String>,
  pub category_slug: Option<String>,
  pub location_name: Option<String>,
  pub image_url: Option<String>,
  pub is_published: bool,
  pub pub_date: chrono::NaiveDateTime,
  pub created_at: chrono::NaiveDateTime,
}

/// The selection backing [PostView]. Kept in one place so the listing and
/// detail queries can't drift apart.
macro_rules! post_view_select {
  () => {
    (
      post::id,
      post::title,
      post::body,
      post::author_id,
      user_::name,
      post::category_id,
      category::title.nullable(),
      category::slug.nullable(),
      location::name.nullable(),
      post::image_url,
      post::is_published,
      post::pub_date,
      post::created_at,
    )
  };
}

/// Public visibility per the site rules: publication date reached, the post
/// itself published, and its category (if any) published too.
macro_rules! publicly_visible {
  () => {
    post::pub_date
      .le(now)
      .and(post::is_published.eq(true))
      .and(post::category_id.is_null().or(category::is_published.eq(true)))
  };
}

#[derive(Default, Clone)]
pub struct PostQueryBuilder {
  for_category_id: Option<i32>,
  for_author_id: Option<i32>,
  show_unpublished: bool,
  page: Option<i64>,
  limit: Option<i64>,
}

impl PostQueryBuilder {
  pub fn create() -> Self {
    PostQueryBuilder::default()
  }

  pub fn for_category_id<T: MaybeOptional<i32>>(mut self, for_category_id: T) -> Self {
    self.for_category_id = for_category_id.get_optional();
    self
  }

  pub fn for_author_id<T: MaybeOptional<i32>>(mut self, for_author_id: T) -> Self {
    self.for_author_id = for_author_id.get_optional();
    self
  }

  /// Skip the visibility filter. Only valid for a profile page viewed by
  /// its owner.
  pub fn show_unpublished(mut self, show_unpublished: bool) -> Self {
    self.show_unpublished = show_unpublished;
    self
  }

  pub fn page<T: MaybeOptional<i64>>(mut self, page: T) -> Self {
    self.page = page.get_optional();
    self
  }

  pub fn limit<T: MaybeOptional<i64>>(mut self, limit: T) -> Self {
    self.limit = limit.get_optional();
    self
  }

  pub fn list(&self, conn: &mut PgConnection) -> Result<Vec<PostView>, Error> {
    let mut query = post::table
      .inner_join(user_::table)
      .left_join(category::table)
      .left_join(location::table)
      .select(post_view_select!())
      .into_boxed();

    if let Some(for_category_id) = self.for_category_id {
      query = query.filter(post::category_id.eq(for_category_id));
    }
    if let Some(for_author_id) = self.for_author_id {
      query = query.filter(post::author_id.eq(for_author_id));
    }
    if !self.show_unpublished {
      query = query.filter(publicly_visible!());
    }

    let (limit, offset) = limit_and_offset(self.page, self.limit);
    query
      .order_by(post::pub_date.desc())
      .limit(limit)
      .offset(offset)
      .load::<PostView>(conn)
  }

  pub fn count(&self, conn: &mut PgConnection) -> Result<i64, Error> {
    let mut query = post::table
      .inner_join(user_::table)
      .left_join(category::table)
      .left_join(location::table)
      .select(count_star())
      .into_boxed();

    if let Some(for_category_id) = self.for_category_id {
      query = query.filter(post::category_id.eq(for_category_id));
    }
    if let Some(for_author_id) = self.for_author_id {
      query = query.filter(post::author_id.eq(for_author_id));
    }
    if !self.show_unpublished {
      query = query.filter(publicly_visible!());
    }

    query.get_result::<i64>(conn)
  }

  /// Counts, clamps the requested page into range, and loads that page.
  pub fn load_page(mut self, conn: &mut PgConnection) -> Result<Paginated<PostView>, Error> {
    let per_page = self.limit.unwrap_or(10);
    let total = self.count(conn)?;
    let pages = total_pages(total, per_page);
    let page = clamp_page(self.page, pages);
    self.page = Some(page);
    let items = self.list(conn)?;
    Ok(Paginated::new(items, page, pages))
  }
}

impl PostView {
  /// Reads one post for the detail page. Non-visible posts only resolve for
  /// their author; everyone else gets NotFound.
  pub fn read(
    conn: &mut PgConnection,
    from_post_id: i32,
    my_user_id: Option<i32>,
  ) -> Result<Self, Error> {
    let mut query = post::table
      .inner_join(user_::table)
      .left_join(category::table)
      .left_join(location::table)
      .select(post_view_select!())
      .into_boxed()
      .filter(post::id.eq(from_post_id));

    query = match my_user_id {
      Some(my_user_id) => {
        query.filter(post::author_id.eq(my_user_id).or(publicly_visible!()))
      }
      None => query.filter(publicly_visible!()),
    };

    query.first::<PostView>(conn)
  }
}

#[cfg(test)]
mod tests {
  use super::super::category::{Category, CategoryForm};
  use super::super::establish_unpooled_connection;
  use super::super::post::{Post, PostForm};
  use super::super::user::{UserForm, User_};
  use super::super::Crud;
  use super::*;
  use chrono::Duration;
  use pretty_assertions::assert_eq;
  use serial_test::serial;

  fn post_form(author_id: i32, title: &str, pub_date: chrono::NaiveDateTime) -> PostForm {
    PostForm {
      title: title.into(),
      body: "body".into(),
      author_id,
      category_id: None,
      location_id: None,
      image_url: None,
      pub_date,
    }
  }

  #[test]
  #[serial]
  #[ignore = "needs a running postgres"]
  fn test_visibility_rules() {
    let conn = &mut establish_unpooled_connection();
    let yesterday = chrono::Utc::now().naive_utc() - Duration::days(1);
    let tomorrow = chrono::Utc::now().naive_utc() + Duration::days(1);

    let author = User_::create(
      conn,
      &UserForm {
        name: "sara".into(),
        first_name: None,
        last_name: None,
        email: None,
        password_encrypted: "nope".into(),
      },
    )
    .unwrap();

    let hidden_category = Category::create(
      conn,
      &CategoryForm {
        title: "Drafts".into(),
        description: "not ready".into(),
        slug: "drafts".into(),
        is_published: Some(false),
      },
    )
    .unwrap();

    // One post per visibility condition.
    let visible = Post::create(conn, &post_form(author.id, "visible", yesterday)).unwrap();
    let scheduled = Post::create(conn, &post_form(author.id, "scheduled", tomorrow)).unwrap();
    let in_hidden_category = Post::create(
      conn,
      &PostForm {
        category_id: Some(hidden_category.id),
        ..post_form(author.id, "hidden category", yesterday)
      },
    )
    .unwrap();
    let unpublished = {
      let inserted = Post::create(conn, &post_form(author.id, "unpublished", yesterday)).unwrap();
      use crate::schema::post::dsl::*;
      diesel::update(post.find(inserted.id))
        .set(is_published.eq(false))
        .get_result::<Post>(conn)
        .unwrap()
    };

    let listed = PostQueryBuilder::create()
      .for_author_id(author.id)
      .list(conn)
      .unwrap();
    assert_eq!(
      listed.iter().map(|p| p.id).collect::<Vec<_>>(),
      vec![visible.id]
    );

    // The owner's profile listing includes everything.
    let own = PostQueryBuilder::create()
      .for_author_id(author.id)
      .show_unpublished(true)
      .count(conn)
      .unwrap();
    assert_eq!(own, 4);

    // Detail reads: author sees all four, strangers only the visible one.
    for hidden in [scheduled.id, in_hidden_category.id, unpublished.id] {
      assert!(PostView::read(conn, hidden, Some(author.id)).is_ok());
      assert!(PostView::read(conn, hidden, None).is_err());
    }
    assert!(PostView::read(conn, visible.id, None).is_ok());

    User_::delete(conn, author.id).unwrap();
    Category::delete(conn, hidden_category.id).unwrap();
  }

  #[test]
  #[serial]
  #[ignore = "needs a running postgres"]
  fn test_pagination_clamps() {
    let conn = &mut establish_unpooled_connection();
    let yesterday = chrono::Utc::now().naive_utc() - Duration::days(1);

    let author = User_::create(
      conn,
      &UserForm {
        name: "paged".into(),
        first_name: None,
        last_name: None,
        email: None,
        password_encrypted: "nope".into(),
      },
    )
    .unwrap();

    for i in 0..15 {
      Post::create(conn, &post_form(author.id, &format!("post {}", i), yesterday)).unwrap();
    }

    let page = PostQueryBuilder::create()
      .for_author_id(author.id)
      .page(99)
      .limit(10)
      .load_page(conn)
      .unwrap();
    assert_eq!(page.page, 2);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items.len(), 5);
    assert!(page.has_previous);
    assert!(!page.has_next);

    User_::delete(conn, author.id).unwrap();
  }
}
