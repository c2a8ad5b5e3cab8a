use super::Crud;
use crate::schema::category;
use crate::schema::category::dsl::*;
use diesel::prelude::*;
use diesel::result::Error;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Identifiable, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = category)]
pub struct Category {
  pub id: i32,
  pub title: String,
  pub description: String,
  pub slug: String,
  pub is_published: bool,
  pub created_at: chrono::NaiveDateTime,
}

#[derive(Insertable, AsChangeset, Clone)]
#[diesel(table_name = category)]
pub struct CategoryForm {
  pub title: String,
  pub description: String,
  pub slug: String,
  pub is_published: Option<bool>,
}

impl Crud<CategoryForm> for Category {
  fn read(conn: &mut PgConnection, category_id: i32) -> Result<Self, Error> {
    category.find(category_id).first::<Self>(conn)
  }

  fn delete(conn: &mut PgConnection, category_id: i32) -> Result<usize, Error> {
    diesel::delete(category.find(category_id)).execute(conn)
  }

  fn create(conn: &mut PgConnection, new_category: &CategoryForm) -> Result<Self, Error> {
    diesel::insert_into(category)
      .values(new_category)
      .get_result::<Self>(conn)
  }

  fn update(
    conn: &mut PgConnection,
    category_id: i32,
    new_category: &CategoryForm,
  ) -> Result<Self, Error> {
    diesel::update(category.find(category_id))
      .set(new_category)
      .get_result::<Self>(conn)
  }
}

impl Category {
  /// Unpublished categories don't exist as far as their pages are concerned.
  pub fn read_published_from_slug(
    conn: &mut PgConnection,
    from_slug: &str,
  ) -> Result<Self, Error> {
    category
      .filter(slug.eq(from_slug))
      .filter(is_published.eq(true))
      .first::<Self>(conn)
  }

  pub fn list_published(conn: &mut PgConnection) -> Result<Vec<Self>, Error> {
    category
      .filter(is_published.eq(true))
      .order_by(title.asc())
      .load::<Self>(conn)
  }
}

#[cfg(test)]
mod tests {
  use super::super::establish_unpooled_connection;
  use super::*;
  use pretty_assertions::assert_eq;
  use serial_test::serial;

  #[test]
  #[serial]
  #[ignore = "needs a running postgres"]
  fn test_crud() {
    let conn = &mut establish_unpooled_connection();

    let new_category = CategoryForm {
      title: "Travel".into(),
      description: "Places and trips".into(),
      slug: "travel".into(),
      is_published: None,
    };

    let inserted_category = Category::create(conn, &new_category).unwrap();
    assert!(inserted_category.is_published);

    let read_category =
      Category::read_published_from_slug(conn, "travel").unwrap();
    assert_eq!(inserted_category, read_category);

    let hidden = CategoryForm {
      is_published: Some(false),
      ..new_category
    };
    Category::update(conn, inserted_category.id, &hidden).unwrap();
    assert!(Category::read_published_from_slug(conn, "travel").is_err());

    let num_deleted = Category::delete(conn, inserted_category.id).unwrap();
    assert_eq!(1, num_deleted);
  }
}
