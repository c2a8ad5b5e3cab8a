use super::Crud;
use crate::schema::location;
use crate::schema::location::dsl::*;
use diesel::prelude::*;
use diesel::result::Error;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Identifiable, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = location)]
pub struct Location {
  pub id: i32,
  pub name: String,
  pub is_published: bool,
  pub created_at: chrono::NaiveDateTime,
}

#[derive(Insertable, AsChangeset, Clone)]
#[diesel(table_name = location)]
pub struct LocationForm {
  pub name: String,
  pub is_published: Option<bool>,
}

impl Crud<LocationForm> for Location {
  fn read(conn: &mut PgConnection, location_id: i32) -> Result<Self, Error> {
    location.find(location_id).first::<Self>(conn)
  }

  fn delete(conn: &mut PgConnection, location_id: i32) -> Result<usize, Error> {
    diesel::delete(location.find(location_id)).execute(conn)
  }

  fn create(conn: &mut PgConnection, new_location: &LocationForm) -> Result<Self, Error> {
    diesel::insert_into(location)
      .values(new_location)
      .get_result::<Self>(conn)
  }

  fn update(
    conn: &mut PgConnection,
    location_id: i32,
    new_location: &LocationForm,
  ) -> Result<Self, Error> {
    diesel::update(location.find(location_id))
      .set(new_location)
      .get_result::<Self>(conn)
  }
}

impl Location {
  pub fn list_published(conn: &mut PgConnection) -> Result<Vec<Self>, Error> {
    location
      .filter(is_published.eq(true))
      .order_by(name.asc())
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

    let new_location = LocationForm {
      name: "Reykjavik".into(),
      is_published: None,
    };

    let inserted_location = Location::create(conn, &new_location).unwrap();
    let read_location = Location::read(conn, inserted_location.id).unwrap();
    assert_eq!(inserted_location, read_location);

    let num_deleted = Location::delete(conn, inserted_location.id).unwrap();
    assert_eq!(1, num_deleted);
  }
}
