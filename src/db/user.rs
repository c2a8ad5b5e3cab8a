use super::Crud;
use crate::schema::user_;
use crate::schema::user_::dsl::*;
use bcrypt::{hash, verify, DEFAULT_COST};
use diesel::prelude::*;
use diesel::result::Error;
use serde::Serialize;

#[derive(Queryable, Identifiable, PartialEq, Debug, Clone, Serialize)]
#[diesel(table_name = user_)]
pub struct User_ {
  pub id: i32,
  pub name: String,
  pub first_name: Option<String>,
  pub last_name: Option<String>,
  pub email: Option<String>,
  #[serde(skip_serializing)]
  pub password_encrypted: String,
  pub published: chrono::NaiveDateTime,
}

#[derive(Insertable, AsChangeset, Clone)]
#[diesel(table_name = user_)]
pub struct UserForm {
  pub name: String,
  pub first_name: Option<String>,
  pub last_name: Option<String>,
  pub email: Option<String>,
  pub password_encrypted: String,
}

impl Crud<UserForm> for User_ {
  fn read(conn: &mut PgConnection, user_id: i32) -> Result<Self, Error> {
    user_.find(user_id).first::<Self>(conn)
  }
  fn delete(conn: &mut PgConnection, user_id: i32) -> Result<usize, Error> {
    diesel::delete(user_.find(user_id)).execute(conn)
  }
  fn create(conn: &mut PgConnection, form: &UserForm) -> Result<Self, Error> {
    diesel::insert_into(user_)
      .values(form)
      .get_result::<Self>(conn)
  }
  fn update(conn: &mut PgConnection, user_id: i32, form: &UserForm) -> Result<Self, Error> {
    diesel::update(user_.find(user_id))
      .set(form)
      .get_result::<Self>(conn)
  }
}

impl User_ {
  /// Hashes the plaintext password in the form before inserting.
  pub fn register(conn: &mut PgConnection, form: &UserForm) -> Result<Self, Error> {
    let mut edited_user = form.clone();
    let password_hash =
      hash(&form.password_encrypted, DEFAULT_COST).expect("Couldn't hash password");
    edited_user.password_encrypted = password_hash;

    Self::create(conn, &edited_user)
  }

  pub fn verify_password(&self, password: &str) -> bool {
    verify(password, &self.password_encrypted).unwrap_or(false)
  }

  pub fn find_by_username(conn: &mut PgConnection, username: &str) -> Result<Self, Error> {
    user_.filter(name.eq(username)).first::<Self>(conn)
  }

  /// The profile edit form never touches the password, so the changeset is
  /// written out by hand instead of going through UserForm.
  pub fn update_profile(
    conn: &mut PgConnection,
    user_id: i32,
    new_name: &str,
    new_first_name: Option<String>,
    new_last_name: Option<String>,
    new_email: Option<String>,
  ) -> Result<Self, Error> {
    diesel::update(user_.find(user_id))
      .set((
        name.eq(new_name),
        first_name.eq(new_first_name),
        last_name.eq(new_last_name),
        email.eq(new_email),
      ))
      .get_result::<Self>(conn)
  }
}
