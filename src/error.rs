use actix_web::http::{header::LOCATION, StatusCode};
use std::fmt;
use strum::Display;

pub type SiteResult<T> = Result<T, SiteError>;

#[derive(Display, Debug, Clone, PartialEq, Eq)]
pub enum SiteErrorType {
  NotFound,
  NotLoggedIn,
  IncorrectLogin,
  PasswordsDoNotMatch,
  UsernameAlreadyExists,
  InvalidPubDate,
  Unknown(String),
}

pub struct SiteError {
  pub error_type: SiteErrorType,
  pub inner: anyhow::Error,
}

impl<T> From<T> for SiteError
where
  T: Into<anyhow::Error>,
{
  fn from(t: T) -> Self {
    let cause = t.into();
    let error_type = match cause.downcast_ref::<diesel::result::Error>() {
      Some(&diesel::NotFound) => SiteErrorType::NotFound,
      _ => SiteErrorType::Unknown(format!("{}", &cause)),
    };
    SiteError {
      error_type,
      inner: cause,
    }
  }
}

impl From<SiteErrorType> for SiteError {
  fn from(error_type: SiteErrorType) -> Self {
    let inner = anyhow::anyhow!("{}", error_type);
    SiteError { error_type, inner }
  }
}

impl fmt::Debug for SiteError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SiteError")
      .field("message", &self.error_type)
      .field("inner", &self.inner)
      .finish()
  }
}

impl fmt::Display for SiteError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}: ", &self.error_type)?;
    self.inner.fmt(f)
  }
}

impl actix_web::error::ResponseError for SiteError {
  fn status_code(&self) -> StatusCode {
    match self.error_type {
      SiteErrorType::NotFound => StatusCode::NOT_FOUND,
      SiteErrorType::NotLoggedIn => StatusCode::SEE_OTHER,
      SiteErrorType::IncorrectLogin => StatusCode::UNAUTHORIZED,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> actix_web::HttpResponse {
    // Anonymous users poking at login-only pages get bounced to the login form.
    if self.error_type == SiteErrorType::NotLoggedIn {
      return actix_web::HttpResponse::SeeOther()
        .insert_header((LOCATION, "/login"))
        .finish();
    }
    let status = self.status_code();
    actix_web::HttpResponse::build(status)
      .content_type("text/html; charset=utf-8")
      .body(format!(
        "<!doctype html><html><body><h1>{}</h1></body></html>",
        status
      ))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn test_diesel_not_found_maps_to_not_found() {
    let err = SiteError::from(diesel::NotFound);
    assert_eq!(err.error_type, SiteErrorType::NotFound);
  }

  #[test]
  fn test_other_errors_keep_their_message() {
    let err = SiteError::from(anyhow::anyhow!("broken pipe"));
    assert_eq!(err.error_type, SiteErrorType::Unknown("broken pipe".into()));
  }
}
