use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};

use crate::{model::ValidationError, store::StoreError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("Could not understand request body: {0}")]
  Parse(#[from] json::Error),

  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("Could not verify provided release URL")]
  UnverifiableContent,

  #[error("Could not write record to store: {0}")]
  StoreWrite(#[source] StoreError),

  #[error("Could not query store: {0}")]
  StoreQuery(#[source] StoreError),

  #[error("Nothing found for product and branch")]
  NotFound,
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message): (StatusCode, String) = match self {
      Error::Parse(_) => {
        (StatusCode::BAD_REQUEST, "Could not understand request body".into())
      }
      Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
      Error::UnverifiableContent => (
        StatusCode::BAD_REQUEST,
        "Could not verify provided release URL".into(),
      ),
      Error::StoreWrite(_) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Could not communicate with database".into(),
      ),
      Error::StoreQuery(_) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Could not get info from database".into(),
      ),
      Error::NotFound => {
        (StatusCode::NOT_FOUND, "Nothing found for product and branch".into())
      }
    };

    (status, message).into_response()
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
