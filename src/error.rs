use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("a movie titled {0:?} already exists")]
    DuplicateTitle(String),
    #[error("user {0} is already registered")]
    DuplicateUserId(i64),
    #[error("movie {0} not found")]
    MovieNotFound(String),
    #[error("user {0} not found")]
    UserNotFound(i64),
    #[error(transparent)]
    Db(#[from] DbErr),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// True when the database rejected a write on a UNIQUE or PRIMARY KEY constraint.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    inner: anyhow::Error,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, inner: anyhow::anyhow!(message.into()) }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, inner: err }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        StoreError::Db(err).into()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::DuplicateTitle(_) | StoreError::DuplicateUserId(_) => StatusCode::CONFLICT,
            StoreError::MovieNotFound(_) | StoreError::UserNotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self { status, inner: anyhow::Error::new(err) }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.inner, "request failed");
        }
        let body = Json(serde_json::json!({ "error": self.inner.to_string() }));
        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_http_statuses() {
        let dup: AppError = StoreError::DuplicateTitle("inception".into()).into();
        assert_eq!(dup.status(), StatusCode::CONFLICT);

        let dup_user: AppError = StoreError::DuplicateUserId(42).into();
        assert_eq!(dup_user.status(), StatusCode::CONFLICT);

        let missing: AppError = StoreError::UserNotFound(7).into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let db: AppError = DbErr::Custom("boom".into()).into();
        assert_eq!(db.status(), StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(AppError::bad_request("nope").status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn duplicate_title_message_names_the_title() {
        let err = StoreError::DuplicateTitle("inception".into());
        assert_eq!(err.to_string(), "a movie titled \"inception\" already exists");
    }

    #[test]
    fn unrelated_db_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&DbErr::Custom("disk full".into())));
    }
}
