use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("db error: {0}")]
    Db(#[from] footprint_db::DbError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("{0} is required")]
    InputMissing(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let (status, code) = match err {
            AppError::InputMissing(_) => (400, Some("input_missing".to_string())),
            AppError::InvalidInput(_) => (400, Some("invalid_input".to_string())),
            AppError::NotFound(_) => (404, Some("not_found".to_string())),
            AppError::Db(footprint_db::DbError::Unreadable(_)) => {
                (500, Some("ledger_unreadable".to_string()))
            }
            AppError::Db(_) | AppError::Io(_) | AppError::Serde(_) | AppError::Message(_) => {
                (500, None)
            }
        };
        Self {
            status,
            message: err.to_string(),
            code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_maps_to_bad_request() {
        let api = ApiError::from(AppError::InputMissing("city".to_string()));
        assert_eq!(api.status, 400);
        assert_eq!(api.code.as_deref(), Some("input_missing"));
        assert_eq!(api.message, "city is required");
    }

    #[test]
    fn unreadable_ledger_is_flagged() {
        let err = AppError::Db(footprint_db::DbError::Unreadable("bad header".to_string()));
        let api = ApiError::from(err);
        assert_eq!(api.status, 500);
        assert_eq!(api.code.as_deref(), Some("ledger_unreadable"));
    }
}
