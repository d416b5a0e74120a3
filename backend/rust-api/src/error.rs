use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Engine error taxonomy. Every failure keeps its kind so the presentation
/// layer decides user messaging; nothing is swallowed along the way.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0} not found")]
    NotFound(String),

    #[error("this quest is finished")]
    QuestFinished,

    #[error("customer already started this quest")]
    AlreadyStarted,

    #[error("you have already hit 3 suggestions")]
    SuggestionLimitExceeded,

    #[error("you have already hit 5 wrong answers, we will show the right answer")]
    WrongAnswerLimitExceeded { correct_answer: String },

    #[error("distance oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("quest item chain is corrupted: {0}")]
    InvalidChain(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Error::NotFound(_) => (StatusCode::NOT_FOUND, json!({ "error": self.to_string() })),
            Error::QuestFinished | Error::AlreadyStarted => {
                (StatusCode::CONFLICT, json!({ "error": self.to_string() }))
            }
            Error::SuggestionLimitExceeded => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": self.to_string() }),
            ),
            Error::WrongAnswerLimitExceeded { correct_answer } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": self.to_string(), "correct_answer": correct_answer }),
            ),
            Error::OracleUnavailable(reason) => {
                tracing::warn!("distance oracle degraded: {}", reason);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({ "error": self.to_string() }),
                )
            }
            Error::InvalidChain(detail) => {
                tracing::error!("quest item chain integrity failure: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": self.to_string() }),
                )
            }
            Error::BadRequest(_) => (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() })),
            Error::Internal(e) => {
                tracing::error!("internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let response = Error::NotFound("CustomerTask".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn quest_finished_is_a_conflict_not_a_server_error() {
        let response = Error::QuestFinished.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn oracle_unavailable_maps_to_503() {
        let response = Error::OracleUnavailable("timeout".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
