use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::EngineError;

use api_types::MessageResponse;
pub use server::{Actor, ServerState, router, run_with_listener, spawn_with_listener};

mod audit;
mod products;
mod recipes;
mod server;
mod waste;

pub mod types {
    pub use api_types::{DataResponse, MessageResponse};

    pub mod product {
        pub use api_types::product::{
            InventoryUpdate, ProductNew, ProductUpdate, ProductView, TransferRequest,
            TransferResponse,
        };
    }

    pub mod recipe {
        pub use api_types::recipe::{
            IngredientNew, IngredientView, RecipeCreated, RecipeView, RecipeWrite,
        };
    }

    pub mod waste {
        pub use api_types::waste::{WasteLogQuery, WasteLogView, WasteNew, WasteRecorded};
    }

    pub mod audit {
        pub use api_types::audit::{AuditNew, AuditView};
    }
}

pub enum ServerError {
    Engine(EngineError),
    /// Malformed request detected before the engine is called.
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) | EngineError::InUse(_) => StatusCode::CONFLICT,
        EngineError::InvalidArgument(_) | EngineError::InsufficientStock(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        EngineError::Database(_) | EngineError::Timeout(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    if err.is_storage_failure() {
        tracing::error!("storage failure: {err}");
        return "internal server error".to_string();
    }
    err.to_string()
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(MessageResponse::error(message))).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

impl From<PathRejection> for ServerError {
    fn from(value: PathRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
        let res = ServerError::from(EngineError::InUse("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        let res =
            ServerError::from(EngineError::InvalidArgument("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let res =
            ServerError::from(EngineError::InsufficientStock("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn storage_failures_map_to_500() {
        let res = ServerError::from(EngineError::Timeout(5000)).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let res = ServerError::from(EngineError::Database(sea_orm::DbErr::Custom(
            "disk I/O error".to_string(),
        )))
        .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn storage_failure_detail_is_not_exposed() {
        assert_eq!(
            message_for_engine_error(EngineError::Database(sea_orm::DbErr::Custom(
                "disk I/O error".to_string()
            ))),
            "internal server error"
        );
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
