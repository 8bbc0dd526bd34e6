//! Request Extractors
//!
//! [`JsonBody`] accepts any JSON document and leaves field checking to
//! [`crate::validation::Validator`], so a missing or mistyped field is
//! reported as a field error rather than a framework rejection.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde_json::Value;

use crate::error::app_error::AppError;
use crate::validation::FieldError;

/// Untyped JSON request body
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

impl JsonBody {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(AppError::validation(vec![FieldError::new(
                "body",
                rejection.body_text(),
            )])),
        }
    }
}
