// src/common/extract.rs

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::common::error::AppError;

/// `Json<T>` que devolve os erros de corpo no envelope `{status, message}`
/// com 400, em vez do 422 em texto puro do axum.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                tracing::debug!("Corpo rejeitado: {}", rejection.body_text());
                Err(AppError::InvalidBody(rejection.body_text()))
            }
        }
    }
}
