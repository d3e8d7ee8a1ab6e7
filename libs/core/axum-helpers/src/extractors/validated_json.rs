//! JSON extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body extractor that also runs `Validate::validate`.
///
/// Malformed bodies are rejected with the JSON extractor's status, failed
/// validation with 400 and per-field details.
///
/// ```ignore
/// use axum_helpers::ValidatedJson;
///
/// async fn create(ValidatedJson(input): ValidatedJson<ProductIn>) -> impl IntoResponse {
///     // input passed validation
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, response::IntoResponse};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 1))]
        name: String,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_accepts_valid_payload() {
        let ValidatedJson(payload) =
            ValidatedJson::<Payload>::from_request(json_request(r#"{"name":"lamp"}"#), &())
                .await
                .unwrap();
        assert_eq!(payload.name, "lamp");
    }

    #[tokio::test]
    async fn test_rejects_failed_validation_with_400() {
        let rejection =
            ValidatedJson::<Payload>::from_request(json_request(r#"{"name":""}"#), &())
                .await
                .err()
                .unwrap();
        assert!(matches!(rejection, AppError::ValidationError(_)));
        assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rejects_malformed_json() {
        let rejection = ValidatedJson::<Payload>::from_request(json_request("{"), &())
            .await
            .err()
            .unwrap();
        assert!(matches!(rejection, AppError::JsonExtractorRejection(_)));
    }
}
