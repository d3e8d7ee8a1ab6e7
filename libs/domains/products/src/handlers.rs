//! HTTP handlers for Products API

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    QueryParams, ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{ProductError, ProductResult};
use crate::models::{PriceRange, ProductIn, ProductOut, ProductUpdate, ProductUpdateOut};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        query_products,
        create_product,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(ProductIn, ProductOut, ProductUpdate, ProductUpdateOut, PriceRange),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the products router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(query_products).post(create_product))
        .route(
            "/{id}",
            get(get_product)
                .patch(update_product)
                .delete(delete_product),
        )
        .with_state(shared_service)
}

/// List products, optionally bounded by price
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(PriceRange),
    responses(
        (status = 200, description = "Products priced strictly inside the bounds", body = Vec<ProductOut>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn query_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    QueryParams(range): QueryParams<PriceRange>,
) -> ProductResult<Json<Vec<ProductOut>>> {
    let products = service.query(range).await?;
    Ok(Json(products))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = ProductIn,
    responses(
        (status = 201, description = "Product created successfully", body = ProductOut),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(body): ValidatedJson<ProductIn>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create(body).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductOut),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<String>,
) -> ProductResult<Json<ProductOut>> {
    let product = service.get(&id).await?;
    Ok(Json(product))
}

/// Partially update a product
///
/// Only fields present in the body are written.
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    request_body = ProductUpdate,
    responses(
        (status = 200, description = "Product updated successfully", body = ProductUpdateOut),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<ProductUpdate>,
) -> ProductResult<Json<ProductUpdateOut>> {
    let product = service.update(&id, body).await?;
    Ok(Json(product))
}

/// Delete a product
///
/// A document removed by a concurrent request between the lookup and the
/// delete is reported as 404.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted successfully"),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<String>,
) -> ProductResult<impl IntoResponse> {
    if !service.delete(&id).await? {
        return Err(ProductError::NotFound(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;
    use crate::repository::MockProductRepository;
    use axum::body::Body;
    use axum::http::{Request, header};
    use axum_helpers::ErrorResponse;
    use chrono::Utc;
    use http_body_util::BodyExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    fn stored(id: &str, price: f64) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: "Desk lamp".to_string(),
            quantity: 4,
            price,
            status: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn app(repo: MockProductRepository) -> Router {
        router(ProductService::new(repo))
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_returns_201() {
        let mut repo = MockProductRepository::new();
        repo.expect_insert().returning(|p| Ok(p));

        let response = app(repo)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"name":"Desk lamp","quantity":4,"price":24.5}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let out: ProductOut = body_json(response).await;
        assert_eq!(out.name, "Desk lamp");
        assert!(out.status);
    }

    #[tokio::test]
    async fn test_create_invalid_body_returns_400() {
        let mut repo = MockProductRepository::new();
        repo.expect_insert().never();

        let response = app(repo)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"","quantity":4,"price":24.5}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let err: ErrorResponse = body_json(response).await;
        assert_eq!(err.error, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_query_with_max_price_only() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_price_range()
            .withf(|range| range.min_price.is_none() && range.max_price == Some(50.0))
            .returning(|_| Ok(vec![stored("a", 20.0)]));

        let response = app(repo)
            .oneshot(
                Request::builder()
                    .uri("/?max_price=50")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let products: Vec<ProductOut> = body_json(response).await;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "a");
    }

    #[tokio::test]
    async fn test_query_with_unparsable_bound_returns_json_400() {
        for uri in ["/?min_price=abc", "/?min_price="] {
            let mut repo = MockProductRepository::new();
            repo.expect_find_by_price_range().never();

            let response = app(repo)
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(
                response.headers().get(header::CONTENT_TYPE).unwrap(),
                "application/json"
            );
            let err: ErrorResponse = body_json(response).await;
            assert_eq!(err.error, "QUERY_EXTRACTION");
            assert!(err.message.contains("min_price"));
        }
    }

    #[tokio::test]
    async fn test_get_missing_returns_404() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let response = app(repo)
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let err: ErrorResponse = body_json(response).await;
        assert_eq!(err.message, "Product not found with filter: nope");
    }

    #[tokio::test]
    async fn test_patch_updates_product() {
        let mut repo = MockProductRepository::new();
        repo.expect_update_fields()
            .withf(|id, update| id == "p-1" && update.price == Some(99.0) && update.name.is_none())
            .returning(|id, _| Ok(Some(stored(id, 99.0))));

        let response = app(repo)
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/p-1")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"price":99.0}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let out: ProductUpdateOut = body_json(response).await;
        assert_eq!(out.price, 99.0);
    }

    #[tokio::test]
    async fn test_delete_returns_204_then_404() {
        let lookups = AtomicUsize::new(0);
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id().times(2).returning(move |id| {
            if lookups.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(Some(stored(id, 1.0)))
            } else {
                Ok(None)
            }
        });
        repo.expect_delete_by_id().times(1).returning(|_| Ok(1));

        let app = app(repo);
        let request = || {
            Request::builder()
                .method("DELETE")
                .uri("/p-1")
                .body(Body::empty())
                .unwrap()
        };

        let response = app.clone().oneshot(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.oneshot(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_lost_to_concurrent_delete_returns_404() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, 1.0))));
        repo.expect_delete_by_id().times(1).returning(|_| Ok(0));

        let response = app(repo)
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/p-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let err: ErrorResponse = body_json(response).await;
        assert_eq!(err.message, "Product not found with filter: p-1");
    }

    #[test]
    fn test_openapi_lists_product_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/{id}"));
        assert!(doc.components.is_some());
    }
}
