// src/routes.rs

use axum::{
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::{config::AppState, docs::ApiDoc, handlers};

pub fn router(app_state: AppState) -> Router {
    // Rotas de clientes (chave: celular)
    let client_routes = Router::new()
        .route("/save_client", post(handlers::clients::save_client))
        .route("/clients", get(handlers::clients::list_clients))
        .route(
            "/clients/{mobile_number}",
            put(handlers::clients::update_client).delete(handlers::clients::delete_client),
        );

    // Rotas de faturas
    let invoice_routes = Router::new()
        .route("/save_invoice", post(handlers::invoices::save_invoice))
        .route("/invoices", get(handlers::invoices::list_invoices))
        // O frontend chama esta para "Saved Invoices"
        .route("/dashboard/invoices", get(handlers::invoices::list_invoices))
        .route(
            "/invoices/{invoice_number}",
            delete(handlers::invoices::delete_invoice),
        )
        .route(
            "/invoices/{invoice_number}/add_payment",
            put(handlers::invoices::add_payment),
        );

    let dashboard_routes = Router::new()
        .route("/dashboard_summary", get(handlers::dashboard::get_summary))
        .route("/invoice_summary", get(handlers::dashboard::get_summary));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(client_routes)
        .merge(invoice_routes)
        .merge(dashboard_routes)
        .layer(TraceLayer::new_for_http())
        // O frontend roda em outra origem
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        db::{CollectionBackend, CollectionName, InMemoryBackend},
        services::client_service::ClientSaveMode,
    };
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn app_with(backend: InMemoryBackend, config: Config) -> Router {
        let backend: Arc<dyn CollectionBackend> = Arc::new(backend);
        let state = AppState::with_backend(backend, &config).await.unwrap();
        router(state)
    }

    async fn app(backend: InMemoryBackend) -> Router {
        app_with(backend, Config::default()).await
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }

    #[tokio::test]
    async fn health_check_answers_ok() {
        let app = app(InMemoryBackend::new()).await;
        let (status, body) = send(&app, "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!("OK"));
    }

    #[tokio::test]
    async fn openapi_document_lists_the_routes() {
        let app = app(InMemoryBackend::new()).await;
        let (status, body) = send(&app, "GET", "/api-docs/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"].get("/save_invoice").is_some());
        assert!(body["paths"].get("/invoices/{invoice_number}/add_payment").is_some());
    }

    // --- Clientes ---

    #[tokio::test]
    async fn client_lifecycle() {
        let backend = InMemoryBackend::new();
        let app = app(backend.clone()).await;

        let (status, body) = send(
            &app,
            "POST",
            "/save_client",
            Some(json!({"mobile_number": "9876543210", "name": "Ana", "email": "ana@x.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({"status": "success", "message": "Client added successfully!"}));

        let (status, body) = send(
            &app,
            "PUT",
            "/clients/9876543210",
            Some(json!({"address": "Rua B, 10"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Client with mobile number 9876543210 updated.");

        let (status, body) = send(&app, "GET", "/clients", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([{
                "mobile_number": "9876543210",
                "name": "Ana",
                "email": "ana@x.com",
                "address": "Rua B, 10"
            }])
        );

        let (status, _) = send(&app, "DELETE", "/clients/9876543210", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(backend.snapshot(CollectionName::Clients).is_empty());
    }

    #[tokio::test]
    async fn saving_existing_client_upserts_without_duplicating() {
        let backend = InMemoryBackend::with_records(
            CollectionName::Clients,
            vec![json!({"mobile_number": "111", "name": "Ana"})],
        );
        let app = app(backend.clone()).await;

        let (status, body) = send(
            &app,
            "POST",
            "/save_client",
            Some(json!({"mobile_number": "111", "email": "ana@x.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Client with mobile number 111 updated.");
        assert_eq!(
            backend.snapshot(CollectionName::Clients),
            vec![json!({"mobile_number": "111", "name": "Ana", "email": "ana@x.com"})]
        );
    }

    #[tokio::test]
    async fn reject_mode_answers_409_for_duplicates() {
        let backend = InMemoryBackend::with_records(
            CollectionName::Clients,
            vec![json!({"mobile_number": "111"})],
        );
        let config = Config {
            client_save_mode: ClientSaveMode::Reject,
            ..Config::default()
        };
        let app = app_with(backend, config).await;

        let (status, body) =
            send(&app, "POST", "/save_client", Some(json!({"mobile_number": "111"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "Client with this mobile number already exists.");
    }

    #[tokio::test]
    async fn client_without_mobile_number_is_rejected() {
        let app = app(InMemoryBackend::new()).await;
        let (status, body) = send(&app, "POST", "/save_client", Some(json!({"name": "Ana"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert!(body["details"].get("mobile_number").is_some());
    }

    #[tokio::test]
    async fn unknown_client_answers_404() {
        let app = app(InMemoryBackend::new()).await;

        let (status, body) = send(&app, "DELETE", "/clients/000", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Client with mobile number 000 not found.");

        let (status, _) = send(&app, "PUT", "/clients/000", Some(json!({"name": "X"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // --- Faturas ---

    #[tokio::test]
    async fn saving_invoices_assigns_sequential_numbers() {
        let backend = InMemoryBackend::new();
        let app = app(backend.clone()).await;

        let (status, body) = send(
            &app,
            "POST",
            "/save_invoice",
            Some(json!({"client_name": "Ana", "total_amount": 100})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({"status": "success", "message": "Invoice saved successfully!", "invoice_number": "01"})
        );

        let (_, body) = send(
            &app,
            "POST",
            "/save_invoice",
            Some(json!({"invoice_number": "01", "total_amount": "50.00"})),
        )
        .await;
        assert_eq!(body["invoice_number"], "02");

        let (status, body) = send(&app, "GET", "/dashboard/invoices", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(2));
        assert_eq!(body[0]["client_name"], "Ana");
        assert_eq!(body[0]["remaining_balance"], json!(100.0));
    }

    #[tokio::test]
    async fn payments_flow_through_the_api() {
        let backend = InMemoryBackend::with_records(
            CollectionName::Invoices,
            vec![json!({"invoice_number": "01", "total_amount": 100, "remaining_balance": 100})],
        );
        let app = app(backend).await;

        let (status, body) = send(
            &app,
            "PUT",
            "/invoices/01/add_payment",
            Some(json!({"amount_paid": 60})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["invoice_number"], "01");
        assert_eq!(body["remaining_balance"], json!(40.0));

        let (status, body) = send(
            &app,
            "PUT",
            "/invoices/01/add_payment",
            Some(json!({"amount_paid": "40.01"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Payment exceeds remaining balance of 40.");

        let (status, _) = send(
            &app,
            "PUT",
            "/invoices/01/add_payment",
            Some(json!({"amount_paid": 0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            "PUT",
            "/invoices/01/add_payment",
            Some(json!({"amount_paid": 40})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            "PUT",
            "/invoices/01/add_payment",
            Some(json!({"amount_paid": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invoice 01 is already fully paid.");

        let (status, _) = send(
            &app,
            "PUT",
            "/invoices/99/add_payment",
            Some(json!({"amount_paid": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn deleting_invoices() {
        let backend = InMemoryBackend::with_records(
            CollectionName::Invoices,
            vec![json!({"invoice_number": "01"}), json!({"invoice_number": "02"})],
        );
        let app = app(backend.clone()).await;

        let (status, body) = send(&app, "DELETE", "/invoices/01", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Invoice 01 deleted.");

        let (status, body) = send(&app, "DELETE", "/invoices/01", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Invoice 01 not found.");

        assert_eq!(
            backend.snapshot(CollectionName::Invoices),
            vec![json!({"invoice_number": "02"})]
        );
    }

    #[tokio::test]
    async fn bad_bodies_answer_400_with_the_error_envelope() {
        let backend = InMemoryBackend::with_records(
            CollectionName::Invoices,
            vec![json!({"invoice_number": "01", "total_amount": 100, "remaining_balance": 100})],
        );
        let app = app(backend.clone()).await;

        let (status, body) = send(
            &app,
            "PUT",
            "/invoices/01/add_payment",
            Some(json!({"amount_paid": "abc"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"status": "error", "message": "Invalid payment amount."}));

        let (status, body) =
            send(&app, "POST", "/save_invoice", Some(json!({"total_amount": "abc"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("abc"));
        assert_eq!(backend.snapshot(CollectionName::Invoices).len(), 1);

        let (status, body) = send(&app, "POST", "/save_client", Some(json!("not an object"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn unreadable_stored_client_survives_a_save() {
        let seed = vec![
            json!({"mobile_number": "111", "name": 12345}),
            json!({"mobile_number": "222", "name": "Bia"}),
        ];
        let backend = InMemoryBackend::with_records(CollectionName::Clients, seed.clone());
        let app = app(backend.clone()).await;

        let (status, body) = send(&app, "GET", "/clients", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(seed));

        let (status, _) =
            send(&app, "POST", "/save_client", Some(json!({"mobile_number": "333"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            backend.snapshot(CollectionName::Clients),
            vec![seed[0].clone(), seed[1].clone(), json!({"mobile_number": "333"})]
        );

        let (status, body) = send(&app, "GET", "/dashboard_summary", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_clients"], 3);
    }

    // --- Dashboard ---

    #[tokio::test]
    async fn summary_is_served_on_both_paths() {
        let backend = InMemoryBackend::with_records(
            CollectionName::Invoices,
            vec![
                json!({"invoice_number": "01", "total_amount": 100, "remaining_balance": 40}),
                json!({"invoice_number": "02", "total_amount": 50, "remaining_balance": 0}),
            ],
        );
        let app = app(backend).await;

        for path in ["/dashboard_summary", "/invoice_summary"] {
            let (status, body) = send(&app, "GET", path, None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(
                body,
                json!({
                    "total_clients": 0,
                    "total_invoices": 2,
                    "total_paid_amount": 110.0,
                    "total_unpaid_amount": 40.0
                })
            );
        }
    }
}
