//! HTTP server for the roster API.
//!
//! # API Endpoints
//!
//! | Method | Path                 | Description                        |
//! |--------|----------------------|------------------------------------|
//! | GET    | `/health`            | Health check                       |
//! | GET    | `/api/records`       | List records, surname ascending    |
//! | GET    | `/api/records/{id}`  | Fetch one record                   |
//! | POST   | `/api/records`       | Create a record                    |
//! | PUT    | `/api/records/{id}`  | Update a record in full            |
//! | POST   | `/api/import`        | Upload a CSV file for bulk import  |

use axum::{
    extract::{Multipart, Path, State},
    http::{header, Method, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use super::types::{error_response, ImportResponse};
use crate::error::{ImportError, StoreError};
use crate::import::import_bytes;
use crate::models::{NewPersonnelRecord, PersonnelRecord};
use crate::store::RecordStore;

type ApiError = (StatusCode, Json<Value>);

/// Start the HTTP server.
pub async fn start_server(
    port: u16,
    store: RecordStore,
) -> Result<(), Box<dyn std::error::Error>> {
    // Permissive CORS for development; the front end is served separately
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/records", get(list_records).post(create_record))
        .route("/api/records/{id}", get(get_record).put(update_record))
        .route("/api/import", post(import_csv))
        .layer(cors)
        .with_state(store);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("rosterload server listening on http://localhost:{}", port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "rosterload",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// List all records ordered by surname.
async fn list_records(
    State(store): State<RecordStore>,
) -> Result<Json<Vec<PersonnelRecord>>, ApiError> {
    let records = store.list().await.map_err(internal)?;
    Ok(Json(records))
}

/// Fetch a single record by id.
async fn get_record(
    State(store): State<RecordStore>,
    Path(id): Path<i64>,
) -> Result<Json<PersonnelRecord>, ApiError> {
    match store.find_by_id(id).await.map_err(internal)? {
        Some(record) => Ok(Json(record)),
        None => Err(not_found(id)),
    }
}

/// Create a new record.
async fn create_record(
    State(store): State<RecordStore>,
    Json(candidate): Json<NewPersonnelRecord>,
) -> Result<(StatusCode, Json<PersonnelRecord>), ApiError> {
    if let Err(errors) = candidate.validate() {
        return Err(validation_failed(errors));
    }

    match store.insert(&candidate).await {
        Ok(record) => Ok((StatusCode::CREATED, Json(record))),
        Err(StoreError::Duplicate(payroll)) => Err((
            StatusCode::CONFLICT,
            Json(error_response(&format!(
                "Payroll number '{}' already exists",
                payroll
            ))),
        )),
        Err(e) => Err(internal(e)),
    }
}

/// Update a record in full. The path id must match the body id.
async fn update_record(
    State(store): State<RecordStore>,
    Path(id): Path<i64>,
    Json(record): Json<PersonnelRecord>,
) -> Result<Json<PersonnelRecord>, ApiError> {
    if id != record.id {
        return Err(not_found(id));
    }

    if let Err(errors) = record.fields.validate() {
        return Err(validation_failed(errors));
    }

    match store.update(&record).await {
        Ok(()) => Ok(Json(record)),
        Err(StoreError::NotFound(id)) => Err(not_found(id)),
        // Genuine concurrent-update conflict: unrecoverable, propagate
        Err(e) => Err(internal(e)),
    }
}

/// Upload CSV endpoint.
async fn import_csv(
    State(store): State<RecordStore>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, ApiError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(error_response(&format!("Multipart error: {}", e))),
        )
    })? {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            file_name = field.file_name().map(|s| s.to_string());
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| {
                        (
                            StatusCode::BAD_REQUEST,
                            Json(error_response(&format!("Read error: {}", e))),
                        )
                    })?
                    .to_vec(),
            );
        }
    }

    let bytes = file_data
        .ok_or_else(|| (StatusCode::BAD_REQUEST, Json(error_response(&ImportError::NoFile.to_string()))))?;
    let file_name = file_name.unwrap_or_default();

    info!(file = %file_name, size = bytes.len(), "upload received");

    match import_bytes(&store, &file_name, &bytes).await {
        Ok(outcome) => Ok(Json(ImportResponse::from(outcome))),
        Err(err @ (ImportError::NoFile | ImportError::NotCsv | ImportError::Csv(_))) => Err((
            StatusCode::BAD_REQUEST,
            Json(error_response(&err.to_string())),
        )),
        Err(err) => Err(internal(err)),
    }
}

fn not_found(id: i64) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(error_response(&format!("Record {} not found", id))),
    )
}

fn validation_failed(errors: Vec<String>) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "status": "error",
            "errors": errors,
        })),
    )
}

fn internal(err: impl std::fmt::Display) -> ApiError {
    error!("internal error: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(error_response(&err.to_string())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn candidate(payroll: &str, surname: &str) -> NewPersonnelRecord {
        NewPersonnelRecord {
            payroll_number: payroll.into(),
            forenames: "John".into(),
            surname: surname.into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            telephone: String::new(),
            mobile: String::new(),
            address: String::new(),
            address2: String::new(),
            postcode: String::new(),
            email_home: String::new(),
        }
    }

    async fn store() -> RecordStore {
        RecordStore::init_test().await.unwrap()
    }

    #[tokio::test]
    async fn test_get_record_not_found() {
        let store = store().await;
        let err = get_record(State(store), Path(42)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let store = store().await;

        let (status, Json(created)) =
            create_record(State(store.clone()), Json(candidate("EMP001", "Doe")))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(fetched) = get_record(State(store), Path(created.id)).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_duplicate_is_conflict() {
        let store = store().await;

        create_record(State(store.clone()), Json(candidate("EMP001", "Doe")))
            .await
            .unwrap();
        let err = create_record(State(store), Json(candidate("EMP001", "Smith")))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_invalid_is_unprocessable() {
        let store = store().await;
        let mut bad = candidate("EMP001", "Doe");
        bad.surname = String::new();

        let err = create_record(State(store), Json(bad)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_update_path_id_mismatch_is_not_found() {
        let store = store().await;

        let (_, Json(created)) =
            create_record(State(store.clone()), Json(candidate("EMP001", "Doe")))
                .await
                .unwrap();

        let mut edited = created.clone();
        edited.fields.surname = "Smith".into();
        let err = update_record(State(store.clone()), Path(created.id + 1), Json(edited))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);

        // No mutation happened
        let Json(unchanged) = get_record(State(store), Path(created.id)).await.unwrap();
        assert_eq!(unchanged.fields.surname, "Doe");
    }

    #[tokio::test]
    async fn test_update_vanished_record_is_not_found() {
        let store = store().await;
        let ghost = candidate("EMP009", "Ghost").with_id(999);
        let err = update_record(State(store), Path(999), Json(ghost)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_sorted_by_surname() {
        let store = store().await;
        create_record(State(store.clone()), Json(candidate("EMP001", "Young")))
            .await
            .unwrap();
        create_record(State(store.clone()), Json(candidate("EMP002", "Adams")))
            .await
            .unwrap();

        let Json(records) = list_records(State(store)).await.unwrap();
        let surnames: Vec<&str> = records.iter().map(|r| r.fields.surname.as_str()).collect();
        assert_eq!(surnames, vec!["Adams", "Young"]);
    }
}
