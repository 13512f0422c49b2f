use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{self, HeaderName, HeaderValue, Method, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use platform_api::{ApiError, ApiResult};
use products_hr::{
    dto::{
        CreateEmployeeRequest, EmployeeBenefitResponse, EmployeeResponse, ListEmployeesQuery,
        UpdateEmployeeRequest,
    },
    repository::{EmployeeStore, RepoError},
    validate::{UpdateEmployeeValidator, validate_create, validate_list},
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EmployeeStore>,
    pub config: Arc<AppConfig>,
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "employee api listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .route("/employees/{id}/benefits", get(get_employee_benefits))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<ListEmployeesQuery>,
) -> ApiResult<Json<Vec<EmployeeResponse>>> {
    validate_list(&query).into_result()?;
    let filter = query.into_filter();
    let employees = state.store.list(&filter).await?;
    let catalog = state.store.benefit_catalog().await?;
    let mut responses = Vec::with_capacity(employees.len());
    for employee in employees {
        let enrollments = state.store.benefits_for(employee.id).await?;
        responses.push(EmployeeResponse::from_entity(employee, &enrollments, &catalog));
    }
    Ok(Json(responses))
}

async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<EmployeeResponse>> {
    let employee = state
        .store
        .get_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let catalog = state.store.benefit_catalog().await?;
    let enrollments = state.store.benefits_for(employee.id).await?;
    Ok(Json(EmployeeResponse::from_entity(
        employee,
        &enrollments,
        &catalog,
    )))
}

async fn create_employee(
    State(state): State<AppState>,
    Json(request): Json<CreateEmployeeRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_create(&request).into_result()?;
    let created = state.store.create(request.into_entity()).await?;
    info!(employee_id = created.id, "employee created");
    let location = format!("/employees/{}", created.id);
    let body = EmployeeResponse::from_entity(created, &[], &[]);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(body),
    ))
}

async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateEmployeeRequest>,
) -> ApiResult<Json<EmployeeResponse>> {
    info!(employee_id = id, "updating employee");
    let Some(existing) = state.store.get_by_id(id).await? else {
        warn!(employee_id = id, "employee not found");
        return Err(ApiError::NotFound);
    };

    let validator = UpdateEmployeeValidator::new(state.store.as_ref());
    validator.validate(id, &request).await?.into_result()?;

    let mut updated = existing;
    request.apply_to(&mut updated);
    match state.store.update(updated).await {
        Ok(saved) => {
            info!(employee_id = id, "employee updated");
            let catalog = state.store.benefit_catalog().await?;
            let enrollments = state.store.benefits_for(saved.id).await?;
            Ok(Json(EmployeeResponse::from_entity(
                saved,
                &enrollments,
                &catalog,
            )))
        }
        Err(RepoError::NotFound) => Err(ApiError::NotFound),
        Err(err) => {
            error!(employee_id = id, error = %err, "error occurred while updating employee");
            Err(ApiError::internal(err.into()))
        }
    }
}

async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    let Some(existing) = state.store.get_by_id(id).await? else {
        return Err(ApiError::NotFound);
    };
    state.store.delete(&existing).await?;
    info!(employee_id = id, "employee deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn get_employee_benefits(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Vec<EmployeeBenefitResponse>>> {
    let employee = state
        .store
        .get_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let catalog = state.store.benefit_catalog().await?;
    let enrollments = state.store.benefits_for(employee.id).await?;
    Ok(Json(
        enrollments
            .iter()
            .map(|enrollment| EmployeeBenefitResponse::from_enrollment(enrollment, &catalog))
            .collect(),
    ))
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store_ok = state.store.get_all().await.is_ok();
    Json(HealthResponse {
        ok: store_ok,
        store_ok,
        backend: state.config.storage.as_str(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    ok: bool,
    store_ok: bool,
    backend: &'static str,
    version: &'static str,
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
}
