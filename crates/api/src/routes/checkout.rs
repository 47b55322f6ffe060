//! Catalog and checkout-session endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::SessionId;
use domain::checkout::{AddressField, CheckoutSession, Receipt};
use domain::{Catalog, CheckoutError, Package};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::store::SessionStore;

/// Shared application state accessible from all handlers.
pub struct AppState<S: SessionStore> {
    pub catalog: Catalog,
    pub store: S,
}

// -- Request types --

#[derive(Deserialize)]
pub struct SelectPackageRequest {
    pub package_id: String,
}

#[derive(Deserialize)]
pub struct AdjustUnitsRequest {
    pub delta: i32,
}

/// Partial address update; only the provided fields are assigned.
#[derive(Deserialize, Default)]
pub struct AddressRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub notes: Option<String>,
}

impl AddressRequest {
    fn into_updates(self) -> Vec<(AddressField, String)> {
        [
            (AddressField::FullName, self.full_name),
            (AddressField::Phone, self.phone),
            (AddressField::Address, self.address),
            (AddressField::City, self.city),
            (AddressField::State, self.state),
            (AddressField::Pincode, self.pincode),
            (AddressField::Notes, self.notes),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }
}

// -- Response types --

#[derive(Serialize)]
pub struct PackageResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub base_price_paise: i64,
    pub additional_unit_price_paise: Option<i64>,
    pub features: Vec<String>,
    pub highlight: String,
}

impl PackageResponse {
    fn from_package(package: &Package) -> Self {
        Self {
            id: package.id().to_string(),
            title: package.title().to_string(),
            description: package.description().to_string(),
            base_price_paise: package.base_price().paise(),
            additional_unit_price_paise: package.additional_unit_price().map(|p| p.paise()),
            features: package.features().to_vec(),
            highlight: package.highlight().to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub state: String,
    pub selected_package_id: Option<String>,
    pub additional_units: u32,
    pub total_paise: i64,
}

impl SessionResponse {
    fn new(id: SessionId, session: &CheckoutSession, catalog: &Catalog) -> Self {
        Self {
            session_id: id.to_string(),
            state: session.state().to_string(),
            selected_package_id: session
                .configuration()
                .selected_package_id()
                .map(|p| p.to_string()),
            additional_units: session.configuration().additional_units(),
            total_paise: session.total(catalog).paise(),
        }
    }
}

// -- Handlers --

/// GET /packages — list the catalog.
#[tracing::instrument(skip(state))]
pub async fn list_packages<S: SessionStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<Vec<PackageResponse>> {
    let packages = state
        .catalog
        .iter()
        .map(PackageResponse::from_package)
        .collect();
    Json(packages)
}

/// POST /checkout — start a new checkout session.
#[tracing::instrument(skip(state))]
pub async fn create_session<S: SessionStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let id = state.store.create().await;
    let session = load(&state, id).await?;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse::new(id, &session, &state.catalog)),
    ))
}

/// GET /checkout/:id — current session view with a freshly computed total.
#[tracing::instrument(skip(state))]
pub async fn get_session<S: SessionStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session_id = parse_session_id(&id)?;
    let session = load(&state, session_id).await?;
    Ok(Json(SessionResponse::new(
        session_id,
        &session,
        &state.catalog,
    )))
}

/// POST /checkout/:id/package — select a package and move to the address step.
#[tracing::instrument(skip(state, req))]
pub async fn select_package<S: SessionStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<SelectPackageRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session_id = parse_session_id(&id)?;
    let mut session = load(&state, session_id).await?;

    session.select_package(&state.catalog, req.package_id.into())?;

    state.store.save(session_id, session.clone()).await;
    Ok(Json(SessionResponse::new(
        session_id,
        &session,
        &state.catalog,
    )))
}

/// POST /checkout/:id/units — adjust the additional-appliance count.
#[tracing::instrument(skip(state, req))]
pub async fn adjust_units<S: SessionStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<AdjustUnitsRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session_id = parse_session_id(&id)?;
    let mut session = load(&state, session_id).await?;

    session.adjust_additional_units(&state.catalog, req.delta)?;

    state.store.save(session_id, session.clone()).await;
    Ok(Json(SessionResponse::new(
        session_id,
        &session,
        &state.catalog,
    )))
}

/// PUT /checkout/:id/address — set the provided address fields.
#[tracing::instrument(skip(state, req))]
pub async fn set_address<S: SessionStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<AddressRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session_id = parse_session_id(&id)?;
    let mut session = load(&state, session_id).await?;

    for (field, value) in req.into_updates() {
        session.set_address_field(field, value)?;
    }

    state.store.save(session_id, session.clone()).await;
    Ok(Json(SessionResponse::new(
        session_id,
        &session,
        &state.catalog,
    )))
}

/// POST /checkout/:id/back — return to package selection, keeping the
/// configuration.
#[tracing::instrument(skip(state))]
pub async fn go_back<S: SessionStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session_id = parse_session_id(&id)?;
    let mut session = load(&state, session_id).await?;

    session.back()?;

    state.store.save(session_id, session.clone()).await;
    Ok(Json(SessionResponse::new(
        session_id,
        &session,
        &state.catalog,
    )))
}

/// POST /checkout/:id/submit — validate the address and place the order.
#[tracing::instrument(skip(state))]
pub async fn submit<S: SessionStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Receipt>), ApiError> {
    let session_id = parse_session_id(&id)?;
    let mut session = load(&state, session_id).await?;

    let receipt = match session.submit(&state.catalog) {
        Ok(order) => Receipt::for_order(order),
        Err(err) => {
            if matches!(err, CheckoutError::MissingRequiredFields { .. }) {
                metrics::counter!("checkout_validation_failures_total").increment(1);
            }
            return Err(err.into());
        }
    };

    state.store.save(session_id, session).await;
    metrics::counter!("checkout_orders_submitted_total").increment(1);
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// GET /checkout/:id/receipt — the receipt of the placed order.
#[tracing::instrument(skip(state))]
pub async fn get_receipt<S: SessionStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Receipt>, ApiError> {
    let session_id = parse_session_id(&id)?;
    let session = load(&state, session_id).await?;

    match session.receipt() {
        Some(receipt) => Ok(Json(receipt)),
        None => Err(CheckoutError::InvalidStateTransition {
            current_state: session.state(),
            action: "view receipt",
        }
        .into()),
    }
}

/// POST /checkout/:id/reset — clear everything and start a new order.
#[tracing::instrument(skip(state))]
pub async fn reset<S: SessionStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session_id = parse_session_id(&id)?;
    let mut session = load(&state, session_id).await?;

    session.reset()?;

    state.store.save(session_id, session.clone()).await;
    Ok(Json(SessionResponse::new(
        session_id,
        &session,
        &state.catalog,
    )))
}

// -- Helpers --

async fn load<S: SessionStore>(
    state: &AppState<S>,
    id: SessionId,
) -> Result<CheckoutSession, ApiError> {
    state
        .store
        .load(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Session {id} not found")))
}

fn parse_session_id(id: &str) -> Result<SessionId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid session id: {e}")))?;
    Ok(SessionId::from(uuid))
}
