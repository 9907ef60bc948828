//! # REST API for Account Management
//!
//! Routes under `/accounts/`. Each handler decodes the HTTP request into the
//! matching endpoint request, calls the endpoint, and encodes the result.
//! Decoding failures are reported here and never reach the service.

use axum::{
    body::Bytes,
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use shared::{Account, Filter, Pagination};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;

use crate::io::endpoints::{
    CreateAccountRequest, DeleteAccountRequest, GetAccountRequest, GetAccountsRequest,
    UpdateAccountRequest,
};
use crate::io::rest::error::ApiError;
use crate::AppState;

/// Content type of every response on the account routes, errors included
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Create the router for the account APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/accounts",
            get(list_accounts).post(create_account).fallback(method_not_allowed),
        )
        .route(
            "/accounts/",
            get(list_accounts).post(create_account).fallback(method_not_allowed),
        )
        .route(
            "/accounts/:id",
            get(get_account)
                .patch(update_account)
                .delete(delete_account)
                .fallback(method_not_allowed),
        )
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_TYPE,
            HeaderValue::from_static(JSON_CONTENT_TYPE),
        ))
}

/// Query parameters for the account list endpoint
#[derive(Debug, Default)]
pub struct AccountListQuery {
    /// Comma-separated account ids
    pub account_id: Option<String>,
}

impl AccountListQuery {
    /// Pick the known parameters out of the decoded query string. Only the
    /// first `account_id` counts; repeats are ignored.
    pub fn from_params(params: Vec<(String, String)>) -> Self {
        let account_id = params
            .into_iter()
            .find(|(key, _)| key == "account_id")
            .map(|(_, value)| value);

        Self { account_id }
    }
}

/// Build a list request from the query string.
///
/// Pagination is not read from the query string; the defaults always apply.
pub fn decode_get_accounts_request(query: &AccountListQuery) -> GetAccountsRequest {
    let ids = query
        .account_id
        .as_deref()
        .map(|raw| {
            raw.split(',')
                .filter(|id| !id.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();

    GetAccountsRequest {
        filter: Filter { ids },
        pagination: Pagination::default(),
    }
}

pub fn decode_create_account_request(body: &[u8]) -> Result<CreateAccountRequest, ApiError> {
    let account: Account = serde_json::from_slice(body).map_err(|_| ApiError::InvalidBody)?;
    Ok(CreateAccountRequest { account })
}

/// Decode a PATCH body. A body without an id takes the id from the path; a
/// body whose id differs from the path is rejected.
pub fn decode_update_account_request(
    path_id: &str,
    body: &[u8],
) -> Result<UpdateAccountRequest, ApiError> {
    let mut account: Account = serde_json::from_slice(body).map_err(|_| ApiError::InvalidBody)?;

    let body_id = account.id().map(str::to_owned);
    match body_id {
        None => account.account_id = Some(path_id.to_string()),
        Some(id) if id != path_id => return Err(ApiError::InconsistentId),
        Some(_) => {}
    }

    Ok(UpdateAccountRequest { account })
}

/// GET /accounts/
pub async fn list_accounts(
    State(state): State<AppState>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<Account>>, ApiError> {
    let Query(params) = params?;
    let query = AccountListQuery::from_params(params);
    info!("GET /accounts/ - query: {:?}", query);

    let request = decode_get_accounts_request(&query);
    let accounts = state.account_endpoints.get_accounts(request).await?;
    Ok(Json(accounts))
}

/// GET /accounts/:id
pub async fn get_account(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Account>, ApiError> {
    let Path(id) = path?;
    info!("GET /accounts/{}", id);

    let account = state
        .account_endpoints
        .get_account(GetAccountRequest { id })
        .await?;
    Ok(Json(account))
}

/// PATCH /accounts/:id
pub async fn update_account(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<Json<Account>, ApiError> {
    let Path(id) = path?;
    info!("PATCH /accounts/{}", id);

    let request = decode_update_account_request(&id, &body)?;
    let account = state.account_endpoints.update_account(request).await?;
    Ok(Json(account))
}

/// POST /accounts/
pub async fn create_account(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    info!("POST /accounts/");

    let request = decode_create_account_request(&body)?;
    let id = state.account_endpoints.create_account(request).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/accounts/{id}"))],
    )
        .into_response())
}

/// DELETE /accounts/:id
pub async fn delete_account(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    info!("DELETE /accounts/{}", id);

    state
        .account_endpoints
        .delete_account(DeleteAccountRequest { id })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Any method a route does not serve
async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
