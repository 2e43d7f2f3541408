//! REST API handlers for vault operations
//!
//! The `caller` field of each mutating request is taken as the authenticated
//! identity of whoever invoked the operation; the fronting environment is
//! responsible for establishing it.

use crate::api::websocket::{WsBroadcaster, WsEvent};
use crate::assets::{Asset, AssetLedger, TokenBalanceEntry, TransferReport};
use crate::config::ServiceConfig;
use crate::crypto::decode_hex;
use crate::storage::Storage;
use crate::vault::{
    AccountInfo, ArmRequest, Clock, HeirConfig, RecordedEvent, Rejection, ReleaseRecord,
    VaultError, VaultManager, VerificationReport,
};
use crate::vault::verifier::authorization_message;
use alloy_primitives::{Address, B256};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub manager: Arc<RwLock<VaultManager>>,
    /// Snapshot storage; `None` keeps everything in memory
    pub storage: Option<Arc<Storage>>,
    pub clock: Arc<dyn Clock>,
    pub ws_broadcaster: Arc<WsBroadcaster>,
    pub config: Arc<ServiceConfig>,
}

impl ApiState {
    pub fn new(
        manager: VaultManager,
        storage: Option<Arc<Storage>>,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            manager: Arc::new(RwLock::new(manager)),
            storage,
            clock,
            ws_broadcaster: Arc::new(WsBroadcaster::new()),
            config: Arc::new(config),
        }
    }

    /// Persist the snapshot and push the vault's newest event to subscribers
    fn commit(&self, manager: &VaultManager, vault: &Address) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.save(manager) {
                log::error!("Failed to save snapshot: {}", e);
            }
        }
        if let Some(event) = manager.events(vault).ok().and_then(|events| events.last()) {
            self.ws_broadcaster
                .broadcast(WsEvent::VaultEvent(event.clone()));
        }
    }

    /// Candidate tokens for discovery: the configured catalog, or every
    /// token the ledger knows when no catalog is configured
    fn token_candidates(&self, manager: &VaultManager) -> Vec<Address> {
        if self.config.token_catalog.is_empty() {
            let mut tokens = manager.ledger().tokens();
            tokens.sort();
            tokens
        } else {
            self.config.token_catalog.clone()
        }
    }
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<VerificationReport>,
}

fn bad_request(error: String) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError {
            error,
            code: None,
            report: None,
        }),
    )
}

impl From<VaultError> for (StatusCode, Json<ApiError>) {
    fn from(err: VaultError) -> Self {
        let status = match &err {
            VaultError::VaultNotFound(_) => StatusCode::NOT_FOUND,
            VaultError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            VaultError::NotArmed
            | VaultError::AlreadyArmed(_)
            | VaultError::ConfigLocked
            | VaultError::LockNotElapsed { .. }
            | VaultError::ReplayedNonce { .. } => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        };
        (
            status,
            Json(ApiError {
                error: err.to_string(),
                code: Some(err.code().to_string()),
                report: err.report().cloned(),
            }),
        )
    }
}

#[derive(Serialize, Deserialize)]
pub struct DigestResponse {
    pub vault: Address,
    pub nonce: u64,
    pub destination: Address,
    /// Packed message, hex
    pub message: String,
    /// Keccak-256 of the message; what heirs sign
    pub hash: B256,
}

#[derive(Serialize, Deserialize)]
pub struct SiftResponse {
    pub quorum: bool,
    pub threshold: usize,
    pub accepted_signers: Vec<Address>,
    /// Accepted signatures, ready to submit to `arm`
    pub accepted_signatures: Vec<String>,
    pub rejected: Vec<Rejection>,
}

#[derive(Serialize, Deserialize)]
pub struct CancelResponse {
    pub nonce: u64,
}

#[derive(Serialize, Deserialize)]
pub struct DepositResponse {
    pub vault: Address,
    pub asset: Asset,
    pub balance: String,
}

#[derive(Serialize, Deserialize)]
pub struct TokenInfo {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
pub struct CreateVaultRequest {
    pub owner: Address,
    pub heirs: Vec<Address>,
    pub threshold: usize,
    pub delay_secs: u64,
}

#[derive(Deserialize)]
pub struct DigestQuery {
    pub destination: Address,
}

#[derive(Deserialize)]
pub struct SiftRequest {
    pub destination: Address,
    pub signatures: Vec<String>,
}

#[derive(Deserialize)]
pub struct ArmVaultRequest {
    pub caller: Address,
    pub destination: Address,
    pub signatures: Vec<String>,
    /// Nonce the signatures were collected under
    pub nonce: Option<u64>,
}

#[derive(Deserialize)]
pub struct CallerRequest {
    pub caller: Address,
}

#[derive(Deserialize)]
pub struct ReleaseRequest {
    pub caller: Address,
    /// Tokens to move; only these are touched
    pub tokens: Vec<Address>,
}

#[derive(Deserialize)]
pub struct UpdateConfigRequest {
    pub caller: Address,
    pub heirs: Vec<Address>,
    pub threshold: usize,
    pub delay_secs: u64,
}

#[derive(Deserialize)]
pub struct EmergencyTransferRequest {
    pub caller: Address,
    pub to: Address,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub tokens: Vec<Address>,
    #[serde(default)]
    pub transfer_all: bool,
}

#[derive(Deserialize)]
pub struct DepositRequest {
    /// Token to deposit; omitted means the base currency
    pub token: Option<Address>,
    pub amount: String,
}

#[derive(Deserialize)]
pub struct RegisterTokenRequest {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_address(input: &str) -> Result<Address, (StatusCode, Json<ApiError>)> {
    input
        .parse()
        .map_err(|e| bad_request(format!("Invalid address '{}': {}", input, e)))
}

fn parse_amount(input: &str) -> Result<u128, (StatusCode, Json<ApiError>)> {
    input
        .parse()
        .map_err(|_| bad_request("Invalid amount: must be a valid number".to_string()))
}

/// Undecodable hex becomes an empty candidate, which the verifier then
/// records as unrecoverable instead of failing the whole batch
fn decode_signatures(signatures: &[String]) -> Vec<Vec<u8>> {
    signatures
        .iter()
        .map(|s| decode_hex(s).unwrap_or_default())
        .collect()
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

// ============================================================================
// Vault Handlers
// ============================================================================

/// POST /api/vaults - Create a vault
pub async fn create_vault(
    State(state): State<ApiState>,
    Json(req): Json<CreateVaultRequest>,
) -> ApiResult<AccountInfo> {
    let now = state.clock.now();
    let mut manager = state.manager.write().await;

    let vault = manager
        .create_vault(req.owner, req.heirs, req.threshold, req.delay_secs, now)?
        .address();
    let info = manager.info(&vault)?;
    state.commit(&manager, &vault);

    Ok(Json(info))
}

/// GET /api/vaults - List vaults
pub async fn list_vaults(State(state): State<ApiState>) -> Json<Vec<AccountInfo>> {
    let manager = state.manager.read().await;
    let infos = manager
        .list_vaults()
        .iter()
        .map(|v| v.info(manager.ledger()))
        .collect();
    Json(infos)
}

/// GET /api/vaults/{address} - Vault state
pub async fn get_vault(
    State(state): State<ApiState>,
    Path(address): Path<String>,
) -> ApiResult<AccountInfo> {
    let vault = parse_address(&address)?;
    let manager = state.manager.read().await;
    Ok(Json(manager.info(&vault)?))
}

/// GET /api/vaults/{address}/events - Recent vault events
pub async fn get_vault_events(
    State(state): State<ApiState>,
    Path(address): Path<String>,
) -> ApiResult<Vec<RecordedEvent>> {
    let vault = parse_address(&address)?;
    let manager = state.manager.read().await;
    Ok(Json(manager.events(&vault)?.to_vec()))
}

/// GET /api/vaults/{address}/digest?destination=0x.. - Message heirs must sign
pub async fn get_digest(
    State(state): State<ApiState>,
    Path(address): Path<String>,
    Query(query): Query<DigestQuery>,
) -> ApiResult<DigestResponse> {
    let vault = parse_address(&address)?;
    let manager = state.manager.read().await;
    let (nonce, hash) = manager.authorization_digest(&vault, &query.destination)?;

    Ok(Json(DigestResponse {
        vault,
        nonce,
        destination: query.destination,
        message: format!(
            "0x{}",
            hex::encode(authorization_message(&vault, nonce, &query.destination))
        ),
        hash,
    }))
}

/// POST /api/vaults/{address}/sift - Check signatures without arming
pub async fn sift_signatures(
    State(state): State<ApiState>,
    Path(address): Path<String>,
    Json(req): Json<SiftRequest>,
) -> ApiResult<SiftResponse> {
    let vault = parse_address(&address)?;
    let signatures = decode_signatures(&req.signatures);
    let manager = state.manager.read().await;
    let report = manager.sift(&vault, &signatures, &req.destination)?;

    Ok(Json(SiftResponse {
        quorum: report.is_quorum(),
        threshold: report.threshold,
        accepted_signatures: report
            .accepted_indices
            .iter()
            .map(|i| req.signatures[*i].clone())
            .collect(),
        accepted_signers: report.accepted,
        rejected: report.rejected,
    }))
}

/// POST /api/vaults/{address}/arm - Arm a release with heir signatures
pub async fn arm_vault(
    State(state): State<ApiState>,
    Path(address): Path<String>,
    Json(req): Json<ArmVaultRequest>,
) -> ApiResult<ArmRequest> {
    let vault = parse_address(&address)?;
    let signatures = decode_signatures(&req.signatures);
    let now = state.clock.now();
    let mut manager = state.manager.write().await;

    let request = manager.arm(
        &vault,
        &req.caller,
        &signatures,
        &req.destination,
        req.nonce,
        now,
    )?;
    state.commit(&manager, &vault);

    Ok(Json(request))
}

/// POST /api/vaults/{address}/cancel - Owner cancels the pending release
pub async fn cancel_vault(
    State(state): State<ApiState>,
    Path(address): Path<String>,
    Json(req): Json<CallerRequest>,
) -> ApiResult<CancelResponse> {
    let vault = parse_address(&address)?;
    let now = state.clock.now();
    let mut manager = state.manager.write().await;

    let nonce = manager.cancel(&vault, &req.caller, now)?;
    state.commit(&manager, &vault);

    Ok(Json(CancelResponse { nonce }))
}

/// POST /api/vaults/{address}/release - Release after the delay
pub async fn release_vault(
    State(state): State<ApiState>,
    Path(address): Path<String>,
    Json(req): Json<ReleaseRequest>,
) -> ApiResult<ReleaseRecord> {
    let vault = parse_address(&address)?;
    let now = state.clock.now();
    let mut manager = state.manager.write().await;

    let record = manager.release(&vault, &req.caller, &req.tokens, now)?;
    state.commit(&manager, &vault);

    Ok(Json(record))
}

/// POST /api/vaults/{address}/config - Owner replaces heirs, threshold and delay
pub async fn update_config(
    State(state): State<ApiState>,
    Path(address): Path<String>,
    Json(req): Json<UpdateConfigRequest>,
) -> ApiResult<HeirConfig> {
    let vault = parse_address(&address)?;
    let now = state.clock.now();
    let mut manager = state.manager.write().await;

    let config = manager.update_config(
        &vault,
        &req.caller,
        req.heirs,
        req.threshold,
        req.delay_secs,
        now,
    )?;
    state.commit(&manager, &vault);

    Ok(Json(config))
}

/// POST /api/vaults/{address}/emergency - Owner moves assets out directly
pub async fn emergency_transfer(
    State(state): State<ApiState>,
    Path(address): Path<String>,
    Json(req): Json<EmergencyTransferRequest>,
) -> ApiResult<TransferReport> {
    let vault = parse_address(&address)?;
    let amount = match &req.amount {
        Some(amount) => parse_amount(amount)?,
        None => 0,
    };
    let now = state.clock.now();
    let mut manager = state.manager.write().await;

    let report = manager.emergency_transfer(
        &vault,
        &req.caller,
        &req.to,
        amount,
        &req.tokens,
        req.transfer_all,
        now,
    )?;
    state.commit(&manager, &vault);

    Ok(Json(report))
}

/// POST /api/vaults/{address}/deposit - Fund a vault
pub async fn deposit(
    State(state): State<ApiState>,
    Path(address): Path<String>,
    Json(req): Json<DepositRequest>,
) -> ApiResult<DepositResponse> {
    let vault = parse_address(&address)?;
    let amount = parse_amount(&req.amount)?;
    let asset = req.token.map(Asset::Token).unwrap_or(Asset::Base);
    let mut manager = state.manager.write().await;

    let balance = manager.deposit(&vault, &asset, amount)?;
    if let Some(storage) = &state.storage {
        if let Err(e) = storage.save(&manager) {
            log::error!("Failed to save snapshot: {}", e);
        }
    }

    Ok(Json(DepositResponse {
        vault,
        asset,
        balance: balance.to_string(),
    }))
}

/// GET /api/vaults/{address}/tokens - Non-zero token balances
pub async fn discover_tokens(
    State(state): State<ApiState>,
    Path(address): Path<String>,
) -> ApiResult<Vec<TokenBalanceEntry>> {
    let vault = parse_address(&address)?;
    let manager = state.manager.read().await;
    let candidates = state.token_candidates(&manager);
    Ok(Json(manager.discover_tokens(&vault, &candidates)?))
}

// ============================================================================
// Token Handlers
// ============================================================================

/// GET /api/tokens - List registered tokens
pub async fn list_tokens(State(state): State<ApiState>) -> Json<Vec<TokenInfo>> {
    let manager = state.manager.read().await;
    let ledger = manager.ledger();

    let mut tokens: Vec<TokenInfo> = ledger
        .tokens()
        .into_iter()
        .filter_map(|address| {
            ledger.token_metadata(&address).map(|m| TokenInfo {
                address,
                symbol: m.symbol,
                decimals: m.decimals,
            })
        })
        .collect();
    tokens.sort_by_key(|t| t.address);

    Json(tokens)
}

/// POST /api/tokens - Register a token with the ledger
pub async fn register_token(
    State(state): State<ApiState>,
    Json(req): Json<RegisterTokenRequest>,
) -> ApiResult<TokenInfo> {
    let mut manager = state.manager.write().await;
    manager
        .ledger_mut()
        .register_token(req.address, req.symbol.clone(), req.decimals)
        .map_err(|e| bad_request(format!("Failed to register token: {}", e)))?;
    if let Some(storage) = &state.storage {
        if let Err(e) = storage.save(&manager) {
            log::error!("Failed to save snapshot: {}", e);
        }
    }

    Ok(Json(TokenInfo {
        address: req.address,
        symbol: req.symbol,
        decimals: req.decimals,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::create_router;
    use crate::crypto::KeyPair;
    use crate::vault::{sign_authorization, ManualClock};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::Router;
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        clock: Arc<ManualClock>,
        state: ApiState,
    }

    fn test_app() -> TestApp {
        let clock = Arc::new(ManualClock::new(
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        ));
        let state = ApiState::new(
            VaultManager::default(),
            None,
            clock.clone(),
            ServiceConfig::default(),
        );
        TestApp {
            router: create_router(state.clone()),
            clock,
            state,
        }
    }

    async fn call(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn hex_sig(sig: Vec<u8>) -> String {
        format!("0x{}", hex::encode(sig))
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = test_app();
        let response = app
            .router
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_vault_validation() {
        let app = test_app();
        let (status, body) = call(
            &app.router,
            "POST",
            "/api/vaults",
            Some(json!({
                "owner": Address::repeat_byte(0xee),
                "heirs": [Address::repeat_byte(1)],
                "threshold": 2,
                "delay_secs": 60
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "InvalidThreshold");
    }

    #[tokio::test]
    async fn test_unknown_vault_is_not_found() {
        let app = test_app();
        let uri = format!("/api/vaults/{}", Address::repeat_byte(9));
        let (status, _) = call(&app.router, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(&app.router, "GET", "/api/vaults/not-an-address", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_arm_and_release_over_http() {
        let app = test_app();
        let heirs: Vec<KeyPair> = (0..2).map(|_| KeyPair::generate()).collect();
        let owner = Address::repeat_byte(0xee);
        let destination = Address::repeat_byte(0xd0);
        let token = Address::repeat_byte(0xaa);

        let (status, created) = call(
            &app.router,
            "POST",
            "/api/vaults",
            Some(json!({
                "owner": owner,
                "heirs": heirs.iter().map(|k| k.address()).collect::<Vec<_>>(),
                "threshold": 2,
                "delay_secs": 3600
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let vault: Address = serde_json::from_value(created["vault"].clone()).unwrap();

        let (status, _) = call(
            &app.router,
            "POST",
            "/api/tokens",
            Some(json!({ "address": token, "symbol": "TTK", "decimals": 6 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        for body in [
            json!({ "amount": "5000" }),
            json!({ "token": token, "amount": "2500000" }),
        ] {
            let (status, _) = call(
                &app.router,
                "POST",
                &format!("/api/vaults/{}/deposit", vault),
                Some(body),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, tokens) = call(&app.router, "GET", &format!("/api/vaults/{}/tokens", vault), None).await;
        assert_eq!(tokens[0]["display"], "2.5");
        let listed: Vec<Value> = tokens
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["token"].clone())
            .collect();

        let (_, digest) = call(
            &app.router,
            "GET",
            &format!("/api/vaults/{}/digest?destination={}", vault, destination),
            None,
        )
        .await;
        assert_eq!(digest["nonce"], 0);

        let sigs: Vec<String> = heirs
            .iter()
            .map(|k| hex_sig(sign_authorization(k, &vault, 0, &destination)))
            .collect();

        let (_, sifted) = call(
            &app.router,
            "POST",
            &format!("/api/vaults/{}/sift", vault),
            Some(json!({ "destination": destination, "signatures": [sigs[0], "0xdead", sigs[1]] })),
        )
        .await;
        assert_eq!(sifted["quorum"], true);
        assert_eq!(sifted["accepted_signatures"].as_array().unwrap().len(), 2);
        assert_eq!(sifted["rejected"][0]["index"], 1);

        let mut events = app.state.ws_broadcaster.subscribe();
        let (status, armed) = call(
            &app.router,
            "POST",
            &format!("/api/vaults/{}/arm", vault),
            Some(json!({ "caller": owner, "destination": destination, "signatures": sigs, "nonce": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(armed["nonce"], 0);
        assert!(matches!(events.try_recv(), Ok(WsEvent::VaultEvent(_))));

        let release_uri = format!("/api/vaults/{}/release", vault);
        let (status, body) = call(
            &app.router,
            "POST",
            &release_uri,
            Some(json!({ "caller": heirs[0].address(), "tokens": listed })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "LockNotElapsed");

        app.clock.advance(3600);
        let (status, record) = call(
            &app.router,
            "POST",
            &release_uri,
            Some(json!({ "caller": heirs[0].address(), "tokens": listed })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(record["base_amount"], 5000);
        assert_eq!(record["tokens"].as_array().unwrap().len(), 1);

        let manager = app.state.manager.read().await;
        assert_eq!(manager.ledger().base_balance(&destination), 5000);
        assert_eq!(manager.ledger().token_balance(&token, &destination), 2_500_000);
    }

    #[tokio::test]
    async fn test_release_moves_only_listed_tokens() {
        let app = test_app();
        let heir = KeyPair::generate();
        let destination = Address::repeat_byte(0xd0);
        let token = Address::repeat_byte(0xaa);

        let vault = {
            let mut manager = app.state.manager.write().await;
            let vault = manager
                .create_vault(
                    Address::repeat_byte(0xee),
                    vec![heir.address()],
                    1,
                    0,
                    app.clock.now(),
                )
                .unwrap()
                .address();
            manager
                .ledger_mut()
                .register_token(token, "TTK".to_string(), 6)
                .unwrap();
            manager.deposit(&vault, &Asset::Base, 100).unwrap();
            manager.deposit(&vault, &Asset::Token(token), 42).unwrap();
            let sigs = vec![sign_authorization(&heir, &vault, 0, &destination)];
            manager
                .arm(&vault, &heir.address(), &sigs, &destination, None, app.clock.now())
                .unwrap();
            vault
        };

        let release_uri = format!("/api/vaults/{}/release", vault);
        let (status, _) = call(
            &app.router,
            "POST",
            &release_uri,
            Some(json!({ "caller": heir.address() })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, record) = call(
            &app.router,
            "POST",
            &release_uri,
            Some(json!({ "caller": heir.address(), "tokens": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(record["base_amount"], 100);

        let manager = app.state.manager.read().await;
        assert_eq!(manager.ledger().token_balance(&token, &vault), 42);
        assert_eq!(manager.ledger().token_balance(&token, &destination), 0);
    }

    #[tokio::test]
    async fn test_insufficient_signatures_carries_report() {
        let app = test_app();
        let heirs: Vec<KeyPair> = (0..2).map(|_| KeyPair::generate()).collect();
        let destination = Address::repeat_byte(0xd0);

        let vault = {
            let mut manager = app.state.manager.write().await;
            manager
                .create_vault(
                    Address::repeat_byte(0xee),
                    heirs.iter().map(|k| k.address()).collect(),
                    2,
                    0,
                    app.clock.now(),
                )
                .unwrap()
                .address()
        };
        let sig = hex_sig(sign_authorization(&heirs[0], &vault, 0, &destination));

        let (status, body) = call(
            &app.router,
            "POST",
            &format!("/api/vaults/{}/arm", vault),
            Some(json!({ "caller": heirs[0].address(), "destination": destination, "signatures": [sig, sig] })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "InsufficientSignatures");
        assert_eq!(body["report"]["rejected"][0]["reason"]["reason"], "duplicate");
    }

    #[tokio::test]
    async fn test_cancel_requires_owner() {
        let app = test_app();
        let owner = Address::repeat_byte(0xee);
        let vault = {
            let mut manager = app.state.manager.write().await;
            manager
                .create_vault(owner, vec![Address::repeat_byte(1)], 1, 0, app.clock.now())
                .unwrap()
                .address()
        };
        let uri = format!("/api/vaults/{}/cancel", vault);

        let (status, _) = call(&app.router, "POST", &uri, Some(json!({ "caller": Address::repeat_byte(1) }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = call(&app.router, "POST", &uri, Some(json!({ "caller": owner }))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "NotArmed");
    }
}
