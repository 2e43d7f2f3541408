//! REST API module
//!
//! Provides HTTP access to the vault manager.
//!
//! # Endpoints
//!
//! ## Vaults
//! - `GET /api/vaults` - List vaults
//! - `POST /api/vaults` - Create a vault
//! - `GET /api/vaults/:address` - Vault state
//! - `GET /api/vaults/:address/events` - Recent events
//! - `GET /api/vaults/:address/digest?destination=` - Authorization hash for the current nonce
//! - `POST /api/vaults/:address/sift` - Sift signatures without arming
//! - `POST /api/vaults/:address/arm` - Arm a release
//! - `POST /api/vaults/:address/cancel` - Cancel a pending release (owner)
//! - `POST /api/vaults/:address/release` - Release after the delay
//! - `POST /api/vaults/:address/config` - Replace heirs, threshold and delay (owner)
//! - `POST /api/vaults/:address/emergency` - Emergency transfer (owner)
//! - `POST /api/vaults/:address/deposit` - Fund a vault
//! - `GET /api/vaults/:address/tokens` - Non-zero token balances
//!
//! ## Tokens
//! - `GET /api/tokens` - Registered tokens
//! - `POST /api/tokens` - Register a token
//!
//! ## WebSocket
//! - `GET /ws` - Vault events as they happen

pub mod handlers;
pub mod routes;
pub mod websocket;

pub use handlers::ApiState;
pub use routes::{create_router, describe_routes};
pub use websocket::{WsBroadcaster, WsEvent};
