//! HTTP API for issuing and checking licenses.
//!
//! The signer and verifier are built once at startup and shared through
//! [`AppState`]; handlers hold no other state.
//!
//! Issuing requires the shared API key in the `API-KEY` header. Verification
//! and the public key are open.

use std::sync::Arc;

use anyhow::{Result, ensure};
use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use licensify::{License, Signature, Signer, Verifier, keys};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

/// Header carrying the API key on issuing requests.
pub const API_KEY_HEADER: &str = "API-KEY";

/// Services injected into the router.
#[derive(Debug)]
pub struct AppState {
    signer: Signer,
    verifier: Verifier,
    public_key_pem: String,
    api_key_hash: [u8; 32],
}

impl AppState {
    /// Builds the shared state, caching the PEM form of the public key.
    ///
    /// Only a SHA-256 hash of `api_key` is kept. An empty key is refused.
    pub fn new(signer: Signer, verifier: Verifier, api_key: &str) -> Result<Self> {
        ensure!(!api_key.is_empty(), "API key must not be empty");
        let public_key_pem = keys::public_key_to_pem(verifier.public_key())?;
        Ok(Self {
            signer,
            verifier,
            public_key_pem,
            api_key_hash: hash_api_key(api_key),
        })
    }

    #[must_use]
    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    #[must_use]
    pub fn verifier(&self) -> &Verifier {
        &self.verifier
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SignRequest {
    pub license: License,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PublicKeyResponse {
    pub public_key: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorResponse {
    pub valid: bool,
    pub error: String,
}

impl ErrorResponse {
    fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

fn hash_api_key(api_key: &str) -> [u8; 32] {
    Sha256::digest(api_key.as_bytes()).into()
}

fn extract_api_key(headers: &HeaderMap) -> Option<&str> {
    headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok())
}

/// Rejects requests whose `API-KEY` header is missing or wrong.
async fn require_api_key(
    State(state): State<Arc<AppState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let authorized = extract_api_key(req.headers())
        .is_some_and(|key| hash_api_key(key) == state.api_key_hash);
    if !authorized {
        warn!("Rejected issuing request without a valid API key");
        return ErrorResponse {
            valid: false,
            error: "invalid api key".to_string(),
        }
        .into_response_with(StatusCode::UNAUTHORIZED);
    }

    next.run(req).await
}

async fn sign_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignRequest>,
) -> Response {
    match state.signer.sign(&request.license) {
        Ok(signature) => {
            info!("Issued license with {} attributes", request.license.len());
            Json(signature).into_response()
        }
        Err(e) => {
            warn!("Signing failed: {}", e);
            ErrorResponse {
                valid: false,
                error: "signing failed".to_string(),
            }
            .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn verify_handler(
    State(state): State<Arc<AppState>>,
    Json(signature): Json<Signature>,
) -> Response {
    match state.verifier.verify(&signature) {
        Ok(()) => {
            if let Some(id) = signature.license().get("id") {
                info!("Received valid license {}", id);
            }
            Json(signature).into_response()
        }
        Err(e) => {
            // The reason stays in the log; clients only learn "invalid".
            debug!("Rejected license: {}", e);
            ErrorResponse {
                valid: false,
                error: "invalid signature".to_string(),
            }
            .into_response_with(StatusCode::UNAUTHORIZED)
        }
    }
}

async fn public_key_handler(State(state): State<Arc<AppState>>) -> Json<PublicKeyResponse> {
    Json(PublicKeyResponse {
        public_key: state.public_key_pem.clone(),
    })
}

/// Build the HTTP API router around the given services.
pub fn build_router(state: Arc<AppState>) -> Router {
    let issuing = Router::new()
        .route("/api/v1/sign", post(sign_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .merge(issuing)
        .route("/api/v1/verify", post(verify_handler))
        .route("/api/v1/public-key", get(public_key_handler))
        .with_state(state)
}
