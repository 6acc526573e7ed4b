mod common;

use std::sync::Arc;

use common::{issuer_signer, issuer_verifier, other_verifier, sample_license};
use licensify::{Signature, Signer, Verifier, keys};
use licensify_cli::{
    API_KEY_HEADER, AppState, ErrorResponse, PublicKeyResponse, SignRequest, build_router,
};

const TEST_API_KEY: &str = "test-api-key";

/// Spin up the HTTP server on an OS-assigned port, returning the base URL.
async fn spawn_test_server(signer: Signer, verifier: Verifier) -> String {
    let state = Arc::new(AppState::new(signer, verifier, TEST_API_KEY).unwrap());
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

async fn spawn_issuer_server() -> String {
    spawn_test_server(issuer_signer(), issuer_verifier()).await
}

#[tokio::test]
async fn sign_endpoint_returns_verifiable_signature() {
    let base = spawn_issuer_server().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/api/v1/sign", base))
        .header(API_KEY_HEADER, TEST_API_KEY)
        .json(&SignRequest {
            license: sample_license(),
        })
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let signature: Signature = resp.json().await.unwrap();
    assert_eq!(signature.license(), &sample_license());
    issuer_verifier().verify(&signature).unwrap();
}

#[tokio::test]
async fn sign_endpoint_requires_api_key() {
    let base = spawn_issuer_server().await;
    let client = reqwest::Client::new();
    let request = SignRequest {
        license: sample_license(),
    };

    let missing = client
        .post(format!("{}/api/v1/sign", base))
        .json(&request)
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 401);
    let body: ErrorResponse = missing.json().await.unwrap();
    assert_eq!(body.error, "invalid api key");

    for wrong in ["", "test-api-ke", "TEST-API-KEY"] {
        let resp = client
            .post(format!("{}/api/v1/sign", base))
            .header(API_KEY_HEADER, wrong)
            .json(&request)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 401, "key {wrong:?} accepted");
    }
}

#[tokio::test]
async fn api_key_not_needed_for_verify_or_public_key() {
    let base = spawn_issuer_server().await;
    let signature = issuer_signer().sign(&sample_license()).unwrap();

    let verify = reqwest::Client::new()
        .post(format!("{}/api/v1/verify", base))
        .json(&signature)
        .send()
        .await
        .unwrap();
    assert_eq!(verify.status(), 200);

    let public_key = reqwest::get(format!("{}/api/v1/public-key", base))
        .await
        .unwrap();
    assert_eq!(public_key.status(), 200);
}

#[test]
fn empty_api_key_refused() {
    assert!(AppState::new(issuer_signer(), issuer_verifier(), "").is_err());
}

#[tokio::test]
async fn verify_endpoint_accepts_valid_signature() {
    let base = spawn_issuer_server().await;
    let signature = issuer_signer().sign(&sample_license()).unwrap();

    let resp = reqwest::Client::new()
        .post(format!("{}/api/v1/verify", base))
        .json(&signature)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let echoed: Signature = resp.json().await.unwrap();
    assert_eq!(echoed, signature);
}

#[tokio::test]
async fn verify_endpoint_rejects_tampered_license() {
    let base = spawn_issuer_server().await;
    let (mut license, sig) = issuer_signer().sign(&sample_license()).unwrap().into_parts();
    license.set("product", "Enterprise");

    let resp = reqwest::Client::new()
        .post(format!("{}/api/v1/verify", base))
        .json(&Signature::from_parts(license, sig))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: ErrorResponse = resp.json().await.unwrap();
    assert!(!body.valid);
    assert_eq!(body.error, "invalid signature");
}

#[tokio::test]
async fn verify_failures_are_indistinguishable() {
    let base = spawn_test_server(issuer_signer(), other_verifier()).await;
    let client = reqwest::Client::new();

    let wrong_key = issuer_signer().sign(&sample_license()).unwrap();
    let bad_base64 = Signature::from_parts(sample_license(), "***");

    let mut bodies = Vec::new();
    for signature in [wrong_key, bad_base64] {
        let resp = client
            .post(format!("{}/api/v1/verify", base))
            .json(&signature)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 401);
        bodies.push(resp.text().await.unwrap());
    }
    assert_eq!(bodies[0], bodies[1]);
}

#[tokio::test]
async fn verify_endpoint_rejects_malformed_body() {
    let base = spawn_issuer_server().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/api/v1/verify", base))
        .header("content-type", "application/json")
        .body(r#"{"license":{"id":"abc-123"}}"#)
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_client_error());
    assert_ne!(resp.status(), 401);
}

#[tokio::test]
async fn public_key_endpoint_returns_pem() {
    let base = spawn_issuer_server().await;
    let resp = reqwest::get(format!("{}/api/v1/public-key", base))
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: PublicKeyResponse = resp.json().await.unwrap();
    let key = keys::public_key_from_pem(&body.public_key).unwrap();
    assert_eq!(Verifier::new(key), issuer_verifier());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let base = spawn_issuer_server().await;
    let resp = reqwest::get(format!("{}/api/v1/licenses", base))
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
}
