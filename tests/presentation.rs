//! Presentation Flow

use chrono::{TimeDelta, Utc};
use serde_json::json;
use vc_exchange::holder::{credential as wallet, issuance, presentation};
use vc_exchange::issuer::types::CreateOfferRequest;
use vc_exchange::model::{VerifiablePresentation, VpEnvelope};
use vc_exchange::provider::StateStore;
use vc_exchange::proof;
use vc_exchange::test_utils::keystore::{self, Keyring, HOLDER_KEY_ID};
use vc_exchange::test_utils::{self, holder, issuer as test_issuer, verifier as test_verifier};
use vc_exchange::verifier::state as session;
use vc_exchange::verifier::types::{
    CreateRequestRequest, PresentationRequest, StatusRequest, StatusResponse, SubmitRequest,
};
use vc_exchange::{issuer, verifier, Kind};

// Drive a full issuance so the wallet holds a credential of the given type.
async fn issue(
    provider: &holder::Provider, issuer_provider: &test_issuer::Provider, credential_type: &str,
    fields: serde_json::Value,
) {
    let request = CreateOfferRequest {
        subject_id: "normal_user".into(),
        credential_type: credential_type.into(),
        credential_fields: fields.as_object().expect("should be an object").clone(),
    };
    let response =
        issuer::create_offer(issuer_provider.clone(), request).await.expect("should create offer");

    let flow = issuance::offer(
        provider.clone(),
        issuance::OfferRequest {
            offer: Kind::Object(response.offer),
        },
    )
    .await
    .expect("should process offer");
    let issuance_id = flow.id;

    issuance::accept(
        provider.clone(),
        issuance::AcceptRequest {
            issuance_id: issuance_id.clone(),
        },
    )
    .await
    .expect("should accept");
    issuance::token(
        provider.clone(),
        issuance::TokenRequest {
            issuance_id: issuance_id.clone(),
        },
    )
    .await
    .expect("should get token");
    issuance::credential(
        provider.clone(),
        issuance::CredentialRequest {
            issuance_id: issuance_id.clone(),
        },
    )
    .await
    .expect("should get credential");
    issuance::save(provider.clone(), issuance::SaveRequest { issuance_id })
        .await
        .expect("should save");
}

fn degree_fields() -> serde_json::Value {
    json!({
        "name": "A",
        "degreeType": "BSc",
        "university": "X",
        "graduationDate": "2024-01-01"
    })
}

// The full presentation flow: request → match → authorize → present. The
// verifier's session completes with a valid result and the shared claims.
#[tokio::test]
async fn verified_presentation() {
    test_utils::init_tracer();
    let issuer_provider = test_issuer::Provider::new();
    let verifier_provider = test_verifier::Provider::new();
    let provider = holder::Provider::new(issuer_provider.clone(), verifier_provider.clone());

    issue(&provider, &issuer_provider, "UniversityDegree", degree_fields()).await;

    // --------------------------------------------------
    // The verifier creates a presentation request
    // --------------------------------------------------
    let response = verifier::create_request(
        verifier_provider.clone(),
        CreateRequestRequest {
            requested_types: vec!["UniversityDegree".into()],
        },
    )
    .await
    .expect("should create request");
    let state = response.request.state.clone();

    // --------------------------------------------------
    // The wallet receives the request (as a JSON string), the holder
    // authorizes, and the wallet presents
    // --------------------------------------------------
    let as_string = serde_json::to_string(&response.request).expect("should serialize");
    let flow = presentation::request(
        provider.clone(),
        presentation::RequestReceived {
            request: Kind::<PresentationRequest>::String(as_string),
        },
    )
    .await
    .expect("should match a credential");
    assert!(flow.credential.type_.iter().any(|t| t == "UniversityDegree"));

    presentation::authorize(
        provider.clone(),
        presentation::AuthorizeRequest {
            presentation_id: flow.id.clone(),
        },
    )
    .await
    .expect("should authorize");

    let result = presentation::present(
        provider.clone(),
        presentation::PresentRequest {
            presentation_id: flow.id,
        },
    )
    .await
    .expect("should verify");
    assert!(result.valid);

    let shared = result.shared_claims.clone().expect("should share claims");
    let shared = serde_json::to_value(&shared).expect("should serialize");
    assert_eq!(
        shared,
        json!([{
            "id": "normal_user",
            "name": "A",
            "degreeType": "BSc",
            "university": "X",
            "graduationDate": "2024-01-01"
        }])
    );

    // the session is completed with the same result
    let status = verifier::status(verifier_provider, StatusRequest { state })
        .await
        .expect("should read status");
    assert_eq!(status, StatusResponse::Completed { result });
}

// Changing one bit of the nonce flips the result from valid to
// `nonce_mismatch`, and the session records a completed, invalid result.
#[tokio::test]
async fn nonce_mismatch_invalidates_presentation() {
    test_utils::init_tracer();
    let issuer_provider = test_issuer::Provider::new();
    let verifier_provider = test_verifier::Provider::new();
    let provider = holder::Provider::new(issuer_provider.clone(), verifier_provider.clone());

    issue(&provider, &issuer_provider, "UniversityDegree", degree_fields()).await;

    let response = verifier::create_request(
        verifier_provider.clone(),
        CreateRequestRequest {
            requested_types: vec!["UniversityDegree".into()],
        },
    )
    .await
    .expect("should create request");
    let state = response.request.state.clone();

    // tamper with the nonce before the wallet sees the request
    let mut tampered = response.request;
    tampered.nonce.push('x');

    let flow = presentation::request(
        provider.clone(),
        presentation::RequestReceived {
            request: Kind::Object(tampered),
        },
    )
    .await
    .expect("should match a credential");
    presentation::authorize(
        provider.clone(),
        presentation::AuthorizeRequest {
            presentation_id: flow.id.clone(),
        },
    )
    .await
    .expect("should authorize");

    let err = presentation::present(
        provider.clone(),
        presentation::PresentRequest {
            presentation_id: flow.id,
        },
    )
    .await
    .expect_err("should reject presentation");
    assert_eq!(err.code(), "nonce_mismatch");

    // the failure is recorded: completed and invalid
    let status = verifier::status(verifier_provider, StatusRequest { state })
        .await
        .expect("should read status");
    let StatusResponse::Completed { result } = status else {
        panic!("session should be completed");
    };
    assert!(!result.valid);
    assert_eq!(result.error.as_deref(), Some("nonce_mismatch"));
}

// A wallet holding only a `DriverLicense` cannot satisfy a
// `UniversityDegree` request; nothing is submitted and the verifier session
// stays pending.
#[tokio::test]
async fn no_matching_credential() {
    test_utils::init_tracer();
    let issuer_provider = test_issuer::Provider::new();
    let verifier_provider = test_verifier::Provider::new();
    let provider = holder::Provider::new(issuer_provider.clone(), verifier_provider.clone());

    issue(
        &provider,
        &issuer_provider,
        "DriverLicense",
        json!({
            "name": "A",
            "licenseNumber": "L-123",
            "vehicleClass": "B",
            "issueDate": "2023-06-01"
        }),
    )
    .await;

    let response = verifier::create_request(
        verifier_provider.clone(),
        CreateRequestRequest {
            requested_types: vec!["UniversityDegree".into()],
        },
    )
    .await
    .expect("should create request");
    let state = response.request.state.clone();

    let err = presentation::request(
        provider,
        presentation::RequestReceived {
            request: Kind::Object(response.request),
        },
    )
    .await
    .expect_err("should find no credential");
    assert_eq!(err.code(), "no_matching_credential");

    let status = verifier::status(verifier_provider, StatusRequest { state })
        .await
        .expect("should read status");
    assert_eq!(status, StatusResponse::Pending);
}

// A second submission against a completed session fails with
// `session_already_completed` and the stored result is unchanged.
#[tokio::test]
async fn completed_session_is_frozen() {
    test_utils::init_tracer();
    let issuer_provider = test_issuer::Provider::new();
    let verifier_provider = test_verifier::Provider::new();
    let provider = holder::Provider::new(issuer_provider.clone(), verifier_provider.clone());

    issue(&provider, &issuer_provider, "UniversityDegree", degree_fields()).await;

    let response = verifier::create_request(
        verifier_provider.clone(),
        CreateRequestRequest {
            requested_types: vec!["UniversityDegree".into()],
        },
    )
    .await
    .expect("should create request");
    let state = response.request.state.clone();

    let flow = presentation::request(
        provider.clone(),
        presentation::RequestReceived {
            request: Kind::Object(response.request),
        },
    )
    .await
    .expect("should match a credential");
    presentation::authorize(
        provider.clone(),
        presentation::AuthorizeRequest {
            presentation_id: flow.id.clone(),
        },
    )
    .await
    .expect("should authorize");
    let result = presentation::present(
        provider,
        presentation::PresentRequest {
            presentation_id: flow.id,
        },
    )
    .await
    .expect("should verify");
    assert!(result.valid);

    // a second submission is rejected without touching the result
    let err = verifier::submit(
        verifier_provider.clone(),
        SubmitRequest {
            vp_token: VpEnvelope::default(),
            state: state.clone(),
        },
    )
    .await
    .expect_err("should reject resubmission");
    assert_eq!(err.code(), "session_already_completed");

    let status = verifier::status(verifier_provider, StatusRequest { state })
        .await
        .expect("should read status");
    assert_eq!(status, StatusResponse::Completed { result });
}

// A request for two credential types satisfied by only one presented
// credential fails coverage with `missing_credential_type`, and the session
// records the failure.
#[tokio::test]
async fn uncovered_requested_type_fails() {
    test_utils::init_tracer();
    let issuer_provider = test_issuer::Provider::new();
    let verifier_provider = test_verifier::Provider::new();
    let provider = holder::Provider::new(issuer_provider.clone(), verifier_provider.clone());

    issue(&provider, &issuer_provider, "UniversityDegree", degree_fields()).await;

    let response = verifier::create_request(
        verifier_provider.clone(),
        CreateRequestRequest {
            requested_types: vec!["UniversityDegree".into(), "DriverLicense".into()],
        },
    )
    .await
    .expect("should create request");
    let state = response.request.state.clone();

    // the degree credential intersects the requested types, so the wallet
    // proceeds — coverage is the verifier's check
    let flow = presentation::request(
        provider.clone(),
        presentation::RequestReceived {
            request: Kind::Object(response.request),
        },
    )
    .await
    .expect("should match a credential");
    presentation::authorize(
        provider.clone(),
        presentation::AuthorizeRequest {
            presentation_id: flow.id.clone(),
        },
    )
    .await
    .expect("should authorize");

    let err = presentation::present(
        provider,
        presentation::PresentRequest {
            presentation_id: flow.id,
        },
    )
    .await
    .expect_err("should reject presentation");
    assert_eq!(err.code(), "missing_credential_type");

    let status = verifier::status(verifier_provider, StatusRequest { state })
        .await
        .expect("should read status");
    let StatusResponse::Completed { result } = status else {
        panic!("session should be completed");
    };
    assert!(!result.valid);
    assert_eq!(result.error.as_deref(), Some("missing_credential_type"));
}

// Mutating the presentation after the holder signed it invalidates the
// envelope proof.
#[tokio::test]
async fn tampered_envelope_fails_proof_check() {
    test_utils::init_tracer();
    let issuer_provider = test_issuer::Provider::new();
    let verifier_provider = test_verifier::Provider::new();
    let provider = holder::Provider::new(issuer_provider.clone(), verifier_provider.clone());

    issue(&provider, &issuer_provider, "UniversityDegree", degree_fields()).await;
    let stored = wallet::list(provider.clone()).await.expect("should list");

    let response = verifier::create_request(
        verifier_provider.clone(),
        CreateRequestRequest {
            requested_types: vec!["UniversityDegree".into()],
        },
    )
    .await
    .expect("should create request");

    let vp = VerifiablePresentation::builder()
        .holder(keystore::verification_method(HOLDER_KEY_ID))
        .add_credential(stored[0].vc.clone())
        .build()
        .expect("should build vp");
    let mut envelope = VpEnvelope {
        vp,
        aud: test_verifier::CLIENT_ID.into(),
        nonce: response.request.nonce.clone(),
        proof: None,
    };
    let signer = Keyring::new().signer(HOLDER_KEY_ID);
    envelope.proof = Some(proof::create(&envelope.unsigned(), &signer).await.expect("should sign"));

    // mutate a subject claim after signing
    envelope.vp.verifiable_credential[0]
        .credential_subject
        .claims
        .insert("degreeType".into(), json!("PhD"));

    let err = verifier::submit(
        verifier_provider,
        SubmitRequest {
            vp_token: envelope,
            state: response.request.state,
        },
    )
    .await
    .expect_err("should reject presentation");
    assert_eq!(err.code(), "invalid_proof");
}

// A credential whose claims were altered after issuance fails its embedded
// proof check even when the envelope itself is correctly signed.
#[tokio::test]
async fn tampered_credential_fails_proof_check() {
    test_utils::init_tracer();
    let issuer_provider = test_issuer::Provider::new();
    let verifier_provider = test_verifier::Provider::new();
    let provider = holder::Provider::new(issuer_provider.clone(), verifier_provider.clone());

    issue(&provider, &issuer_provider, "UniversityDegree", degree_fields()).await;
    let stored = wallet::list(provider.clone()).await.expect("should list");

    let response = verifier::create_request(
        verifier_provider.clone(),
        CreateRequestRequest {
            requested_types: vec!["UniversityDegree".into()],
        },
    )
    .await
    .expect("should create request");
    let state = response.request.state.clone();

    // alter a claim, then sign the envelope over the altered credential
    let mut vc = stored[0].vc.clone();
    vc.credential_subject.claims.insert("degreeType".into(), json!("PhD"));

    let vp = VerifiablePresentation::builder()
        .holder(keystore::verification_method(HOLDER_KEY_ID))
        .add_credential(vc)
        .build()
        .expect("should build vp");
    let mut envelope = VpEnvelope {
        vp,
        aud: test_verifier::CLIENT_ID.into(),
        nonce: response.request.nonce.clone(),
        proof: None,
    };
    let signer = Keyring::new().signer(HOLDER_KEY_ID);
    envelope.proof = Some(proof::create(&envelope.unsigned(), &signer).await.expect("should sign"));

    let err = verifier::submit(
        verifier_provider.clone(),
        SubmitRequest {
            vp_token: envelope,
            state: state.clone(),
        },
    )
    .await
    .expect_err("should reject presentation");
    assert_eq!(err.code(), "invalid_proof");

    let status = verifier::status(verifier_provider, StatusRequest { state })
        .await
        .expect("should read status");
    let StatusResponse::Completed { result } = status else {
        panic!("session should be completed");
    };
    assert_eq!(result.error.as_deref(), Some("invalid_proof"));
}

// An expired verification session behaves as absent for both submission and
// status reads.
#[tokio::test]
async fn expired_session_is_unknown() {
    test_utils::init_tracer();
    let verifier_provider = test_verifier::Provider::new();

    let expired = session::State {
        request: PresentationRequest::default(),
        status: session::Status::Pending,
        expires_at: Utc::now() - TimeDelta::seconds(1),
    };
    StateStore::put(&verifier_provider, "expired-state", &expired, expired.expires_at)
        .await
        .expect("should put");

    let err = verifier::submit(
        verifier_provider.clone(),
        SubmitRequest {
            vp_token: VpEnvelope::default(),
            state: "expired-state".into(),
        },
    )
    .await
    .expect_err("should fail");
    assert_eq!(err.code(), "unknown_state");

    let err = verifier::status(
        verifier_provider,
        StatusRequest {
            state: "expired-state".into(),
        },
    )
    .await
    .expect_err("should fail");
    assert_eq!(err.code(), "unknown_state");
}

// Malformed request strings from the side channel are input errors, never
// panics.
#[tokio::test]
async fn malformed_request_string_is_invalid_input() {
    test_utils::init_tracer();
    let issuer_provider = test_issuer::Provider::new();
    let provider = holder::Provider::new(issuer_provider, test_verifier::Provider::new());

    for bad in ["", "не запрос", "%%%not-base64%%%"] {
        let err = presentation::request(
            provider.clone(),
            presentation::RequestReceived {
                request: Kind::<PresentationRequest>::String(bad.into()),
            },
        )
        .await
        .expect_err("should reject request");
        assert_eq!(err.code(), "invalid_input");
    }
}

// Tampering with the audience before the wallet sees the request flips the
// result to `audience_mismatch`.
#[tokio::test]
async fn audience_mismatch_invalidates_presentation() {
    test_utils::init_tracer();
    let issuer_provider = test_issuer::Provider::new();
    let verifier_provider = test_verifier::Provider::new();
    let provider = holder::Provider::new(issuer_provider.clone(), verifier_provider.clone());

    issue(&provider, &issuer_provider, "UniversityDegree", degree_fields()).await;

    let response = verifier::create_request(
        verifier_provider.clone(),
        CreateRequestRequest {
            requested_types: vec!["UniversityDegree".into()],
        },
    )
    .await
    .expect("should create request");

    let mut tampered = response.request;
    tampered.client_id = "http://phisher.example.com".into();

    let flow = presentation::request(
        provider.clone(),
        presentation::RequestReceived {
            request: Kind::Object(tampered),
        },
    )
    .await
    .expect("should match a credential");
    presentation::authorize(
        provider.clone(),
        presentation::AuthorizeRequest {
            presentation_id: flow.id.clone(),
        },
    )
    .await
    .expect("should authorize");

    let err = presentation::present(
        provider,
        presentation::PresentRequest {
            presentation_id: flow.id,
        },
    )
    .await
    .expect_err("should reject presentation");
    assert_eq!(err.code(), "audience_mismatch");
}
