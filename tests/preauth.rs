//! Pre-Authorized Code Flow

use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::{TimeDelta, Utc};
use insta::assert_snapshot;
use serde_json::json;
use vc_exchange::holder::{credential as wallet, issuance};
use vc_exchange::issuer::state::{Offer, Stage, State, Token};
use vc_exchange::issuer::types::{
    CreateOfferRequest, CredentialRequest, MetadataRequest, PopClaims, ProofOfPossession,
    TokenRequest, FORMAT_VC_JSON, GRANT_TYPE_PRE_AUTHORIZED,
};
use vc_exchange::provider::StateStore;
use vc_exchange::proof;
use vc_exchange::test_utils::keystore::{Keyring, HOLDER_KEY_ID};
use vc_exchange::test_utils::{self, holder, issuer as test_issuer, verifier as test_verifier};
use vc_exchange::{issuer, Kind};

fn degree_fields() -> serde_json::Map<String, serde_json::Value> {
    let fields = json!({
        "name": "A",
        "degreeType": "BSc",
        "university": "X",
        "graduationDate": "2024-01-01"
    });
    fields.as_object().expect("should be an object").clone()
}

// The full issuer-initiated flow: offer → accept → token → credential →
// save. The wallet's stored list grows by one with matching subject claims.
#[tokio::test]
async fn issuer_initiated_flow() {
    test_utils::init_tracer();
    let issuer_provider = test_issuer::Provider::new();
    let provider = holder::Provider::new(issuer_provider.clone(), test_verifier::Provider::new());

    // --------------------------------------------------
    // The issuer creates an offer for a previously authenticated subject
    // --------------------------------------------------
    let request = CreateOfferRequest {
        subject_id: "normal_user".into(),
        credential_type: "UniversityDegree".into(),
        credential_fields: degree_fields(),
    };
    let response =
        issuer::create_offer(issuer_provider.clone(), request).await.expect("should create offer");

    // --------------------------------------------------
    // The wallet receives the offer (encoded, as from a QR code) and the
    // holder accepts
    // --------------------------------------------------
    let encoded = Base64UrlUnpadded::encode_string(
        serde_json::to_string(&response.offer).expect("should serialize").as_bytes(),
    );
    let flow = issuance::offer(
        provider.clone(),
        issuance::OfferRequest {
            offer: Kind::String(encoded),
        },
    )
    .await
    .expect("should process offer");

    issuance::accept(
        provider.clone(),
        issuance::AcceptRequest {
            issuance_id: flow.id.clone(),
        },
    )
    .await
    .expect("should accept");

    // --------------------------------------------------
    // The wallet exchanges the code, requests the credential, and saves it
    // --------------------------------------------------
    issuance::token(
        provider.clone(),
        issuance::TokenRequest {
            issuance_id: flow.id.clone(),
        },
    )
    .await
    .expect("should get token");

    issuance::credential(
        provider.clone(),
        issuance::CredentialRequest {
            issuance_id: flow.id.clone(),
        },
    )
    .await
    .expect("should get credential");

    let credential = issuance::save(
        provider.clone(),
        issuance::SaveRequest {
            issuance_id: flow.id.clone(),
        },
    )
    .await
    .expect("should save");

    let stored = wallet::list(provider.clone()).await.expect("should list");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, credential.id);
    assert_eq!(credential.issuer, test_issuer::CREDENTIAL_ISSUER);

    let claims = serde_json::to_value(&credential.subject_claims).expect("should serialize");
    assert_eq!(
        claims,
        json!({
            "id": "normal_user",
            "name": "A",
            "degreeType": "BSc",
            "university": "X",
            "graduationDate": "2024-01-01"
        })
    );
}

// Redeeming the same pre-authorized code twice: the first succeeds, the
// second fails with `unknown_code`.
#[tokio::test]
async fn code_redemption_is_single_use() {
    test_utils::init_tracer();
    let provider = test_issuer::Provider::new();

    let request = CreateOfferRequest {
        subject_id: "normal_user".into(),
        credential_type: "UniversityDegree".into(),
        credential_fields: degree_fields(),
    };
    let response =
        issuer::create_offer(provider.clone(), request).await.expect("should create offer");
    let grant =
        response.offer.grants.pre_authorized_code.expect("should have pre-authorized code grant");

    let token_request = TokenRequest {
        grant_type: GRANT_TYPE_PRE_AUTHORIZED.into(),
        pre_authorized_code: grant.pre_authorized_code,
    };
    issuer::token(provider.clone(), token_request.clone()).await.expect("first should succeed");

    let err = issuer::token(provider, token_request).await.expect_err("second should fail");
    assert_eq!(err.code(), "unknown_code");
    assert_snapshot!(
        err.to_string(),
        @r#"{"error": "unknown_code", "error_description": "pre-authorized code is invalid"}"#
    );
}

// Issuing a credential twice with the same access token: the first
// succeeds, the second fails with `unknown_token`.
#[tokio::test]
async fn token_is_single_use() {
    test_utils::init_tracer();
    let provider = test_issuer::Provider::new();

    let request = CreateOfferRequest {
        subject_id: "normal_user".into(),
        credential_type: "UniversityDegree".into(),
        credential_fields: degree_fields(),
    };
    let response =
        issuer::create_offer(provider.clone(), request).await.expect("should create offer");
    let grant =
        response.offer.grants.pre_authorized_code.expect("should have pre-authorized code grant");

    let token = issuer::token(
        provider.clone(),
        TokenRequest {
            grant_type: GRANT_TYPE_PRE_AUTHORIZED.into(),
            pre_authorized_code: grant.pre_authorized_code,
        },
    )
    .await
    .expect("should return token");

    // proof of possession of the holder's key material
    let claims = PopClaims {
        aud: test_issuer::CREDENTIAL_ISSUER.into(),
        nonce: token.c_nonce.clone(),
    };
    let signer = Keyring::new().signer(HOLDER_KEY_ID);
    let pop_proof = proof::create(&claims, &signer).await.expect("should sign");

    let credential_request = CredentialRequest {
        access_token: token.access_token,
        format: FORMAT_VC_JSON.into(),
        proof: ProofOfPossession {
            claims,
            proof: pop_proof,
        },
    };
    issuer::credential(provider.clone(), credential_request.clone())
        .await
        .expect("first should succeed");

    let err =
        issuer::credential(provider, credential_request).await.expect_err("second should fail");
    assert_eq!(err.code(), "unknown_token");
}

// An invalid proof of possession leaves the token intact: a retry with a
// fresh, valid proof still succeeds.
#[tokio::test]
async fn invalid_pop_leaves_token_intact() {
    test_utils::init_tracer();
    let provider = test_issuer::Provider::new();

    let request = CreateOfferRequest {
        subject_id: "normal_user".into(),
        credential_type: "DriverLicense".into(),
        credential_fields: {
            let fields = json!({
                "name": "A",
                "licenseNumber": "L-123",
                "vehicleClass": "B",
                "issueDate": "2023-06-01"
            });
            fields.as_object().expect("should be an object").clone()
        },
    };
    let response =
        issuer::create_offer(provider.clone(), request).await.expect("should create offer");
    let grant =
        response.offer.grants.pre_authorized_code.expect("should have pre-authorized code grant");

    let token = issuer::token(
        provider.clone(),
        TokenRequest {
            grant_type: GRANT_TYPE_PRE_AUTHORIZED.into(),
            pre_authorized_code: grant.pre_authorized_code,
        },
    )
    .await
    .expect("should return token");

    let signer = Keyring::new().signer(HOLDER_KEY_ID);

    // proof signed over the wrong nonce
    let bad_claims = PopClaims {
        aud: test_issuer::CREDENTIAL_ISSUER.into(),
        nonce: "not-the-c-nonce".into(),
    };
    let bad_proof = proof::create(&bad_claims, &signer).await.expect("should sign");
    let err = issuer::credential(
        provider.clone(),
        CredentialRequest {
            access_token: token.access_token.clone(),
            format: FORMAT_VC_JSON.into(),
            proof: ProofOfPossession {
                claims: bad_claims,
                proof: bad_proof,
            },
        },
    )
    .await
    .expect_err("should reject proof");
    assert_eq!(err.code(), "invalid_proof");

    // retry with a valid proof
    let claims = PopClaims {
        aud: test_issuer::CREDENTIAL_ISSUER.into(),
        nonce: token.c_nonce.clone(),
    };
    let pop_proof = proof::create(&claims, &signer).await.expect("should sign");
    issuer::credential(
        provider,
        CredentialRequest {
            access_token: token.access_token,
            format: FORMAT_VC_JSON.into(),
            proof: ProofOfPossession {
                claims,
                proof: pop_proof,
            },
        },
    )
    .await
    .expect("retry should succeed");
}

// An expired offer behaves as absent.
#[tokio::test]
async fn expired_code_is_unknown() {
    test_utils::init_tracer();
    let provider = test_issuer::Provider::new();

    let state = State {
        subject_id: "normal_user".into(),
        stage: Stage::Offered(Offer {
            credential_type: "UniversityDegree".into(),
            claims: degree_fields(),
        }),
        expires_at: Utc::now() - TimeDelta::seconds(1),
    };
    StateStore::put(&provider, "expired-code", &state, state.expires_at)
        .await
        .expect("should put");

    let err = issuer::token(
        provider,
        TokenRequest {
            grant_type: GRANT_TYPE_PRE_AUTHORIZED.into(),
            pre_authorized_code: "expired-code".into(),
        },
    )
    .await
    .expect_err("should fail");
    assert_eq!(err.code(), "unknown_code");
}

// An expired access token behaves as absent.
#[tokio::test]
async fn expired_token_is_unknown() {
    test_utils::init_tracer();
    let provider = test_issuer::Provider::new();

    let state = State {
        subject_id: "normal_user".into(),
        stage: Stage::Validated(Token {
            access_token: "expired-token".into(),
            c_nonce: "nonce".into(),
            offer: Offer {
                credential_type: "UniversityDegree".into(),
                claims: degree_fields(),
            },
        }),
        expires_at: Utc::now() - TimeDelta::seconds(1),
    };
    StateStore::put(&provider, "expired-token", &state, state.expires_at)
        .await
        .expect("should put");

    let err = issuer::credential(
        provider,
        CredentialRequest {
            access_token: "expired-token".into(),
            format: FORMAT_VC_JSON.into(),
            proof: ProofOfPossession::default(),
        },
    )
    .await
    .expect_err("should fail");
    assert_eq!(err.code(), "unknown_token");
}

// Malformed offer strings from the side channel are input errors, never
// panics: empty, non-ASCII, and non-base64 payloads all surface as
// `invalid_input`.
#[tokio::test]
async fn malformed_offer_string_is_invalid_input() {
    test_utils::init_tracer();
    let issuer_provider = test_issuer::Provider::new();
    let provider = holder::Provider::new(issuer_provider, test_verifier::Provider::new());

    for bad in ["", "不是JSON", "%%%not-base64%%%"] {
        let err = issuance::offer(
            provider.clone(),
            issuance::OfferRequest {
                offer: Kind::String(bad.into()),
            },
        )
        .await
        .expect_err("should reject offer");
        assert_eq!(err.code(), "invalid_input");
    }
}

// Endpoint discovery reflects the claim schema table.
#[tokio::test]
async fn metadata_lists_supported_types() {
    test_utils::init_tracer();
    let provider = test_issuer::Provider::new();

    let response =
        issuer::metadata(provider, MetadataRequest {}).await.expect("should return metadata");
    assert_eq!(response.issuer.credential_issuer, test_issuer::CREDENTIAL_ISSUER);
    assert!(
        response.issuer.credential_types_supported.iter().any(|t| t == "UniversityDegree")
    );
}
