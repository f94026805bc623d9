//! # Claim Schemas
//!
//! A declarative table mapping each supported credential type to its ordered
//! list of required subject claims. The issuer consults the table when
//! validating an offer request and shaping `credentialSubject`; the wallet
//! consults it when rendering and validating offers.

use serde_json::{Map, Value};

use crate::error::Error;

/// Credential types supported by the exchange, with their required subject
/// claims in presentation order.
pub const CLAIM_SCHEMAS: &[(&str, &[&str])] = &[
    ("UniversityDegree", &["name", "degreeType", "university", "graduationDate"]),
    ("DriverLicense", &["name", "licenseNumber", "vehicleClass", "issueDate"]),
    ("PersonIdentification", &["givenName", "familyName", "birthDate", "nationality"]),
    ("ResidenceCertificate", &["name", "address", "municipality", "validFrom"]),
];

/// The ordered required claim keys for a credential type, or `None` if the
/// type is not supported.
#[must_use]
pub fn required_claims(credential_type: &str) -> Option<&'static [&'static str]> {
    CLAIM_SCHEMAS.iter().find(|(t, _)| *t == credential_type).map(|(_, fields)| *fields)
}

/// All supported credential type names.
#[must_use]
pub fn supported_types() -> Vec<String> {
    CLAIM_SCHEMAS.iter().map(|(t, _)| (*t).to_string()).collect()
}

/// Verify the supplied claims contain every required key for the given type.
///
/// Required-keys-present is the extent of issuer-side validation; value
/// shapes are a client concern.
///
/// # Errors
///
/// Returns `InvalidInput` if the type is unsupported or a required key is
/// missing.
pub fn verify_claims(credential_type: &str, claims: &Map<String, Value>) -> crate::Result<()> {
    let Some(required) = required_claims(credential_type) else {
        return Err(Error::InvalidInput(format!(
            "unsupported credential type: {credential_type}"
        )));
    };
    for key in required {
        if !claims.contains_key(*key) {
            return Err(Error::InvalidInput(format!("missing required claim: {key}")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn known_type_with_all_claims() {
        let claims = json!({
            "name": "A",
            "degreeType": "BSc",
            "university": "X",
            "graduationDate": "2024-01-01"
        });
        let claims = claims.as_object().unwrap();
        assert!(verify_claims("UniversityDegree", claims).is_ok());
    }

    #[test]
    fn missing_claim_is_invalid_input() {
        let claims = json!({"name": "A"});
        let claims = claims.as_object().unwrap();
        let err = verify_claims("UniversityDegree", claims).unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn unsupported_type_is_invalid_input() {
        let claims = json!({});
        let claims = claims.as_object().unwrap();
        let err = verify_claims("FishingPermit", claims).unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }
}
