//! Local access-token expiry check (no signature verification, no network)

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde_json::Value;

/// base64url, padding optional
const BASE64_URL_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Read the `exp` claim (seconds since epoch) from a JWT's payload
pub fn expiry_secs(token: &str) -> Option<f64> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };

    let bytes = BASE64_URL_LENIENT.decode(payload).ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;
    claims.get("exp")?.as_f64()
}

/// Whether `token` is well formed and unexpired at `now_ms` (milliseconds since epoch)
pub fn is_token_valid_at(token: &str, now_ms: i64) -> bool {
    match expiry_secs(token) {
        Some(exp) => (now_ms as f64) < exp * 1000.0,
        None => false,
    }
}

/// Whether `token` is well formed and unexpired now
pub fn is_token_valid(token: &str) -> bool {
    is_token_valid_at(token, chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
pub(crate) fn make_token(claims: &Value) -> String {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
    use serde_json::json;

    const NOW_MS: i64 = 1_700_000_000_000;

    #[test]
    fn test_valid_until_expiry() {
        let token = make_token(&json!({ "sub": "admin-1", "exp": 1_700_000_060 }));
        assert!(is_token_valid_at(&token, NOW_MS));
        assert!(is_token_valid_at(&token, 1_700_000_059_999));
        // exp*1000 == now is already expired
        assert!(!is_token_valid_at(&token, 1_700_000_060_000));
        assert!(!is_token_valid_at(&token, 1_700_000_060_001));
    }

    #[test]
    fn test_fractional_exp() {
        let token = make_token(&json!({ "exp": 1_700_000_000.5 }));
        assert!(is_token_valid_at(&token, NOW_MS + 499));
        assert!(!is_token_valid_at(&token, NOW_MS + 500));
    }

    #[test]
    fn test_padded_payload_is_accepted() {
        let header = URL_SAFE_NO_PAD.encode(b"{}");
        let payload = URL_SAFE.encode(json!({ "exp": 1_800_000_000 }).to_string());
        let token = format!("{header}.{payload}.sig");
        assert!(is_token_valid_at(&token, NOW_MS));
    }

    #[test]
    fn test_malformed_tokens_are_invalid() {
        let no_json = format!("h.{}.s", URL_SAFE_NO_PAD.encode(b"not json"));
        let no_exp = make_token(&json!({ "sub": "admin-1" }));
        let string_exp = make_token(&json!({ "exp": "tomorrow" }));
        let four_parts = format!("{}.extra", make_token(&json!({ "exp": 1_800_000_000 })));

        for token in [
            "",
            "abc",
            "a.b",
            "a.!!!.c",
            no_json.as_str(),
            no_exp.as_str(),
            string_exp.as_str(),
            four_parts.as_str(),
        ] {
            assert!(!is_token_valid_at(token, NOW_MS), "accepted {token:?}");
        }
    }

    #[test]
    fn test_against_wall_clock() {
        let future = chrono::Utc::now().timestamp() + 3600;
        let past = chrono::Utc::now().timestamp() - 3600;
        assert!(is_token_valid(&make_token(&json!({ "exp": future }))));
        assert!(!is_token_valid(&make_token(&json!({ "exp": past }))));
    }
}
