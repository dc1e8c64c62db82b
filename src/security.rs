use subtle::ConstantTimeEq;

/// Verify an inbound webhook secret against the configured one.
///
/// Comparison is constant-time to prevent timing attacks; a missing header
/// never matches.
pub fn verify_webhook_secret(expected: &str, provided: Option<&str>) -> bool {
    let Some(provided) = provided else {
        return false;
    };
    if expected.len() != provided.len() {
        return false;
    }
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}
