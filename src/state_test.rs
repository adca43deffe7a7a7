use super::*;

#[test]
fn token_digest_is_stable_sha256() {
    let digest = token_digest("abc");
    assert_eq!(digest[..4], [0xba, 0x78, 0x16, 0xbf]);
    assert_eq!(digest, token_digest("abc"));
    assert_ne!(digest, token_digest("abd"));
}

#[tokio::test]
async fn admin_token_matches_only_the_configured_token() {
    let state = test_helpers::test_app_state();
    assert!(state.admin_token_matches(test_helpers::TEST_ADMIN_TOKEN));
    assert!(!state.admin_token_matches("wrong"));
    assert!(!state.admin_token_matches(""));
}

#[tokio::test]
async fn admin_token_never_matches_when_unset() {
    let state = test_helpers::test_app_state_without_admin();
    assert!(state.admin_token.is_none());
    assert!(!state.admin_token_matches(""));
    assert!(!state.admin_token_matches(test_helpers::TEST_ADMIN_TOKEN));
}
