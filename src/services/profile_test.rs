use super::*;

#[test]
fn role_parsing_is_case_insensitive() {
    assert_eq!(Role::from_str(" Admin "), Some(Role::Admin));
    assert_eq!(Role::from_str("user"), Some(Role::User));
    assert_eq!(Role::from_str("owner"), None);
    assert_eq!(Role::Admin.as_str(), "admin");
}

#[test]
fn parse_role_rejects_unknown_roles() {
    let err = parse_role("superuser").unwrap_err();
    assert_eq!(err.to_string(), "role must be one of: user, admin");
}

#[test]
fn username_rules() {
    assert!(check_username("wrench_head.42").is_ok());
    assert!(check_username("ab").is_err());
    assert!(check_username("has space").is_err());
    assert!(check_username("UPPER").is_err());
    assert!(check_username(&"x".repeat(33)).is_err());
}
