use super::*;

#[test]
fn year_range_is_inclusive() {
    assert!(year_in_range("year", Some(1885), EARLIEST_MODEL_YEAR, 2030).is_ok());
    assert!(year_in_range("year", Some(2030), EARLIEST_MODEL_YEAR, 2030).is_ok());
    assert!(year_in_range("year", None, EARLIEST_MODEL_YEAR, 2030).is_ok());

    let err = year_in_range("year", Some(1884), EARLIEST_MODEL_YEAR, 2030).unwrap_err();
    assert_eq!(err.to_string(), "year must be between 1885 and 2030");
    assert!(year_in_range("year", Some(2031), EARLIEST_MODEL_YEAR, 2030).is_err());
}

#[test]
fn latest_model_year_leads_calendar() {
    assert_eq!(latest_model_year(), current_year() + MODEL_YEAR_LEAD);
    assert!(current_year() >= 2024);
}

#[test]
fn non_negative_checks() {
    assert!(non_negative_int("msrp_usd", Some(0)).is_ok());
    assert!(non_negative_int("msrp_usd", Some(-1)).is_err());
    assert!(non_negative_float("weight_kg", Some(0.0)).is_ok());
    assert!(non_negative_float("weight_kg", Some(-0.1)).is_err());
    assert!(non_negative_float("weight_kg", Some(f64::INFINITY)).is_err());
    assert!(non_negative_float("weight_kg", None).is_ok());
}

#[test]
fn slug_rules() {
    assert!(slug("slug", "cornering-basics-2").is_ok());
    assert!(slug("slug", "").is_err());
    assert!(slug("slug", "Cornering").is_err());
    assert!(slug("slug", "-lead").is_err());
    assert!(slug("slug", "trail-").is_err());
    assert!(slug("slug", "double--hyphen").is_err());
    assert!(slug("slug", "under_score").is_err());
}

#[test]
fn slugify_collapses_punctuation() {
    assert_eq!(slugify("Braking 101: The Basics!"), "braking-101-the-basics");
    assert_eq!(slugify("  Counter-steering  "), "counter-steering");
    assert_eq!(slugify("!!!"), "");
}

#[test]
fn one_of_lists_allowed_values() {
    assert!(one_of("difficulty", "advanced", &["beginner", "advanced"]).is_ok());
    let err = one_of("difficulty", "expert", &["beginner", "advanced"]).unwrap_err();
    assert_eq!(err.to_string(), "difficulty must be one of: beginner, advanced");
}
