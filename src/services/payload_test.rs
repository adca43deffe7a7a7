use super::*;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Form {
    #[serde(default, deserialize_with = "lenient_i32")]
    year: Option<i32>,
    #[serde(default, deserialize_with = "lenient_f64")]
    weight: Option<f64>,
    #[serde(default, deserialize_with = "lenient_uuid")]
    engine_id: Option<uuid::Uuid>,
}

fn parse(json: &str) -> Result<Form, serde_json::Error> {
    serde_json::from_str(json)
}

#[test]
fn clean_text_trims_and_drops_blanks() {
    assert_eq!(clean_text(Some("  Ducati ".into())).as_deref(), Some("Ducati"));
    assert_eq!(clean_text(Some("   ".into())), None);
    assert_eq!(clean_text(None), None);
}

#[test]
fn require_text_names_the_field() {
    let err = require_text("name", Some(" ".into())).unwrap_err();
    assert_eq!(err.to_string(), "name is required");
    assert_eq!(require_text("name", Some(" Monster ".into())).unwrap(), "Monster");
}

#[test]
fn clean_list_drops_blank_entries() {
    let cleaned = clean_list(Some(vec![" Red ".into(), String::new(), "Black".into()]));
    assert_eq!(cleaned, Some(vec!["Red".to_owned(), "Black".to_owned()]));
    assert_eq!(clean_list(None), None);
}

#[test]
fn empty_string_numbers_become_null() {
    let form = parse(r#"{"year":"","weight":"  ","engine_id":""}"#).unwrap();
    assert_eq!(form.year, None);
    assert_eq!(form.weight, None);
    assert_eq!(form.engine_id, None);
}

#[test]
fn missing_fields_default_to_null() {
    let form = parse("{}").unwrap();
    assert!(form.year.is_none() && form.weight.is_none() && form.engine_id.is_none());
}

#[test]
fn numeric_strings_and_numbers_parse() {
    let form = parse(r#"{"year":"2021","weight":"219.5"}"#).unwrap();
    assert_eq!(form.year, Some(2021));
    assert_eq!(form.weight, Some(219.5));

    let form = parse(r#"{"year":2022.0,"weight":0}"#).unwrap();
    assert_eq!(form.year, Some(2022));
    assert_eq!(form.weight, Some(0.0));
}

#[test]
fn rejects_fractional_years_and_garbage() {
    assert!(parse(r#"{"year":2021.5}"#).is_err());
    assert!(parse(r#"{"weight":"heavy"}"#).is_err());
    assert!(parse(r#"{"weight":[1]}"#).is_err());
    assert!(parse(r#"{"engine_id":"not-a-uuid"}"#).is_err());
}
