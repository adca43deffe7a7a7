use super::*;

fn value<'a>(columns: &'a Columns, name: &str) -> &'a ColumnValue {
    &columns.iter().find(|(c, _)| *c == name).expect("column present").1
}

#[test]
fn into_columns_coerces_form_strings() {
    let engine_id = Uuid::new_v4();
    let json = format!(
        r#"{{
            "name": " Touring ",
            "msrp_usd": "18995",
            "price_premium_usd": "",
            "weight_kg": "220.5",
            "engine_id": "{engine_id}",
            "frame_id": "",
            "color_options": [" Red ", "", "Black"]
        }}"#
    );
    let input: ConfigurationInput = serde_json::from_str(&json).unwrap();
    let columns = input.into_columns().unwrap();

    assert_eq!(value(&columns, "name"), &ColumnValue::Text(Some("Touring".into())));
    assert_eq!(value(&columns, "msrp_usd"), &ColumnValue::Int(Some(18995)));
    assert_eq!(value(&columns, "price_premium_usd"), &ColumnValue::Int(None));
    assert_eq!(value(&columns, "weight_kg"), &ColumnValue::Float(Some(220.5)));
    assert_eq!(value(&columns, "engine_id"), &ColumnValue::Id(Some(engine_id)));
    assert_eq!(value(&columns, "frame_id"), &ColumnValue::Id(None));
    assert_eq!(
        value(&columns, "color_options"),
        &ColumnValue::TextList(Some(vec!["Red".into(), "Black".into()]))
    );
}

#[test]
fn into_columns_never_writes_is_default() {
    let input = ConfigurationInput { name: Some("Base".into()), is_default: true, ..ConfigurationInput::default() };
    let columns = input.into_columns().unwrap();
    assert!(columns.iter().all(|(c, _)| *c != "is_default"));
}

#[test]
fn into_columns_rejects_negative_amounts() {
    let input = ConfigurationInput {
        name: Some("Base".into()),
        msrp_usd: Some(-1),
        ..ConfigurationInput::default()
    };
    assert_eq!(input.into_columns().unwrap_err().to_string(), "msrp_usd must not be negative");

    let input = ConfigurationInput {
        name: Some("Base".into()),
        fuel_capacity_l: Some(-3.0),
        ..ConfigurationInput::default()
    };
    assert!(input.into_columns().is_err());
}

#[test]
fn into_columns_accepts_zero_prices() {
    let input = ConfigurationInput {
        name: Some("Base".into()),
        price_premium_usd: Some(0),
        ..ConfigurationInput::default()
    };
    let columns = input.into_columns().unwrap();
    assert_eq!(value(&columns, "price_premium_usd"), &ColumnValue::Int(Some(0)));
}

#[test]
fn into_columns_requires_name() {
    assert!(ConfigurationInput::default().into_columns().is_err());
}

// =============================================================================
// live Postgres
// =============================================================================

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn default_flag_moves_between_configurations_of_a_year() {
    use crate::db::test_support::{integration_pool, seed_years};

    let pool = integration_pool().await;
    let year = seed_years(&pool, &[2024]).await[0];
    let named = |name: &str, is_default: bool| ConfigurationInput {
        name: Some(name.into()),
        is_default,
        ..ConfigurationInput::default()
    };
    let base = create_configuration(&pool, year, named("Base", true))
        .await
        .expect("base should be created");
    let sport = create_configuration(&pool, year, named("Sport", false))
        .await
        .expect("sport should be created");
    assert!(base.is_default);
    assert!(!sport.is_default);

    set_default(&pool, sport.id).await.expect("set_default should succeed");
    let defaults: Vec<Uuid> = list_for_year(&pool, year)
        .await
        .unwrap()
        .into_iter()
        .filter(|c| c.is_default)
        .map(|c| c.id)
        .collect();
    assert_eq!(defaults, vec![sport.id]);

    let touring = create_configuration(&pool, year, named("Touring", true))
        .await
        .expect("a new default should replace the old one");
    update_configuration(&pool, base.id, named("Base", true))
        .await
        .expect("update to default should succeed");
    let defaults: Vec<Uuid> = list_for_year(&pool, year)
        .await
        .unwrap()
        .into_iter()
        .filter(|c| c.is_default)
        .map(|c| c.id)
        .collect();
    assert_eq!(defaults, vec![base.id]);
    assert!(!get_configuration(&pool, touring.id).await.unwrap().is_default);
}
