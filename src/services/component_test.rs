use super::*;
use serde_json::json;

#[test]
fn kind_parses_url_segments() {
    assert_eq!(ComponentKind::from_segment("engines"), Some(ComponentKind::Engine));
    assert_eq!(ComponentKind::from_segment("brake-systems"), Some(ComponentKind::BrakeSystem));
    assert_eq!(ComponentKind::from_segment("Brake_System"), Some(ComponentKind::BrakeSystem));
    assert_eq!(ComponentKind::from_segment("wheel"), Some(ComponentKind::Wheel));
    assert_eq!(ComponentKind::from_segment("exhausts"), None);
}

#[test]
fn kind_type_strings_round_trip() {
    for kind in ComponentKind::ALL {
        assert_eq!(ComponentKind::from_type(kind.as_str()), Some(kind));
        assert!(kind.configuration_column().ends_with("_id"));
    }
    assert_eq!(ComponentKind::from_type("engines"), None);
}

#[test]
fn parse_engine_form_coerces_numbers() {
    let input = ComponentInput::parse(
        ComponentKind::Engine,
        json!({"name": " LC8 ", "displacement_cc": "1301", "power_hp": "", "cylinders": 2}),
    )
    .unwrap();
    assert_eq!(input.kind(), ComponentKind::Engine);
    let columns = input.into_columns().unwrap();
    assert!(columns.contains(&("name", ColumnValue::Text(Some("LC8".into())))));
    assert!(columns.contains(&("displacement_cc", ColumnValue::Int(Some(1301)))));
    assert!(columns.contains(&("power_hp", ColumnValue::Float(None))));
    assert!(columns.contains(&("cylinders", ColumnValue::Int(Some(2)))));
}

#[test]
fn parse_rejects_malformed_form() {
    let err = ComponentInput::parse(ComponentKind::Frame, json!({"name": "Trellis", "trail_mm": "long"})).unwrap_err();
    assert!(err.to_string().starts_with("invalid frame form"));
}

#[test]
fn brake_form_defaults_abs_off() {
    let input = ComponentInput::parse(ComponentKind::BrakeSystem, json!({"name": "Brembo M50"})).unwrap();
    let columns = input.into_columns().unwrap();
    assert!(columns.contains(&("has_abs", ColumnValue::Bool(Some(false)))));
}

#[test]
fn forms_require_name_and_non_negative_specs() {
    let err = ComponentInput::Wheel(WheelInput::default()).into_columns().unwrap_err();
    assert_eq!(err.to_string(), "name is required");

    let suspension = SuspensionInput {
        name: Some("WP XPLOR".into()),
        front_travel_mm: Some(-230),
        ..SuspensionInput::default()
    };
    assert!(ComponentInput::Suspension(suspension).into_columns().is_err());
}

// =============================================================================
// live Postgres
// =============================================================================

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn delete_component_is_refused_while_configured_and_drops_assignments() {
    use crate::db::test_support::{integration_pool, seed_years};
    use crate::services::assignment::{self, AssignInput};
    use crate::services::configuration::{self, ConfigurationInput};

    let pool = integration_pool().await;
    let year = seed_years(&pool, &[2024]).await[0];
    let engine = create_component(
        &pool,
        ComponentInput::Engine(EngineInput { name: Some("Parallel twin".into()), ..EngineInput::default() }),
    )
    .await
    .expect("engine should be created");
    let engine_id: Uuid = serde_json::from_value(engine["id"].clone()).unwrap();

    let config = configuration::create_configuration(
        &pool,
        year,
        ConfigurationInput { name: Some("Base".into()), engine_id: Some(engine_id), ..ConfigurationInput::default() },
    )
    .await
    .expect("configuration should be created");

    let err = delete_component(&pool, ComponentKind::Engine, engine_id).await.unwrap_err();
    assert!(matches!(err, CatalogError::Reference(_)));
    assert!(component_exists(&pool, ComponentKind::Engine, engine_id).await.unwrap());

    configuration::update_configuration(
        &pool,
        config.id,
        ConfigurationInput { name: Some("Base".into()), ..ConfigurationInput::default() },
    )
    .await
    .expect("clearing the engine should succeed");
    let model_id = configuration::model_id_of(&pool, config.id).await.unwrap();
    let assigned = assignment::assign(
        &pool,
        model_id,
        AssignInput {
            component_type: Some("engine".into()),
            component_id: Some(engine_id),
            ..AssignInput::default()
        },
    )
    .await
    .expect("assignment should be created");

    delete_component(&pool, ComponentKind::Engine, engine_id)
        .await
        .expect("unused engine should be deleted");
    assert!(!component_exists(&pool, ComponentKind::Engine, engine_id).await.unwrap());
    let gone = assignment::get_assignment(&pool, assigned.id).await.unwrap_err();
    assert!(matches!(gone, CatalogError::NotFound { .. }));
}
