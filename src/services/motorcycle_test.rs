use super::*;

fn year(model_id: Uuid, value: i32) -> ModelYear {
    ModelYear { id: Uuid::new_v4(), model_id, year: value, notes: None }
}

fn config_for(year: &ModelYear, name: &str) -> Configuration {
    Configuration { id: Uuid::new_v4(), model_year_id: year.id, name: name.into(), ..Configuration::default() }
}

#[test]
fn model_input_requires_brand_and_name() {
    let err = ModelInput { name: Some("Monster".into()), ..ModelInput::default() }
        .into_columns()
        .unwrap_err();
    assert_eq!(err.to_string(), "brand_id is required");

    let err = ModelInput { brand_id: Some(Uuid::new_v4()), ..ModelInput::default() }
        .into_columns()
        .unwrap_err();
    assert_eq!(err.to_string(), "name is required");
}

#[test]
fn model_input_rejects_end_before_start() {
    let input = ModelInput {
        brand_id: Some(Uuid::new_v4()),
        name: Some("Bonneville".into()),
        production_start_year: Some(2016),
        production_end_year: Some(2001),
        ..ModelInput::default()
    };
    let err = input.into_columns().unwrap_err();
    assert!(err.to_string().contains("production_end_year"));
}

#[test]
fn model_input_rejects_years_outside_catalog_range() {
    let input = ModelInput {
        brand_id: Some(Uuid::new_v4()),
        name: Some("Velocipede".into()),
        production_start_year: Some(1850),
        ..ModelInput::default()
    };
    assert!(input.into_columns().is_err());

    let input = ModelInput {
        brand_id: Some(Uuid::new_v4()),
        name: Some("Concept".into()),
        production_start_year: Some(validate::latest_model_year() + 1),
        ..ModelInput::default()
    };
    assert!(input.into_columns().is_err());
}

#[test]
fn model_input_from_form_json() {
    let brand_id = Uuid::new_v4();
    let json = format!(
        r#"{{"brand_id":"{brand_id}","name":" Tenere 700 ","category":"","production_start_year":"2019","production_end_year":""}}"#
    );
    let input: ModelInput = serde_json::from_str(&json).unwrap();
    let columns = input.into_columns().unwrap();
    assert!(columns.contains(&("name", ColumnValue::Text(Some("Tenere 700".into())))));
    assert!(columns.contains(&("category", ColumnValue::Text(None))));
    assert!(columns.contains(&("production_start_year", ColumnValue::Int(Some(2019)))));
    assert!(columns.contains(&("production_end_year", ColumnValue::Int(None))));
    assert!(columns.contains(&("is_published", ColumnValue::Bool(Some(false)))));
}

#[test]
fn emptied_brand_select_reports_missing_brand() {
    let input: ModelInput = serde_json::from_str(r#"{"brand_id":"","name":"Monster"}"#).unwrap();
    assert!(input.brand_id.is_none());
    assert_eq!(input.into_columns().unwrap_err().to_string(), "brand_id is required");
}

#[test]
fn year_input_requires_year() {
    assert!(ModelYearInput::default().into_columns().is_err());
    let columns = ModelYearInput { year: Some(2024), notes: Some("  ".into()) }
        .into_columns()
        .unwrap();
    assert_eq!(columns[0], ("year", ColumnValue::Int(Some(2024))));
    assert_eq!(columns[1], ("notes", ColumnValue::Text(None)));
}

#[test]
fn assemble_years_groups_configurations_by_year() {
    let model_id = Uuid::new_v4();
    let y2024 = year(model_id, 2024);
    let y2023 = year(model_id, 2023);
    let configs = vec![
        config_for(&y2023, "Base"),
        config_for(&y2024, "Base"),
        config_for(&y2024, "Touring"),
        Configuration { model_year_id: Uuid::new_v4(), ..config_for(&y2024, "Orphan") },
    ];

    let details = assemble_years(vec![y2024.clone(), y2023.clone()], configs);
    assert_eq!(details.len(), 2);
    assert_eq!(details[0].year.year, 2024);
    let names: Vec<&str> = details[0].configurations.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Base", "Touring"]);
    assert_eq!(details[1].configurations.len(), 1);
}

#[test]
fn model_detail_serializes_flat() {
    let model = MotorcycleModel {
        id: Uuid::nil(),
        brand_id: Uuid::nil(),
        brand_name: "Ducati".into(),
        name: "Monster".into(),
        category: Some("naked".into()),
        production_start_year: Some(1993),
        production_end_year: None,
        description: None,
        is_published: true,
    };
    let detail = ModelDetail { model, years: Vec::new() };
    let json = serde_json::to_value(&detail).unwrap();
    assert_eq!(json["name"], "Monster");
    assert_eq!(json["brand_name"], "Ducati");
    assert!(json["years"].as_array().unwrap().is_empty());
}
