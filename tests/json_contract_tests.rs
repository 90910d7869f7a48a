use bs_history::api::{CHART_SNAPSHOT_JSON_SCHEMA_V1, ChartData, ChartRequest, ChartSnapshot};
use bs_history::core::{BloodSugarType, Period, ReadingCollection};

const READINGS_JSON: &str = r#"[
    {"blood_sugar_type": "fasting", "blood_sugar_value": "95", "blood_sugar_unit": "mg/dL", "recorded_at": "2024-03-05T07:00:00"},
    {"blood_sugar_type": "fasting", "blood_sugar_value": "130", "blood_sugar_unit": "mg/dL", "recorded_at": "2024-03-05T20:00:00"},
    {"blood_sugar_type": "fasting", "blood_sugar_value": "80", "recorded_at": "2024-03-20T07:00:00"},
    {"blood_sugar_type": "hba1c", "blood_sugar_value": "8.2", "blood_sugar_unit": "%", "recorded_at": "2023-09-14T10:00:00"}
]"#;

fn snapshot() -> ChartSnapshot {
    let readings: ReadingCollection = serde_json::from_str(READINGS_JSON).expect("parse readings");
    let request =
        ChartRequest::single_month(BloodSugarType::Fasting, 2, 2024, readings).expect("request");
    ChartData::new(&request).expect("chart data").snapshot()
}

#[test]
fn snapshot_captures_derived_series() {
    let snapshot = snapshot();

    assert_eq!(snapshot.title, "March 2024");
    assert_eq!(
        snapshot.period,
        Period::Month {
            year: 2024,
            month0: 2
        }
    );
    assert_eq!(snapshot.index_values.len(), 31);
    assert_eq!(snapshot.scatter_points.len(), 3);
    assert_eq!(snapshot.min_max_bands.len(), 1);
    assert_eq!(snapshot.overall_min, Some(80.0));
    assert_eq!(snapshot.overall_max, Some(130.0));
    assert!(snapshot.presence.fasting);
    assert!(snapshot.presence.hemoglobic);
    assert!(!snapshot.presence.random);
}

#[test]
fn snapshot_contract_v1_is_versioned_and_parseable() {
    let snapshot = snapshot();
    let json = snapshot
        .to_json_contract_v1_pretty()
        .expect("serialize contract");

    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(
        value["schema_version"].as_u64(),
        Some(u64::from(CHART_SNAPSHOT_JSON_SCHEMA_V1))
    );

    let parsed = ChartSnapshot::from_json_compat_str(&json).expect("parse contract");
    assert_eq!(parsed, snapshot);
}

#[test]
fn snapshot_accepts_bare_payload_and_rejects_unknown_versions() {
    let snapshot = snapshot();
    let bare = serde_json::to_string(&snapshot).expect("serialize bare");
    assert_eq!(
        ChartSnapshot::from_json_compat_str(&bare).expect("parse bare"),
        snapshot
    );

    let future = serde_json::json!({
        "schema_version": 99,
        "snapshot": serde_json::to_value(&snapshot).expect("snapshot value"),
    })
    .to_string();
    assert!(ChartSnapshot::from_json_compat_str(&future).is_err());
}

#[test]
fn invalid_reading_value_fails_deserialization() {
    let json = r#"[{"blood_sugar_type": "random", "blood_sugar_value": "n/a", "recorded_at": "2024-03-05T07:00:00"}]"#;
    assert!(serde_json::from_str::<ReadingCollection>(json).is_err());
}
