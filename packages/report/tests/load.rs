use exposure_database::artifact::write_artifact;
use exposure_incident_models::TypeValues;
use exposure_pipeline_models::AdjustedRow;
use exposure_report::{ReportError, ReportQuery, load, summarize};

#[test]
fn missing_artifact_is_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let err = load(&dir.path().join("probabilities.parquet")).unwrap_err();
    assert!(matches!(err, ReportError::NoData));
    assert_eq!(err.to_string(), "No data available");
}

#[test]
fn empty_artifact_is_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("probabilities.parquet");
    write_artifact(&path, &[]).unwrap();

    assert!(matches!(load(&path), Err(ReportError::NoData)));
}

#[test]
fn populated_artifact_loads_and_summarizes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("probabilities.parquet");
    let rows = vec![AdjustedRow {
        year_week: "2005-10".parse().unwrap(),
        locality: "Baghdad".to_string(),
        adjusted: TypeValues {
            enemy_action: 0.6,
            ..TypeValues::ZERO
        },
    }];
    write_artifact(&path, &rows).unwrap();

    let loaded = load(&path).unwrap();
    assert_eq!(loaded, rows);

    let summary = summarize(&loaded, &ReportQuery::new("Baghdad")).unwrap();
    assert_eq!(summary.enemy_action_weeks, 1);
    assert_eq!(summary.explosive_hazard_weeks, 0);
}
