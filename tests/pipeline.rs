//! End-to-end pipeline tests.
//!
//! Artifacts are built in-test, written through the storage format into a
//! temporary `models/` directory, and loaded back before predicting, so
//! every stage of the real run is exercised.

use std::fs;
use std::path::Path;

use ndarray::array;

use floodcast::artifact::{self, Artifact};
use floodcast::pipeline::{self, Artifacts};
use floodcast::{Classifier, Imputer, PipelineError, RiskTier, Scaler};

// =============================================================================
// Fixtures
// =============================================================================

/// Write the three artifacts into `<base>/models/` at the fixed paths.
fn write_artifacts(base: &Path) {
    let models = base.join("models");
    fs::create_dir_all(&models).unwrap();

    let imputer = Artifact::Imputer(Imputer::new(array![50.0, 2.5, 0.3]));
    let scaler = Artifact::Scaler(Scaler::new(
        array![50.0, 2.5, 0.3],
        array![25.0, 1.0, 0.15],
    ));
    let classifier = Artifact::Classifier(Classifier::new(array![1.2, 0.8, 0.5], -0.2));

    artifact::save(&imputer, &base.join(pipeline::IMPUTER_PATH)).unwrap();
    artifact::save(&scaler, &base.join(pipeline::SCALER_PATH)).unwrap();
    artifact::save(&classifier, &base.join(pipeline::MODEL_PATH)).unwrap();
}

/// Nine rows with strictly increasing rainfall; row 4 has a missing
/// soil_moisture cell that imputes to the column center.
fn write_input(base: &Path) -> std::path::PathBuf {
    let mut csv = String::from("rainfall_mm,river_level_m,soil_moisture\n");
    for i in 0..9 {
        let rainfall = 12.5 * i as f64;
        let soil = if i == 4 { String::new() } else { "0.3".to_string() };
        csv.push_str(&format!("{rainfall},2.5,{soil}\n"));
    }
    let path = base.join("input.csv");
    fs::write(&path, csv).unwrap();
    path
}

fn read_csv_rows(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

// =============================================================================
// Happy Path
// =============================================================================

#[test]
fn full_run_appends_three_columns() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    let input_path = write_input(dir.path());
    let output_path = dir.path().join("predictions.csv");

    let artifacts = Artifacts::load_from(dir.path()).unwrap();
    let table = pipeline::read_input(&input_path).unwrap();
    assert_eq!((table.n_rows(), table.n_columns()), (9, 3));

    let predictions = artifacts.predict(&table).unwrap();
    pipeline::write_output(table, &predictions, &output_path).unwrap();

    let (headers, rows) = read_csv_rows(&output_path);
    assert_eq!(
        headers,
        vec![
            "rainfall_mm",
            "river_level_m",
            "soil_moisture",
            "flooded",
            "flood_probability",
            "risk_level"
        ]
    );
    assert_eq!(rows.len(), 9);

    for row in &rows {
        assert!(matches!(row[3].as_str(), "0" | "1"));
        let probability: f32 = row[4].parse().unwrap();
        assert!((0.0..=1.0).contains(&probability));
        assert!(matches!(row[5].as_str(), "low" | "medium" | "high"));
    }

    // Input cells are echoed verbatim, including the missing soil cell.
    assert_eq!(rows[0][0], "0");
    assert_eq!(rows[4][2], "");
}

#[test]
fn tiers_are_equal_population_and_monotone() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    let input_path = write_input(dir.path());

    let artifacts = Artifacts::load_from(dir.path()).unwrap();
    let table = pipeline::read_input(&input_path).unwrap();
    let predictions = artifacts.predict(&table).unwrap();

    // Rainfall (and so probability) increases strictly with row index.
    for pair in predictions.probabilities.windows(2) {
        assert!(pair[0] < pair[1]);
    }
    assert_eq!(
        predictions.tiers,
        vec![
            RiskTier::Low,
            RiskTier::Low,
            RiskTier::Low,
            RiskTier::Medium,
            RiskTier::Medium,
            RiskTier::Medium,
            RiskTier::High,
            RiskTier::High,
            RiskTier::High,
        ]
    );

    // Labels track the classifier's own 0.5 boundary.
    for (label, probability) in predictions.labels.iter().zip(&predictions.probabilities) {
        assert_eq!(*label, u8::from(*probability >= 0.5));
    }
}

#[test]
fn reruns_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    let input_path = write_input(dir.path());
    let first_path = dir.path().join("first.csv");
    let second_path = dir.path().join("second.csv");

    for output_path in [&first_path, &second_path] {
        let artifacts = Artifacts::load_from(dir.path()).unwrap();
        let table = pipeline::read_input(&input_path).unwrap();
        let predictions = artifacts.predict(&table).unwrap();
        pipeline::write_output(table, &predictions, output_path).unwrap();
    }

    assert_eq!(fs::read(&first_path).unwrap(), fs::read(&second_path).unwrap());
}

// =============================================================================
// Failure Paths
// =============================================================================

#[test]
fn missing_artifact_fails_loading() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    fs::remove_file(dir.path().join(pipeline::SCALER_PATH)).unwrap();

    let err = Artifacts::load_from(dir.path()).unwrap_err();
    assert!(matches!(err, PipelineError::ArtifactLoad { .. }));
}

#[test]
fn swapped_artifact_kind_fails_loading() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    // Put the classifier where the imputer belongs.
    fs::copy(
        dir.path().join(pipeline::MODEL_PATH),
        dir.path().join(pipeline::IMPUTER_PATH),
    )
    .unwrap();

    let err = Artifacts::load_from(dir.path()).unwrap_err();
    assert!(matches!(err, PipelineError::ArtifactLoad { .. }));
}

#[test]
fn missing_input_file_fails_reading() {
    let dir = tempfile::tempdir().unwrap();
    let err = pipeline::read_input(&dir.path().join("does_not_exist.csv")).unwrap_err();
    assert!(matches!(err, PipelineError::InputRead { .. }));
}

#[test]
fn constant_batch_fails_bucketing_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());

    let input_path = dir.path().join("constant.csv");
    fs::write(
        &input_path,
        "rainfall_mm,river_level_m,soil_moisture\n50,2.5,0.3\n50,2.5,0.3\n50,2.5,0.3\n",
    )
    .unwrap();

    let artifacts = Artifacts::load_from(dir.path()).unwrap();
    let table = pipeline::read_input(&input_path).unwrap();
    let err = artifacts.predict(&table).unwrap_err();
    assert!(matches!(err, PipelineError::Bucketing(_)));
    assert!(!dir.path().join("predictions.csv").exists());
}

#[test]
fn wrong_column_count_fails_preprocessing() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());

    let input_path = dir.path().join("narrow.csv");
    fs::write(&input_path, "rainfall_mm,river_level_m\n10,2\n20,3\n30,4\n").unwrap();

    let artifacts = Artifacts::load_from(dir.path()).unwrap();
    let table = pipeline::read_input(&input_path).unwrap();
    let err = artifacts.predict(&table).unwrap_err();
    assert!(matches!(err, PipelineError::Preprocess(_)));
}

#[test]
fn two_row_batch_fails_bucketing() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());

    let input_path = dir.path().join("tiny.csv");
    fs::write(
        &input_path,
        "rainfall_mm,river_level_m,soil_moisture\n10,2.5,0.3\n90,2.5,0.3\n",
    )
    .unwrap();

    let artifacts = Artifacts::load_from(dir.path()).unwrap();
    let table = pipeline::read_input(&input_path).unwrap();
    let err = artifacts.predict(&table).unwrap_err();
    assert!(matches!(err, PipelineError::Bucketing(_)));
}
