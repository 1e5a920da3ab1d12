//! End-to-end tests: load a file, run the pipeline, inspect the report.

use std::io::Write;
use std::path::PathBuf;

use calidad::{
    ChartRenderer, CheckConfig, Dimension, QualityPipeline, Severity, TableLoader, TableSchema,
    TextRenderer,
};

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

/// A small semicolon-delimited extract in the shape of the UCI student
/// performance files.
const STUDENTS: &str = "\
school;sex;age;address;G3\n\
GP;M;15;U;10\n\
GP;m;16;U;12\n\
GP;Male;17;R;14\n\
MS;F;16;U;11\n\
MS;F;15;R;13\n\
MS;F;17;U;9\n\
GP;M;16;R;15\n\
MS;F;;U;12\n\
GP;M;15;R;11\n\
MS;F;16;U;13\n";

const SCHEMA: &str = r#"{
  "columns": [
    { "name": "school", "type": "categorical" },
    { "name": "sex", "type": "categorical" },
    { "name": "age", "type": "numeric", "min": 15, "max": 22 },
    { "name": "address", "type": "categorical" },
    { "name": "G3", "type": "numeric", "min": 0, "max": 20 }
  ],
  "groups": ["sex"],
  "outcomes": ["G3"],
  "target": "G3"
}"#;

fn load_students(dir: &tempfile::TempDir) -> calidad::Table {
    let data = write_file(dir, "student-mat.csv", STUDENTS);
    let schema_path = write_file(dir, "schema.json", SCHEMA);
    let schema = TableSchema::from_json_file(&schema_path).unwrap();
    TableLoader::new()
        .with_schema(schema)
        .with_delimiter(b';')
        .load(&data)
        .unwrap()
}

#[test]
fn full_run_produces_all_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let table = load_students(&dir);
    let report = QualityPipeline::new().run(&table).unwrap();

    for dimension in [
        Dimension::Completeness,
        Dimension::Consistency,
        Dimension::Validity,
        Dimension::Bias,
    ] {
        assert!(
            report.dimension_score(dimension).is_some(),
            "{dimension} missing from report"
        );
    }
}

#[test]
fn mixed_sex_encodings_are_flagged() {
    let dir = tempfile::tempdir().unwrap();
    let table = load_students(&dir);
    let report = QualityPipeline::new().run(&table).unwrap();

    let sex_finding = report
        .findings_for(Dimension::Consistency)
        .into_iter()
        .find(|f| f.columns == vec!["sex".to_string()])
        .unwrap();
    assert!(sex_finding.message.contains("diverge from canonical form"));
    assert!(sex_finding.score < 0.5);
}

#[test]
fn missing_age_cell_lowers_completeness_only_for_age() {
    let dir = tempfile::tempdir().unwrap();
    let table = load_students(&dir);
    let report = QualityPipeline::new().run(&table).unwrap();

    let completeness = report.findings_for(Dimension::Completeness);
    let age = completeness
        .iter()
        .find(|f| f.columns == vec!["age".to_string()])
        .unwrap();
    assert!((age.score - 0.9).abs() < 1e-12);

    let g3 = completeness
        .iter()
        .find(|f| f.columns == vec!["G3".to_string()])
        .unwrap();
    assert!((g3.score - 1.0).abs() < f64::EPSILON);
}

#[test]
fn bias_pair_comes_from_schema_roles() {
    let dir = tempfile::tempdir().unwrap();
    let table = load_students(&dir);
    let report = QualityPipeline::new().run(&table).unwrap();

    let bias = report.findings_for(Dimension::Bias);
    assert!(!bias.is_empty());
    for finding in &bias {
        assert!(finding.columns.contains(&"sex".to_string()));
    }
}

#[test]
fn feature_ranking_targets_g3() {
    let dir = tempfile::tempdir().unwrap();
    let table = load_students(&dir);
    let report = QualityPipeline::new().run(&table).unwrap();

    let ranking = report.feature_ranking.as_ref().unwrap();
    assert_eq!(ranking.target.as_deref(), Some("G3"));
    assert!(ranking
        .target_correlations
        .iter()
        .all(|c| c.feature == "age"));
}

#[test]
fn json_report_shape_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let table = load_students(&dir);
    let report = QualityPipeline::new().run(&table).unwrap();

    let json = report.to_json_value();
    let dimensions = json["dimensions"].as_object().unwrap();
    assert_eq!(dimensions.len(), 5);
    for name in ["completeness", "consistency", "validity", "bias", "feature_quality"] {
        assert!(dimensions.contains_key(name), "{name} missing");
        assert!(dimensions[name]["findings"].is_array());
    }
    // Score is a float or null, never a magic zero for unevaluated.
    let feature_quality = &dimensions["feature_quality"]["score"];
    assert!(feature_quality.is_null() || feature_quality.is_f64());
}

#[test]
fn schemaless_csv_still_evaluates_numeric_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_file(
        &dir,
        "grades.csv",
        "age,G3\n20,10\n21,12\n999,14\n22,11\n20,13\n",
    );

    // No schema file: semantic types come from CSV type inference.
    let table = TableLoader::new().load(&data).unwrap();
    let report = QualityPipeline::new().run(&table).unwrap();

    assert!(report.dimension_score(Dimension::Validity).is_some());
    assert!(report
        .findings_for(Dimension::Validity)
        .iter()
        .any(|f| f.columns == vec!["age".to_string()] && f.message.contains("outlier")));

    let ranking = report.feature_ranking.as_ref().unwrap();
    assert!(!ranking.pairs.is_empty());
}

#[test]
fn schema_mismatch_aborts_before_any_report() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_file(&dir, "data.csv", "a,b\n1,2\n");
    let schema = TableSchema::from_json_file(write_file(
        &dir,
        "schema.json",
        r#"{ "columns": [ { "name": "a", "type": "numeric" }, { "name": "c", "type": "numeric" } ] }"#,
    ))
    .unwrap();

    let err = TableLoader::new().with_schema(schema).load(&data).unwrap_err();
    assert!(err.is_fatal());
    assert!(err.to_string().contains('c'));
}

#[test]
fn out_of_range_grades_are_critical() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_file(
        &dir,
        "grades.csv",
        "G3\n12\n25\n8\n-3\n10\n11\n9\n13\n14\n7\n",
    );
    let schema = TableSchema::from_json_file(write_file(
        &dir,
        "schema.json",
        r#"{ "columns": [ { "name": "G3", "type": "numeric", "min": 0, "max": 20 } ] }"#,
    ))
    .unwrap();
    let table = TableLoader::new().with_schema(schema).load(&data).unwrap();
    let report = QualityPipeline::new().run(&table).unwrap();

    let range = report
        .findings_for(Dimension::Validity)
        .into_iter()
        .find(|f| f.message.contains("declared range"))
        .unwrap();
    assert_eq!(range.severity, Severity::Critical);
    assert!(range.message.contains("2 values outside"));
    assert!(report.has_critical());
}

#[test]
fn tiny_groups_report_insufficient_data() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_file(
        &dir,
        "data.csv",
        "school,G3\nGP,10\nGP,12\nGP,11\nGP,13\nGP,9\nMS,14\nMS,8\n",
    );
    let schema = TableSchema::from_json_file(write_file(
        &dir,
        "schema.json",
        r#"{
          "columns": [
            { "name": "school", "type": "categorical" },
            { "name": "G3", "type": "numeric" }
          ],
          "groups": ["school"],
          "outcomes": ["G3"]
        }"#,
    ))
    .unwrap();
    let table = TableLoader::new().with_schema(schema).load(&data).unwrap();
    let report = QualityPipeline::new().run(&table).unwrap();

    let bias = report.findings_for(Dimension::Bias);
    assert!(bias
        .iter()
        .any(|f| f.message.contains("insufficient data") && f.severity == Severity::Info));
    // Only one group is big enough, so no dispersion verdict is possible.
    assert!(bias
        .iter()
        .any(|f| f.message.contains("fewer than two groups")));
}

#[test]
fn custom_thresholds_change_severities() {
    let dir = tempfile::tempdir().unwrap();
    let table = load_students(&dir);

    // With a forgiving ladder the 90%-complete age column is merely info.
    let config = CheckConfig::default().with_score_cutoffs(0.85, 0.5);
    let report = QualityPipeline::with_config(config).run(&table).unwrap();
    let age = report
        .findings_for(Dimension::Completeness)
        .into_iter()
        .find(|f| f.columns == vec!["age".to_string()])
        .unwrap();
    assert_eq!(age.severity, Severity::Info);
}

#[test]
fn text_rendering_covers_whole_report() {
    let dir = tempfile::tempdir().unwrap();
    let table = load_students(&dir);
    let report = QualityPipeline::new().run(&table).unwrap();

    let mut renderer = TextRenderer::new(Vec::new());
    renderer.render(&table, &report).unwrap();
    let text = String::from_utf8(renderer.into_inner()).unwrap();

    assert!(text.contains("10 rows, 5 columns"));
    for name in ["completeness", "consistency", "validity", "bias"] {
        assert!(text.contains(name), "{name} missing from text output");
    }
    assert!(text.contains("Feature correlation with G3"));
}
