//! Command implementations.

use std::{io, path::Path, process::ExitCode};

use crate::{
    error::Error,
    loader::TableLoader,
    pipeline::QualityPipeline,
    profile::ColumnProfile,
    render::{ChartRenderer, TextRenderer},
    schema::TableSchema,
    table::Table,
};

use super::LoadArgs;

/// Load a table per the shared CLI options, applying role overrides on
/// top of whatever the schema file declares.
fn load_table(args: &LoadArgs) -> crate::Result<Table> {
    let delimiter = u8::try_from(args.delimiter)
        .map_err(|_| Error::invalid_config("delimiter must be a single ASCII character"))?;

    let mut loader = TableLoader::new().with_delimiter(delimiter);
    if let Some(schema_path) = &args.schema {
        loader = loader.with_schema(TableSchema::from_json_file(schema_path)?);
    }

    let mut table = loader.load(&args.path)?;
    if !args.groups.is_empty() {
        table = table.with_groups(args.groups.clone());
    }
    if !args.outcomes.is_empty() {
        table = table.with_outcomes(args.outcomes.clone());
    }
    if let Some(target) = &args.target {
        table = table.with_target(target.clone());
    }
    table.schema().validate_roles()?;

    Ok(table)
}

/// Run the quality checks and print a summary.
///
/// Exits non-zero when the report carries a critical finding, so CI can
/// gate on it.
pub(crate) fn cmd_check(args: &LoadArgs, format: &str) -> crate::Result<ExitCode> {
    let table = load_table(args)?;
    let report = QualityPipeline::new().run(&table)?;

    match format {
        "json" => println!("{:#}", report.to_json_value()),
        "text" => {
            let mut renderer = TextRenderer::new(io::stdout().lock());
            renderer.render(&table, &report)?;
        }
        other => return Err(Error::invalid_config(format!("unknown format '{other}'"))),
    }

    if report.has_critical() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Write the full quality report as JSON.
pub(crate) fn cmd_report(args: &LoadArgs, output: Option<&Path>) -> crate::Result<()> {
    let table = load_table(args)?;
    let report = QualityPipeline::new().run(&table)?;
    let json = format!("{:#}", report.to_json_value());

    if let Some(output_path) = output {
        std::fs::write(output_path, &json).map_err(|e| Error::io(e, output_path))?;
        println!("Quality report written to: {}", output_path.display());
    } else {
        println!("{json}");
    }

    Ok(())
}

/// Display per-column profiles.
pub(crate) fn cmd_profile(args: &LoadArgs, format: &str) -> crate::Result<()> {
    let table = load_table(args)?;
    let profiles = ColumnProfile::for_table(&table);

    match format {
        "json" => {
            let json = serde_json::json!({
                "path": args.path.display().to_string(),
                "rows": table.row_count(),
                "columns": profiles,
            });
            println!("{json:#}");
        }
        "text" => {
            println!("File: {}", args.path.display());
            println!("Rows: {}", table.row_count());
            println!();
            println!(
                "{:<20} {:<12} {:>9} {:>9} {:>10} {:>10} {:>10}",
                "COLUMN", "TYPE", "MISSING %", "DISTINCT", "MIN", "MAX", "MEAN"
            );
            println!("{}", "-".repeat(86));
            for profile in &profiles {
                println!(
                    "{:<20} {:<12} {:>9.1} {:>9} {:>10} {:>10} {:>10}",
                    profile.name,
                    profile.semantic_type.to_string(),
                    profile.missing_rate() * 100.0,
                    profile.distinct_count,
                    optional_stat(profile.min),
                    optional_stat(profile.max),
                    optional_stat(profile.mean),
                );
            }
        }
        other => return Err(Error::invalid_config(format!("unknown format '{other}'"))),
    }

    Ok(())
}

fn optional_stat(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

/// Display the table schema as JSON.
pub(crate) fn cmd_schema(args: &LoadArgs) -> crate::Result<()> {
    let table = load_table(args)?;
    println!("{:#}", serde_json::json!(table.schema()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn write_csv(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content)
            .ok()
            .unwrap_or_else(|| panic!("Should write fixture"));
        path
    }

    fn args(path: PathBuf) -> LoadArgs {
        LoadArgs {
            path,
            schema: None,
            delimiter: ',',
            groups: Vec::new(),
            outcomes: Vec::new(),
            target: None,
        }
    }

    const STUDENTS: &str = "\
age,sex,G3\n\
15,M,10\n\
16,F,12\n\
17,M,14\n\
16,F,11\n\
15,M,13\n\
17,F,9\n";

    #[test]
    fn test_cmd_check_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "students.csv", STUDENTS);
        assert!(cmd_check(&args(path), "text").is_ok());
    }

    #[test]
    fn test_cmd_check_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "students.csv", STUDENTS);
        assert!(cmd_check(&args(path), "json").is_ok());
    }

    #[test]
    fn test_cmd_check_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "students.csv", STUDENTS);
        assert!(cmd_check(&args(path), "yaml").is_err());
    }

    #[test]
    fn test_cmd_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "students.csv", STUDENTS);
        let output = dir.path().join("report.json");

        cmd_report(&args(path), Some(&output)).unwrap();
        let content = std::fs::read_to_string(&output).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert!(parsed["dimensions"]["completeness"]["score"].is_f64());
    }

    #[test]
    fn test_cmd_report_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "students.csv", STUDENTS);
        assert!(cmd_report(&args(path), None).is_ok());
    }

    #[test]
    fn test_cmd_profile_text_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "students.csv", STUDENTS);
        assert!(cmd_profile(&args(path.clone()), "text").is_ok());
        assert!(cmd_profile(&args(path), "json").is_ok());
    }

    #[test]
    fn test_cmd_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "students.csv", STUDENTS);
        assert!(cmd_schema(&args(path)).is_ok());
    }

    #[test]
    fn test_role_override_unknown_column_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "students.csv", STUDENTS);
        let mut load = args(path);
        load.groups = vec!["ethnicity".to_string()];
        assert!(load_table(&load).is_err());
    }

    #[test]
    fn test_role_overrides_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "students.csv", STUDENTS);
        let mut load = args(path);
        load.groups = vec!["sex".to_string()];
        load.outcomes = vec!["G3".to_string()];
        load.target = Some("G3".to_string());

        let table = load_table(&load).unwrap();
        assert_eq!(table.schema().groups, vec!["sex"]);
        assert_eq!(table.schema().target.as_deref(), Some("G3"));
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "students.csv", STUDENTS);
        let mut load = args(path);
        load.delimiter = '\u{00e7}';
        assert!(load_table(&load).is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        let load = args(PathBuf::from("/nonexistent/students.csv"));
        assert!(cmd_check(&load, "text").is_err());
    }
}
