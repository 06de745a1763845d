use std::path::Path;

use anyhow::{Context, Result};
use ct_core::record::CourseRecord;

/// Charge le JSON de la source de données et écarte les entrées dont le
/// jour de semaine sort de la grille.
///
/// Les champs `weeks` malformés sont déjà absorbés par la désérialisation
/// défensive de `CourseRecord` ; seul un JSON illisible est une erreur.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a JSON array of
/// course entries.
pub fn load_schedule(path: &Path) -> Result<Vec<CourseRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read schedule {}", path.display()))?;

    let records: Vec<CourseRecord> = serde_json::from_str(&content)
        .with_context(|| format!("schedule {} is not a course array", path.display()))?;

    let total = records.len();
    let kept: Vec<CourseRecord> = records
        .into_iter()
        .filter(|record| {
            if record.weekday_in_range() {
                true
            } else {
                log::warn!(
                    "skipping '{}': weekday {} out of range",
                    record.name,
                    record.weekday
                );
                false
            }
        })
        .collect();

    log::info!("schedule loaded: {}/{} records", kept.len(), total);
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_schedule(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_and_filters_bad_weekdays() {
        let file = write_schedule(
            r#"[
              {"name":"Analysis","weekday":1,"periods":[1,2],"weeks":[1]},
              {"name":"Ghost","weekday":9,"periods":[1],"weeks":[1]}
            ]"#,
        );
        let records = load_schedule(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Analysis");
    }

    #[test]
    fn malformed_weeks_loads_as_never_visible() {
        let file = write_schedule(
            r#"[{"name":"X","weekday":1,"periods":[1],"weeks":"1-16"}]"#,
        );
        let records = load_schedule(file.path()).unwrap();
        assert!(records[0].weeks.is_empty());
    }

    #[test]
    fn non_array_payload_is_an_error() {
        let file = write_schedule(r#"{"error":"not logged in"}"#);
        assert!(load_schedule(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_schedule(Path::new("/nonexistent/courses.json")).is_err());
    }
}
