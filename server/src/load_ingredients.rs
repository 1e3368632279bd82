//! Bulk import of the ingredient catalog from CSV or JSON.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use diesel::prelude::*;
use foodgram_core::types::{MAX_INGREDIENT_NAME, MAX_MEASUREMENT_UNIT};
use serde::Deserialize;

use crate::models::NewIngredient;
use crate::schema::ingredients;

const INSERT_BATCH: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct IngredientRecord {
    pub name: String,
    pub measurement_unit: String,
}

impl IngredientRecord {
    fn new(name: &str, measurement_unit: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            measurement_unit: measurement_unit.trim().to_string(),
        }
    }

    fn check(&self) -> Result<(), String> {
        if self.name.is_empty() || self.measurement_unit.is_empty() {
            return Err("name and unit are required".to_string());
        }
        if self.name.chars().count() > MAX_INGREDIENT_NAME {
            return Err(format!("name longer than {}", MAX_INGREDIENT_NAME));
        }
        if self.measurement_unit.chars().count() > MAX_MEASUREMENT_UNIT {
            return Err(format!("unit longer than {}", MAX_MEASUREMENT_UNIT));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub read: usize,
    pub skipped_invalid: usize,
    pub inserted: usize,
}

/// One `name,unit` record per line. Fields may be double-quoted, with `""`
/// standing for a literal quote; quoted fields cannot span lines. The unit is
/// the last field, and any unquoted commas before it belong to the name.
pub fn parse_csv(content: &str) -> anyhow::Result<Vec<IngredientRecord>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            let mut fields = split_fields(line)
                .map_err(|reason| anyhow::anyhow!("line {}: {}", index + 1, reason))?;
            let unit = fields
                .pop()
                .filter(|_| !fields.is_empty())
                .with_context(|| format!("line {}: expected `name,unit`", index + 1))?;
            Ok(IngredientRecord::new(&fields.join(","), &unit))
        })
        .collect()
}

fn split_fields(line: &str) -> Result<Vec<String>, &'static str> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            c => field.push(c),
        }
    }

    if in_quotes {
        return Err("unterminated quoted field");
    }
    fields.push(field);
    Ok(fields)
}

/// A JSON array of `{"name", "measurement_unit"}` objects.
pub fn parse_json(content: &str) -> anyhow::Result<Vec<IngredientRecord>> {
    let records: Vec<IngredientRecord> =
        serde_json::from_str(content).context("expected an array of {name, measurement_unit}")?;
    Ok(records
        .iter()
        .map(|r| IngredientRecord::new(&r.name, &r.measurement_unit))
        .collect())
}

pub fn read_file(path: &Path) -> anyhow::Result<Vec<IngredientRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        parse_json(&content)
    } else {
        parse_csv(&content)
    }
}

/// Drop invalid and repeated records, keeping the first occurrence.
fn dedupe(records: Vec<IngredientRecord>, report: &mut LoadReport) -> Vec<IngredientRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| match record.check() {
            Ok(()) => true,
            Err(reason) => {
                tracing::warn!(name = %record.name, "Skipping ingredient: {}", reason);
                report.skipped_invalid += 1;
                false
            }
        })
        .filter(|record| seen.insert(record.clone()))
        .collect()
}

/// Insert records, skipping (name, unit) pairs that already exist.
pub fn load(conn: &mut PgConnection, records: Vec<IngredientRecord>) -> anyhow::Result<LoadReport> {
    let mut report = LoadReport {
        read: records.len(),
        ..LoadReport::default()
    };
    let records = dedupe(records, &mut report);

    for batch in records.chunks(INSERT_BATCH) {
        let rows: Vec<NewIngredient> = batch
            .iter()
            .map(|r| NewIngredient {
                name: &r.name,
                measurement_unit: &r.measurement_unit,
            })
            .collect();

        report.inserted += diesel::insert_into(ingredients::table)
            .values(&rows)
            .on_conflict((ingredients::name, ingredients::measurement_unit))
            .do_nothing()
            .execute(conn)
            .context("Failed to insert ingredients")?;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv() {
        let records = parse_csv("flour,g\n\nsalt, pinch\n\"onions, red\",pcs\n").unwrap();
        assert_eq!(
            records,
            vec![
                IngredientRecord::new("flour", "g"),
                IngredientRecord::new("salt", "pinch"),
                IngredientRecord::new("onions, red", "pcs"),
            ]
        );
    }

    #[test]
    fn test_parse_csv_missing_unit() {
        let err = parse_csv("flour,g\nsugar\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_parse_csv_quoting() {
        let records = parse_csv(
            "\"salt, sea\",\"pinch\"\n\"\"\"Grandma's\"\" jam\",\"jar, small\"\nchili, dried,pcs\n",
        )
        .unwrap();
        assert_eq!(
            records,
            vec![
                IngredientRecord::new("salt, sea", "pinch"),
                IngredientRecord::new("\"Grandma's\" jam", "jar, small"),
                IngredientRecord::new("chili, dried", "pcs"),
            ]
        );
    }

    #[test]
    fn test_parse_csv_unterminated_quote() {
        let err = parse_csv("flour,g\n\"sugar,g\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_parse_json() {
        let records =
            parse_json(r#"[{"name": " milk ", "measurement_unit": "ml"}]"#).unwrap();
        assert_eq!(records, vec![IngredientRecord::new("milk", "ml")]);
        assert!(parse_json(r#"{"name": "milk"}"#).is_err());
    }

    #[test]
    fn test_dedupe_and_skip_invalid() {
        let mut report = LoadReport::default();
        let records = dedupe(
            vec![
                IngredientRecord::new("flour", "g"),
                IngredientRecord::new("flour", "g"),
                IngredientRecord::new("flour", "kg"),
                IngredientRecord::new("", "g"),
                IngredientRecord::new(&"x".repeat(MAX_INGREDIENT_NAME + 1), "g"),
            ],
            &mut report,
        );
        assert_eq!(records.len(), 2);
        assert_eq!(report.skipped_invalid, 2);
    }
}
