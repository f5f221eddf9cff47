//! Загрузка и запись табличных данных

use std::io;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{
    FeatureRecord, LabeledRecord, CATEGORICAL_COLUMNS, NUMERIC_COLUMNS, TARGET_COLUMN,
};

/// Пустая ячейка, "NA" или "NaN" считаются пропуском (конвенция palmerpenguins).
fn is_missing(raw: &str) -> bool {
    let t = raw.trim();
    t.is_empty() || t.eq_ignore_ascii_case("na") || t.eq_ignore_ascii_case("nan")
}

fn parse_opt_f64(raw: &str, column: &str) -> Result<Option<f64>> {
    if is_missing(raw) {
        return Ok(None);
    }
    raw.trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|_| Error::Schema(format!("column '{column}': '{raw}' is not a number")))
}

fn parse_opt_str(raw: &str) -> Option<String> {
    if is_missing(raw) {
        None
    } else {
        Some(raw.trim().to_string())
    }
}

/// Читает размеченный датасет. Записи с пропущенной целевой переменной
/// отбрасываются. Отсутствие любой обязательной колонки в заголовке
/// возвращает `SchemaError`.
pub fn read_labeled<R: io::Read>(reader: R) -> Result<Vec<LabeledRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();

    let col = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| Error::Schema(format!("required column '{name}' not found")))
    };

    let num_idx = [
        col(NUMERIC_COLUMNS[0])?,
        col(NUMERIC_COLUMNS[1])?,
        col(NUMERIC_COLUMNS[2])?,
    ];
    let cat_idx = [
        col(CATEGORICAL_COLUMNS[0])?,
        col(CATEGORICAL_COLUMNS[1])?,
        col(CATEGORICAL_COLUMNS[2])?,
    ];
    let target_idx = col(TARGET_COLUMN)?;

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let field = |idx: usize| row.get(idx).unwrap_or("");

        let target = match parse_opt_f64(field(target_idx), TARGET_COLUMN)? {
            Some(v) => v,
            None => continue,
        };

        let features = FeatureRecord {
            species: parse_opt_str(field(cat_idx[0])),
            island: parse_opt_str(field(cat_idx[1])),
            sex: parse_opt_str(field(cat_idx[2])),
            bill_length_mm: parse_opt_f64(field(num_idx[0]), NUMERIC_COLUMNS[0])?,
            bill_depth_mm: parse_opt_f64(field(num_idx[1]), NUMERIC_COLUMNS[1])?,
            flipper_length_mm: parse_opt_f64(field(num_idx[2]), NUMERIC_COLUMNS[2])?,
        };

        records.push(LabeledRecord {
            features,
            body_mass_g: target,
        });
    }

    Ok(records)
}

/// Читает размеченный датасет из CSV файла.
pub fn load_labeled_csv(path: &Path) -> Result<Vec<LabeledRecord>> {
    let file = std::fs::File::open(path)?;
    read_labeled(io::BufReader::new(file))
}

/// Записывает размеченный датасет в CSV. Пропуски пишутся как "NA".
pub fn write_labeled_csv(path: &Path, records: &[LabeledRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        CATEGORICAL_COLUMNS[0],
        CATEGORICAL_COLUMNS[1],
        CATEGORICAL_COLUMNS[2],
        NUMERIC_COLUMNS[0],
        NUMERIC_COLUMNS[1],
        NUMERIC_COLUMNS[2],
        TARGET_COLUMN,
    ])?;

    let fmt_str = |v: &Option<String>| v.clone().unwrap_or_else(|| "NA".to_string());
    let fmt_num = |v: &Option<f64>| match v {
        Some(x) => x.to_string(),
        None => "NA".to_string(),
    };

    for rec in records {
        let f = &rec.features;
        wtr.write_record([
            fmt_str(&f.species),
            fmt_str(&f.island),
            fmt_str(&f.sex),
            fmt_num(&f.bill_length_mm),
            fmt_num(&f.bill_depth_mm),
            fmt_num(&f.flipper_length_mm),
            rec.body_mass_g.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
