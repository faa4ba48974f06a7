use std::io::Read;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::LoadError;
use super::model::{columns, SalaryDataset, SalaryRecord};

pub type Result<T> = std::result::Result<T, LoadError>;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load from a URL (`http://` / `https://`) or a local path.
pub fn load_source(source: &str) -> Result<SalaryDataset> {
    let dataset = if source.starts_with("http://") || source.starts_with("https://") {
        load_url(source)?
    } else {
        load_file(Path::new(source))?
    };
    log::info!("Loaded {} salary records from {source}", dataset.len());
    Ok(dataset)
}

/// Fetch a remote CSV and parse it.
pub fn load_url(url: &str) -> Result<SalaryDataset> {
    log::debug!("Fetching {url}");
    let body = reqwest::blocking::get(url)?.error_for_status()?.bytes()?;
    read_csv(body.as_ref())
}

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the survey column names (recommended)
/// * `.json`    – `[{ "ano": 2024, "cargo": "...", "usd": 120000, ... }, ...]`
/// * `.parquet` – one column per survey field
pub fn load_file(path: &Path) -> Result<SalaryDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => read_csv(std::fs::File::open(path)?),
        "json" => read_json(std::fs::File::open(path)?),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

/// Fail with the first required column `present` does not report.
fn require_columns(present: impl Fn(&str) -> bool) -> Result<()> {
    match columns::REQUIRED.into_iter().find(|column| !present(*column)) {
        Some(column) => Err(LoadError::missing(column)),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse CSV with a header row. Columns not used by the dashboard are ignored.
pub fn read_csv<R: Read>(reader: R) -> Result<SalaryDataset> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();
    require_columns(|column| headers.iter().any(|h| h == column))?;

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<SalaryRecord>().enumerate() {
        let record = result?;
        check_salary(row_no, record.salary_usd)?;
        records.push(record);
    }

    Ok(SalaryDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (the default `df.to_json(orient='records')`).
pub fn read_json<R: Read>(reader: R) -> Result<SalaryDataset> {
    let rows: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_reader(reader)?;
    for row in &rows {
        require_columns(|column| row.contains_key(column))?;
    }

    let mut records = Vec::with_capacity(rows.len());
    for (row_no, row) in rows.into_iter().enumerate() {
        let record: SalaryRecord = serde_json::from_value(serde_json::Value::Object(row))?;
        check_salary(row_no, record.salary_usd)?;
        records.push(record);
    }

    Ok(SalaryDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per survey field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`): integer columns may be Int32 or Int64,
/// `usd` may be integer or floating point.
fn load_parquet(path: &Path) -> Result<SalaryDataset> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    // Checked up front so a file without row groups still fails.
    let schema = builder.schema().clone();
    require_columns(|column| schema.index_of(column).is_ok())?;
    let reader = builder.build()?;

    let mut records = Vec::new();
    for batch in reader {
        let batch = batch?;
        records_from_batch(&batch, records.len(), &mut records)?;
    }

    Ok(SalaryDataset::from_records(records))
}

/// Append the rows of one record batch. `offset` is the global row number of
/// the batch's first row, used in error messages.
fn records_from_batch(batch: &RecordBatch, offset: usize, out: &mut Vec<SalaryRecord>) -> Result<()> {
    let year = column(batch, columns::YEAR)?;
    let seniority = column(batch, columns::SENIORITY)?;
    let contract = column(batch, columns::CONTRACT_TYPE)?;
    let size = column(batch, columns::COMPANY_SIZE)?;
    let role = column(batch, columns::ROLE_TITLE)?;
    let remote = column(batch, columns::REMOTE_TYPE)?;
    let iso3 = column(batch, columns::RESIDENCE_ISO3)?;
    let usd = column(batch, columns::SALARY_USD)?;

    for row in 0..batch.num_rows() {
        let row_no = offset + row;
        let record = SalaryRecord {
            year: extract_i64(year, row_no, row, columns::YEAR)?,
            seniority: extract_string(seniority, row_no, row, columns::SENIORITY)?,
            contract_type: extract_string(contract, row_no, row, columns::CONTRACT_TYPE)?,
            company_size: extract_string(size, row_no, row, columns::COMPANY_SIZE)?,
            role_title: extract_string(role, row_no, row, columns::ROLE_TITLE)?,
            remote_type: extract_string(remote, row_no, row, columns::REMOTE_TYPE)?,
            residence_country_code: extract_string(iso3, row_no, row, columns::RESIDENCE_ISO3)?,
            salary_usd: extract_f64(usd, row_no, row, columns::SALARY_USD)?,
        };
        check_salary(row_no, record.salary_usd)?;
        out.push(record);
    }
    Ok(())
}

// -- Arrow helpers --

fn column<'b>(batch: &'b RecordBatch, name: &str) -> Result<&'b ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| LoadError::missing(name))?;
    Ok(batch.column(idx))
}

fn not_null(col: &ArrayRef, row_no: usize, row: usize, name: &str) -> Result<()> {
    if col.is_null(row) {
        return Err(LoadError::invalid(row_no, name, "null value"));
    }
    Ok(())
}

fn extract_i64(col: &ArrayRef, row_no: usize, row: usize, name: &str) -> Result<i64> {
    not_null(col, row_no, row, name)?;
    if let Some(arr) = col.as_any().downcast_ref::<Int64Array>() {
        Ok(arr.value(row))
    } else if let Some(arr) = col.as_any().downcast_ref::<Int32Array>() {
        Ok(i64::from(arr.value(row)))
    } else {
        Err(LoadError::invalid(
            row_no,
            name,
            format!("expected integer column, got {:?}", col.data_type()),
        ))
    }
}

fn extract_f64(col: &ArrayRef, row_no: usize, row: usize, name: &str) -> Result<f64> {
    not_null(col, row_no, row, name)?;
    if let Some(arr) = col.as_any().downcast_ref::<Float64Array>() {
        Ok(arr.value(row))
    } else if let Some(arr) = col.as_any().downcast_ref::<Float32Array>() {
        Ok(f64::from(arr.value(row)))
    } else if let Some(arr) = col.as_any().downcast_ref::<Int64Array>() {
        Ok(arr.value(row) as f64)
    } else if let Some(arr) = col.as_any().downcast_ref::<Int32Array>() {
        Ok(f64::from(arr.value(row)))
    } else {
        Err(LoadError::invalid(
            row_no,
            name,
            format!("expected numeric column, got {:?}", col.data_type()),
        ))
    }
}

fn extract_string(col: &ArrayRef, row_no: usize, row: usize, name: &str) -> Result<String> {
    not_null(col, row_no, row, name)?;
    match col.data_type() {
        DataType::Utf8 => Ok(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        other => Err(LoadError::invalid(
            row_no,
            name,
            format!("expected string column, got {other:?}"),
        )),
    }
}

fn check_salary(row_no: usize, usd: f64) -> Result<()> {
    if !usd.is_finite() || usd < 0.0 {
        return Err(LoadError::invalid(
            row_no,
            columns::SALARY_USD,
            format!("salary must be a non-negative number, got {usd}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const CSV: &str = "\
ano,senioridade,contrato,cargo,salario,moeda,usd,residencia,remoto,empresa,tamanho_empresa,residencia_iso3
2025,senior,integral,Data Scientist,150000,USD,150000,US,remoto,US,media,USA
2024,junior,integral,Data Analyst,50000,EUR,54000,DE,presencial,DE,pequena,DEU
2024,pleno,freelancer,Data Engineer,90000,USD,90000.5,BR,hibrido,US,grande,BRA
";

    #[test]
    fn csv_ignores_extra_columns() {
        let ds = read_csv(CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        let first = &ds.records()[0];
        assert_eq!(first.year, 2025);
        assert_eq!(first.role_title, "Data Scientist");
        assert_eq!(first.residence_country_code, "USA");
        assert_eq!(ds.records()[2].salary_usd, 90000.5);
        assert_eq!(ds.observed().years.len(), 2);
    }

    #[test]
    fn csv_missing_column_is_reported() {
        let csv = "ano,senioridade,contrato,cargo,remoto,tamanho_empresa,residencia_iso3\n\
                   2024,senior,integral,X,remoto,media,USA\n";
        match read_csv(csv.as_bytes()) {
            Err(LoadError::MissingColumn { column }) => assert_eq!(column, "usd"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn csv_rejects_negative_salary() {
        let csv = "ano,senioridade,contrato,cargo,usd,remoto,tamanho_empresa,residencia_iso3\n\
                   2024,senior,integral,X,-5,remoto,media,USA\n";
        assert!(matches!(
            read_csv(csv.as_bytes()),
            Err(LoadError::InvalidValue { row: 0, .. })
        ));
    }

    #[test]
    fn json_records_round_trip_through_loader() {
        let json = r#"[
            {"ano": 2023, "senioridade": "senior", "contrato": "integral",
             "tamanho_empresa": "grande", "cargo": "ML Engineer", "remoto": "remoto",
             "residencia_iso3": "CAN", "usd": 175000, "moeda": "CAD"}
        ]"#;
        let ds = read_json(json.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].salary_usd, 175_000.0);
        assert_eq!(ds.records()[0].company_size, "grande");
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let mut tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(tmp, "{CSV}").unwrap();
        let ds = load_source(tmp.path().to_str().unwrap()).unwrap();
        assert_eq!(ds.len(), 3);

        let other = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        assert!(matches!(
            load_file(other.path()),
            Err(LoadError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn parquet_accepts_narrow_integer_columns() {
        use std::sync::Arc;

        use arrow::array::StringArray;
        use arrow::datatypes::{Field, Schema};
        use parquet::arrow::ArrowWriter;

        let text = |v: &str| -> ArrayRef { Arc::new(StringArray::from(vec![v, v])) };
        let schema = Arc::new(Schema::new(vec![
            Field::new(columns::YEAR, DataType::Int32, false),
            Field::new(columns::SENIORITY, DataType::Utf8, false),
            Field::new(columns::CONTRACT_TYPE, DataType::Utf8, false),
            Field::new(columns::COMPANY_SIZE, DataType::Utf8, false),
            Field::new(columns::ROLE_TITLE, DataType::Utf8, false),
            Field::new(columns::REMOTE_TYPE, DataType::Utf8, false),
            Field::new(columns::RESIDENCE_ISO3, DataType::Utf8, false),
            Field::new(columns::SALARY_USD, DataType::Int64, false),
        ]));
        let arrays: Vec<ArrayRef> = vec![
            Arc::new(Int32Array::from(vec![2023, 2024])),
            text("senior"),
            text("integral"),
            text("media"),
            text("Data Scientist"),
            text("remoto"),
            text("USA"),
            Arc::new(Int64Array::from(vec![100_000, 140_000])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), arrays).unwrap();

        let tmp = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(tmp.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(tmp.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[1].year, 2024);
        assert_eq!(ds.records()[1].salary_usd, 140_000.0);
        assert_eq!(ds.records()[0].residence_country_code, "USA");
    }

    #[test]
    fn json_missing_column_in_later_row() {
        let json = r#"[
            {"ano": 2023, "senioridade": "senior", "contrato": "integral",
             "tamanho_empresa": "grande", "cargo": "ML Engineer", "remoto": "remoto",
             "residencia_iso3": "CAN", "usd": 175000},
            {"ano": 2024, "senioridade": "junior", "contrato": "integral",
             "tamanho_empresa": "media", "cargo": "Data Analyst", "remoto": "remoto",
             "residencia_iso3": "BRA"}
        ]"#;
        match read_json(json.as_bytes()) {
            Err(LoadError::MissingColumn { column }) => assert_eq!(column, "usd"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn parquet_without_rows_still_checks_columns() {
        use std::sync::Arc;

        use arrow::datatypes::{Field, Schema};
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![Field::new(columns::YEAR, DataType::Int64, false)]));
        let tmp = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let writer = ArrowWriter::try_new(tmp.reopen().unwrap(), schema, None).unwrap();
        writer.close().unwrap();

        match load_file(tmp.path()) {
            Err(LoadError::MissingColumn { column }) => assert_eq!(column, columns::SENIORITY),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn unreachable_url_is_a_fetch_error() {
        // Port 9 (discard) is closed on loopback, so the connection is refused.
        match load_source("http://127.0.0.1:9/x.csv") {
            Err(LoadError::Fetch { url, .. }) => assert!(url.contains("127.0.0.1:9")),
            other => panic!("expected Fetch, got {other:?}"),
        }
    }
}
