use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use salary_dashboard::data::model::columns;
use salary_dashboard::SalaryRecord;

const ROWS: usize = 2_000;

/// (role, base salary in USD)
const ROLES: [(&str, f64); 10] = [
    ("Data Scientist", 125_000.0),
    ("Data Engineer", 120_000.0),
    ("Data Analyst", 85_000.0),
    ("Machine Learning Engineer", 150_000.0),
    ("Analytics Engineer", 115_000.0),
    ("Research Scientist", 160_000.0),
    ("Data Architect", 145_000.0),
    ("BI Developer", 80_000.0),
    ("Applied Scientist", 170_000.0),
    ("Head of Data", 190_000.0),
];

/// (seniority, multiplier)
const SENIORITIES: [(&str, f64); 4] = [
    ("junior", 0.6),
    ("pleno", 0.85),
    ("senior", 1.1),
    ("executivo", 1.5),
];

const CONTRACTS: [&str; 4] = ["integral", "parcial", "contrato", "freelancer"];
const COMPANY_SIZES: [&str; 3] = ["pequena", "media", "grande"];
const REMOTE_TYPES: [&str; 3] = ["remoto", "presencial", "hibrido"];

/// (ISO3 code, cost-of-labour multiplier)
const COUNTRIES: [(&str, f64); 8] = [
    ("USA", 1.0),
    ("CAN", 0.8),
    ("GBR", 0.75),
    ("DEU", 0.7),
    ("ESP", 0.5),
    ("BRA", 0.35),
    ("IND", 0.25),
    ("AUS", 0.8),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Uniform pick from a non-empty slice.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let idx = (self.next_u64() % items.len() as u64) as usize;
        &items[idx]
    }
}

fn generate_records(rng: &mut SimpleRng) -> Vec<SalaryRecord> {
    (0..ROWS)
        .map(|_| {
            let &(role, base) = rng.pick(&ROLES);
            let &(seniority, level) = rng.pick(&SENIORITIES);
            let &(country, market) = rng.pick(&COUNTRIES);
            let year = 2020 + (rng.next_u64() % 6) as i64;
            // ~3% yearly drift from 2020 levels
            let drift = 1.0 + 0.03 * (year - 2020) as f64;
            let noise = rng.gauss(1.0, 0.15).max(0.3);

            SalaryRecord {
                year,
                seniority: seniority.to_string(),
                contract_type: rng.pick(&CONTRACTS).to_string(),
                company_size: rng.pick(&COMPANY_SIZES).to_string(),
                role_title: role.to_string(),
                remote_type: rng.pick(&REMOTE_TYPES).to_string(),
                residence_country_code: country.to_string(),
                salary_usd: (base * level * market * drift * noise).round(),
            }
        })
        .collect()
}

fn write_csv(path: &Path, records: &[SalaryRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV output")?;
    for record in records {
        writer.serialize(record).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

fn write_parquet(path: &Path, records: &[SalaryRecord]) -> Result<()> {
    let strings = |f: fn(&SalaryRecord) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(records.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new(columns::YEAR, DataType::Int64, false),
        Field::new(columns::SENIORITY, DataType::Utf8, false),
        Field::new(columns::CONTRACT_TYPE, DataType::Utf8, false),
        Field::new(columns::COMPANY_SIZE, DataType::Utf8, false),
        Field::new(columns::ROLE_TITLE, DataType::Utf8, false),
        Field::new(columns::REMOTE_TYPE, DataType::Utf8, false),
        Field::new(columns::RESIDENCE_ISO3, DataType::Utf8, false),
        Field::new(columns::SALARY_USD, DataType::Float64, false),
    ]));

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(records.iter().map(|r| r.year).collect::<Vec<_>>())),
        strings(|r| r.seniority.as_str()),
        strings(|r| r.contract_type.as_str()),
        strings(|r| r.company_size.as_str()),
        strings(|r| r.role_title.as_str()),
        strings(|r| r.remote_type.as_str()),
        strings(|r| r.residence_country_code.as_str()),
        Arc::new(Float64Array::from(records.iter().map(|r| r.salary_usd).collect::<Vec<_>>())),
    ];
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating Parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating Parquet writer")?;
    writer.write(&batch).context("writing Parquet batch")?;
    writer.close().context("closing Parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let records = generate_records(&mut rng);

    let csv_path = out_dir.join("sample_salaries.csv");
    let parquet_path = out_dir.join("sample_salaries.parquet");
    write_csv(&csv_path, &records)?;
    write_parquet(&parquet_path, &records)?;

    log::info!(
        "Wrote {} salary records to {} and {}",
        records.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
