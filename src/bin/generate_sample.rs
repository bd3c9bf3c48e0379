//! Write a synthetic `creditcard.csv` into the raw-data directory.
//!
//! Same columns as the Kaggle file (`Time, V1..V28, Amount, Class`),
//! roughly 2 % fraud. Fraud rows are shifted on V10/V12/V14 and a few
//! extreme values are injected so the outlier filter has work to do.

use anyhow::{Context, Result};
use fraud_prep::Settings;
use fraud_prep::data::model::{Record, Table, Value};
use fraud_prep::data::writer::save_file;

const ROWS: usize = 5000;
const FRAUD_RATE: f64 = 0.02;

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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
}

/// Mean of V<n> for fraud rows; zero for the rest.
fn fraud_shift(feature: usize) -> f64 {
    match feature {
        10 => -5.5,
        12 => -6.0,
        14 => -7.0,
        _ => 0.0,
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::resolve().context("resolving settings")?;
    let mut rng = SimpleRng::new(42);

    let mut columns = vec!["Time".to_string()];
    columns.extend((1..=28).map(|i| format!("V{i}")));
    columns.push("Amount".into());
    columns.push("Class".into());

    let mut records = Vec::with_capacity(ROWS);
    let mut time = 0.0_f64;
    for _ in 0..ROWS {
        let fraud = rng.next_f64() < FRAUD_RATE;
        time += (rng.next_f64() * 3.0).floor();

        let mut cells = Vec::with_capacity(columns.len());
        cells.push(Value::Float(time));
        for feature in 1..=28 {
            let (mean, sd) = if fraud {
                (fraud_shift(feature), 2.0)
            } else {
                (0.0, 1.0)
            };
            let mut v = rng.gauss(mean, sd);
            // occasional heavy tail
            if rng.next_f64() < 0.01 {
                v *= 8.0;
            }
            cells.push(Value::Float(v));
        }
        let amount = (rng.gauss(3.5, 1.2).exp() * 100.0).round() / 100.0;
        cells.push(Value::Float(amount));
        cells.push(Value::Integer(fraud as i64));
        records.push(Record { cells });
    }

    let table = Table::new(columns, records)?;
    let frauds = table.column_labels("Class")?.iter().filter(|&&c| c == 1).count();

    std::fs::create_dir_all(&settings.data_raw)
        .with_context(|| format!("creating {}", settings.data_raw.display()))?;
    let output = settings.raw_path();
    save_file(&table, &output)?;

    log::info!(
        "Wrote {} transactions ({frauds} fraud) to {}",
        table.len(),
        output.display()
    );
    Ok(())
}
