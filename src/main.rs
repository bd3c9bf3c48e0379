use anyhow::{Context, Result};
use fraud_prep::{Settings, generate};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::resolve().context("resolving settings")?;
    match generate(&settings) {
        Ok(Some(report)) => {
            log::info!(
                "Wrote {} of {} rows to {}",
                report.rows_out,
                report.rows_in,
                report.output.display()
            );
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => {
            log::error!("Failed to prepare dataset: {e:#}");
            Err(e)
        }
    }
}
