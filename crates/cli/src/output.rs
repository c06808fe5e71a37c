use crate::error::CliError;
use engine_config::report::ExecutionReport;
use std::path::Path;

pub async fn write_report(report: &ExecutionReport, path: &Path) -> Result<(), CliError> {
    tokio::fs::write(path, report.to_json()?).await?;
    Ok(())
}

pub fn print_report(report: &ExecutionReport) -> Result<(), CliError> {
    println!("{}", report.to_json()?);
    Ok(())
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
