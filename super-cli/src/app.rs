//! Wiring between command-line arguments and an [`EstimatorSession`].

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{Datelike, Local};
use super_core::{CarryOverStrategy, EstimatorSession, VisaCategory};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::csv_loader;
use crate::report::render_session;

/// Inputs for a one-shot estimate. Salaries and visa categories apply to
/// the years of the range in order.
#[derive(Debug, Clone, Default)]
pub struct EstimateRequest {
    pub arrival: Option<String>,
    pub departure: Option<String>,
    pub salaries: Vec<String>,
    pub visas: Vec<VisaCategory>,
    pub input: Option<PathBuf>,
}

pub fn current_year() -> i32 {
    Local::now().year()
}

/// A fresh session using the configured rates.
pub fn build_session(
    config: &AppConfig,
    current_year: i32,
    carry_over: CarryOverStrategy,
) -> Result<EstimatorSession> {
    let estimator = config.estimator().context("building estimator")?;
    Ok(EstimatorSession::new(current_year, estimator).with_carry_over(carry_over))
}

/// Applies a request to `session`: the CSV file first, then the range, then
/// the per-year values.
pub fn apply_request(
    session: &mut EstimatorSession,
    request: &EstimateRequest,
) -> Result<()> {
    if let Some(path) = &request.input {
        let records = csv_loader::load_from_file(path)
            .with_context(|| format!("loading earnings from '{}'", path.display()))?;
        csv_loader::apply_to_session(session, &records)?;
        info!(path = %path.display(), rows = records.len(), "earnings imported");
    }

    if let Some(arrival) = &request.arrival {
        session.set_arrival_year(arrival);
    }
    if let Some(departure) = &request.departure {
        session.set_departure_year(departure);
    }

    let years = session.records().len();
    if request.salaries.len() > years {
        bail!(
            "{} salaries given but the range {} to {} has {years} year(s)",
            request.salaries.len(),
            session.arrival_year(),
            session.departure_year()
        );
    }
    if request.visas.len() > years {
        bail!(
            "{} visa categories given but the range {} to {} has {years} year(s)",
            request.visas.len(),
            session.arrival_year(),
            session.departure_year()
        );
    }

    for (index, salary) in request.salaries.iter().enumerate() {
        session.set_salary(index, salary)?;
    }
    for (index, category) in request.visas.iter().enumerate() {
        session.set_visa_category(index, *category)?;
    }
    debug!(years, "request applied");
    Ok(())
}

/// Calculates and renders the report, or fails with the refusal notice.
pub fn run_estimate(
    session: &mut EstimatorSession,
    request: &EstimateRequest,
) -> Result<String> {
    apply_request(session, request)?;
    session.calculate()?;
    Ok(render_session(session))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use super_core::{SessionPhase, YearRange};

    use super::*;

    fn session() -> EstimatorSession {
        build_session(&AppConfig::default(), 2024, CarryOverStrategy::Positional).unwrap()
    }

    fn scenario_request() -> EstimateRequest {
        EstimateRequest {
            arrival: Some("2023".to_string()),
            departure: Some("2024".to_string()),
            salaries: vec!["50000".to_string(), "60000".to_string()],
            visas: vec![VisaCategory::Working, VisaCategory::Skilled],
            input: None,
        }
    }

    #[test]
    fn scenario_produces_report() {
        let mut s = session();

        let report = run_estimate(&mut s, &scenario_request()).unwrap();

        assert_eq!(s.phase(), SessionPhase::ShowingResults);
        assert_eq!(s.estimate().net_payout, dec!(4186.87));
        assert!(report.contains("$4,186.87"));
    }

    #[test]
    fn no_salary_is_refused_with_notice() {
        let mut s = session();

        let err = run_estimate(&mut s, &EstimateRequest::default()).unwrap_err();

        assert_eq!(err.to_string(), "Please enter at least one salary amount");
        assert_eq!(s.phase(), SessionPhase::Input);
    }

    #[test]
    fn too_many_salaries_is_an_error() {
        let mut s = session();
        let request = EstimateRequest {
            salaries: vec!["1".to_string(); 3],
            ..EstimateRequest::default()
        };

        let err = apply_request(&mut s, &request).unwrap_err();

        assert!(err.to_string().contains("3 salaries given"));
    }

    #[test]
    fn explicit_years_override_csv_range() {
        let dir = std::env::temp_dir().join("super-cli-app-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("history.csv");
        std::fs::write(&path, "year,salary\n2020,1000\n2021,2000\n").unwrap();
        let mut s = session();
        let request = EstimateRequest {
            departure: Some("2022".to_string()),
            input: Some(path),
            ..EstimateRequest::default()
        };

        apply_request(&mut s, &request).unwrap();

        assert_eq!(s.range(), YearRange::new(2020, 2022));
        assert_eq!(s.records()[1].salary, dec!(2000));
        assert_eq!(s.records()[2].salary, dec!(0));
    }

    #[test]
    fn missing_csv_names_the_file() {
        let mut s = session();
        let request = EstimateRequest {
            input: Some(PathBuf::from("/no/such/history.csv")),
            ..EstimateRequest::default()
        };

        let err = apply_request(&mut s, &request).unwrap_err();

        assert!(err.to_string().contains("/no/such/history.csv"));
    }
}
