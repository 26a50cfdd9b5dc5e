use serde::{Deserialize, Serialize};

/// One day of energy figures for a single street light
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyReportRow {
    #[serde(rename = "report_date")]
    pub date: String,
    #[serde(rename = "street_light_id")]
    pub street_light_id: String,
    #[serde(rename = "energy_consumed_kwh")]
    pub consumed_kwh: f64,
    #[serde(rename = "energy_saved_kwh")]
    pub saved_kwh: f64,
}

impl EnergyReportRow {
    pub fn new(date: &str, street_light_id: &str, consumed_kwh: f64, saved_kwh: f64) -> Self {
        EnergyReportRow {
            date: date.to_string(),
            street_light_id: street_light_id.to_string(),
            consumed_kwh,
            saved_kwh,
        }
    }
}
