//! Inventory report export.

use std::{fs, path::Path};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lotledger_core::LotLedger;
use lotledger_domain::{LedgerSnapshot, OpenLot, Statistics, UsedLot};

use crate::errors::LotLedgerError;

/// Point-in-time copy of the derived inventory, ready to be written out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryReport {
    pub journal_id: Uuid,
    pub journal_name: String,
    pub generated_at: DateTime<Utc>,
    pub currency: String,
    pub open_lots: Vec<OpenLot>,
    pub used_lots: Vec<UsedLot>,
    pub statistics: ReportTotals,
}

/// Statistics plus the derived gain, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportTotals {
    pub acquisition_value: f64,
    pub orig_value: f64,
    pub sell_value: f64,
    pub realized_gain: f64,
    pub open_quantity: f64,
    pub sold_quantity: f64,
}

impl From<Statistics> for ReportTotals {
    fn from(stats: Statistics) -> Self {
        Self {
            acquisition_value: stats.acquisition_value,
            orig_value: stats.orig_value,
            sell_value: stats.sell_value,
            realized_gain: stats.realized_gain(),
            open_quantity: stats.open_quantity,
            sold_quantity: stats.sold_quantity,
        }
    }
}

impl InventoryReport {
    pub fn from_snapshot(
        journal_id: Uuid,
        journal_name: impl Into<String>,
        currency: impl Into<String>,
        snapshot: LedgerSnapshot,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            journal_id,
            journal_name: journal_name.into(),
            generated_at,
            currency: currency.into(),
            open_lots: snapshot.open_lots,
            used_lots: snapshot.used_lots,
            statistics: snapshot.statistics.into(),
        }
    }

    /// Builds a report from a single consistent read of `ledger`.
    pub fn from_ledger(ledger: &LotLedger, currency: impl Into<String>) -> Self {
        let (journal, snapshot) = ledger.journal_and_snapshot();
        Self::from_snapshot(journal.id, journal.name, currency, snapshot, Utc::now())
    }
}

/// Writes `report` as pretty JSON, creating parent directories as needed.
pub fn write_json_report(report: &InventoryReport, path: &Path) -> Result<(), LotLedgerError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    tracing::info!(path = %path.display(), "inventory report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[test]
    fn report_carries_unrounded_totals() {
        let at = NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let ledger = LotLedger::new("Report");
        ledger.record_purchase(3.0, 0.3333, at).unwrap();
        ledger.record_liquidation(1.0, 0.5, at).unwrap();

        let report = InventoryReport::from_ledger(&ledger, "USD");
        assert_eq!(report.open_lots.len(), 1);
        assert_eq!(report.used_lots.len(), 1);
        assert_eq!(report.statistics.orig_value, 0.3333);
        assert_eq!(report.statistics.realized_gain, 0.5 - 0.3333);

        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("report.json");
        write_json_report(&report, &path).unwrap();
        let parsed: InventoryReport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.journal_name, "Report");
        assert_eq!(parsed.used_lots, report.used_lots);
    }
}
