//! Input checks applied before any journal mutation.

use lotledger_domain::EventDraft;

use crate::CoreError;

pub fn validate_quantity(quantity: f64) -> Result<(), CoreError> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(CoreError::InvalidInput(format!(
            "quantity must be a positive number, got {quantity}"
        )));
    }
    Ok(())
}

pub fn validate_price(label: &str, price: f64) -> Result<(), CoreError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(CoreError::InvalidInput(format!(
            "{label} must be a positive number, got {price}"
        )));
    }
    Ok(())
}

/// Rejects drafts with non-positive or non-finite quantity or price.
pub fn validate_draft(draft: &EventDraft) -> Result<(), CoreError> {
    validate_quantity(draft.quantity())?;
    let label = match draft {
        EventDraft::Purchase { .. } => "unit price",
        EventDraft::Liquidation { .. } => "selling price",
    };
    validate_price(label, draft.price())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn rejects_non_positive_and_non_finite_values() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(validate_draft(&EventDraft::purchase(1.0, 2.0, ts)).is_ok());
        assert!(validate_draft(&EventDraft::purchase(0.0, 2.0, ts)).is_err());
        assert!(validate_draft(&EventDraft::purchase(1.0, -2.0, ts)).is_err());
        assert!(validate_draft(&EventDraft::liquidation(f64::NAN, 2.0, ts)).is_err());

        let err = validate_draft(&EventDraft::liquidation(1.0, f64::INFINITY, ts)).unwrap_err();
        assert!(err.to_string().contains("selling price"), "{err}");
    }
}
