//! Price-alert records and their display join against enriched stocks.
//!
//! Alerts are data only; nothing here evaluates or triggers them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::format::{format_change_percent, format_price};
use crate::{EnrichedStock, Symbol, UtcDateTime, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    /// Fires when the price rises above the threshold.
    Upper,
    /// Fires when the price falls below the threshold.
    Lower,
}

impl AlertType {
    pub const fn operator(self) -> &'static str {
        match self {
            Self::Upper => ">",
            Self::Lower => "<",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCadence {
    #[default]
    Once,
    Daily,
    Weekly,
}

fn default_active() -> bool {
    true
}

/// A persisted price alert, supplied by the surrounding application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: String,
    pub symbol: Symbol,
    pub company: String,
    pub alert_name: String,
    pub alert_type: AlertType,
    pub threshold: f64,
    #[serde(default)]
    pub cadence: AlertCadence,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<UtcDateTime>,
    #[serde(default)]
    pub last_triggered: Option<UtcDateTime>,
}

impl AlertRecord {
    pub fn new(
        id: impl Into<String>,
        symbol: Symbol,
        company: impl Into<String>,
        alert_name: impl Into<String>,
        alert_type: AlertType,
        threshold: f64,
        cadence: AlertCadence,
    ) -> Result<Self, ValidationError> {
        let record = Self {
            id: id.into(),
            symbol,
            company: company.into().trim().to_owned(),
            alert_name: alert_name.into().trim().to_owned(),
            alert_type,
            threshold,
            cadence,
            is_active: true,
            created_at: None,
            last_triggered: None,
        };
        record.validate()?;
        Ok(record)
    }

    /// Rejects non-finite or non-positive thresholds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.threshold.is_finite() && self.threshold > 0.0 {
            Ok(())
        } else {
            Err(ValidationError::InvalidThreshold {
                value: self.threshold.to_string(),
            })
        }
    }

    /// e.g. `"Price > $200.00"`.
    pub fn condition_text(&self) -> String {
        format!(
            "Price {} {}",
            self.alert_type.operator(),
            format_price(Some(self.threshold))
        )
    }
}

/// An alert with the live figures of its symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedAlert {
    #[serde(flatten)]
    pub alert: AlertRecord,
    pub current_price: Option<f64>,
    pub change_percent: Option<f64>,
    pub price_formatted: String,
    pub change_formatted: String,
    pub threshold_formatted: String,
    pub condition: String,
}

/// Joins each alert with the enriched stock of its symbol, keeping alert
/// order. Alerts on symbols without a stock record show `N/A` figures.
pub fn enrich_alerts(alerts: &[AlertRecord], stocks: &[EnrichedStock]) -> Vec<EnrichedAlert> {
    let by_symbol: HashMap<&Symbol, &EnrichedStock> =
        stocks.iter().map(|stock| (&stock.symbol, stock)).collect();

    alerts
        .iter()
        .map(|alert| {
            let stock = by_symbol.get(&alert.symbol);
            let current_price = stock.and_then(|s| s.current_price);
            let change_percent = stock.and_then(|s| s.change_percent);
            EnrichedAlert {
                current_price,
                change_percent,
                price_formatted: format_price(current_price),
                change_formatted: format_change_percent(change_percent),
                threshold_formatted: format_price(Some(alert.threshold)),
                condition: alert.condition_text(),
                alert: alert.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(raw: &str) -> Symbol {
        Symbol::parse(raw).expect("valid")
    }

    fn stock(raw: &str, price: f64) -> EnrichedStock {
        EnrichedStock {
            symbol: symbol(raw),
            company: raw.to_owned(),
            added_at: None,
            current_price: Some(price),
            change_percent: Some(1.5),
            price_formatted: format_price(Some(price)),
            change_formatted: format_change_percent(Some(1.5)),
            market_cap: String::from("N/A"),
            pe_ratio: String::from("N/A"),
        }
    }

    #[test]
    fn threshold_must_be_positive_and_finite() {
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let result = AlertRecord::new(
                "a1",
                symbol("AAPL"),
                "Apple",
                "Breakout",
                AlertType::Upper,
                bad,
                AlertCadence::Once,
            );
            assert!(matches!(result, Err(ValidationError::InvalidThreshold { .. })));
        }
    }

    #[test]
    fn condition_text_uses_operator_and_price_format() {
        let upper = AlertRecord::new(
            "a1",
            symbol("AAPL"),
            "Apple",
            "Breakout",
            AlertType::Upper,
            200.0,
            AlertCadence::Daily,
        )
        .expect("valid");
        assert_eq!(upper.condition_text(), "Price > $200.00");

        let lower = AlertRecord {
            alert_type: AlertType::Lower,
            threshold: 1_500.5,
            ..upper
        };
        assert_eq!(lower.condition_text(), "Price < $1,500.50");
    }

    #[test]
    fn alerts_join_stocks_by_symbol() {
        let alerts = vec![
            AlertRecord::new("a1", symbol("TSLA"), "Tesla", "Dip", AlertType::Lower, 180.0, AlertCadence::Once)
                .expect("valid"),
            AlertRecord::new("a2", symbol("NVDA"), "Nvidia", "Moon", AlertType::Upper, 1_000.0, AlertCadence::Weekly)
                .expect("valid"),
        ];
        let stocks = vec![stock("TSLA", 201.25)];

        let enriched = enrich_alerts(&alerts, &stocks);

        assert_eq!(enriched[0].price_formatted, "$201.25");
        assert_eq!(enriched[0].change_formatted, "+1.50%");
        assert_eq!(enriched[1].price_formatted, "N/A");
        assert_eq!(enriched[1].threshold_formatted, "$1,000.00");
    }

    #[test]
    fn serde_defaults_cadence_and_activity() {
        let alert: AlertRecord = serde_json::from_str(
            r#"{"id": "x", "symbol": "amd", "company": "AMD", "alert_name": "n", "alert_type": "upper", "threshold": 150}"#,
        )
        .expect("parse");
        assert_eq!(alert.cadence, AlertCadence::Once);
        assert!(alert.is_active);
        assert_eq!(alert.symbol.as_str(), "AMD");
    }
}
