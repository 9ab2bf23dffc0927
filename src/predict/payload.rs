use crate::wizard::WizardState;
use serde::Serialize;

/// Payload keys in wire order.
pub(crate) const PAYLOAD_KEYS: [&str; 17] = [
    "Store",
    "Dept",
    "IsHoliday",
    "Temperature",
    "Fuel_Price",
    "MarkDown1",
    "MarkDown2",
    "MarkDown3",
    "MarkDown4",
    "MarkDown5",
    "CPI",
    "Unemployment",
    "Type",
    "Size",
    "Year",
    "Month",
    "Week",
];

/// Flat numeric record for one inference call.
///
/// Unparseable text becomes NaN rather than an error; `serde_json` writes
/// non-finite floats as `null`, so every key is still present on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct PredictionPayload {
    #[serde(rename = "Store")]
    pub(crate) store: f64,
    #[serde(rename = "Dept")]
    pub(crate) dept: f64,
    #[serde(rename = "IsHoliday")]
    pub(crate) is_holiday: f64,
    #[serde(rename = "Temperature")]
    pub(crate) temperature: f64,
    #[serde(rename = "Fuel_Price")]
    pub(crate) fuel_price: f64,
    #[serde(rename = "MarkDown1")]
    pub(crate) markdown1: f64,
    #[serde(rename = "MarkDown2")]
    pub(crate) markdown2: f64,
    #[serde(rename = "MarkDown3")]
    pub(crate) markdown3: f64,
    #[serde(rename = "MarkDown4")]
    pub(crate) markdown4: f64,
    #[serde(rename = "MarkDown5")]
    pub(crate) markdown5: f64,
    #[serde(rename = "CPI")]
    pub(crate) cpi: f64,
    #[serde(rename = "Unemployment")]
    pub(crate) unemployment: f64,
    #[serde(rename = "Type")]
    pub(crate) store_type: f64,
    #[serde(rename = "Size")]
    pub(crate) size: f64,
    #[serde(rename = "Year")]
    pub(crate) year: f64,
    #[serde(rename = "Month")]
    pub(crate) month: f64,
    #[serde(rename = "Week")]
    pub(crate) week: f64,
}

impl PredictionPayload {
    pub(crate) fn from_state(state: &WizardState) -> Self {
        let number = |name: &str| parse_number(state.value(name).unwrap_or_default());
        Self {
            store: number("Store"),
            dept: number("Dept"),
            is_holiday: if state.is_holiday() { 1.0 } else { 0.0 },
            temperature: number("Temperature"),
            fuel_price: number("Fuel_Price"),
            markdown1: number("MarkDown1"),
            markdown2: number("MarkDown2"),
            markdown3: number("MarkDown3"),
            markdown4: number("MarkDown4"),
            markdown5: number("MarkDown5"),
            cpi: number("CPI"),
            unemployment: number("Unemployment"),
            store_type: number("Type"),
            size: number("Size"),
            year: number("Year"),
            month: number("Month"),
            week: number("Week"),
        }
    }

    /// Key/value pairs in wire order.
    pub(crate) fn entries(&self) -> [(&'static str, f64); 17] {
        let values = [
            self.store,
            self.dept,
            self.is_holiday,
            self.temperature,
            self.fuel_price,
            self.markdown1,
            self.markdown2,
            self.markdown3,
            self.markdown4,
            self.markdown5,
            self.cpi,
            self.unemployment,
            self.store_type,
            self.size,
            self.year,
            self.month,
            self.week,
        ];
        std::array::from_fn(|index| (PAYLOAD_KEYS[index], values[index]))
    }
}

/// The whole trimmed text must be a number; a numeric prefix such as
/// `"12abc"` does not count.
fn parse_number(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}
