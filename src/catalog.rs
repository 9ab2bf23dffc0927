//! Static field schema for the forecast wizard.
//!
//! Group order is step order: the wizard shows `FIELD_GROUPS[step]`. Field
//! names double as the payload keys sent to the prediction service, so they
//! must stay unique across every group.
use serde::Serialize;
use std::collections::BTreeMap;

/// One named input with its display metadata and default text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct FieldDefinition {
    pub(crate) name: &'static str,
    pub(crate) label: &'static str,
    pub(crate) tooltip: &'static str,
    pub(crate) default: &'static str,
}

/// A wizard step: a titled, ordered set of fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct FieldGroup {
    pub(crate) title: &'static str,
    pub(crate) icon: &'static str,
    pub(crate) fields: &'static [FieldDefinition],
}

const fn field(
    name: &'static str,
    label: &'static str,
    tooltip: &'static str,
    default: &'static str,
) -> FieldDefinition {
    FieldDefinition {
        name,
        label,
        tooltip,
        default,
    }
}

pub(crate) const FIELD_GROUPS: &[FieldGroup] = &[
    FieldGroup {
        title: "Store Information",
        icon: "store",
        fields: &[
            field("Store", "Store ID", "Unique identifier for the store (1-45)", "1"),
            field("Dept", "Department", "Department number within the store", "1"),
            field("Type", "Store Type", "Type of store (A=1, B=2, C=3)", "1"),
            field("Size", "Store Size", "Size of the store in square feet", "151315"),
        ],
    },
    FieldGroup {
        title: "Date & Time",
        icon: "calendar",
        fields: &[
            field("Year", "Year", "Year of the record", "2024"),
            field("Month", "Month", "Month of the year (1-12)", "12"),
            field("Week", "Week", "Week of the year (1-52)", "51"),
        ],
    },
    FieldGroup {
        title: "Economic Indicators",
        icon: "dollar-sign",
        fields: &[
            field(
                "CPI",
                "CPI",
                "Consumer Price Index - measures inflation",
                "211.096",
            ),
            field(
                "Unemployment",
                "Unemployment %",
                "Unemployment rate in the area",
                "8.106",
            ),
            field(
                "Fuel_Price",
                "Fuel Price",
                "Average fuel price in the region",
                "2.572",
            ),
        ],
    },
    FieldGroup {
        title: "Weather & Environment",
        icon: "thermometer",
        fields: &[field(
            "Temperature",
            "Temperature (°F)",
            "Average temperature in Fahrenheit",
            "42.31",
        )],
    },
    FieldGroup {
        title: "Promotional Markdowns",
        icon: "bar-chart",
        fields: &[
            field("MarkDown1", "MarkDown 1", "Promotional markdown amount 1", "0"),
            field("MarkDown2", "MarkDown 2", "Promotional markdown amount 2", "0"),
            field("MarkDown3", "MarkDown 3", "Promotional markdown amount 3", "0"),
            field("MarkDown4", "MarkDown 4", "Promotional markdown amount 4", "0"),
            field("MarkDown5", "MarkDown 5", "Promotional markdown amount 5", "0"),
        ],
    },
];

pub(crate) fn groups() -> &'static [FieldGroup] {
    FIELD_GROUPS
}

pub(crate) fn group_count() -> usize {
    FIELD_GROUPS.len()
}

/// All fields flattened in step order.
pub(crate) fn all_fields() -> impl Iterator<Item = &'static FieldDefinition> {
    FIELD_GROUPS.iter().flat_map(|group| group.fields.iter())
}

pub(crate) fn field_names() -> Vec<&'static str> {
    all_fields().map(|field| field.name).collect()
}

pub(crate) fn find(name: &str) -> Option<&'static FieldDefinition> {
    all_fields().find(|field| field.name == name)
}

/// Fresh name -> default mapping covering the full key set.
pub(crate) fn defaults() -> BTreeMap<String, String> {
    all_fields()
        .map(|field| (field.name.to_string(), field.default.to_string()))
        .collect()
}
