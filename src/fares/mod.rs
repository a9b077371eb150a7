//! Fare-rule extraction over an upstream pricing payload.
//!
//! The payload shape differs between upstream responses, so every lookup is a
//! list of candidate JSON pointers tried in order. Nothing here fails: a
//! missing or oddly shaped branch simply yields no value.

use serde::Serialize;
use serde_json::Value;

/// Candidate locations of the rules object, first match wins.
pub const RULES_LOCATIONS: &[&str] = &[
    "/FareInfo/0/TPA_Extensions/Rules",
    "/FareInfos/FareInfo/0/TPA_Extensions/Rules",
];

/// Candidate locations of the fare basis code list.
pub const FARE_BASIS_LOCATIONS: &[&str] = &[
    "/PTC_FareBreakdowns/PTC_FareBreakdown/0/FareBasisCodes/FareBasisCode",
    "/PTC_FareBreakdowns/PTC_FareBreakdown/FareBasisCodes/FareBasisCode",
];

/// Field names that may carry the code when an entry is an object.
pub const FARE_BASIS_CODE_FIELDS: &[&str] = &["content", "FareBasisCode"];

const CANCELLATION_FIELD: &str = "Cancellation";
const DATE_CHANGE_FIELD: &str = "DateChange";
const NO_SHOW_FIELD: &str = "NoShow";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FareRules {
    pub cancellation: Option<Value>,
    pub date_change: Option<Value>,
    pub no_show: Option<Value>,
}

impl FareRules {
    /// All-null triple; the UI shows its standard "rules unavailable" text.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.cancellation.is_none() && self.date_change.is_none() && self.no_show.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFareRules {
    pub rules: FareRules,
    pub fare_basis_codes: Vec<String>,
}

pub fn extract(pricing_info: &Value) -> ExtractedFareRules {
    ExtractedFareRules {
        rules: extract_rules(pricing_info),
        fare_basis_codes: extract_fare_basis_codes(pricing_info),
    }
}

pub fn extract_rules(pricing_info: &Value) -> FareRules {
    let Some(rules) = RULES_LOCATIONS
        .iter()
        .find_map(|pointer| pricing_info.pointer(pointer).filter(|v| v.is_object()))
    else {
        return FareRules::unavailable();
    };

    let field = |name: &str| rules.get(name).filter(|v| !v.is_null()).cloned();
    let extracted = FareRules {
        cancellation: field(CANCELLATION_FIELD),
        date_change: field(DATE_CHANGE_FIELD),
        no_show: field(NO_SHOW_FIELD),
    };

    if extracted.is_empty() {
        FareRules::unavailable()
    } else {
        extracted
    }
}

pub fn extract_fare_basis_codes(pricing_info: &Value) -> Vec<String> {
    let Some(entries) = FARE_BASIS_LOCATIONS
        .iter()
        .find_map(|pointer| pricing_info.pointer(pointer).filter(|v| !v.is_null()))
    else {
        return Vec::new();
    };

    match entries {
        Value::Array(items) => items.iter().filter_map(fare_basis_code).collect(),
        single => fare_basis_code(single).into_iter().collect(),
    }
}

fn fare_basis_code(entry: &Value) -> Option<String> {
    match entry {
        Value::String(code) => Some(code.clone()),
        Value::Object(fields) => FARE_BASIS_CODE_FIELDS
            .iter()
            .find_map(|name| fields.get(*name).and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_payload_yields_nulls_and_no_codes() {
        let extracted = extract(&json!({}));
        assert_eq!(extracted.rules, FareRules::unavailable());
        assert!(extracted.fare_basis_codes.is_empty());

        let body = serde_json::to_value(&extracted).unwrap();
        assert_eq!(body["rules"], json!({ "cancellation": null, "dateChange": null, "noShow": null }));
        assert_eq!(body["fareBasisCodes"], json!([]));
    }

    #[test]
    fn reads_rules_from_primary_location() {
        let payload = json!({
            "FareInfo": [{
                "TPA_Extensions": {
                    "Rules": {
                        "Cancellation": { "Amount": 2500, "CurrencyCode": "BDT" },
                        "NoShow": { "Amount": 5000 }
                    }
                }
            }]
        });

        let rules = extract_rules(&payload);
        assert_eq!(rules.cancellation, Some(json!({ "Amount": 2500, "CurrencyCode": "BDT" })));
        assert_eq!(rules.date_change, None);
        assert_eq!(rules.no_show, Some(json!({ "Amount": 5000 })));
    }

    #[test]
    fn falls_back_to_alternate_location() {
        let payload = json!({
            "FareInfos": { "FareInfo": [{ "TPA_Extensions": { "Rules": { "DateChange": { "Allowed": true } } } }] }
        });

        let rules = extract_rules(&payload);
        assert_eq!(rules.date_change, Some(json!({ "Allowed": true })));
        assert!(rules.cancellation.is_none());
    }

    #[test]
    fn primary_location_wins_when_both_present() {
        let payload = json!({
            "FareInfo": [{ "TPA_Extensions": { "Rules": { "Cancellation": "primary" } } }],
            "FareInfos": { "FareInfo": [{ "TPA_Extensions": { "Rules": { "Cancellation": "alternate" } } }] }
        });
        assert_eq!(extract_rules(&payload).cancellation, Some(json!("primary")));
    }

    #[test]
    fn rules_object_without_known_fields_is_unavailable() {
        let payload = json!({ "FareInfo": [{ "TPA_Extensions": { "Rules": { "Other": 1, "NoShow": null } } }] });
        assert!(extract_rules(&payload).is_empty());
    }

    #[test]
    fn fare_basis_codes_accept_strings_and_both_object_shapes() {
        let payload = json!({
            "PTC_FareBreakdowns": {
                "PTC_FareBreakdown": [{
                    "FareBasisCodes": {
                        "FareBasisCode": [
                            "YOWBD",
                            { "content": "MLOWBD", "BookingCode": "M" },
                            { "FareBasisCode": "KPROMO" },
                            { "BookingCode": "Q" },
                            42
                        ]
                    }
                }]
            }
        });

        assert_eq!(extract_fare_basis_codes(&payload), vec!["YOWBD", "MLOWBD", "KPROMO"]);
    }

    #[test]
    fn single_breakdown_object_is_supported() {
        let payload = json!({
            "PTC_FareBreakdowns": {
                "PTC_FareBreakdown": { "FareBasisCodes": { "FareBasisCode": { "content": "TSAVER" } } }
            }
        });
        assert_eq!(extract_fare_basis_codes(&payload), vec!["TSAVER"]);
    }

    #[test]
    fn non_object_payload_extracts_nothing() {
        let extracted = extract(&json!("not a pricing payload"));
        assert!(extracted.rules.is_empty());
        assert!(extracted.fare_basis_codes.is_empty());
    }
}
