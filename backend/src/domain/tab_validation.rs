//! Tab validation: turns untyped input into a tab the calculator can trust.
//!
//! Raw input (form values, a decoded share link, an API body) is checked in
//! two passes:
//!
//! 1. **Shape**: every field is present with the right type. Amounts accept
//!    numbers or numeric-looking strings, `tipBeforeTax` accepts booleans or
//!    `"true"`/`"false"`. All type problems are reported together.
//! 2. **Rules**: once the input is a typed [`Tab`], every business rule is
//!    checked and all violations are reported together: names present and
//!    unique, amounts non-negative, each item split by at least one person,
//!    every item splitter declared as a participant, every participant on at
//!    least one item, and payment details present when a payment type is set.
//!
//! Names are matched exactly (case-sensitive).

use std::collections::HashSet;

use serde_json::{Map, Value};
use shared::{DescriptionType, Item, PathSegment, SplitterRef, Tab, TabDescription};

use crate::domain::models::validation::{
    issue_path, IssueCollector, TabValidationError, ValidationErrors,
};
use crate::domain::payment::{is_payment_app, is_payment_handle};

pub const NAME_REQUIRED: &str = "Name must be at least 1 character long.";
pub const NAMES_NOT_UNIQUE: &str = "Names must be unique";
pub const NEGATIVE_AMOUNT: &str = "Dollar amount must not be negative";
pub const NON_FINITE_AMOUNT: &str = "Dollar amount must be a finite number";
pub const NO_ITEMS: &str = "Must have at least one item";
pub const NO_SPLITTERS: &str = "Must have at least one person splitting the tab";
pub const NO_ITEM_SPLITTERS: &str = "Each item must be split by at least one person";
pub const UNKNOWN_ITEM_SPLITTER: &str =
    "Every person splitting an item must be in the main 'splitters' list.";
pub const UNASSIGNED_SPLITTER: &str =
    "Every person in the 'splitters' list must be assigned to at least one item.";
pub const DETAILS_REQUIRED: &str = "Details are required when type is not None";
pub const DETAILS_FORBIDDEN_CHARS: &str = "Details must not include @ or $";
pub const DETAILS_NOT_A_HANDLE: &str =
    "Payment handles may only contain letters, numbers, '.', '-' and '_'";

/// Top-level fields without which the input cannot be a tab at all
const REQUIRED_FIELDS: [&str; 5] = ["tabName", "taxAmount", "tipAmount", "items", "splitters"];

/// Validate raw input and produce a typed, invariant-satisfying tab.
pub fn validate_tab(raw: &Value) -> Result<Tab, TabValidationError> {
    let object = raw
        .as_object()
        .ok_or_else(|| TabValidationError::Malformed("expected a JSON object".to_string()))?;

    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| object.get(*field).map_or(true, Value::is_null))
        .collect();
    if !missing.is_empty() {
        return Err(TabValidationError::Malformed(format!(
            "missing required field(s): {}",
            missing.join(", ")
        )));
    }

    let tab = read_tab(object)?;
    Ok(validate_tab_struct(tab)?)
}

/// Check the business rules of an already typed tab.
pub fn validate_tab_struct(tab: Tab) -> Result<Tab, ValidationErrors> {
    let mut issues = IssueCollector::default();
    check_tab_rules(&tab, &mut issues);
    issues.into_result(tab)
}

fn read_tab(object: &Map<String, Value>) -> Result<Tab, ValidationErrors> {
    let mut issues = IssueCollector::default();

    let tab_name = read_string(&object["tabName"], issue_path!["tabName"], &mut issues);
    let tab_description = read_description(object.get("tabDescription"), &mut issues);
    let tax_amount = read_amount(&object["taxAmount"], issue_path!["taxAmount"], &mut issues);
    let tip_before_tax = read_flag(object.get("tipBeforeTax"), &mut issues);
    let tip_amount = read_amount(&object["tipAmount"], issue_path!["tipAmount"], &mut issues);
    let items = read_items(&object["items"], &mut issues);
    let splitters = read_splitter_refs(&object["splitters"], issue_path!["splitters"], &mut issues);

    match (tab_name, tax_amount, tip_amount, items, splitters) {
        (Some(tab_name), Some(tax_amount), Some(tip_amount), Some(items), Some(splitters)) => {
            issues.into_result(Tab {
                tab_name,
                tab_description,
                tax_amount,
                tip_before_tax,
                tip_amount,
                items,
                splitters,
            })
        }
        _ => Err(issues.into_errors()),
    }
}

fn read_string(value: &Value, path: Vec<PathSegment>, issues: &mut IssueCollector) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        _ => {
            issues.push(path, "Expected a string");
            None
        }
    }
}

/// Numbers pass through; numeric-looking strings are coerced.
fn read_amount(value: &Value, path: Vec<PathSegment>, issues: &mut IssueCollector) -> Option<f64> {
    let amount = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    if amount.is_none() {
        issues.push(path, "Expected a number");
    }
    amount
}

fn read_flag(value: Option<&Value>, issues: &mut IssueCollector) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) if text == "true" => true,
        Some(Value::String(text)) if text == "false" => false,
        Some(_) => {
            issues.push(issue_path!["tipBeforeTax"], "Expected a boolean");
            true
        }
    }
}

fn read_description(value: Option<&Value>, issues: &mut IssueCollector) -> TabDescription {
    let object = match value {
        None | Some(Value::Null) => return TabDescription::default(),
        Some(Value::Object(object)) => object,
        Some(_) => {
            issues.push(issue_path!["tabDescription"], "Expected an object");
            return TabDescription::default();
        }
    };

    let kind = match object.get("type") {
        None | Some(Value::Null) => DescriptionType::None,
        Some(Value::String(name)) => DescriptionType::from_wire_name(name).unwrap_or_else(|| {
            issues.push(
                issue_path!["tabDescription", "type"],
                format!("Unknown description type '{}'", name),
            );
            DescriptionType::None
        }),
        Some(_) => {
            issues.push(issue_path!["tabDescription", "type"], "Expected a string");
            DescriptionType::None
        }
    };

    let details = match object.get("details") {
        None | Some(Value::Null) => None,
        Some(value) => read_string(value, issue_path!["tabDescription", "details"], issues),
    };

    TabDescription { kind, details }
}

fn read_items(value: &Value, issues: &mut IssueCollector) -> Option<Vec<Item>> {
    let Value::Array(entries) = value else {
        issues.push(issue_path!["items"], "Expected an array");
        return None;
    };

    let mut items = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let Value::Object(object) = entry else {
            issues.push(issue_path!["items", index], "Expected an object");
            continue;
        };

        let name = match object.get("name") {
            Some(value) => read_string(value, issue_path!["items", index, "name"], issues),
            None => {
                issues.push(issue_path!["items", index, "name"], "Required");
                None
            }
        };
        let price = match object.get("price") {
            Some(value) => read_amount(value, issue_path!["items", index, "price"], issues),
            None => {
                issues.push(issue_path!["items", index, "price"], "Required");
                None
            }
        };
        let splitters = match object.get("splitters") {
            Some(value) => {
                read_splitter_refs(value, issue_path!["items", index, "splitters"], issues)
            }
            None => {
                issues.push(issue_path!["items", index, "splitters"], "Required");
                None
            }
        };

        if let (Some(name), Some(price), Some(splitters)) = (name, price, splitters) {
            items.push(Item {
                name,
                price,
                splitters,
            });
        }
    }
    Some(items)
}

fn read_splitter_refs(
    value: &Value,
    path: Vec<PathSegment>,
    issues: &mut IssueCollector,
) -> Option<Vec<SplitterRef>> {
    let Value::Array(entries) = value else {
        issues.push(path, "Expected an array");
        return None;
    };

    let mut splitters = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let mut entry_path = path.clone();
        entry_path.push(index.into());

        match entry.get("name") {
            Some(name) => {
                entry_path.push("name".into());
                if let Some(name) = read_string(name, entry_path, issues) {
                    splitters.push(SplitterRef { name });
                }
            }
            None => issues.push(entry_path, "Expected an object with a name"),
        }
    }
    Some(splitters)
}

fn check_tab_rules(tab: &Tab, issues: &mut IssueCollector) {
    check_name(&tab.tab_name, issue_path!["tabName"], issues);
    check_description(&tab.tab_description, issues);
    check_amount(tab.tax_amount, issue_path!["taxAmount"], issues);
    check_amount(tab.tip_amount, issue_path!["tipAmount"], issues);

    if tab.items.is_empty() {
        issues.push(issue_path!["items"], NO_ITEMS);
    }
    for (index, item) in tab.items.iter().enumerate() {
        check_name(&item.name, issue_path!["items", index, "name"], issues);
        check_amount(item.price, issue_path!["items", index, "price"], issues);
        if item.splitters.is_empty() {
            issues.push(issue_path!["items", index, "splitters"], NO_ITEM_SPLITTERS);
        }
        for (position, splitter) in item.splitters.iter().enumerate() {
            check_name(
                &splitter.name,
                issue_path!["items", index, "splitters", position, "name"],
                issues,
            );
        }
        if !all_unique(item.splitters.iter().map(|splitter| splitter.name.as_str())) {
            issues.push(issue_path!["items", index, "splitters"], NAMES_NOT_UNIQUE);
        }
    }
    if !all_unique(tab.items.iter().map(|item| item.name.as_str())) {
        issues.push(issue_path!["items"], NAMES_NOT_UNIQUE);
    }

    if tab.splitters.is_empty() {
        issues.push(issue_path!["splitters"], NO_SPLITTERS);
    }
    for (index, splitter) in tab.splitters.iter().enumerate() {
        check_name(&splitter.name, issue_path!["splitters", index, "name"], issues);
    }
    if !all_unique(tab.splitters.iter().map(|splitter| splitter.name.as_str())) {
        issues.push(issue_path!["splitters"], NAMES_NOT_UNIQUE);
    }

    check_splitter_assignments(
        &tab.items,
        tab.splitters.iter().map(|splitter| splitter.name.as_str()),
        issues,
    );
}

/// Cross-checks between item splitters and the participant list. Each side
/// is only checked when the other side is non-empty, so an empty list
/// reports once instead of flagging every entry on the other side.
pub(crate) fn check_splitter_assignments<'a>(
    items: &[Item],
    participants: impl IntoIterator<Item = &'a str> + Clone,
    issues: &mut IssueCollector,
) {
    let declared: HashSet<&str> = participants.clone().into_iter().collect();

    if !declared.is_empty() {
        for (index, item) in items.iter().enumerate() {
            if item
                .splitters
                .iter()
                .any(|splitter| !declared.contains(splitter.name.as_str()))
            {
                issues.push(issue_path!["items", index, "splitters"], UNKNOWN_ITEM_SPLITTER);
            }
        }
    }

    if !items.is_empty() {
        let assigned: HashSet<&str> = items
            .iter()
            .flat_map(|item| item.splitters.iter().map(|splitter| splitter.name.as_str()))
            .collect();
        for (index, name) in participants.into_iter().enumerate() {
            if !assigned.contains(name) {
                issues.push(issue_path!["splitters", index], UNASSIGNED_SPLITTER);
            }
        }
    }
}

fn check_description(description: &TabDescription, issues: &mut IssueCollector) {
    let details = description.details.as_deref().unwrap_or("");
    if details.contains('@') || details.contains('$') {
        issues.push(issue_path!["tabDescription", "details"], DETAILS_FORBIDDEN_CHARS);
    } else if is_payment_app(description.kind)
        && !details.trim().is_empty()
        && !is_payment_handle(details.trim())
    {
        issues.push(issue_path!["tabDescription", "details"], DETAILS_NOT_A_HANDLE);
    }
    if description.kind != DescriptionType::None && details.trim().is_empty() {
        issues.push(issue_path!["tabDescription", "details"], DETAILS_REQUIRED);
    }
}

pub(crate) fn check_name(name: &str, path: Vec<PathSegment>, issues: &mut IssueCollector) {
    if name.trim().is_empty() {
        issues.push(path, NAME_REQUIRED);
    }
}

pub(crate) fn check_amount(amount: f64, path: Vec<PathSegment>, issues: &mut IssueCollector) {
    if !amount.is_finite() {
        issues.push(path, NON_FINITE_AMOUNT);
    } else if amount < 0.0 {
        issues.push(path, NEGATIVE_AMOUNT);
    }
}

pub(crate) fn all_unique<'a>(names: impl IntoIterator<Item = &'a str>) -> bool {
    let mut seen = HashSet::new();
    names.into_iter().all(|name| seen.insert(name))
}
