use serde::{Deserialize, Serialize};
use std::fmt;

/// A reference to a person by name, as it appears in a tab's participant list
/// and in each item's list of splitters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SplitterRef {
    pub name: String,
}

impl SplitterRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One line on the receipt and the people who shared it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    /// Price of the whole item (non-negative)
    pub price: f64,
    /// People who split this item, each paying an equal portion
    pub splitters: Vec<SplitterRef>,
}

/// How the person who paid wants to be paid back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DescriptionType {
    #[default]
    None,
    Venmo,
    #[serde(rename = "Cash App")]
    CashApp,
    PayPal,
    Other,
}

impl DescriptionType {
    pub const ALL: [DescriptionType; 5] = [
        DescriptionType::None,
        DescriptionType::Venmo,
        DescriptionType::CashApp,
        DescriptionType::PayPal,
        DescriptionType::Other,
    ];

    /// Wire name, matching the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DescriptionType::None => "None",
            DescriptionType::Venmo => "Venmo",
            DescriptionType::CashApp => "Cash App",
            DescriptionType::PayPal => "PayPal",
            DescriptionType::Other => "Other",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for DescriptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabDescription {
    #[serde(rename = "type", default)]
    pub kind: DescriptionType,
    /// Payment handle or free-form note. Required unless `kind` is `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

fn default_tip_before_tax() -> bool {
    true
}

/// The input receipt: what was ordered, by whom, and what was paid on top
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub tab_name: String,
    #[serde(default)]
    pub tab_description: TabDescription,
    pub tax_amount: f64,
    /// Whether the tip was calculated on the subtotal (true) or on subtotal + tax
    #[serde(default = "default_tip_before_tax")]
    pub tip_before_tax: bool,
    pub tip_amount: f64,
    pub items: Vec<Item>,
    pub splitters: Vec<SplitterRef>,
}

/// One person's equal share of a single item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPortion {
    pub name: String,
    pub portion_cost: f64,
}

/// Everything one person owes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitterShare {
    pub name: String,
    pub items: Vec<ItemPortion>,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub tip_amount: f64,
    pub total: f64,
}

/// The computed per-person breakdown of a tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Split {
    pub tab_name: String,
    #[serde(default)]
    pub tab_description: TabDescription,
    pub tax_percentage: f64,
    pub tax_amount: f64,
    pub tip_before_tax: bool,
    pub tip_percentage: f64,
    pub tip_amount: f64,
    pub sub_total: f64,
    pub total: f64,
    pub items: Vec<Item>,
    pub splitters: Vec<SplitterShare>,
}

/// One step in the path to an offending field, e.g. `["items", 2, "splitters"]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(index) => write!(f, "{}", index),
            PathSegment::Key(key) => f.write_str(key),
        }
    }
}

/// A single rule violation found while validating a tab or split
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// Dotted form of the path, e.g. `items.2.splitters`
    pub fn dotted_path(&self) -> String {
        self.path
            .iter()
            .map(|segment| segment.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// True when the path starts with the given top-level field
    pub fn points_at(&self, field: &str) -> bool {
        matches!(self.path.first(), Some(PathSegment::Key(key)) if key == field)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.dotted_path(), self.message)
    }
}

/// Item as extracted from a receipt image, before anyone is assigned to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialItem {
    pub name: String,
    pub price: f64,
}

/// Receipt data returned by the image extraction service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialTab {
    pub tab_name: String,
    pub tax_amount: f64,
    pub tip_amount: f64,
    pub items: Vec<PartialItem>,
}

/// Where and how to pay the person who covered the tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentLink {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: DescriptionType,
    pub display: String,
}

/// Response from POST /api/split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitResponse {
    /// Shareable link that reproduces this split
    pub link: String,
    pub split: Split,
}

/// Response from GET /api/split/load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSplitResponse {
    pub split: Split,
    pub payment: Option<PaymentLink>,
}

/// Response from POST /api/tab/validate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabValidationResponse {
    pub valid: bool,
    pub tab: Tab,
}

/// Response from GET /api/example
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleTabResponse {
    pub tab: Tab,
    pub split: Split,
    pub link: String,
}

/// Field-level validation failures, all reported at once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub errors: Vec<ValidationIssue>,
}

/// Failure that is not tied to a specific field (undecodable link, bad JSON)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
