//! Output invariants of a computed split.
//!
//! Used by the tests and by the REST layer as a second check that the
//! calculator behaved before a split leaves the process. Sums are compared
//! with [`TOLERANCE`] to absorb floating-point drift.

use shared::{Split, SplitterShare};

use crate::domain::models::validation::{issue_path, IssueCollector, ValidationErrors};
use crate::domain::tab_validation::{
    all_unique, check_amount, check_name, check_splitter_assignments, NAMES_NOT_UNIQUE, NO_ITEMS,
    NO_ITEM_SPLITTERS, NO_SPLITTERS,
};

/// Largest difference, in dollars, treated as equal for everyday amounts
pub const TOLERANCE: f64 = 0.01;

/// Allowed drift when comparing `a` and `b`: one cent, or a few ulps once the
/// amounts are large enough that a cent is below `f64` resolution.
pub fn tolerance(a: f64, b: f64) -> f64 {
    TOLERANCE.max(f64::EPSILON * 16.0 * a.abs().max(b.abs()))
}

pub fn roughly_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < tolerance(a, b)
}

/// Check every invariant a split must satisfy, reporting all violations.
pub fn validate_split(candidate: Split) -> Result<Split, ValidationErrors> {
    let mut issues = IssueCollector::default();
    check_fields(&candidate, &mut issues);
    check_arithmetic(&candidate, &mut issues);
    issues.into_result(candidate)
}

fn check_fields(split: &Split, issues: &mut IssueCollector) {
    check_name(&split.tab_name, issue_path!["tabName"], issues);
    check_amount(split.tax_percentage, issue_path!["taxPercentage"], issues);
    check_amount(split.tax_amount, issue_path!["taxAmount"], issues);
    check_amount(split.tip_percentage, issue_path!["tipPercentage"], issues);
    check_amount(split.tip_amount, issue_path!["tipAmount"], issues);
    check_amount(split.sub_total, issue_path!["subTotal"], issues);
    check_amount(split.total, issue_path!["total"], issues);

    if split.items.is_empty() {
        issues.push(issue_path!["items"], NO_ITEMS);
    }
    for (index, item) in split.items.iter().enumerate() {
        check_name(&item.name, issue_path!["items", index, "name"], issues);
        check_amount(item.price, issue_path!["items", index, "price"], issues);
        if item.splitters.is_empty() {
            issues.push(issue_path!["items", index, "splitters"], NO_ITEM_SPLITTERS);
        }
        if !all_unique(item.splitters.iter().map(|splitter| splitter.name.as_str())) {
            issues.push(issue_path!["items", index, "splitters"], NAMES_NOT_UNIQUE);
        }
    }
    if !all_unique(split.items.iter().map(|item| item.name.as_str())) {
        issues.push(issue_path!["items"], NAMES_NOT_UNIQUE);
    }
    if !is_sorted_by_name(split.items.iter().map(|item| item.name.as_str())) {
        issues.push(issue_path!["items"], "Items must be sorted by name");
    }

    if split.splitters.is_empty() {
        issues.push(issue_path!["splitters"], NO_SPLITTERS);
    }
    for (index, splitter) in split.splitters.iter().enumerate() {
        check_splitter_share(index, splitter, issues);
    }
    if !all_unique(split.splitters.iter().map(|splitter| splitter.name.as_str())) {
        issues.push(issue_path!["splitters"], NAMES_NOT_UNIQUE);
    }
    if !is_sorted_by_name(split.splitters.iter().map(|splitter| splitter.name.as_str())) {
        issues.push(issue_path!["splitters"], "Splitters must be sorted by name");
    }

    check_splitter_assignments(
        &split.items,
        split.splitters.iter().map(|splitter| splitter.name.as_str()),
        issues,
    );
}

fn check_splitter_share(index: usize, splitter: &SplitterShare, issues: &mut IssueCollector) {
    check_name(&splitter.name, issue_path!["splitters", index, "name"], issues);
    check_amount(splitter.subtotal, issue_path!["splitters", index, "subtotal"], issues);
    check_amount(splitter.tax_amount, issue_path!["splitters", index, "taxAmount"], issues);
    check_amount(splitter.tip_amount, issue_path!["splitters", index, "tipAmount"], issues);
    check_amount(splitter.total, issue_path!["splitters", index, "total"], issues);

    for (position, portion) in splitter.items.iter().enumerate() {
        check_name(
            &portion.name,
            issue_path!["splitters", index, "items", position, "name"],
            issues,
        );
        check_amount(
            portion.portion_cost,
            issue_path!["splitters", index, "items", position, "portionCost"],
            issues,
        );
    }
    if !all_unique(splitter.items.iter().map(|portion| portion.name.as_str())) {
        issues.push(issue_path!["splitters", index, "items"], NAMES_NOT_UNIQUE);
    }

    let portions: f64 = splitter.items.iter().map(|portion| portion.portion_cost).sum();
    if !roughly_equal(splitter.subtotal, portions) {
        issues.push(
            issue_path!["splitters", index, "subtotal"],
            "Portion costs should equal subtotal",
        );
    }
    if !roughly_equal(
        splitter.total,
        splitter.subtotal + splitter.tax_amount + splitter.tip_amount,
    ) {
        issues.push(
            issue_path!["splitters", index, "total"],
            "Splitter total must equal subtotal plus tax and tip",
        );
    }
}

fn check_arithmetic(split: &Split, issues: &mut IssueCollector) {
    let item_sum: f64 = split.items.iter().map(|item| item.price).sum();
    if !roughly_equal(split.sub_total, item_sum) {
        issues.push(issue_path!["subTotal"], "Sum of item prices must equal the subtotal.");
    }

    if !roughly_equal(split.total, split.sub_total + split.tax_amount + split.tip_amount) {
        issues.push(
            issue_path!["total"],
            "Total must equal the sum of subtotal, tip amount, and tax amount.",
        );
    }
    // Charges too small to move the total past the subtotal are not checked
    let charges = split.tax_amount + split.tip_amount;
    if charges >= tolerance(split.sub_total, split.total) && split.total <= split.sub_total {
        issues.push(issue_path!["total"], "Total must be greater than subtotal.");
    }

    let splitter_total: f64 = split.splitters.iter().map(|splitter| splitter.total).sum();
    if !roughly_equal(split.total, splitter_total) {
        issues.push(
            issue_path!["total"],
            "Sum of splitter totals must equal the overall total.",
        );
    }
    let splitter_tax: f64 = split.splitters.iter().map(|splitter| splitter.tax_amount).sum();
    if !roughly_equal(split.tax_amount, splitter_tax) {
        issues.push(
            issue_path!["taxAmount"],
            "Sum of splitter tax amounts must equal the tax amount.",
        );
    }
    let splitter_tip: f64 = split.splitters.iter().map(|splitter| splitter.tip_amount).sum();
    if !roughly_equal(split.tip_amount, splitter_tip) {
        issues.push(
            issue_path!["tipAmount"],
            "Sum of splitter tip amounts must equal the tip amount.",
        );
    }

    if !roughly_equal(split.tax_amount, split.sub_total * split.tax_percentage / 100.0) {
        issues.push(
            issue_path!["taxPercentage"],
            "Tax amount must be consistent with tax percentage.",
        );
    }
    let tip_base = if split.tip_before_tax {
        split.sub_total
    } else {
        split.sub_total + split.tax_amount
    };
    if !roughly_equal(split.tip_amount, tip_base * split.tip_percentage / 100.0) {
        issues.push(
            issue_path!["tipPercentage"],
            "Tip amount must be consistent with tip percentage.",
        );
    }
}

fn is_sorted_by_name<'a>(names: impl IntoIterator<Item = &'a str>) -> bool {
    let names: Vec<&str> = names.into_iter().collect();
    names.windows(2).all(|pair| pair[0] <= pair[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::example_tab::generate_example_tab;
    use crate::domain::split_calculator::calculate_split;
    use crate::domain::tab_validation::validate_tab_struct;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shared::{Item, SplitterRef, Tab, TabDescription};

    fn create_mock_tab() -> Tab {
        let people = |names: &[&str]| -> Vec<SplitterRef> {
            names.iter().map(|name| SplitterRef::new(*name)).collect()
        };
        Tab {
            tab_name: "Dinner at The Code Bistro".to_string(),
            tab_description: TabDescription::default(),
            tax_amount: 8.0,
            tip_before_tax: true,
            tip_amount: 20.0,
            items: vec![
                Item { name: "Pizza".to_string(), price: 25.0, splitters: people(&["Alice", "Bob"]) },
                Item { name: "Salad".to_string(), price: 15.0, splitters: people(&["Alice"]) },
                Item { name: "Beer".to_string(), price: 8.0, splitters: people(&["Bob"]) },
                Item { name: "Wine".to_string(), price: 12.0, splitters: people(&["Charlie"]) },
            ],
            splitters: people(&["Alice", "Bob", "Charlie"]),
        }
    }

    fn messages(errors: &ValidationErrors) -> Vec<&str> {
        errors.issues().iter().map(|issue| issue.message.as_str()).collect()
    }

    #[test]
    fn test_calculated_split_passes() {
        for tip_before_tax in [true, false] {
            let mut tab = create_mock_tab();
            tab.tip_before_tax = tip_before_tax;
            assert!(validate_split(calculate_split(&tab)).is_ok());
        }
    }

    #[test]
    fn test_zero_subtotal_split_passes() {
        let mut tab = create_mock_tab();
        for item in &mut tab.items {
            item.price = 0.0;
        }

        let split = validate_split(calculate_split(&tab)).expect("zeroed split is valid");
        assert_eq!(split.total, 0.0);
    }

    #[test]
    fn test_wrong_total_is_reported() {
        let mut split = calculate_split(&create_mock_tab());
        split.total += 1.0;

        let errors = validate_split(split).unwrap_err();

        assert!(messages(&errors)
            .contains(&"Total must equal the sum of subtotal, tip amount, and tax amount."));
        assert!(messages(&errors).contains(&"Sum of splitter totals must equal the overall total."));
        assert!(errors.issues().iter().all(|issue| issue.points_at("total")));
    }

    #[test]
    fn test_drift_within_tolerance_is_accepted() {
        let mut split = calculate_split(&create_mock_tab());
        split.splitters[0].total += 0.004;

        assert!(validate_split(split).is_ok());
    }

    #[test]
    fn test_portion_mismatch_is_reported() {
        let mut split = calculate_split(&create_mock_tab());
        split.splitters[1].items[0].portion_cost += 2.0;

        let errors = validate_split(split).unwrap_err();

        assert_eq!(errors.issues().len(), 1);
        assert_eq!(errors.issues()[0].path, issue_path!["splitters", 1usize, "subtotal"]);
    }

    #[test]
    fn test_inconsistent_tip_percentage_is_reported() {
        let mut split = calculate_split(&create_mock_tab());
        split.tip_percentage = 15.0;

        let errors = validate_split(split).unwrap_err();

        assert_eq!(messages(&errors), vec!["Tip amount must be consistent with tip percentage."]);
    }

    #[test]
    fn test_total_must_exceed_subtotal_when_charged() {
        let mut split = calculate_split(&create_mock_tab());
        split.total = split.sub_total;

        let errors = validate_split(split).unwrap_err();

        assert!(messages(&errors).contains(&"Total must be greater than subtotal."));
    }

    #[test]
    fn test_unsorted_and_unassigned_are_reported() {
        let mut split = calculate_split(&create_mock_tab());
        split.splitters.reverse();
        split.splitters[0].name = "Zed".to_string();

        let errors = validate_split(split).unwrap_err();

        assert!(errors.find_at("splitters").is_some());
        assert!(errors.find_at("items").is_some());
        assert!(messages(&errors).contains(&"Splitters must be sorted by name"));
    }

    #[test]
    fn test_sub_cent_charges_pass() {
        let mut tab = create_mock_tab();
        tab.tax_amount = 1e-20;
        tab.tip_amount = 0.0;

        let split = calculate_split(&tab);
        assert_eq!(split.total, split.sub_total);
        assert!(validate_split(split).is_ok());
    }

    #[test]
    fn test_large_amounts_pass() {
        let tab = Tab {
            tab_name: "Acquisition Dinner".to_string(),
            tab_description: TabDescription::default(),
            tax_amount: 7.77,
            tip_before_tax: false,
            tip_amount: 13.13,
            items: vec![Item {
                name: "Company".to_string(),
                price: 123_456_789_012_345.67,
                splitters: vec![
                    SplitterRef::new("Alice"),
                    SplitterRef::new("Bob"),
                    SplitterRef::new("Carol"),
                ],
            }],
            splitters: vec![
                SplitterRef::new("Alice"),
                SplitterRef::new("Bob"),
                SplitterRef::new("Carol"),
            ],
        };
        let tab = validate_tab_struct(tab).expect("large tab is valid");

        let split = validate_split(calculate_split(&tab));
        assert!(split.is_ok(), "{:?}", split.err());
    }

    #[test]
    fn test_tolerance_scales_with_magnitude() {
        assert_eq!(tolerance(10.0, 10.5), TOLERANCE);
        assert!(tolerance(1e15, 1e15) > TOLERANCE);
        assert!(roughly_equal(1e15, 1e15 + 0.125));
        assert!(!roughly_equal(10.0, 10.02));
    }

    fn arb_seed() -> impl Strategy<Value = u64> {
        any::<u64>()
    }

    proptest! {
        #[test]
        fn prop_valid_tabs_produce_valid_splits(seed in arb_seed()) {
            let tab = generate_example_tab(&mut StdRng::seed_from_u64(seed));
            let tab = validate_tab_struct(tab).expect("generated tabs are valid");

            let split = calculate_split(&tab);
            let split = validate_split(split);
            prop_assert!(split.is_ok(), "{:?}", split.err());
        }

        #[test]
        fn prop_totals_are_conserved(seed in arb_seed(), tip_before_tax in any::<bool>()) {
            let mut tab = generate_example_tab(&mut StdRng::seed_from_u64(seed));
            tab.tip_before_tax = tip_before_tax;

            let split = calculate_split(&tab);
            let item_sum: f64 = split.items.iter().map(|item| item.price).sum();
            let person_sum: f64 = split.splitters.iter().map(|s| s.total).sum();

            prop_assert!(roughly_equal(item_sum, split.sub_total));
            prop_assert!(roughly_equal(person_sum, split.total));
        }
    }
}
