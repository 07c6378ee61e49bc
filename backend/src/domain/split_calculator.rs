//! Split calculation for a validated tab.
//!
//! Each item's price is divided equally among the people who shared it.
//! Tax and tip are then charged to each person in proportion to their
//! subtotal, using the same rates and the same tip base (subtotal, or
//! subtotal + tax) as the tab as a whole, so the per-person totals always
//! add back up to the tab total.
//!
//! Items and people are ordered by name (ordinal string order) in the
//! output. A tab whose items are all free yields an all-zero split rather
//! than dividing by zero.

use std::collections::BTreeMap;

use shared::{Item, ItemPortion, Split, SplitterShare, Tab};

/// Running per-person totals while walking the items
#[derive(Debug, Default)]
struct Accumulated {
    subtotal: f64,
    items: Vec<ItemPortion>,
}

/// Compute the per-person breakdown of a tab.
///
/// The tab is expected to have passed validation; a person named on an item
/// but missing from the participant list is not included in the output.
pub fn calculate_split(tab: &Tab) -> Split {
    let mut items = tab.items.clone();
    items.sort_by(|a, b| a.name.cmp(&b.name));
    let mut participants: Vec<&str> = tab.splitters.iter().map(|s| s.name.as_str()).collect();
    participants.sort_unstable();

    let sub_total: f64 = items.iter().map(|item| item.price).sum();

    if sub_total == 0.0 {
        return zeroed_split(tab, items, &participants);
    }

    let tax_rate = tab.tax_amount / sub_total;
    let tip_base = if tab.tip_before_tax {
        sub_total
    } else {
        sub_total + tab.tax_amount
    };
    let tip_rate = tab.tip_amount / tip_base;

    let accumulated = accumulate_portions(&items);

    let splitters = participants
        .iter()
        .map(|name| {
            let (subtotal, mut person_items) = match accumulated.get(name) {
                Some(entry) => (entry.subtotal, entry.items.clone()),
                None => (0.0, Vec::new()),
            };
            person_items.sort_by(|a, b| a.name.cmp(&b.name));

            let tax_amount = subtotal * tax_rate;
            let person_tip_base = if tab.tip_before_tax {
                subtotal
            } else {
                subtotal + tax_amount
            };
            let tip_amount = person_tip_base * tip_rate;

            SplitterShare {
                name: (*name).to_string(),
                items: person_items,
                subtotal,
                tax_amount,
                tip_amount,
                total: subtotal + tax_amount + tip_amount,
            }
        })
        .collect();

    Split {
        tab_name: tab.tab_name.clone(),
        tab_description: tab.tab_description.clone(),
        tax_percentage: tax_rate * 100.0,
        tax_amount: tab.tax_amount,
        tip_before_tax: tab.tip_before_tax,
        tip_percentage: tip_rate * 100.0,
        tip_amount: tab.tip_amount,
        sub_total,
        total: sub_total + tab.tax_amount + tab.tip_amount,
        items,
        splitters,
    }
}

/// Equal portions of every item, keyed by exact person name
fn accumulate_portions(items: &[Item]) -> BTreeMap<&str, Accumulated> {
    let mut accumulated: BTreeMap<&str, Accumulated> = BTreeMap::new();
    for item in items {
        if item.splitters.is_empty() {
            continue;
        }
        let portion_cost = item.price / item.splitters.len() as f64;
        for splitter in &item.splitters {
            let entry = accumulated.entry(splitter.name.as_str()).or_default();
            entry.subtotal += portion_cost;
            entry.items.push(ItemPortion {
                name: item.name.clone(),
                portion_cost,
            });
        }
    }
    accumulated
}

/// Nothing was bought, so nobody owes anything; tax and tip are dropped.
fn zeroed_split(tab: &Tab, items: Vec<Item>, participants: &[&str]) -> Split {
    Split {
        tab_name: tab.tab_name.clone(),
        tab_description: tab.tab_description.clone(),
        tax_percentage: 0.0,
        tax_amount: 0.0,
        tip_before_tax: tab.tip_before_tax,
        tip_percentage: 0.0,
        tip_amount: 0.0,
        sub_total: 0.0,
        total: 0.0,
        items,
        splitters: participants
            .iter()
            .map(|name| SplitterShare {
                name: (*name).to_string(),
                items: Vec::new(),
                subtotal: 0.0,
                tax_amount: 0.0,
                tip_amount: 0.0,
                total: 0.0,
            })
            .collect(),
    }
}
