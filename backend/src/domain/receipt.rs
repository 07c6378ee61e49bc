//! Reshaping of receipt data extracted from an image.
//!
//! The extraction service only knows item names and prices; who shared what
//! is filled in afterwards, so the resulting tab is a form prefill and does
//! not pass validation until participants are added.

use shared::{Item, PartialTab, Tab, TabDescription};

pub fn complete_partial_tab(partial: PartialTab) -> Tab {
    Tab {
        tab_name: partial.tab_name,
        tab_description: TabDescription::default(),
        tax_amount: partial.tax_amount,
        tip_before_tax: true,
        tip_amount: partial.tip_amount,
        items: partial
            .items
            .into_iter()
            .map(|item| Item {
                name: item.name,
                price: item.price,
                splitters: Vec::new(),
            })
            .collect(),
        splitters: Vec::new(),
    }
}
