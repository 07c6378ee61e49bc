//! # Domain Module
//!
//! Contains the bill-splitting rules: checking a tab, dividing it among the
//! people who shared it, and checking the resulting split.
//!
//! Everything here is synchronous and free of I/O, so the same functions back
//! the REST layer, share links and the tests.
//!
//! ## Module Organization
//!
//! - **tab_validation**: Raw JSON to a well-formed [`Tab`](shared::Tab), or every rule it breaks
//! - **split_calculator**: Proportional tax and tip allocation per participant
//! - **split_validation**: Structural and arithmetic checks on a computed split
//! - **tab_codec**: Share-link query strings and compressed fragments
//! - **example_tab**: Seedable random tabs for demos and property tests
//! - **receipt**: Prefilling a tab from extracted receipt data
//! - **payment**: Payment-app links from the tab description
//!
//! ## Business Rules
//!
//! - An item's price is divided equally among the people sharing it
//! - Tax is split in proportion to each person's subtotal
//! - Tip is charged on the subtotal, or on subtotal plus tax when it was
//!   added after tax, and split the same way as tax
//! - Names are matched exactly; every participant must share at least one item
//! - Amounts are rounded to cents only when displayed

pub mod example_tab;
pub mod models;
pub mod payment;
pub mod receipt;
pub mod split_calculator;
pub mod split_validation;
pub mod tab_codec;
pub mod tab_validation;

pub use example_tab::generate_example_tab;
pub use models::validation::{TabValidationError, ValidationErrors};
pub use payment::payment_link;
pub use receipt::complete_partial_tab;
pub use split_calculator::calculate_split;
pub use split_validation::validate_split;
pub use tab_codec::{
    compress_query, decode_fragment, decode_query, encode_query, share_link, LinkStyle,
    TabCodecError,
};
pub use tab_validation::{validate_tab, validate_tab_struct};
