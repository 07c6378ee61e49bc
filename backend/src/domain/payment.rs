use shared::{DescriptionType, PaymentLink, TabDescription};

/// Types whose details are an account handle placed into a link
pub fn is_payment_app(kind: DescriptionType) -> bool {
    matches!(
        kind,
        DescriptionType::Venmo | DescriptionType::CashApp | DescriptionType::PayPal
    )
}

/// Handles are a single URL path segment: ASCII letters, digits, `.`, `-`, `_`.
pub fn is_payment_handle(handle: &str) -> bool {
    !handle.is_empty()
        && handle
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

/// Payment link for the person who covered the tab, when the description
/// names a supported payment app.
pub fn payment_link(description: &TabDescription) -> Option<PaymentLink> {
    let handle = description.details.as_deref()?.trim();
    if !is_payment_handle(handle) {
        return None;
    }

    let (url, display) = match description.kind {
        DescriptionType::Venmo => (format!("https://venmo.com/u/{}", handle), format!("@{}", handle)),
        DescriptionType::CashApp => (format!("https://cash.app/${}", handle), format!("${}", handle)),
        DescriptionType::PayPal => (format!("https://paypal.me/{}", handle), format!("@{}", handle)),
        DescriptionType::None | DescriptionType::Other => return None,
    };

    Some(PaymentLink {
        url,
        kind: description.kind,
        display,
    })
}
