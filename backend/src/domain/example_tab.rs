//! Random example tabs for demos, placeholders and property tests.
//!
//! The generator is a plain function of the random source it is handed, so a
//! seeded RNG always yields the same tab.

use rand::seq::SliceRandom;
use rand::Rng;
use shared::{DescriptionType, Item, SplitterRef, Tab, TabDescription};

const FIRST_NAMES: &[&str] = &[
    "Abby", "Adam", "Alice", "Amir", "Ben", "Bob", "Carla", "Charlie", "Dana", "Dave", "Elena",
    "Felix", "Grace", "Hana", "Ivan", "Jonas", "Karen", "Kyle", "Lena", "Marco", "Nia", "Omar",
    "Priya", "Quinn", "Rosa", "Samuel", "Tariq", "Uma", "Vincent", "Wes", "Yara", "Zane",
];

const FOODS: &[&str] = &[
    "Apple Pie", "Bibimbap", "Bruschetta", "Caesar Salad", "Calamari", "Carbonara",
    "Cheeseburger", "Chicken Tikka", "Churros", "Clam Chowder", "Dumplings", "Falafel Wrap",
    "Fish Tacos", "French Onion Soup", "Garlic Bread", "Gnocchi", "Guacamole", "Lasagna",
    "Lemonade", "Mac and Cheese", "Margherita Pizza", "Miso Ramen", "Nachos", "Pad Thai",
    "Paella", "Pho", "Poke Bowl", "Quesadilla", "Risotto", "Sashimi Platter", "Shrimp Scampi",
    "Spring Rolls", "Steak Frites", "Sweet Potato Fries", "Tiramisu", "Tom Yum", "Waffles",
    "Zucchini Sticks",
];

const WEEKDAYS: &[&str] = &[
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];

const MEALS: &[&str] = &[
    "Dinner", "Lunch", "Brunch", "Breakfast", "Drinks", "Snacks", "Party", "Meetup",
    "Celebration", "Gathering",
];

const VENUES: &[&str] = &[
    "Garden", "Harbor", "Market", "Corner", "Rooftop", "Kitchen", "Tavern", "Bistro", "Cellar",
];

const VENUE_WORDS: &[&str] = &[
    "Amber", "Cobalt", "Juniper", "Maple", "Saffron", "Willow", "Copper", "Meadow", "Velvet",
];

const HANDLES: &[&str] = &["tab-host", "dinnerclub", "the-organizer", "groupfund"];

/// Build a random but valid tab: unique names, every participant on at
/// least one item, and payment details filled in.
pub fn generate_example_tab<R: Rng + ?Sized>(rng: &mut R) -> Tab {
    let splitter_count = rng.gen_range(2..=10);
    let names: Vec<&str> = FIRST_NAMES
        .choose_multiple(rng, splitter_count)
        .copied()
        .collect();

    let item_count = rng.gen_range(2..=15);
    let mut items: Vec<Item> = FOODS
        .choose_multiple(rng, item_count)
        .map(|food| {
            let mut sharing = names.clone();
            sharing.shuffle(rng);
            sharing.truncate(rng.gen_range(1..=names.len()));
            Item {
                name: (*food).to_string(),
                price: random_cents(rng, 5, 70),
                splitters: sharing.into_iter().map(SplitterRef::new).collect(),
            }
        })
        .collect();

    for name in &names {
        let assigned = items
            .iter()
            .any(|item| item.splitters.iter().any(|splitter| splitter.name == *name));
        if !assigned {
            let index = rng.gen_range(0..items.len());
            items[index].splitters.push(SplitterRef::new(*name));
        }
    }

    let kind = *[
        DescriptionType::Venmo,
        DescriptionType::CashApp,
        DescriptionType::PayPal,
    ]
    .choose(rng)
    .unwrap_or(&DescriptionType::Venmo);

    Tab {
        tab_name: format!(
            "{} {} at {} {}",
            pick(rng, WEEKDAYS),
            pick(rng, MEALS),
            pick(rng, VENUE_WORDS),
            pick(rng, VENUES),
        ),
        tab_description: TabDescription {
            kind,
            details: Some(pick(rng, HANDLES).to_string()),
        },
        tax_amount: random_cents(rng, 2, 20),
        tip_before_tax: rng.gen_bool(0.5),
        tip_amount: random_cents(rng, 5, 30),
        items,
        splitters: names.into_iter().map(SplitterRef::new).collect(),
    }
}

/// Whole-cent dollar amount between `min` and `max` dollars inclusive
fn random_cents<R: Rng + ?Sized>(rng: &mut R, min: u32, max: u32) -> f64 {
    f64::from(rng.gen_range(min * 100..=max * 100)) / 100.0
}

fn pick<R: Rng + ?Sized>(rng: &mut R, words: &[&'static str]) -> &'static str {
    words.choose(rng).copied().unwrap_or_default()
}
