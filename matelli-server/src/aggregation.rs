//! Totals and progress derived from a kit selection or a cart
//!
//! Pure functions over snapshots; money is `Decimal` end to end.

use rust_decimal::Decimal;
use shared::models::{CartState, KIT_SLOTS, SelectionState, Weekday};

/// Filled (day, category) slots, in `0..=35`
pub fn count_selected_slots(selection: &SelectionState) -> usize {
    selection.days().map(|(_, day)| day.len()).sum()
}

pub fn day_slot_count(selection: &SelectionState, day: Weekday) -> usize {
    selection.filled_in(day)
}

pub fn is_kit_complete(selection: &SelectionState) -> bool {
    count_selected_slots(selection) == KIT_SLOTS
}

/// Sum of the filled slots' prices; empty slots add nothing
pub fn kit_total(selection: &SelectionState) -> Decimal {
    selection.meals().map(|(_, _, meal)| meal.price).sum()
}

pub fn cart_item_count(cart: &CartState) -> u64 {
    cart.items().map(|item| u64::from(item.quantity)).sum()
}

pub fn cart_total(cart: &CartState) -> Decimal {
    cart.items()
        .map(|item| item.meal.price * Decimal::from(item.quantity))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use shared::models::{Meal, MealCategory};

    fn meal(id: &str, category: MealCategory, cents: i64) -> Meal {
        Meal {
            id: id.into(),
            name: id.into(),
            description: String::new(),
            category,
            image: String::new(),
            tags: vec![],
            price: Decimal::new(cents, 2),
            weight: String::new(),
            ingredients: IndexMap::new(),
        }
    }

    fn full_kit() -> SelectionState {
        let mut sel = SelectionState::new();
        for day in Weekday::ALL {
            for cat in MealCategory::ALL {
                sel.select(day, cat, meal("m", cat, 1000)).unwrap();
            }
        }
        sel
    }

    #[test]
    fn test_empty_selection() {
        let sel = SelectionState::new();
        assert_eq!(count_selected_slots(&sel), 0);
        assert!(!is_kit_complete(&sel));
        assert_eq!(kit_total(&sel), Decimal::ZERO);
    }

    #[test]
    fn test_single_slot_total() {
        let mut sel = SelectionState::new();
        sel.select(Weekday::Segunda, MealCategory::Lunch, meal("l1", MealCategory::Lunch, 2890))
            .unwrap();
        assert_eq!(count_selected_slots(&sel), 1);
        assert_eq!(day_slot_count(&sel, Weekday::Segunda), 1);
        assert_eq!(day_slot_count(&sel, Weekday::Terca), 0);
        assert_eq!(kit_total(&sel), Decimal::new(2890, 2));
    }

    #[test]
    fn test_complete_kit() {
        let mut sel = full_kit();
        assert_eq!(count_selected_slots(&sel), 35);
        assert!(is_kit_complete(&sel));
        assert_eq!(kit_total(&sel), Decimal::new(35_000, 2));

        // overwriting a slot never pushes the count past 35
        sel.select(Weekday::Domingo, MealCategory::Dinner, meal("d2", MealCategory::Dinner, 2490))
            .unwrap();
        assert_eq!(count_selected_slots(&sel), 35);
        assert_eq!(kit_total(&sel), Decimal::new(35_000 - 1000 + 2490, 2));

        sel.clear(Weekday::Domingo, MealCategory::Dinner);
        assert!(!is_kit_complete(&sel));
    }

    #[test]
    fn test_cart_three_adds() {
        let mut cart = CartState::new();
        let m = meal("s2", MealCategory::Smoothie, 1550);
        for _ in 0..3 {
            cart.add_one(m.clone());
        }
        assert_eq!(cart_item_count(&cart), 3);
        assert_eq!(cart_total(&cart), Decimal::new(4650, 2));

        cart.remove("s2");
        cart.remove("s2");
        cart.remove("s2");
        assert!(cart.get("s2").is_none());
        assert_eq!(cart_item_count(&cart), 0);
        assert_eq!(cart_total(&cart), Decimal::ZERO);
    }

    #[test]
    fn test_cart_mixed_lines() {
        let mut cart = CartState::new();
        cart.add(meal("b1", MealCategory::Breakfast, 1890), 2);
        cart.add(meal("de2", MealCategory::Dessert, 1150), 1);
        assert_eq!(cart_item_count(&cart), 3);
        assert_eq!(cart_total(&cart), Decimal::new(1890 * 2 + 1150, 2));
    }
}
