//! Weekly kit selection and à la carte cart
//!
//! [`SelectionState`] is the 7 days x 5 categories grid of the weekly kit.
//! [`CartState`] is the flat meal -> quantity map of the avulso menu. Both
//! hold meal snapshots and are copied verbatim into an order at checkout.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::meal::{Meal, MealCategory};
use crate::error::{AppError, ErrorCode};

/// Slots in a full weekly kit
pub const KIT_SLOTS: usize = Weekday::ALL.len() * MealCategory::ALL.len();

/// Day of the kit week, Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Segunda,
    #[serde(rename = "Terça")]
    Terca,
    Quarta,
    Quinta,
    Sexta,
    #[serde(rename = "Sábado")]
    Sabado,
    Domingo,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Segunda,
        Weekday::Terca,
        Weekday::Quarta,
        Weekday::Quinta,
        Weekday::Sexta,
        Weekday::Sabado,
        Weekday::Domingo,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Weekday::Segunda => "Segunda",
            Weekday::Terca => "Terça",
            Weekday::Quarta => "Quarta",
            Weekday::Quinta => "Quinta",
            Weekday::Sexta => "Sexta",
            Weekday::Sabado => "Sábado",
            Weekday::Domingo => "Domingo",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One day of the kit: at most one meal per category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DaySelection(BTreeMap<MealCategory, Meal>);

impl DaySelection {
    pub fn get(&self, category: MealCategory) -> Option<&Meal> {
        self.0.get(&category)
    }

    /// Filled slots in category display order
    pub fn meals(&self) -> impl Iterator<Item = (MealCategory, &Meal)> {
        self.0.iter().map(|(c, m)| (*c, m))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The weekly kit grid
///
/// Always carries all seven days, empty days included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Weekday, DaySelection>")]
pub struct SelectionState(BTreeMap<Weekday, DaySelection>);

impl From<BTreeMap<Weekday, DaySelection>> for SelectionState {
    fn from(mut days: BTreeMap<Weekday, DaySelection>) -> Self {
        for day in Weekday::ALL {
            days.entry(day).or_default();
        }
        Self(days)
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self::from(BTreeMap::new())
    }

    /// Put `meal` in the (day, category) slot, replacing any previous choice.
    ///
    /// Returns the meal that was replaced.
    pub fn select(
        &mut self,
        day: Weekday,
        category: MealCategory,
        meal: Meal,
    ) -> Result<Option<Meal>, AppError> {
        if meal.category != category {
            return Err(AppError::with_message(
                ErrorCode::MealCategoryMismatch,
                format!(
                    "{} is a {} meal and cannot fill the {} slot",
                    meal.name, meal.category, category
                ),
            )
            .with_detail("meal_id", meal.id)
            .with_detail("day", day.display_name()));
        }
        Ok(self.0.entry(day).or_default().0.insert(category, meal))
    }

    /// Empty a slot. Clearing an empty slot is a no-op.
    pub fn clear(&mut self, day: Weekday, category: MealCategory) -> Option<Meal> {
        self.0.get_mut(&day).and_then(|d| d.0.remove(&category))
    }

    pub fn day(&self, day: Weekday) -> Option<&DaySelection> {
        self.0.get(&day)
    }

    pub fn filled_in(&self, day: Weekday) -> usize {
        self.day(day).map_or(0, DaySelection::len)
    }

    pub fn is_day_complete(&self, day: Weekday) -> bool {
        self.filled_in(day) == MealCategory::ALL.len()
    }

    /// Days in week order
    pub fn days(&self) -> impl Iterator<Item = (Weekday, &DaySelection)> {
        self.0.iter().map(|(d, s)| (*d, s))
    }

    /// Every filled slot, day by day, categories in display order
    pub fn meals(&self) -> impl Iterator<Item = (Weekday, MealCategory, &Meal)> {
        self.days()
            .flat_map(|(day, sel)| sel.meals().map(move |(cat, meal)| (day, cat, meal)))
    }

    /// Meal names per non-empty day, the shape sent to the nutrition insight
    pub fn meal_names_by_day(&self) -> BTreeMap<Weekday, Vec<String>> {
        self.days()
            .filter(|(_, sel)| !sel.is_empty())
            .map(|(day, sel)| (day, sel.meals().map(|(_, m)| m.name.clone()).collect()))
            .collect()
    }
}

/// Cart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub meal: Meal,
    pub quantity: u32,
}

/// À la carte cart keyed by meal id, in the order items were first added
///
/// No entry ever has quantity 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IndexMap<String, CartItem>")]
pub struct CartState(IndexMap<String, CartItem>);

impl TryFrom<IndexMap<String, CartItem>> for CartState {
    type Error = String;

    fn try_from(items: IndexMap<String, CartItem>) -> Result<Self, Self::Error> {
        if let Some((id, _)) = items.iter().find(|(_, item)| item.quantity == 0) {
            return Err(format!("cart entry {id} has quantity 0"));
        }
        Ok(Self(items))
    }
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increase the quantity of `meal` by `quantity`, creating the line if absent.
    pub fn add(&mut self, meal: Meal, quantity: u32) {
        if quantity == 0 {
            return;
        }
        self.0
            .entry(meal.id.clone())
            .and_modify(|item| item.quantity = item.quantity.saturating_add(quantity))
            .or_insert(CartItem { meal, quantity });
    }

    pub fn add_one(&mut self, meal: Meal) {
        self.add(meal, 1);
    }

    /// Take one unit off; the line disappears when it reaches zero.
    /// Unknown ids are ignored.
    pub fn remove(&mut self, meal_id: &str) {
        if let Some(item) = self.0.get_mut(meal_id) {
            if item.quantity <= 1 {
                self.0.shift_remove(meal_id);
            } else {
                item.quantity -= 1;
            }
        }
    }

    pub fn get(&self, meal_id: &str) -> Option<&CartItem> {
        self.0.get(meal_id)
    }

    pub fn items(&self) -> impl Iterator<Item = &CartItem> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn meal(id: &str, category: MealCategory) -> Meal {
        Meal {
            id: id.into(),
            name: format!("Prato {id}"),
            description: String::new(),
            category,
            image: String::new(),
            tags: vec![],
            price: Decimal::new(1000, 2),
            weight: "300g".into(),
            ingredients: IndexMap::new(),
        }
    }

    #[test]
    fn test_new_selection_has_every_day_empty() {
        let sel = SelectionState::new();
        assert_eq!(sel.days().count(), 7);
        assert!(sel.days().all(|(_, d)| d.is_empty()));
        assert_eq!(KIT_SLOTS, 35);
    }

    #[test]
    fn test_select_overwrites_slot() {
        let mut sel = SelectionState::new();
        let first = sel
            .select(Weekday::Segunda, MealCategory::Lunch, meal("l1", MealCategory::Lunch))
            .unwrap();
        assert!(first.is_none());

        let replaced = sel
            .select(Weekday::Segunda, MealCategory::Lunch, meal("l2", MealCategory::Lunch))
            .unwrap();
        assert_eq!(replaced.unwrap().id, "l1");
        assert_eq!(sel.filled_in(Weekday::Segunda), 1);
        assert_eq!(
            sel.day(Weekday::Segunda).unwrap().get(MealCategory::Lunch).unwrap().id,
            "l2"
        );
    }

    #[test]
    fn test_select_rejects_wrong_category() {
        let mut sel = SelectionState::new();
        let err = sel
            .select(Weekday::Terca, MealCategory::Dinner, meal("b1", MealCategory::Breakfast))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MealCategoryMismatch);
        assert_eq!(sel.filled_in(Weekday::Terca), 0);
    }

    #[test]
    fn test_clear_and_day_completion() {
        let mut sel = SelectionState::new();
        for cat in MealCategory::ALL {
            sel.select(Weekday::Sexta, cat, meal("x", cat)).unwrap();
        }
        assert!(sel.is_day_complete(Weekday::Sexta));

        assert!(sel.clear(Weekday::Sexta, MealCategory::Dessert).is_some());
        assert!(sel.clear(Weekday::Sexta, MealCategory::Dessert).is_none());
        assert!(!sel.is_day_complete(Weekday::Sexta));
        assert_eq!(sel.filled_in(Weekday::Sexta), 4);
    }

    #[test]
    fn test_selection_json_uses_portuguese_keys() {
        let mut sel = SelectionState::new();
        sel.select(Weekday::Sabado, MealCategory::Breakfast, meal("b1", MealCategory::Breakfast))
            .unwrap();
        let json = serde_json::to_value(&sel).unwrap();
        assert_eq!(json["Sábado"]["Café da Manhã"]["id"], "b1");
        assert!(json["Domingo"].as_object().unwrap().is_empty());

        // Missing days are filled back in
        let partial: SelectionState =
            serde_json::from_value(serde_json::json!({ "Terça": {} })).unwrap();
        assert_eq!(partial.days().count(), 7);
    }

    #[test]
    fn test_meal_names_by_day_skips_empty_days() {
        let mut sel = SelectionState::new();
        sel.select(Weekday::Quarta, MealCategory::Dinner, meal("d1", MealCategory::Dinner))
            .unwrap();
        sel.select(Weekday::Quarta, MealCategory::Breakfast, meal("b1", MealCategory::Breakfast))
            .unwrap();
        let names = sel.meal_names_by_day();
        assert_eq!(names.len(), 1);
        assert_eq!(names[&Weekday::Quarta], vec!["Prato b1", "Prato d1"]);
    }

    #[test]
    fn test_cart_remove_drops_line_at_zero() {
        let mut cart = CartState::new();
        let m = meal("s1", MealCategory::Smoothie);
        cart.add(m.clone(), 2);
        cart.remove("s1");
        assert_eq!(cart.get("s1").unwrap().quantity, 1);
        cart.remove("s1");
        assert!(cart.get("s1").is_none());
        assert!(cart.is_empty());

        // unknown id is a no-op
        cart.remove("nope");
        cart.add(m, 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_keeps_first_added_order() {
        let mut cart = CartState::new();
        cart.add_one(meal("d2", MealCategory::Dinner));
        cart.add_one(meal("b1", MealCategory::Breakfast));
        cart.add_one(meal("d2", MealCategory::Dinner));
        let ids: Vec<_> = cart.items().map(|i| i.meal.id.as_str()).collect();
        assert_eq!(ids, vec!["d2", "b1"]);
        assert_eq!(cart.get("d2").unwrap().quantity, 2);
    }

    #[test]
    fn test_cart_rejects_zero_quantity_json() {
        let m = serde_json::to_value(meal("b1", MealCategory::Breakfast)).unwrap();
        let bad = serde_json::json!({ "b1": { "meal": m, "quantity": 0 } });
        assert!(serde_json::from_value::<CartState>(bad).is_err());
    }
}
