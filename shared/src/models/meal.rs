//! Meal Model

use std::fmt;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorCode};
use crate::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text,
    validate_required_text,
};

/// Catalog category. Declaration order is the display order of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MealCategory {
    #[serde(rename = "Café da Manhã")]
    Breakfast,
    #[serde(rename = "Vitamina de Frutas")]
    Smoothie,
    #[serde(rename = "Almoço")]
    Lunch,
    #[serde(rename = "Sobremesa")]
    Dessert,
    #[serde(rename = "Jantar")]
    Dinner,
}

impl MealCategory {
    pub const ALL: [MealCategory; 5] = [
        MealCategory::Breakfast,
        MealCategory::Smoothie,
        MealCategory::Lunch,
        MealCategory::Dessert,
        MealCategory::Dinner,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            MealCategory::Breakfast => "Café da Manhã",
            MealCategory::Smoothie => "Vitamina de Frutas",
            MealCategory::Lunch => "Almoço",
            MealCategory::Dessert => "Sobremesa",
            MealCategory::Dinner => "Jantar",
        }
    }
}

impl fmt::Display for MealCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Catalog entry
///
/// Selections and carts hold snapshots of this struct; the catalog owns the
/// canonical copy keyed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: MealCategory,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Unit price in BRL
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub weight: String,
    /// Ingredient name -> measure ("Salmão" -> "130g"), in recipe order
    #[serde(default)]
    pub ingredients: IndexMap<String, String>,
}

/// Admin save payload, validated into a [`Meal`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealDraft {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: MealCategory,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub price: f64,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub ingredients: IndexMap<String, String>,
}

impl MealDraft {
    /// Check required fields and limits, producing the catalog document.
    ///
    /// Blank tags and ingredient names are dropped; duplicate tags keep
    /// their first position.
    pub fn validate(self) -> Result<Meal, AppError> {
        validate_required_text(&self.id, "id", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&self.name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&self.description, "description", MAX_DESCRIPTION_LEN)?;
        validate_optional_text(&self.image, "image", MAX_URL_LEN)?;
        validate_optional_text(&self.weight, "weight", MAX_SHORT_TEXT_LEN)?;

        if !self.price.is_finite() || self.price < 0.0 {
            return Err(AppError::with_message(
                ErrorCode::MealInvalidPrice,
                format!("price must be a non-negative number, got {}", self.price),
            )
            .with_detail("meal_id", self.id));
        }
        let price = Decimal::from_f64(self.price)
            .ok_or_else(|| AppError::new(ErrorCode::MealInvalidPrice))?
            .round_dp(2);

        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in self.tags {
            let tag = tag.trim();
            if tag.is_empty() {
                continue;
            }
            validate_required_text(tag, "tag", MAX_SHORT_TEXT_LEN)?;
            if !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }

        let mut ingredients = IndexMap::with_capacity(self.ingredients.len());
        for (name, measure) in self.ingredients {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            validate_required_text(name, "ingredient", MAX_NAME_LEN)?;
            validate_optional_text(&Some(measure.clone()), "measure", MAX_SHORT_TEXT_LEN)?;
            ingredients.insert(name.to_string(), measure.trim().to_string());
        }

        Ok(Meal {
            id: self.id.trim().to_string(),
            name: self.name.trim().to_string(),
            description: self.description.unwrap_or_default(),
            category: self.category,
            image: self.image.unwrap_or_default(),
            tags,
            price,
            weight: self.weight.unwrap_or_default(),
            ingredients,
        })
    }
}

impl From<Meal> for MealDraft {
    fn from(meal: Meal) -> Self {
        use rust_decimal::prelude::ToPrimitive;
        Self {
            id: meal.id,
            name: meal.name,
            description: Some(meal.description),
            category: meal.category,
            image: Some(meal.image),
            tags: meal.tags,
            price: meal.price.to_f64().unwrap_or_default(),
            weight: Some(meal.weight),
            ingredients: meal.ingredients,
        }
    }
}
