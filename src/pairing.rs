// Recipe + drink pairing suggestions

use crate::catalog::{DrinkCatalog, DrinkEntry, MealEntry, RecipeCatalog};
use crate::error::{Error, Result};
use crate::normalize::truncate_preview;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

/// Instructions preview length for the main course of a pairing
pub const PAIRING_PREVIEW_CHARS: usize = 150;

const MAX_DRINK_INGREDIENTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainCourse {
    pub name: String,
    pub category: String,
    pub area: String,
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedDrink {
    pub name: String,
    #[serde(rename = "type")]
    pub alcoholic: String,
    pub ingredients: Vec<String>,
}

/// One recipe and one drink combined, never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingSuggestion {
    pub main_course: MainCourse,
    pub suggested_drink: SuggestedDrink,
    pub message: String,
}

impl PairingSuggestion {
    /// Combine two catalog entries; `None` if either lacks a name or the meal lacks instructions
    pub fn compose(meal: MealEntry, drink: DrinkEntry) -> Option<Self> {
        let meal_name = meal.name.filter(|n| !n.is_empty())?;
        let drink_name = drink.name.filter(|n| !n.is_empty())?;
        let instructions = meal.instructions?;

        let ingredients = [drink.ingredient1, drink.ingredient2]
            .into_iter()
            .flatten()
            .filter(|i| !i.trim().is_empty())
            .take(MAX_DRINK_INGREDIENTS)
            .collect();

        let message = format!("For the dish \"{}\", we suggest the cocktail \"{}\".", meal_name, drink_name);

        Some(Self {
            main_course: MainCourse {
                name: meal_name,
                category: meal.category.unwrap_or_default(),
                area: meal.area.unwrap_or_default(),
                instructions: truncate_preview(&instructions, PAIRING_PREVIEW_CHARS),
            },
            suggested_drink: SuggestedDrink {
                name: drink_name,
                alcoholic: drink.alcoholic.unwrap_or_default(),
                ingredients,
            },
            message,
        })
    }
}

/// Stateless composer over the two catalogs
#[derive(Clone)]
pub struct PairingComposer {
    recipes: Arc<dyn RecipeCatalog>,
    drinks: Arc<dyn DrinkCatalog>,
}

impl PairingComposer {
    pub fn new(recipes: Arc<dyn RecipeCatalog>, drinks: Arc<dyn DrinkCatalog>) -> Self {
        Self { recipes, drinks }
    }

    /// Fetch one random recipe and one random drink and combine them
    ///
    /// Both calls are issued together. Any failure or empty answer on either
    /// side fails the whole suggestion.
    pub async fn suggest(&self) -> Result<PairingSuggestion> {
        let (meal, drink) = tokio::join!(self.recipes.random(), self.drinks.random());

        let meal = meal.map_err(|e| {
            error!(error = ?e, "Random recipe lookup failed");
            Error::UpstreamError(format!("recipe catalog: {:#}", e))
        })?;
        let drink = drink.map_err(|e| {
            error!(error = ?e, "Random drink lookup failed");
            Error::UpstreamError(format!("drinks catalog: {:#}", e))
        })?;

        let (meal, drink) = match (meal, drink) {
            (Some(meal), Some(drink)) => (meal, drink),
            _ => return Err(Error::UpstreamError("catalog returned no random entry".to_string())),
        };

        let suggestion = PairingSuggestion::compose(meal, drink)
            .ok_or_else(|| Error::UpstreamError("catalog entry has an unusable shape".to_string()))?;

        debug!(
            meal = %suggestion.main_course.name,
            drink = %suggestion.suggested_drink.name,
            "Pairing composed"
        );
        Ok(suggestion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use eyre::eyre;

    struct FixedRecipes(Option<MealEntry>);

    #[async_trait]
    impl RecipeCatalog for FixedRecipes {
        async fn search_by_name(&self, _term: &str) -> eyre::Result<Option<MealEntry>> {
            Ok(self.0.clone())
        }

        async fn random(&self) -> eyre::Result<Option<MealEntry>> {
            Ok(self.0.clone())
        }
    }

    struct FixedDrinks(Option<DrinkEntry>);

    #[async_trait]
    impl DrinkCatalog for FixedDrinks {
        async fn random(&self) -> eyre::Result<Option<DrinkEntry>> {
            Ok(self.0.clone())
        }
    }

    struct FailingDrinks;

    #[async_trait]
    impl DrinkCatalog for FailingDrinks {
        async fn random(&self) -> eyre::Result<Option<DrinkEntry>> {
            Err(eyre!("connection refused"))
        }
    }

    fn meal() -> MealEntry {
        MealEntry {
            id: Some("52772".to_string()),
            name: Some("Teriyaki Chicken Casserole".to_string()),
            category: Some("Chicken".to_string()),
            area: Some("Japanese".to_string()),
            instructions: Some("y".repeat(400)),
            ingredient1: Some("soy sauce".to_string()),
            ingredient2: Some("water".to_string()),
        }
    }

    fn drink() -> DrinkEntry {
        DrinkEntry {
            name: Some("Mojito".to_string()),
            alcoholic: Some("Alcoholic".to_string()),
            ingredient1: Some("Light rum".to_string()),
            ingredient2: Some("Lime".to_string()),
        }
    }

    #[test]
    fn test_compose_pairing() {
        let suggestion = PairingSuggestion::compose(meal(), drink()).unwrap();

        assert_eq!(suggestion.main_course.name, "Teriyaki Chicken Casserole");
        assert_eq!(suggestion.main_course.area, "Japanese");
        assert_eq!(suggestion.main_course.instructions.chars().count(), PAIRING_PREVIEW_CHARS + 3);
        assert_eq!(suggestion.suggested_drink.alcoholic, "Alcoholic");
        assert_eq!(suggestion.suggested_drink.ingredients, vec!["Light rum", "Lime"]);
        assert_eq!(
            suggestion.message,
            "For the dish \"Teriyaki Chicken Casserole\", we suggest the cocktail \"Mojito\"."
        );
    }

    #[test]
    fn test_compose_filters_empty_ingredients() {
        let mut d = drink();
        d.ingredient1 = Some(String::new());
        d.ingredient2 = Some("Mint".to_string());
        let suggestion = PairingSuggestion::compose(meal(), d).unwrap();
        assert_eq!(suggestion.suggested_drink.ingredients, vec!["Mint"]);

        let mut d = drink();
        d.ingredient1 = None;
        d.ingredient2 = None;
        let suggestion = PairingSuggestion::compose(meal(), d).unwrap();
        assert!(suggestion.suggested_drink.ingredients.is_empty());
    }

    #[test]
    fn test_pairing_wire_shape() {
        let suggestion = PairingSuggestion::compose(meal(), drink()).unwrap();
        let json = serde_json::to_value(&suggestion).unwrap();
        assert!(json.get("mainCourse").is_some());
        assert_eq!(json["suggestedDrink"]["type"], "Alcoholic");
    }

    #[tokio::test]
    async fn test_suggest_success() {
        let composer = PairingComposer::new(Arc::new(FixedRecipes(Some(meal()))), Arc::new(FixedDrinks(Some(drink()))));
        let suggestion = composer.suggest().await.unwrap();
        assert_eq!(suggestion.suggested_drink.name, "Mojito");
    }

    #[tokio::test]
    async fn test_suggest_fails_when_drinks_catalog_fails() {
        let composer = PairingComposer::new(Arc::new(FixedRecipes(Some(meal()))), Arc::new(FailingDrinks));
        assert!(matches!(composer.suggest().await, Err(Error::UpstreamError(_))));
    }

    #[tokio::test]
    async fn test_suggest_fails_when_one_side_empty() {
        let composer = PairingComposer::new(Arc::new(FixedRecipes(None)), Arc::new(FixedDrinks(Some(drink()))));
        assert!(matches!(composer.suggest().await, Err(Error::UpstreamError(_))));

        let composer = PairingComposer::new(Arc::new(FixedRecipes(Some(meal()))), Arc::new(FixedDrinks(None)));
        assert!(matches!(composer.suggest().await, Err(Error::UpstreamError(_))));
    }
}
