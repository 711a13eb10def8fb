// External catalog clients
//
// Two read-only catalogs are consumed:
// - a recipe catalog (TheMealDB) searched by name or queried at random
// - a drinks catalog (TheCocktailDB) queried at random
//
// Both sit behind async traits so the service can be exercised with
// in-memory catalogs in tests. Failures are plain `eyre` reports; callers
// convert them into domain errors at the operation boundary.

use async_trait::async_trait;
use eyre::{Context, Result, eyre};
use serde::Deserialize;
use tracing::{debug, warn};

pub const DEFAULT_MEAL_DB_URL: &str = "https://www.themealdb.com/api/json/v1/1";
pub const DEFAULT_COCKTAIL_DB_URL: &str = "https://www.thecocktaildb.com/api/json/v1/1";

/// Raw recipe entry as returned by the recipe catalog
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MealEntry {
    #[serde(rename = "idMeal")]
    pub id: Option<String>,
    #[serde(rename = "strMeal")]
    pub name: Option<String>,
    #[serde(rename = "strCategory")]
    pub category: Option<String>,
    #[serde(rename = "strArea")]
    pub area: Option<String>,
    #[serde(rename = "strInstructions")]
    pub instructions: Option<String>,
    #[serde(rename = "strIngredient1")]
    pub ingredient1: Option<String>,
    #[serde(rename = "strIngredient2")]
    pub ingredient2: Option<String>,
}

/// Raw drink entry as returned by the drinks catalog
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DrinkEntry {
    #[serde(rename = "strDrink")]
    pub name: Option<String>,
    #[serde(rename = "strAlcoholic")]
    pub alcoholic: Option<String>,
    #[serde(rename = "strIngredient1")]
    pub ingredient1: Option<String>,
    #[serde(rename = "strIngredient2")]
    pub ingredient2: Option<String>,
}

/// Read-only recipe catalog
#[async_trait]
pub trait RecipeCatalog: Send + Sync {
    /// First entry matching the search term, or `None` if nothing matched
    async fn search_by_name(&self, term: &str) -> Result<Option<MealEntry>>;

    /// One random entry, or `None` if the catalog returned nothing
    async fn random(&self) -> Result<Option<MealEntry>>;
}

/// Read-only drinks catalog
#[async_trait]
pub trait DrinkCatalog: Send + Sync {
    async fn random(&self) -> Result<Option<DrinkEntry>>;
}

#[derive(Debug, Deserialize)]
struct MealsResponse {
    meals: Option<Vec<MealEntry>>,
}

#[derive(Debug, Deserialize)]
struct DrinksResponse {
    drinks: Option<Vec<DrinkEntry>>,
}

async fn get_json<T: for<'de> Deserialize<'de>>(request: reqwest::RequestBuilder, catalog: &str) -> Result<T> {
    let response = request
        .send()
        .await
        .with_context(|| format!("Failed to send request to {}", catalog))?;

    if !response.status().is_success() {
        let status = response.status();
        warn!(catalog, %status, "Catalog returned an error status");
        return Err(eyre!("{} returned status {}", catalog, status));
    }

    response
        .json()
        .await
        .with_context(|| format!("Failed to parse {} response", catalog))
}

/// HTTP client for TheMealDB
#[derive(Debug, Clone)]
pub struct MealDbClient {
    client: reqwest::Client,
    base_url: String,
}

impl MealDbClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Share an existing HTTP client (connection pool) with this catalog
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RecipeCatalog for MealDbClient {
    async fn search_by_name(&self, term: &str) -> Result<Option<MealEntry>> {
        debug!(term, "Searching recipe catalog");
        let request = self
            .client
            .get(format!("{}/search.php", self.base_url))
            .query(&[("s", term)]);

        let body: MealsResponse = get_json(request, "TheMealDB").await?;
        Ok(body.meals.and_then(|meals| meals.into_iter().next()))
    }

    async fn random(&self) -> Result<Option<MealEntry>> {
        debug!("Fetching random recipe");
        let request = self.client.get(format!("{}/random.php", self.base_url));

        let body: MealsResponse = get_json(request, "TheMealDB").await?;
        Ok(body.meals.and_then(|meals| meals.into_iter().next()))
    }
}

/// HTTP client for TheCocktailDB
#[derive(Debug, Clone)]
pub struct CocktailDbClient {
    client: reqwest::Client,
    base_url: String,
}

impl CocktailDbClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl DrinkCatalog for CocktailDbClient {
    async fn random(&self) -> Result<Option<DrinkEntry>> {
        debug!("Fetching random drink");
        let request = self.client.get(format!("{}/random.php", self.base_url));

        let body: DrinksResponse = get_json(request, "TheCocktailDB").await?;
        Ok(body.drinks.and_then(|drinks| drinks.into_iter().next()))
    }
}
