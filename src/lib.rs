// recipebox - favorite recipes with JSON, XML and protobuf responses

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod normalize;
pub mod pairing;
pub mod record;
pub mod server;
pub mod service;
pub mod store;

// Re-export main types for convenience
pub use catalog::{CocktailDbClient, DrinkCatalog, MealDbClient, RecipeCatalog};
pub use config::Config;
pub use error::{Error, Result, StatusClass};
pub use format::{Encoded, Format, FormatEncoder, ListSchema, Payload, SchemaSlot};
pub use pairing::{PairingComposer, PairingSuggestion};
pub use record::{Candidate, ErrorBody, FavoriteRecord};
pub use service::{FavoritesService, Response};
pub use store::FavoritesRepository;
