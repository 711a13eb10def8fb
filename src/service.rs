// Favorites service
//
// The five operations exposed to the routing layer. Each one returns a
// status class and an encoded body, and each one is the point where catalog
// failures become domain errors.

use crate::catalog::RecipeCatalog;
use crate::error::{Error, Result, StatusClass};
use crate::format::{Encoded, Format, FormatEncoder, Payload, SchemaSlot};
use crate::normalize::normalize_meal;
use crate::pairing::PairingComposer;
use crate::record::{ErrorBody, FavoriteRecord};
use crate::store::FavoritesRepository;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Status class plus encoded body
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: StatusClass,
    pub body: Encoded,
}

pub struct FavoritesService {
    repository: FavoritesRepository,
    recipes: Arc<dyn RecipeCatalog>,
    composer: PairingComposer,
    encoder: FormatEncoder,
}

impl FavoritesService {
    pub fn new(recipes: Arc<dyn RecipeCatalog>, composer: PairingComposer, schema: SchemaSlot) -> Self {
        Self {
            repository: FavoritesRepository::new(),
            recipes,
            composer,
            encoder: FormatEncoder::new(schema),
        }
    }

    pub fn repository(&self) -> &FavoritesRepository {
        &self.repository
    }

    /// Look up a recipe by name and store it as a favorite
    pub async fn add_favorite(&self, meal_name: Option<&str>, format: Format) -> Response {
        let result = self.try_add(meal_name).await;
        match result {
            Ok(record) => self.respond(StatusClass::Created, Payload::Record(&record), format),
            Err(e) => self.fail(e, format),
        }
    }

    async fn try_add(&self, meal_name: Option<&str>) -> Result<FavoriteRecord> {
        let term = match meal_name.map(str::trim) {
            Some(term) if !term.is_empty() => term,
            _ => return Err(Error::InvalidInput("The 'mealName' field is required in the request body".to_string())),
        };

        let entry = self.recipes.search_by_name(term).await.map_err(|e| {
            error!(term, error = ?e, "Recipe lookup failed");
            Error::UpstreamError(format!("recipe catalog: {:#}", e))
        })?;

        // No suspension point from here on: normalize, then check-and-append
        let candidate = normalize_meal(entry, term, Utc::now())?;
        self.repository.add(candidate)
    }

    pub fn list_favorites(&self, format: Format) -> Response {
        let records = self.repository.list();
        debug!(count = records.len(), %format, "Listing favorites");
        self.respond(StatusClass::Ok, Payload::Collection(&records), format)
    }

    pub fn rename_favorite(&self, id: i64, new_name: Option<&str>, format: Format) -> Response {
        match self.repository.rename(id, new_name) {
            Ok(record) => self.respond(StatusClass::Ok, Payload::Record(&record), format),
            Err(e) => self.fail(e, format),
        }
    }

    pub fn remove_favorite(&self, id: i64, format: Format) -> Response {
        match self.repository.remove(id) {
            Ok(()) => self.respond(StatusClass::NoContent, Payload::Empty, format),
            Err(e) => self.fail(e, format),
        }
    }

    pub async fn pairing_suggestion(&self) -> Response {
        match self.composer.suggest().await {
            Ok(suggestion) => self.respond(StatusClass::Ok, Payload::Pairing(&suggestion), Format::Default),
            Err(e) => self.fail(e, Format::Default),
        }
    }

    fn respond(&self, status: StatusClass, payload: Payload<'_>, format: Format) -> Response {
        match self.encoder.encode(payload, format) {
            Ok(body) => Response { status, body },
            Err(e) => self.fail(e, Format::Default),
        }
    }

    /// Render an error in the caller's format
    fn fail(&self, err: Error, format: Format) -> Response {
        let status = err.status();
        match status {
            StatusClass::UpstreamUnavailable | StatusClass::ServerError => {
                error!(error = %err, %format, "Request failed")
            }
            _ => warn!(error = %err, "Request rejected"),
        }

        let body = ErrorBody::new(err.public_message());
        let encoded = self
            .encoder
            .encode(Payload::Error(&body), format)
            .or_else(|_| self.encoder.encode(Payload::Error(&body), Format::Default));

        match encoded {
            Ok(body) => Response { status, body },
            Err(e) => {
                error!(error = %e, "Failed to encode error body");
                Response {
                    status: StatusClass::ServerError,
                    body: Encoded::empty(),
                }
            }
        }
    }
}
