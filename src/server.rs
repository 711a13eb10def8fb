// HTTP surface
//
// Thin routing over `FavoritesService`:
//
// | Method | Path                      | Operation          |
// |--------|---------------------------|--------------------|
// | POST   | /api/favorites            | add favorite       |
// | GET    | /api/favorites            | list favorites     |
// | PUT    | /api/favorites/{id}       | rename favorite    |
// | DELETE | /api/favorites/{id}       | remove favorite    |
// | GET    | /api/pairing/suggestion   | pairing suggestion |
//
// All favorites routes accept `?format=default|xml|proto`.

use crate::catalog::{CocktailDbClient, DrinkCatalog, MealDbClient, RecipeCatalog};
use crate::config::Config;
use crate::error::StatusClass;
use crate::format::{Format, ListSchema, SchemaSlot};
use crate::pairing::PairingComposer;
use crate::service::{FavoritesService, Response};
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::Router;
use eyre::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

// Ids are assigned from 1, so 0 never matches a stored record
const UNKNOWN_ID: i64 = 0;

type SharedService = Arc<FavoritesService>;

const FORMAT_PARAM: &str = "format";

// Raw pairs so a repeated or odd selector never rejects the request
type QueryPairs = Option<Query<Vec<(String, String)>>>;

/// First `format` value wins; anything unrecognized is the default format
fn requested_format(query: &QueryPairs) -> Format {
    let tag = query.as_ref().and_then(|Query(pairs)| {
        pairs
            .iter()
            .find(|(key, _)| key == FORMAT_PARAM)
            .map(|(_, value)| value.as_str())
    });
    Format::from_tag(tag)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddFavoriteBody {
    meal_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenameFavoriteBody {
    new_name: Option<String>,
}

/// Missing or malformed bodies read as "no fields given"
fn parse_body<T: for<'de> Deserialize<'de> + Default>(body: &Bytes) -> T {
    serde_json::from_slice(body).unwrap_or_default()
}

fn parse_id(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(UNKNOWN_ID)
}

fn into_http(response: Response) -> axum::response::Response {
    let status = StatusCode::from_u16(response.status.http_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if response.status == StatusClass::NoContent {
        return status.into_response();
    }
    (status, [(header::CONTENT_TYPE, response.body.content_type)], response.body.bytes).into_response()
}

async fn add_favorite(
    State(service): State<SharedService>,
    query: QueryPairs,
    body: Bytes,
) -> axum::response::Response {
    let body: AddFavoriteBody = parse_body(&body);
    into_http(service.add_favorite(body.meal_name.as_deref(), requested_format(&query)).await)
}

async fn list_favorites(State(service): State<SharedService>, query: QueryPairs) -> axum::response::Response {
    into_http(service.list_favorites(requested_format(&query)))
}

async fn rename_favorite(
    State(service): State<SharedService>,
    Path(id): Path<String>,
    query: QueryPairs,
    body: Bytes,
) -> axum::response::Response {
    let body: RenameFavoriteBody = parse_body(&body);
    into_http(service.rename_favorite(parse_id(&id), body.new_name.as_deref(), requested_format(&query)))
}

async fn remove_favorite(
    State(service): State<SharedService>,
    Path(id): Path<String>,
    query: QueryPairs,
) -> axum::response::Response {
    into_http(service.remove_favorite(parse_id(&id), requested_format(&query)))
}

async fn pairing_suggestion(State(service): State<SharedService>) -> axum::response::Response {
    into_http(service.pairing_suggestion().await)
}

pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/api/favorites", post(add_favorite).get(list_favorites))
        .route("/api/favorites/:id", put(rename_favorite).delete(remove_favorite))
        .route("/api/pairing/suggestion", get(pairing_suggestion))
        .with_state(service)
}

/// Load the binary schema in the background and fill `slot` when done
///
/// Until then, binary listings answer with an "encoder not ready" error.
pub fn spawn_schema_loader(slot: SchemaSlot, path: Option<PathBuf>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match ListSchema::load(path.as_deref()).await {
            Ok(schema) => {
                slot.fill(schema);
                debug!("Binary encoder ready");
            }
            Err(e) => error!(error = ?e, "Failed to load binary schema, proto responses unavailable"),
        }
    })
}

/// Build the service from config, wired to the real catalogs
pub fn build_service(config: &Config, schema: SchemaSlot) -> FavoritesService {
    let http = reqwest::Client::new();
    let recipes: Arc<dyn RecipeCatalog> = Arc::new(MealDbClient::with_client(http.clone(), &config.meal_db_url));
    let drinks: Arc<dyn DrinkCatalog> = Arc::new(CocktailDbClient::with_client(http, &config.cocktail_db_url));

    let composer = PairingComposer::new(Arc::clone(&recipes), drinks);
    FavoritesService::new(recipes, composer, schema)
}

/// Serve until the process is stopped
pub async fn serve(config: &Config) -> Result<()> {
    let schema = SchemaSlot::new();
    spawn_schema_loader(schema.clone(), config.schema_path.clone());

    let service = Arc::new(build_service(config, schema));

    let listener = TcpListener::bind(&config.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen))?;
    info!(addr = %config.listen, "recipebox listening");

    axum::serve(listener, router(service)).await.context("HTTP server failed")?;
    Ok(())
}
