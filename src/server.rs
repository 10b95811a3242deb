use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::{
    net::SocketAddr,
    str::FromStr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::{SystemTime, UNIX_EPOCH},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::{ApiItem, ApiRecommendRequest, ApiRecommendResponse, CatalogQuery};
use outfit_advisor::{recommend, Category, Engine};

#[derive(Clone)]
struct AppState {
    engine: Arc<Engine>,
}

static REQUEST_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub async fn serve(engine: Engine, args: crate::ServeArgs) -> Result<(), String> {
    let state = AppState {
        engine: Arc::new(engine),
    };

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/catalog", get(catalog_handler))
        .route("/api/recommend", post(recommend_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;

    tracing::info!(%addr, "serving outfit recommendations");
    axum::serve(tokio::net::TcpListener::bind(addr).await.map_err(|err| {
        format!("failed to bind server: {}", err)
    })?, app)
    .await
    .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn catalog_handler(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<ApiItem>>, (StatusCode, String)> {
    let category = query
        .category
        .as_deref()
        .map(Category::from_str)
        .transpose()
        .map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()))?;

    let items = state
        .engine
        .catalog()
        .iter()
        .filter(|(_, item)| category.map_or(true, |category| item.fits_category(category)))
        .map(|(id, item)| ApiItem {
            id: id.to_string(),
            item: item.clone(),
        })
        .collect();
    Ok(Json(items))
}

async fn recommend_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiRecommendRequest>,
) -> Result<Json<ApiRecommendResponse>, (StatusCode, String)> {
    let request_id = request
        .request_id
        .clone()
        .unwrap_or_else(generate_request_id);
    let (forecast, category) = request
        .into_input(&state.engine)
        .map_err(|err| (StatusCode::BAD_REQUEST, err))?;

    let output = recommend(&state.engine, forecast, category);
    for warning in &output.selection.warnings {
        tracing::warn!(request_id = request_id.as_str(), "{}", warning);
    }

    Ok(Json(ApiRecommendResponse::from_output(output, request_id)))
}

fn generate_request_id() -> String {
    let counter = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("req-{}-{}", now_ms(), counter)
}

fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis())
        .unwrap_or(0)
}
