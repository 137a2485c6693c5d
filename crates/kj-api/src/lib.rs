//! kj-api: REST API for the singer queue.
//!
//! The remote control used by the host: sign singers up, start the show,
//! advance or skip the current singer, and read the queue.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/api/v1/queue` | Now singing, up next, waiting list |
//! | GET | `/api/v1/entries` | All rows in table order |
//! | POST | `/api/v1/entries` | Register a singer |
//! | GET | `/api/v1/next` | Who would be called up next |
//! | POST | `/api/v1/show/start` | Sort the queue and fill the stage |
//! | POST | `/api/v1/show/advance` | Current singer is done |
//! | POST | `/api/v1/show/skip` | Swap current and up-next singers |
//! | GET | `/healthz` | Liveness probe |

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use kj_rotation::Rotation;
use kj_store::QueueStore;
use tokio::sync::Mutex;

/// Shared state for API handlers.
///
/// The rotation sits behind a single mutex: scheduler calls must never
/// interleave against the same snapshot.
#[derive(Clone)]
pub struct ApiState {
    pub rotation: Arc<Mutex<Rotation<QueueStore>>>,
}

impl ApiState {
    pub fn new(rotation: Rotation<QueueStore>) -> Self {
        Self {
            rotation: Arc::new(Mutex::new(rotation)),
        }
    }
}

/// Build the complete API router over a queue store.
pub fn build_router(store: QueueStore) -> Router {
    router_with_state(ApiState::new(Rotation::new(store)))
}

/// Build the router around an existing state (custom clock, shared store).
pub fn router_with_state(state: ApiState) -> Router {
    let api_routes = Router::new()
        .route("/queue", get(handlers::get_queue))
        .route("/entries", get(handlers::list_entries).post(handlers::register_singer))
        .route("/next", get(handlers::peek_next))
        .route("/show/start", post(handlers::start_show))
        .route("/show/advance", post(handlers::advance))
        .route("/show/skip", post(handlers::skip))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/healthz", get(handlers::healthz))
}
