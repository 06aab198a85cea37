/**
 * User Sync Middleware
 *
 * Runs after `auth_middleware`. Makes sure the authenticated user has a
 * row in the local `users` table, copying it from the main database the
 * first time the user hits this service.
 */

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, info};

use super::auth::AuthenticatedUser;
use crate::backend::auth::users::{fetch_main_user, find_local_user, is_unique_violation, upsert_user};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Ensure the local user row exists
///
/// - 404 when the main database does not know the user
/// - a unique-constraint race on insert counts as success
/// - any other failure is a 500
pub async fn ensure_user_exists(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let Some(user) = request.extensions().get::<AuthenticatedUser>().cloned() else {
        return Ok(next.run(request).await);
    };

    let local_db = app_state.db()?;
    if find_local_user(local_db, &user.user_id, &user.email).await?.is_some() {
        debug!("User {} already present locally", user.user_id);
        return Ok(next.run(request).await);
    }

    info!("User {} not found locally, syncing from main database", user.user_id);
    let main_db = app_state.main_db()?;

    let main_user = fetch_main_user(main_db, &user.user_id).await.map_err(|e| {
        error!("Failed to load user {} from main database: {:?}", user.user_id, e);
        BackendError::handler(
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            "User sync failed. Please try again.",
        )
    })?;

    let Some(main_user) = main_user else {
        return Err(BackendError::not_found("User not found. Please sign in again."));
    };

    match upsert_user(local_db, &main_user).await {
        Ok(synced) => info!("User {} synced from main database", synced.email),
        Err(e) if is_unique_violation(&e) => {
            debug!("User {} was synced concurrently", user.user_id);
        }
        Err(e) => {
            error!("Failed to store user {}: {:?}", user.user_id, e);
            return Err(BackendError::handler(
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "User sync failed. Please try again.",
            ));
        }
    }

    Ok(next.run(request).await)
}
