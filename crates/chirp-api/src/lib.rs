pub mod accounts;
pub mod messages;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use chirp_service::SocialService;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub service: SocialService,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/register", post(accounts::register))
        .route("/login", post(accounts::login))
        .route(
            "/messages",
            post(messages::create_message).get(messages::get_all_messages),
        )
        .route(
            "/messages/{id}",
            get(messages::get_message)
                .delete(messages::delete_message)
                .patch(messages::update_message),
        )
        .route(
            "/accounts/{id}/messages",
            get(messages::get_messages_for_user),
        )
        .with_state(state)
}
