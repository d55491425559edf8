use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

use super::{
    admin, announcements, auth, bookmarks, categories, comments, history, images, masjids, meta,
    posts, users,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(meta::router(state.clone()))
        .merge(auth::router(state.clone()))
        .merge(posts::router(state.clone()))
        .merge(masjids::router(state.clone()))
        .merge(comments::router(state.clone()))
        .merge(bookmarks::router(state.clone()))
        .merge(history::router(state.clone()))
        .merge(images::router(state.clone()))
        .merge(users::router(state.clone()))
        .merge(categories::router(state.clone()))
        .merge(announcements::router(state.clone()))
        .merge(admin::router(state))
}
