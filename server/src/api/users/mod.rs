pub mod avatar;
pub mod get;
pub mod list;
pub mod me;
pub mod set_password;
pub mod signup;
pub mod subscribe;
pub mod subscriptions;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/users endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list::list_users).post(signup::signup))
        .route("/api/users/me", get(me::get_me))
        .route(
            "/api/users/me/avatar",
            get(avatar::get_avatar)
                .put(avatar::set_avatar)
                .delete(avatar::delete_avatar),
        )
        .route("/api/users/set_password", post(set_password::set_password))
        .route(
            "/api/users/subscriptions",
            get(subscriptions::list_subscriptions),
        )
        .route("/api/users/{id}", get(get::get_user))
        .route(
            "/api/users/{id}/subscribe",
            post(subscribe::subscribe).delete(subscribe::unsubscribe),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        signup::signup,
        list::list_users,
        get::get_user,
        me::get_me,
        avatar::get_avatar,
        avatar::set_avatar,
        avatar::delete_avatar,
        set_password::set_password,
        subscribe::subscribe,
        subscribe::unsubscribe,
        subscriptions::list_subscriptions,
    ),
    components(schemas(
        signup::SignupRequest,
        signup::SignupResponse,
        list::UserListResponse,
        avatar::AvatarRequest,
        avatar::AvatarResponse,
        set_password::SetPasswordRequest,
        subscriptions::SubscriptionListResponse,
    ))
)]
pub struct ApiDoc;
