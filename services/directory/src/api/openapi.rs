//! OpenAPI document assembly for the directory API.
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::auth::token::login,
        crate::auth::token::logout,
        crate::auth::token::me,
        crate::api::users::list_users,
        crate::api::users::create_user,
        crate::api::users::update_user,
        crate::api::users::delete_user,
        crate::api::users::set_temp_password,
        crate::api::users::password_reset,
        crate::api::permissions::get_policy,
        crate::api::permissions::put_policy,
        crate::api::system::system_info,
        crate::api::system::system_health,
    ),
    components(schemas(
        crate::api::types::ErrorResponse,
        crate::api::types::LoginRequest,
        crate::api::types::LoginResponse,
        crate::api::types::UserListResponse,
        crate::api::types::CreateUserRequest,
        crate::api::types::UpdateUserRequest,
        crate::api::types::TempPasswordRequest,
        crate::api::types::SavePolicyRequest,
        crate::api::types::PolicyResponse,
        crate::api::types::SystemInfoResponse,
        crate::api::types::HealthResponse,
        crate::model::UserView,
        crate::model::UserStatus,
    )),
    tags(
        (name = "auth", description = "Token login and session endpoints"),
        (name = "users", description = "User directory CRUD"),
        (name = "permissions", description = "Per-role policy persistence"),
        (name = "system", description = "Service identity and health")
    )
)]
pub struct ApiDoc;
