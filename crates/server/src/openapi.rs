use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Example user fields. Any JSON object is accepted; `id` is always assigned
/// by the server.
#[derive(ToSchema)]
pub struct UserFieldsDoc {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(ToSchema)]
pub struct IdReplyDoc { pub status: String, pub id: i64 }

#[derive(ToSchema)]
pub struct StatusReplyDoc { pub status: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::list_users,
        crate::routes::users::create_user,
        crate::routes::users::update_user,
        crate::routes::users::delete_user,
        crate::routes::users::delete_all_users,
    ),
    components(
        schemas(
            HealthResponse,
            UserFieldsDoc,
            IdReplyDoc,
            StatusReplyDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "users")
    )
)]
pub struct ApiDoc;
