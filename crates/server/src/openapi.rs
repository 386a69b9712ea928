use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct UserDoc {
    pub user_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<String>,
}

#[derive(ToSchema)]
pub struct UserRegisterDoc {
    pub user_id: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<String>,
}

#[derive(ToSchema)]
pub struct LoginFormDoc { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginResultDoc { pub success: bool, pub message: String }

#[derive(ToSchema)]
pub struct TweetDoc {
    pub tweet_id: String,
    pub content: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub by: UserDoc,
}

#[derive(ToSchema)]
pub struct ContentFormDoc { pub content: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::signup,
        crate::routes::users::login,
        crate::routes::users::list_users,
        crate::routes::users::show_user,
        crate::routes::users::update_user,
        crate::routes::users::delete_user,
        crate::routes::tweets::home,
        crate::routes::tweets::post_tweet,
        crate::routes::tweets::show_tweet,
        crate::routes::tweets::update_tweet,
        crate::routes::tweets::delete_tweet,
    ),
    components(
        schemas(
            HealthResponse,
            UserDoc,
            UserRegisterDoc,
            LoginFormDoc,
            LoginResultDoc,
            TweetDoc,
            ContentFormDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "Users"),
        (name = "Tweets")
    )
)]
pub struct ApiDoc;
