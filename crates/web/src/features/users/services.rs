use storage::{UserStore, dto::user::CreateUserRequest, error::Result, models::User};
use uuid::Uuid;

/// Look up a user by username, creating it on first sight
pub async fn find_or_create(users: &dyn UserStore, request: &CreateUserRequest) -> Result<User> {
    users.find_or_create_user(request.username.trim()).await
}

pub async fn get_user(users: &dyn UserStore, user_id: Uuid) -> Result<User> {
    users.find_user(user_id).await
}
