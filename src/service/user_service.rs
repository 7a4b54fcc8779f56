use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{error, info, instrument};

use crate::model::user::User;
use crate::repository::user_repo::{UserRepository, UserRepositoryImpl};
use crate::util::error::ServiceError;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};
use crate::util::password::{PasswordUtils, PasswordUtilsImpl};

#[derive(Debug, Clone, serde::Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct UserAuthResponse {
    pub user: UserWithoutPassword,
    pub tokens: AuthTokens,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct UserWithoutPassword {
    pub id: Option<ObjectId>,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
}

impl From<User> for UserWithoutPassword {
    fn from(user: User) -> Self {
        UserWithoutPassword {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
        }
    }
}

#[async_trait]
pub trait UserService: Send + Sync {
    async fn register(&self, user: User, password: String) -> Result<UserAuthResponse, ServiceError>;
    async fn login(&self, username: String, password: String)
        -> Result<UserAuthResponse, ServiceError>;
    async fn refresh_token(&self, refresh_token: String) -> Result<AuthTokens, ServiceError>;
}

pub struct UserServiceImpl {
    pub user_repo: Arc<UserRepositoryImpl>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
}

impl UserServiceImpl {
    pub fn new(user_repo: Arc<UserRepositoryImpl>, jwt_utils: Arc<JwtTokenUtilsImpl>) -> Self {
        Self { user_repo, jwt_utils }
    }

    fn tokens_for(&self, user: &User) -> Result<AuthTokens, ServiceError> {
        let pair = self
            .jwt_utils
            .generate_token_pair(
                &user.id.as_ref().map(|id| id.to_hex()).unwrap_or_default(),
                &user.email,
                &user.role,
            )
            .map_err(|e| ServiceError::InternalError(format!("JWT error: {}", e)))?;
        Ok(AuthTokens {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.expires_in,
            token_type: pair.token_type,
        })
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    #[instrument(skip(self, user, password), fields(username = %user.username))]
    async fn register(
        &self,
        mut user: User,
        password: String,
    ) -> Result<UserAuthResponse, ServiceError> {
        info!("Registering new user");

        if self
            .user_repo
            .find_by_username(&user.username)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(format!(
                "Username '{}' already exists",
                user.username
            )));
        }

        let hash = PasswordUtilsImpl::hash_password(&password)
            .map_err(|e| ServiceError::InvalidInput(format!("Password hash error: {}", e)))?;
        user.password_hash = hash;

        let inserted = self.user_repo.insert(user).await.map_err(|e| {
            error!("Failed to insert user: {e}");
            ServiceError::from(e)
        })?;

        let tokens = self.tokens_for(&inserted)?;
        Ok(UserAuthResponse {
            user: inserted.into(),
            tokens,
        })
    }

    #[instrument(skip(self, password), fields(username = %username))]
    async fn login(
        &self,
        username: String,
        password: String,
    ) -> Result<UserAuthResponse, ServiceError> {
        info!("User login attempt");

        let user = self
            .user_repo
            .find_by_username(&username)
            .await?
            .ok_or_else(|| {
                ServiceError::InvalidInput("Usuario o contraseña incorrectos".to_string())
            })?;

        let valid = PasswordUtilsImpl::verify_password(&password, &user.password_hash)
            .map_err(|e| ServiceError::InternalError(format!("Password verify error: {}", e)))?;
        if !valid {
            return Err(ServiceError::InvalidInput(
                "Usuario o contraseña incorrectos".to_string(),
            ));
        }

        info!(role = %user.role, "Login successful");
        let tokens = self.tokens_for(&user)?;
        Ok(UserAuthResponse {
            user: user.into(),
            tokens,
        })
    }

    #[instrument(skip(self, refresh_token))]
    async fn refresh_token(&self, refresh_token: String) -> Result<AuthTokens, ServiceError> {
        let claims = self
            .jwt_utils
            .validate_refresh_token(&refresh_token)
            .map_err(|e| ServiceError::InvalidInput(format!("Invalid refresh token: {}", e)))?;

        let id = ObjectId::parse_str(&claims.sub)
            .map_err(|_| ServiceError::InvalidInput("Invalid token subject".to_string()))?;
        let user = self
            .user_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User no longer exists".to_string()))?;

        self.tokens_for(&user)
    }
}
