//! Cuentas de acceso: inscription y connexion

use crate::config::environment::EnvironmentConfig;
use crate::dto::common::ApiResponse;
use crate::dto::user_dto::{LoginRequest, LoginResponse, RegisterRequest};
use crate::repositories::user_repository::UserRepository;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::generate_token;
use crate::utils::validation::require_not_empty;

pub struct UserController {
    users: UserRepository,
    config: EnvironmentConfig,
}

impl UserController {
    pub fn new(state: &AppState) -> Self {
        Self {
            users: UserRepository::new(state.pool.clone()),
            config: state.config.clone(),
        }
    }

    pub async fn register(
        &self,
        request: RegisterRequest,
    ) -> Result<ApiResponse<()>, AppError> {
        require_not_empty(&request.username, "Tous les champs sont obligatoires")?;
        require_not_empty(&request.password, "Tous les champs sont obligatoires")?;

        let hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Hash(format!("Error hasheando el password: {}", e)))?;

        self.users
            .create(&request.username, &hash, request.agent, request.role)
            .await?;

        Ok(ApiResponse::message_only("Inscription réussie".to_string()))
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        // Mismo mensaje para usuario inexistente y password incorrecto
        let invalid = || {
            AppError::Unauthorized(
                "Nom d'utilisateur ou mot de passe incorrect".to_string(),
            )
        };

        let user = self
            .users
            .find_by_username(&request.username)
            .await?
            .ok_or_else(invalid)?;

        let matches = bcrypt::verify(&request.password, &user.password_user)
            .map_err(|e| AppError::Hash(format!("Error verificando el password: {}", e)))?;
        if !matches {
            return Err(invalid());
        }

        let token = generate_token(user.id, &self.config.jwt_secret, self.config.jwt_expiration)?;

        Ok(LoginResponse {
            id: user.id,
            username_user: user.username_user,
            agent_user_id: user.agent_user_id,
            role_user_id: user.role_user_id,
            token,
        })
    }
}
