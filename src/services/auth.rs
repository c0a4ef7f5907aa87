use actix_web::{
    dev::Payload, error::ErrorUnauthorized, web::Data, Error as ActixError, FromRequest,
    HttpRequest,
};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use std::sync::OnceLock;
use uuid::Uuid;

use crate::config::Config;
use crate::database::models::{AuthResponse, LoginInput, RegisterInput, User, UserRole};
use crate::database::repositories::UserRepository;
use crate::error::AppError;

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| Regex::new(r"^.+@.+\..+$").expect("valid email regex"))
}

/// Verified bearer identity, resolved once at the request boundary and
/// passed into handlers as an argument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    pub fn is_hr_admin(&self) -> bool {
        self.role == UserRole::HrAdmin
    }

    pub fn is_manager(&self) -> bool {
        self.role == UserRole::Manager
    }

    pub fn is_employee(&self) -> bool {
        self.role == UserRole::Employee
    }

    /// Guard for hr_admin-only operations.
    pub fn require_hr_admin(&self) -> Result<(), AppError> {
        if self.is_hr_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Not authorized to access this route".to_string(),
            ))
        }
    }

    /// Guard for operations open to managers and hr_admins.
    pub fn require_manager_or_hr_admin(&self) -> Result<(), AppError> {
        if self.is_hr_admin() || self.is_manager() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Not authorized to access this route".to_string(),
            ))
        }
    }
}

impl FromRequest for Claims {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth_header = req.headers().get("Authorization");

        if let Some(auth_header) = auth_header {
            if let Ok(auth_str) = auth_header.to_str() {
                if let Some(token) = auth_str.strip_prefix("Bearer ") {
                    if let Some(config) = req.app_data::<Data<Config>>() {
                        match decode::<Claims>(
                            token,
                            &DecodingKey::from_secret(config.jwt_secret.as_ref()),
                            &Validation::new(Algorithm::HS256),
                        ) {
                            Ok(token_data) => {
                                return ready(Ok(token_data.claims));
                            }
                            Err(_) => {
                                return ready(Err(ErrorUnauthorized("Invalid or expired token")));
                            }
                        }
                    }
                }
            }
        }

        ready(Err(ErrorUnauthorized(
            "Missing or invalid authorization header",
        )))
    }
}

#[derive(Clone)]
pub struct AuthService {
    user_repository: UserRepository,
    config: Config,
}

impl AuthService {
    pub fn new(user_repository: UserRepository, config: Config) -> Self {
        Self {
            user_repository,
            config,
        }
    }

    pub async fn register(&self, request: RegisterInput) -> Result<AuthResponse, AppError> {
        let email = request.email.trim().to_lowercase();

        if !email_regex().is_match(&email) {
            return Err(AppError::BadRequest(
                "Please enter a valid email address".to_string(),
            ));
        }

        if self.user_repository.email_exists(&email).await? {
            return Err(AppError::BadRequest(
                "User with this email already exists".to_string(),
            ));
        }

        let password_hash = hash(&request.password, DEFAULT_COST)?;
        let role = request.role.unwrap_or_default();
        let user = User::new(request.name, email, password_hash, role);

        self.user_repository.create_user(&user).await?;

        let token = self.generate_token(&user)?;

        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    pub async fn login(&self, request: LoginInput) -> Result<AuthResponse, AppError> {
        let email = request.email.trim().to_lowercase();

        let user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify(&request.password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let token = self.generate_token(&user)?;

        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_ref()),
            &Validation::new(Algorithm::HS256),
        )?;

        Ok(token_data.claims)
    }

    pub fn generate_token(&self, user: &User) -> Result<String, AppError> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::days(self.config.jwt_expiration_days))
            .ok_or_else(|| AppError::internal_server_error_message("invalid expiry timestamp"))?
            .timestamp() as usize;

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            exp: expiration,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )?;

        Ok(token)
    }
}
