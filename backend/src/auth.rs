use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use chrono::{Duration, Utc};
use diesel::prelude::*;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::db;
use crate::error::ApiError;
use crate::models::User;
use crate::schema::{customers, shopkeepers, users};
use crate::AppState;

/// Stakeholder roles that may register and log in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Customer,
    Shopkeeper,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "customer" => Some(Role::Customer),
            "shopkeeper" => Some(Role::Shopkeeper),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Shopkeeper => "shopkeeper",
        }
    }
}

/// Placeholder for a real password hash; credential storage is an
/// external collaborator and only the shape is kept here.
fn stub_hash(password: &str) -> String {
    format!("hash_{}", password)
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
}

pub fn create_token(user_id: &str, jwt_secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = (Utc::now() + Duration::hours(24)).timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiration,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
}

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims.sub)
}

/// Bearer-token guard for the product mutation routes.
pub async fn authenticate(
    headers: HeaderMap,
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;
    let token = auth_header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header format".to_string()))?;
    let user_id = validate_token(token, &state.config.jwt_secret)
        .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;
    log::info!("Authenticated user: {}", user_id);
    Ok(next.run(request).await)
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user_id: i32,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Serialize)]
pub struct UserInfo {
    pub id: i32,
    pub name: String,
    pub role: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: UserInfo,
    pub token: String,
}

fn insert_stakeholder(conn: &mut PgConnection, role: Role, name: &str) -> QueryResult<i32> {
    match role {
        Role::Customer => diesel::insert_into(customers::table)
            .values(customers::name.eq(name))
            .returning(customers::id)
            .get_result(conn),
        Role::Shopkeeper => diesel::insert_into(shopkeepers::table)
            .values(shopkeepers::name.eq(name))
            .returning(shopkeepers::id)
            .get_result(conn),
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let role = Role::parse(&req.role).ok_or_else(|| {
        ApiError::Validation("Invalid role specified for registration.".to_string())
    })?;
    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "Name, email and password are required.".to_string(),
        ));
    }

    let user_id = db::run_blocking(&state.pool, move |conn| {
        let existing = users::table
            .filter(users::email.eq(&req.email))
            .select(users::id)
            .first::<i32>(conn)
            .optional()?;
        if existing.is_some() {
            return Err(ApiError::Conflict(
                "User with this email already exists.".to_string(),
            ));
        }

        let stakeholder_id = insert_stakeholder(conn, role, &req.name)?;
        diesel::insert_into(users::table)
            .values((
                users::email.eq(&req.email),
                users::password_hash.eq(stub_hash(&req.password)),
                users::role.eq(role.as_str()),
                users::stakeholder_id.eq(stakeholder_id),
            ))
            .execute(conn)?;
        Ok(stakeholder_id)
    })
    .await?;

    log::info!("Registered new {} with id {}", role.as_str(), user_id);
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: format!(
                "Registration successful for {}! Please proceed to login.",
                role.as_str()
            ),
            user_id,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let role = Role::parse(&req.role)
        .ok_or_else(|| ApiError::Validation("Invalid role selected.".to_string()))?;
    let jwt_secret = state.config.jwt_secret.clone();

    let response = db::run_blocking(&state.pool, move |conn| {
        let record = users::table
            .filter(users::email.eq(&req.email))
            .filter(users::role.eq(role.as_str()))
            .first::<User>(conn)
            .optional()?;
        let user = record.ok_or_else(|| {
            ApiError::Unauthorized("Invalid email, password, or role selected.".to_string())
        })?;

        if stub_hash(&req.password) != user.password_hash {
            return Err(ApiError::Unauthorized(
                "Invalid email or password.".to_string(),
            ));
        }
        let stakeholder_id = user.stakeholder_id;

        let name = match role {
            Role::Customer => customers::table
                .find(stakeholder_id)
                .select(customers::name)
                .first::<String>(conn)
                .optional()?,
            Role::Shopkeeper => shopkeepers::table
                .find(stakeholder_id)
                .select(shopkeepers::name)
                .first::<String>(conn)
                .optional()?,
        };
        let name = name.ok_or_else(|| {
            ApiError::Unauthorized("Authentication failed: user profile missing.".to_string())
        })?;

        let token = create_token(&stakeholder_id.to_string(), &jwt_secret)
            .map_err(|e| ApiError::Store(format!("token issuance: {}", e)))?;

        let message = format!("Welcome back, {}!", name);
        Ok(LoginResponse {
            success: true,
            message,
            user: UserInfo {
                id: stakeholder_id,
                name,
                role: role.as_str().to_string(),
            },
            token,
        })
    })
    .await?;

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parsing_is_closed() {
        assert_eq!(Role::parse("customer"), Some(Role::Customer));
        assert_eq!(Role::parse("shopkeeper"), Some(Role::Shopkeeper));
        assert_eq!(Role::parse("delivery"), None);
        assert_eq!(Role::parse("Customer"), None);
    }

    #[test]
    fn token_round_trip() {
        let token = create_token("42", "test-secret").unwrap();
        assert_eq!(validate_token(&token, "test-secret").unwrap(), "42");
        assert!(validate_token(&token, "wrong-secret").is_err());
    }
}
