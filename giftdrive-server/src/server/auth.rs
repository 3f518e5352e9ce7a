use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use giftdrive_shared::api::{AdminCredentials, LoginReq, LoginResp, SuccessResp};
use giftdrive_shared::jwt::{self, AdminClaims};
use std::sync::LazyLock;
use tracing::{Span, error, info, warn};

use super::{AppError, AppState};

/// How many days of inactivity before an admin session is considered expired.
const SESSION_IDLE_DAYS: i64 = 14;
/// How many days before mandatory re-login.
const TOKEN_TTL_DAYS: i64 = 30;

/// Verified against when the email matches no admin.
static UNKNOWN_ADMIN_HASH: LazyLock<String> = LazyLock::new(|| {
    bcrypt::hash("giftdrive-unknown-admin", bcrypt::DEFAULT_COST).unwrap_or_default()
});

/// The authenticated admin behind a request.
#[derive(Clone, Debug)]
pub struct AdminCtx {
    pub email: String,
}

/// `Authorization: Bearer <token>`, if the request carries one.
#[derive(Clone, Debug, Default)]
pub struct BearerToken(pub Option<String>);

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Ok(BearerToken(token))
    }
}

/// Admin gate used by every privileged handler. Credentials win over a
/// bearer token; the token is only considered when `jwt_secret` is set.
pub async fn authorize(
    state: &AppState,
    bearer: &BearerToken,
    creds: &AdminCredentials,
) -> Result<AdminCtx, AppError> {
    let ctx = if creds.email.is_some() || creds.password.is_some() {
        verify_credentials(state, creds).await?
    } else if let (Some(token), Some(secret)) = (&bearer.0, &state.config.jwt_secret) {
        verify_token(state, token, secret.as_bytes()).await?
    } else {
        warn!("auth: no credentials supplied");
        return Err(AppError::unauthorized());
    };
    Span::current().record("admin", tracing::field::display(&ctx.email));
    Ok(ctx)
}

async fn verify_credentials(
    state: &AppState,
    creds: &AdminCredentials,
) -> Result<AdminCtx, AppError> {
    let (Some(email), Some(password)) = (creds.email.as_deref(), creds.password.as_deref()) else {
        warn!("auth: incomplete credentials");
        return Err(AppError::unauthorized());
    };
    let admin = state.store.find_admin(email).await.map_err(|e| {
        error!(email, error=%e, "auth: find_admin failed");
        AppError::internal(e)
    })?;
    let Some(admin) = admin else {
        // Burn one bcrypt run so unknown emails answer as slowly as wrong passwords
        let password = password.to_string();
        let _ = tokio::task::spawn_blocking(move || {
            bcrypt::verify(&password, UNKNOWN_ADMIN_HASH.as_str())
        })
        .await;
        warn!(email, "auth: unknown admin");
        return Err(AppError::unauthorized());
    };
    let password = password.to_string();
    let hash = admin.password_hash.clone();
    let ok = tokio::task::spawn_blocking(move || bcrypt::verify(&password, &hash))
        .await
        .map_err(AppError::internal)?
        .map_err(|e| {
            error!(email, error=%e, "auth: bcrypt verify failed");
            AppError::internal(e)
        })?;
    if !ok {
        warn!(email, "auth: invalid password");
        return Err(AppError::unauthorized());
    }
    Ok(AdminCtx { email: admin.email })
}

async fn verify_token(state: &AppState, token: &str, secret: &[u8]) -> Result<AdminCtx, AppError> {
    let claims = jwt::decode_and_verify(token, secret).map_err(|e| {
        warn!(error=%e, "auth: jwt decode failed");
        AppError::unauthorized()
    })?;
    let admin = state
        .store
        .find_admin(&claims.sub)
        .await
        .map_err(AppError::internal)?;
    if admin.is_none() {
        warn!(email = %claims.sub, "auth: token for unknown admin");
        return Err(AppError::unauthorized());
    }
    let cutoff = Utc::now() - Duration::days(SESSION_IDLE_DAYS);
    match state
        .store
        .touch_session_with_cutoff(&claims.jti, cutoff.naive_utc())
        .await
    {
        Ok(true) => Ok(AdminCtx { email: claims.sub }),
        Ok(false) => {
            warn!(
                jti = %claims.jti,
                email = %claims.sub,
                cutoff = %cutoff,
                idle_days = SESSION_IDLE_DAYS,
                "auth: session missing or expired (last_used_at < cutoff)"
            );
            Err(AppError::unauthorized())
        }
        Err(e) => {
            error!(jti = %claims.jti, error=%e, "auth: touch_session_with_cutoff failed");
            Err(AppError::internal(e))
        }
    }
}

fn token_secret(state: &AppState) -> Result<&[u8], AppError> {
    state
        .config
        .jwt_secret
        .as_deref()
        .map(str::as_bytes)
        .ok_or_else(|| AppError::not_found("Token login is disabled"))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginReq>,
) -> Result<Json<LoginResp>, AppError> {
    let secret = token_secret(&state)?;
    let creds = AdminCredentials::new(body.email, body.password);
    let admin = verify_credentials(&state, &creds).await?;

    let jti = uuid::Uuid::new_v4().to_string();
    let expires: DateTime<Utc> = Utc::now() + Duration::days(TOKEN_TTL_DAYS);
    let claims = AdminClaims {
        sub: admin.email.clone(),
        jti: jti.clone(),
        exp: expires.timestamp(),
    };
    state
        .store
        .create_session(&jti, &admin.email)
        .await
        .map_err(|e| {
            error!(email = %admin.email, error=%e, "login: create_session failed");
            AppError::internal(e)
        })?;
    let token = jwt::encode(&claims, secret).map_err(|e| {
        error!(email = %admin.email, error=%e, "login: jwt encode failed");
        AppError::internal(e)
    })?;
    info!(email = %admin.email, "login: session issued");
    Ok(Json(LoginResp {
        token,
        expires_at: expires.to_rfc3339(),
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    bearer: BearerToken,
) -> Result<Json<SuccessResp>, AppError> {
    let secret = token_secret(&state)?;
    let Some(token) = bearer.0 else {
        return Err(AppError::unauthorized());
    };
    let claims = jwt::decode_and_verify(&token, secret).map_err(|e| {
        warn!(error=%e, "logout: jwt decode failed");
        AppError::unauthorized()
    })?;
    let removed = state
        .store
        .delete_session(&claims.jti)
        .await
        .map_err(AppError::internal)?;
    info!(email = %claims.sub, removed, "logout: session closed");
    Ok(Json(SuccessResp { success: true }))
}
