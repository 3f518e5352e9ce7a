//! Minimal REST client helpers for consumers (front-ends, scripts, tests).
//! Feature-gated by `rest-client` to avoid pulling reqwest in the server binary.

use super::endpoints as ep;
use super::*;

pub use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum RestError {
    #[error("http: {0}")]
    Http(String),
    #[error("status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("serde: {0}")]
    Serde(String),
}

impl RestError {
    pub fn status(&self) -> Option<u16> {
        match self {
            RestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn mk_client() -> Result<reqwest::Client, RestError> {
    reqwest::Client::builder()
        .build()
        .map_err(|e| RestError::Http(e.to_string()))
}

async fn check_status(res: reqwest::Response) -> Result<reqwest::Response, RestError> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(RestError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(res)
}

async fn handle_json<T: for<'de> serde::Deserialize<'de>>(
    res: reqwest::Response,
) -> Result<T, RestError> {
    check_status(res)
        .await?
        .json::<T>()
        .await
        .map_err(|e| RestError::Serde(e.to_string()))
}

pub async fn list_parties(base: &str) -> Result<Vec<PartySummaryDto>, RestError> {
    let client = mk_client()?;
    let res = client
        .get(ep::parties(base))
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_json(res).await
}

pub async fn get_party(base: &str, id: i32) -> Result<PartyDto, RestError> {
    let client = mk_client()?;
    let res = client
        .get(ep::party(base, id))
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_json(res).await
}

pub async fn pledge(base: &str, req: &PledgeReq) -> Result<PledgeResp, RestError> {
    let client = mk_client()?;
    let res = client
        .post(ep::pledge(base))
        .json(req)
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_json(res).await
}

pub async fn admin_login(base: &str, req: &LoginReq) -> Result<LoginResp, RestError> {
    let client = mk_client()?;
    let res = client
        .post(ep::admin_login(base))
        .json(req)
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_json(res).await
}

pub async fn admin_logout(base: &str, bearer: &str) -> Result<SuccessResp, RestError> {
    let client = mk_client()?;
    let res = client
        .post(ep::admin_logout(base))
        .bearer_auth(bearer)
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    handle_json(res).await
}

/// Downloads the workbook; returns the suggested filename and the raw bytes.
pub async fn admin_export(
    base: &str,
    creds: &AdminCredentials,
) -> Result<(Option<String>, Vec<u8>), RestError> {
    let client = mk_client()?;
    let res = client
        .get(ep::admin_export(base, creds))
        .send()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    let res = check_status(res).await?;
    let filename = res
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split("filename=").nth(1))
        .map(|v| v.trim_matches('"').to_string());
    let bytes = res
        .bytes()
        .await
        .map_err(|e| RestError::Http(e.to_string()))?;
    Ok((filename, bytes.to_vec()))
}
