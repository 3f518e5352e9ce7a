use serde::{Deserialize, Serialize};

pub mod endpoints;
mod lenient;
#[cfg(feature = "rest-client")]
pub mod rest;

// Admin credentials are re-sent with every privileged call, either inside the
// JSON body or as query parameters.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl AdminCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Body of every admin write: credentials next to the resource fields.
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminReq<T> {
    #[serde(flatten)]
    pub credentials: AdminCredentials,
    #[serde(flatten)]
    pub payload: T,
}

/// Query string of admin reads, deletes and the export.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AdminQuery {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub id: Option<i32>,
}

impl AdminQuery {
    pub fn credentials(&self) -> AdminCredentials {
        AdminCredentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

// Token mode
#[derive(Serialize, Deserialize)]
pub struct LoginReq {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResp {
    pub token: String,
    pub expires_at: String, // RFC3339 UTC
}

// Parties
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartySummaryDto {
    pub id: i32,
    pub name: String,
    pub date: String, // RFC3339 UTC
    pub location: String,
    pub description: String,
    pub child_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyInfoDto {
    pub id: i32,
    pub name: String,
    pub date: String, // RFC3339 UTC
    pub location: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyDto {
    #[serde(flatten)]
    pub party: PartyInfoDto,
    pub children: Vec<ChildDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyReq {
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub id: Option<i32>,
    pub name: String,
    /// RFC3339 timestamp or `YYYY-MM-DD`.
    pub date: String,
    pub location: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PartyResp {
    pub success: bool,
    pub party: PartyInfoDto,
}

// Children
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildInfoDto {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub party_id: i32,
    pub pledged: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildDto {
    #[serde(flatten)]
    pub child: ChildInfoDto,
    pub wishlist: Vec<WishlistItemDto>,
    pub pledges: Vec<PledgeDto>,
}

/// Admin listing shape: a child with its party alongside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildWithPartyDto {
    #[serde(flatten)]
    pub child: ChildDto,
    pub party: PartyInfoDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildReq {
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub id: Option<i32>,
    pub name: String,
    #[serde(deserialize_with = "lenient::int")]
    pub age: i32,
    #[serde(deserialize_with = "lenient::int")]
    pub party_id: i32,
    #[serde(default)]
    pub pledged: Option<bool>,
    #[serde(default)]
    pub wishlist: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChildResp {
    pub success: bool,
    pub child: ChildDto,
}

// Wishlist
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItemDto {
    pub id: i32,
    pub text: String,
    pub child_id: i32,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistChildDto {
    #[serde(flatten)]
    pub child: ChildInfoDto,
    pub party: PartyInfoDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistItemWithChildDto {
    #[serde(flatten)]
    pub item: WishlistItemDto,
    pub child: WishlistChildDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistReq {
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub id: Option<i32>,
    #[serde(deserialize_with = "lenient::int")]
    pub child_id: i32,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistResp {
    pub success: bool,
    pub wishlist_item: WishlistItemDto,
}

// Pledges
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PledgeDto {
    pub id: i32,
    pub child_id: i32,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    pub message: Option<String>,
    pub created_at: String, // RFC3339 UTC
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PledgeReq {
    #[serde(default, deserialize_with = "lenient::opt_int")]
    pub child_id: Option<i32>,
    #[serde(default)]
    pub donor_name: Option<String>,
    #[serde(default)]
    pub donor_email: Option<String>,
    #[serde(default)]
    pub donor_phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PledgeResp {
    pub success: bool,
    pub pledge: PledgeDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResp {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResp {
    pub error: String,
}
