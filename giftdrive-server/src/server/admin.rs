//! Admin CRUD and the workbook export. Every handler passes the admin gate
//! before touching the store.

use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use chrono::Utc;
use giftdrive_shared::api::{
    AdminQuery, AdminReq, ChildReq, ChildResp, ChildWithPartyDto, PartyDto, PartyReq, PartyResp,
    SuccessResp, WishlistItemWithChildDto, WishlistReq, WishlistResp,
};
use tracing::info;

use super::auth::{BearerToken, authorize};
use super::{AppError, AppState, dto};
use crate::export;
use crate::storage::{ChildFields, DateOrder, PartyFields};

fn required_id(id: Option<i32>, what: &str) -> Result<i32, AppError> {
    id.ok_or_else(|| AppError::bad_request(format!("{what} ID is required")))
}

fn party_fields(req: PartyReq) -> Result<PartyFields, AppError> {
    let date = dto::parse_party_date(&req.date).ok_or_else(|| {
        AppError::bad_request("Date must be an RFC 3339 timestamp or YYYY-MM-DD")
    })?;
    Ok(PartyFields {
        name: req.name,
        date,
        location: req.location,
        description: req.description,
    })
}

fn child_fields(req: &ChildReq) -> Result<ChildFields, AppError> {
    if req.age < 0 {
        return Err(AppError::bad_request("Age must not be negative"));
    }
    Ok(ChildFields {
        name: req.name.clone(),
        age: req.age,
        party_id: req.party_id,
        pledged: req.pledged.unwrap_or(false),
    })
}

fn wish_text(text: &str) -> Result<&str, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::bad_request("Wishlist text is required"));
    }
    Ok(text)
}

// Parties

pub async fn list_parties(
    State(state): State<AppState>,
    bearer: BearerToken,
    Query(q): Query<AdminQuery>,
) -> Result<Json<Vec<PartyDto>>, AppError> {
    authorize(&state, &bearer, &q.credentials()).await?;
    let trees = state.store.list_party_trees(DateOrder::Descending).await?;
    Ok(Json(trees.into_iter().map(dto::party_tree).collect()))
}

pub async fn create_party(
    State(state): State<AppState>,
    bearer: BearerToken,
    Json(body): Json<AdminReq<PartyReq>>,
) -> Result<Json<PartyResp>, AppError> {
    let admin = authorize(&state, &bearer, &body.credentials).await?;
    let party = state.store.create_party(party_fields(body.payload)?).await?;
    info!(admin = %admin.email, party_id = party.id, "party created");
    Ok(Json(PartyResp {
        success: true,
        party: dto::party_info(party),
    }))
}

pub async fn update_party(
    State(state): State<AppState>,
    bearer: BearerToken,
    Json(body): Json<AdminReq<PartyReq>>,
) -> Result<Json<PartyResp>, AppError> {
    let admin = authorize(&state, &bearer, &body.credentials).await?;
    let id = required_id(body.payload.id, "Party")?;
    let party = state
        .store
        .update_party(id, party_fields(body.payload)?)
        .await?;
    info!(admin = %admin.email, party_id = id, "party updated");
    Ok(Json(PartyResp {
        success: true,
        party: dto::party_info(party),
    }))
}

pub async fn delete_party(
    State(state): State<AppState>,
    bearer: BearerToken,
    Query(q): Query<AdminQuery>,
) -> Result<Json<SuccessResp>, AppError> {
    let admin = authorize(&state, &bearer, &q.credentials()).await?;
    let id = required_id(q.id, "Party")?;
    state.store.delete_party(id).await?;
    info!(admin = %admin.email, party_id = id, "party deleted");
    Ok(Json(SuccessResp { success: true }))
}

// Children

pub async fn list_children(
    State(state): State<AppState>,
    bearer: BearerToken,
    Query(q): Query<AdminQuery>,
) -> Result<Json<Vec<ChildWithPartyDto>>, AppError> {
    authorize(&state, &bearer, &q.credentials()).await?;
    let rows = state.store.list_children_with_party().await?;
    Ok(Json(
        rows.into_iter()
            .map(|(c, p)| dto::child_with_party(c, p))
            .collect(),
    ))
}

pub async fn create_child(
    State(state): State<AppState>,
    bearer: BearerToken,
    Json(body): Json<AdminReq<ChildReq>>,
) -> Result<Json<ChildResp>, AppError> {
    let admin = authorize(&state, &bearer, &body.credentials).await?;
    let fields = child_fields(&body.payload)?;
    let wishlist = body.payload.wishlist.unwrap_or_default();
    let tree = state.store.create_child(fields, wishlist).await?;
    info!(
        admin = %admin.email,
        child_id = tree.child.id,
        wishes = tree.wishlist.len(),
        "child created"
    );
    Ok(Json(ChildResp {
        success: true,
        child: dto::child_tree(tree),
    }))
}

pub async fn update_child(
    State(state): State<AppState>,
    bearer: BearerToken,
    Json(body): Json<AdminReq<ChildReq>>,
) -> Result<Json<ChildResp>, AppError> {
    let admin = authorize(&state, &bearer, &body.credentials).await?;
    let id = required_id(body.payload.id, "Child")?;
    let fields = child_fields(&body.payload)?;
    let tree = state
        .store
        .update_child(id, fields, body.payload.wishlist)
        .await?;
    info!(admin = %admin.email, child_id = id, "child updated");
    Ok(Json(ChildResp {
        success: true,
        child: dto::child_tree(tree),
    }))
}

pub async fn delete_child(
    State(state): State<AppState>,
    bearer: BearerToken,
    Query(q): Query<AdminQuery>,
) -> Result<Json<SuccessResp>, AppError> {
    let admin = authorize(&state, &bearer, &q.credentials()).await?;
    let id = required_id(q.id, "Child")?;
    state.store.delete_child(id).await?;
    info!(admin = %admin.email, child_id = id, "child deleted");
    Ok(Json(SuccessResp { success: true }))
}

// Wishlist

pub async fn list_wishlist(
    State(state): State<AppState>,
    bearer: BearerToken,
    Query(q): Query<AdminQuery>,
) -> Result<Json<Vec<WishlistItemWithChildDto>>, AppError> {
    authorize(&state, &bearer, &q.credentials()).await?;
    let rows = state.store.list_wishlist_items().await?;
    Ok(Json(
        rows.into_iter()
            .map(|(w, c, p)| dto::wishlist_with_child(w, c, p))
            .collect(),
    ))
}

pub async fn create_wishlist_item(
    State(state): State<AppState>,
    bearer: BearerToken,
    Json(body): Json<AdminReq<WishlistReq>>,
) -> Result<Json<WishlistResp>, AppError> {
    let admin = authorize(&state, &bearer, &body.credentials).await?;
    let req = body.payload;
    let item = state
        .store
        .create_wishlist_item(req.child_id, wish_text(&req.text)?)
        .await?;
    info!(admin = %admin.email, item_id = item.id, child_id = req.child_id, "wishlist item created");
    Ok(Json(WishlistResp {
        success: true,
        wishlist_item: dto::wishlist_item(item),
    }))
}

pub async fn update_wishlist_item(
    State(state): State<AppState>,
    bearer: BearerToken,
    Json(body): Json<AdminReq<WishlistReq>>,
) -> Result<Json<WishlistResp>, AppError> {
    let admin = authorize(&state, &bearer, &body.credentials).await?;
    let req = body.payload;
    let id = required_id(req.id, "Wishlist item")?;
    let item = state
        .store
        .update_wishlist_item(id, req.child_id, wish_text(&req.text)?)
        .await?;
    info!(admin = %admin.email, item_id = id, child_id = req.child_id, "wishlist item updated");
    Ok(Json(WishlistResp {
        success: true,
        wishlist_item: dto::wishlist_item(item),
    }))
}

pub async fn delete_wishlist_item(
    State(state): State<AppState>,
    bearer: BearerToken,
    Query(q): Query<AdminQuery>,
) -> Result<Json<SuccessResp>, AppError> {
    let admin = authorize(&state, &bearer, &q.credentials()).await?;
    let id = required_id(q.id, "Wishlist item")?;
    state.store.delete_wishlist_item(id).await?;
    info!(admin = %admin.email, item_id = id, "wishlist item deleted");
    Ok(Json(SuccessResp { success: true }))
}

// Export

pub async fn export(
    State(state): State<AppState>,
    bearer: BearerToken,
    Query(q): Query<AdminQuery>,
) -> Result<impl IntoResponse, AppError> {
    let admin = authorize(&state, &bearer, &q.credentials()).await?;
    let trees = state.store.list_party_trees(DateOrder::Ascending).await?;
    let tz = state.config.report_tz();
    let party_count = trees.len();
    let bytes = tokio::task::spawn_blocking(move || {
        let report = export::build_report(&trees, tz);
        export::render_xlsx(&report)
    })
    .await
    .map_err(AppError::internal)?
    .map_err(AppError::internal)?;

    let today = Utc::now().with_timezone(&tz).date_naive();
    let filename = export::report_filename(&state.config.app_name, today);
    info!(
        admin = %admin.email,
        parties = party_count,
        bytes = bytes.len(),
        filename = %filename,
        "export generated"
    );
    Ok((
        [
            (header::CONTENT_TYPE, export::XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}
