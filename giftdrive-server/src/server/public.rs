use axum::{
    Json,
    extract::{Path, State},
};
use giftdrive_shared::api::{PartyDto, PartySummaryDto, PledgeReq, PledgeResp};
use giftdrive_shared::domain::non_blank;
use tracing::info;

use super::{AppError, AppState, dto};
use crate::storage::DonorFields;

pub async fn list_parties(
    State(state): State<AppState>,
) -> Result<Json<Vec<PartySummaryDto>>, AppError> {
    let rows = state.store.list_party_summaries().await?;
    Ok(Json(
        rows.into_iter()
            .map(|(p, n)| dto::party_summary(p, n))
            .collect(),
    ))
}

pub async fn get_party(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PartyDto>, AppError> {
    // A non-numeric id cannot name a party
    let not_found = || AppError::not_found("Party not found");
    let id: i32 = id.trim().parse().map_err(|_| not_found())?;
    let tree = state.store.get_party_tree(id).await?.ok_or_else(not_found)?;
    Ok(Json(dto::party_tree(tree)))
}

pub async fn pledge(
    State(state): State<AppState>,
    Json(body): Json<PledgeReq>,
) -> Result<Json<PledgeResp>, AppError> {
    let child_id = body
        .child_id
        .ok_or_else(|| AppError::bad_request("Child ID is required"))?;
    let donor = DonorFields {
        donor_name: non_blank(body.donor_name),
        donor_email: non_blank(body.donor_email),
        donor_phone: non_blank(body.donor_phone),
        message: non_blank(body.message),
    };
    let pledge = state.store.pledge(child_id, donor).await?;
    info!(child_id, pledge_id = pledge.id, "pledge recorded");
    Ok(Json(PledgeResp {
        success: true,
        pledge: dto::pledge(pledge),
    }))
}
