//! Storage rows to wire DTOs.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use giftdrive_shared::api::{
    ChildDto, ChildInfoDto, ChildWithPartyDto, PartyDto, PartyInfoDto, PartySummaryDto, PledgeDto,
    WishlistChildDto, WishlistItemDto, WishlistItemWithChildDto,
};

use crate::storage::models::{Child, ChildTree, Party, PartyTree, Pledge, WishlistItem};

pub(crate) fn rfc3339(dt: NaiveDateTime) -> String {
    DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc).to_rfc3339()
}

/// Accepts an RFC3339 timestamp or a bare `YYYY-MM-DD` (midnight UTC).
pub(crate) fn parse_party_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub(crate) fn party_summary(p: Party, child_count: i64) -> PartySummaryDto {
    PartySummaryDto {
        id: p.id,
        name: p.name,
        date: rfc3339(p.date),
        location: p.location,
        description: p.description,
        child_count,
    }
}

pub(crate) fn party_info(p: Party) -> PartyInfoDto {
    PartyInfoDto {
        id: p.id,
        name: p.name,
        date: rfc3339(p.date),
        location: p.location,
        description: p.description,
        created_at: rfc3339(p.created_at),
        updated_at: rfc3339(p.updated_at),
    }
}

pub(crate) fn party_tree(t: PartyTree) -> PartyDto {
    PartyDto {
        party: party_info(t.party),
        children: t.children.into_iter().map(child_tree).collect(),
    }
}

fn child_info(c: Child) -> ChildInfoDto {
    ChildInfoDto {
        id: c.id,
        name: c.name,
        age: c.age,
        party_id: c.party_id,
        pledged: c.pledged,
        created_at: rfc3339(c.created_at),
        updated_at: rfc3339(c.updated_at),
    }
}

pub(crate) fn child_tree(t: ChildTree) -> ChildDto {
    ChildDto {
        child: child_info(t.child),
        wishlist: t.wishlist.into_iter().map(wishlist_item).collect(),
        pledges: t.pledges.into_iter().map(pledge).collect(),
    }
}

pub(crate) fn child_with_party(t: ChildTree, p: Party) -> ChildWithPartyDto {
    ChildWithPartyDto {
        child: child_tree(t),
        party: party_info(p),
    }
}

pub(crate) fn wishlist_item(w: WishlistItem) -> WishlistItemDto {
    WishlistItemDto {
        id: w.id,
        text: w.text,
        child_id: w.child_id,
        created_at: rfc3339(w.created_at),
    }
}

pub(crate) fn wishlist_with_child(w: WishlistItem, c: Child, p: Party) -> WishlistItemWithChildDto {
    WishlistItemWithChildDto {
        item: wishlist_item(w),
        child: WishlistChildDto {
            child: child_info(c),
            party: party_info(p),
        },
    }
}

pub(crate) fn pledge(p: Pledge) -> PledgeDto {
    PledgeDto {
        id: p.id,
        child_id: p.child_id,
        donor_name: p.donor_name,
        donor_email: p.donor_email,
        donor_phone: p.donor_phone,
        message: p.message,
        created_at: rfc3339(p.created_at),
    }
}
