use crate::storage::schema::{
    admin_sessions, admin_users, children, parties, pledges, wishlist_items,
};
use chrono::NaiveDateTime;
use diesel::prelude::*;

#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = admin_users)]
pub struct AdminUser {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = admin_users)]
pub struct NewAdminUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = parties)]
pub struct Party {
    pub id: i32,
    pub name: String,
    pub date: NaiveDateTime,
    pub location: String,
    pub description: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = parties)]
pub struct NewParty<'a> {
    pub name: &'a str,
    pub date: NaiveDateTime,
    pub location: &'a str,
    pub description: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = parties)]
pub struct PartyChanges<'a> {
    pub name: &'a str,
    pub date: NaiveDateTime,
    pub location: &'a str,
    pub description: &'a str,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = children)]
#[diesel(belongs_to(Party, foreign_key = party_id))]
pub struct Child {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub party_id: i32,
    pub pledged: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = children)]
pub struct NewChild<'a> {
    pub name: &'a str,
    pub age: i32,
    pub party_id: i32,
    pub pledged: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = children)]
pub struct ChildChanges<'a> {
    pub name: &'a str,
    pub age: i32,
    pub party_id: i32,
    pub pledged: bool,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = wishlist_items)]
#[diesel(belongs_to(Child, foreign_key = child_id))]
pub struct WishlistItem {
    pub id: i32,
    pub text: String,
    pub child_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = wishlist_items)]
pub struct NewWishlistItem<'a> {
    pub text: &'a str,
    pub child_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = pledges)]
#[diesel(belongs_to(Child, foreign_key = child_id))]
pub struct Pledge {
    pub id: i32,
    pub child_id: i32,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    pub message: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = pledges)]
pub struct NewPledge<'a> {
    pub child_id: i32,
    pub donor_name: Option<&'a str>,
    pub donor_email: Option<&'a str>,
    pub donor_phone: Option<&'a str>,
    pub message: Option<&'a str>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = admin_sessions)]
pub struct NewAdminSession<'a> {
    pub jti: &'a str,
    pub email: &'a str,
    pub issued_at: NaiveDateTime,
    pub last_used_at: NaiveDateTime,
}

/// A child with everything hanging off it.
#[derive(Debug, Clone)]
pub struct ChildTree {
    pub child: Child,
    pub wishlist: Vec<WishlistItem>,
    /// Newest first.
    pub pledges: Vec<Pledge>,
}

#[derive(Debug, Clone)]
pub struct PartyTree {
    pub party: Party,
    pub children: Vec<ChildTree>,
}
