pub mod models;
pub mod schema;
mod seed;

use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use models::{
    AdminUser, Child, ChildChanges, ChildTree, NewAdminSession, NewAdminUser, NewChild, NewParty,
    NewPledge, NewWishlistItem, Party, PartyChanges, PartyTree, Pledge, WishlistItem,
};
use schema::{admin_sessions, admin_users, children, parties, pledges, wishlist_items};
use tracing::{debug, trace};

/// Structured error type for all storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A Diesel ORM error (query failure, constraint violation, etc.)
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    /// Failed to acquire or build a connection from the pool.
    #[error("pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    /// A `spawn_blocking` task panicked or was cancelled.
    #[error("task error: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// A database migration failed to apply.
    #[error("migration error: {0}")]
    Migration(String),

    /// The caller supplied invalid input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced row does not exist.
    #[error("{entity} not found (id {id})")]
    NotFound { entity: &'static str, id: i32 },

    /// The child already carries a pledge.
    #[error("child {0} has already been pledged for")]
    AlreadyPledged(i32),
}

impl StorageError {
    fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }
}

/// Mutable party fields; `date` is UTC.
#[derive(Debug, Clone)]
pub struct PartyFields {
    pub name: String,
    pub date: NaiveDateTime,
    pub location: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct ChildFields {
    pub name: String,
    pub age: i32,
    pub party_id: i32,
    pub pledged: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DonorFields {
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowCounts {
    pub parties: i64,
    pub children: i64,
    pub wishlist_items: i64,
    pub pledges: i64,
}

#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        configure_sqlite_conn(conn).map_err(diesel::r2d2::Error::QueryError)
    }
}

#[derive(Clone)]
pub struct Store {
    pool: Pool<ConnectionManager<SqliteConnection>>,
}

impl Store {
    pub async fn connect_sqlite(path: &str) -> Result<Self, StorageError> {
        let url = path.to_string();
        let manager = ConnectionManager::<SqliteConnection>::new(url);
        let pool = Pool::builder()
            .max_size(8)
            .connection_customizer(Box::new(SqlitePragmas))
            .build(manager)?;

        // Run pending Diesel migrations on startup (auto-init empty DBs)
        {
            let pool_clone = pool.clone();
            tokio::task::spawn_blocking(move || -> Result<(), StorageError> {
                const MIGRATIONS: EmbeddedMigrations = embed_migrations!();
                let mut conn = pool_clone.get()?;
                conn.run_pending_migrations(MIGRATIONS)
                    .map_err(|e| StorageError::Migration(e.to_string()))?;
                Ok(())
            })
            .await??;
        }

        Ok(Store { pool })
    }

    // Admin credentials

    pub async fn upsert_admin(&self, email: &str, password_hash: &str) -> Result<(), StorageError> {
        let pool = self.pool.clone();
        let email = email.trim().to_string();
        let hash = password_hash.to_string();
        if email.is_empty() {
            return Err(StorageError::InvalidInput("admin email is empty".into()));
        }
        tokio::task::spawn_blocking(move || -> Result<(), StorageError> {
            let mut conn = pool.get()?;
            let new_admin = NewAdminUser {
                email: &email,
                password_hash: &hash,
                created_at: Utc::now().naive_utc(),
            };
            diesel::insert_into(admin_users::table)
                .values(&new_admin)
                .on_conflict(admin_users::email)
                .do_update()
                .set(admin_users::password_hash.eq(new_admin.password_hash))
                .execute(&mut conn)?;
            Ok(())
        })
        .await?
    }

    pub async fn find_admin(&self, email: &str) -> Result<Option<AdminUser>, StorageError> {
        let pool = self.pool.clone();
        let email = email.trim().to_string();
        tokio::task::spawn_blocking(move || -> Result<Option<AdminUser>, StorageError> {
            let mut conn = pool.get()?;
            Ok(admin_users::table
                .filter(admin_users::email.eq(&email))
                .select(AdminUser::as_select())
                .first(&mut conn)
                .optional()?)
        })
        .await?
    }

    // Parties

    /// Parties by date ascending, each with its child count.
    pub async fn list_party_summaries(&self) -> Result<Vec<(Party, i64)>, StorageError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<(Party, i64)>, StorageError> {
            let mut conn = pool.get()?;
            let ps = parties::table
                .order((parties::date.asc(), parties::id.asc()))
                .select(Party::as_select())
                .load(&mut conn)?;
            let counts: HashMap<i32, i64> = children::table
                .group_by(children::party_id)
                .select((children::party_id, diesel::dsl::count_star()))
                .load::<(i32, i64)>(&mut conn)?
                .into_iter()
                .collect();
            Ok(ps
                .into_iter()
                .map(|p| {
                    let n = counts.get(&p.id).copied().unwrap_or(0);
                    (p, n)
                })
                .collect())
        })
        .await?
    }

    pub async fn get_party_tree(&self, party_id: i32) -> Result<Option<PartyTree>, StorageError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<Option<PartyTree>, StorageError> {
            let mut conn = pool.get()?;
            let Some(party) = parties::table
                .find(party_id)
                .select(Party::as_select())
                .first(&mut conn)
                .optional()?
            else {
                return Ok(None);
            };
            Ok(load_party_trees(&mut conn, vec![party])?.pop())
        })
        .await?
    }

    pub async fn list_party_trees(&self, order: DateOrder) -> Result<Vec<PartyTree>, StorageError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<PartyTree>, StorageError> {
            let mut conn = pool.get()?;
            let ps = match order {
                DateOrder::Ascending => parties::table
                    .order((parties::date.asc(), parties::id.asc()))
                    .select(Party::as_select())
                    .load(&mut conn)?,
                DateOrder::Descending => parties::table
                    .order((parties::date.desc(), parties::id.desc()))
                    .select(Party::as_select())
                    .load(&mut conn)?,
            };
            Ok(load_party_trees(&mut conn, ps)?)
        })
        .await?
    }

    pub async fn create_party(&self, fields: PartyFields) -> Result<Party, StorageError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<Party, StorageError> {
            let mut conn = pool.get()?;
            let now = Utc::now().naive_utc();
            let new_party = NewParty {
                name: &fields.name,
                date: fields.date,
                location: &fields.location,
                description: &fields.description,
                created_at: now,
                updated_at: now,
            };
            Ok(diesel::insert_into(parties::table)
                .values(&new_party)
                .returning(Party::as_returning())
                .get_result(&mut conn)?)
        })
        .await?
    }

    pub async fn update_party(
        &self,
        party_id: i32,
        fields: PartyFields,
    ) -> Result<Party, StorageError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<Party, StorageError> {
            let mut conn = pool.get()?;
            let changes = PartyChanges {
                name: &fields.name,
                date: fields.date,
                location: &fields.location,
                description: &fields.description,
                updated_at: Utc::now().naive_utc(),
            };
            diesel::update(parties::table.find(party_id))
                .set(&changes)
                .returning(Party::as_returning())
                .get_result(&mut conn)
                .optional()?
                .ok_or(StorageError::not_found("Party", party_id))
        })
        .await?
    }

    /// Removes the party; children, wishlist items and pledges go with it
    /// through `ON DELETE CASCADE` within the same statement.
    pub async fn delete_party(&self, party_id: i32) -> Result<(), StorageError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<(), StorageError> {
            let mut conn = pool.get()?;
            let deleted = diesel::delete(parties::table.find(party_id)).execute(&mut conn)?;
            if deleted == 0 {
                return Err(StorageError::not_found("Party", party_id));
            }
            debug!(party_id, "party deleted with descendants");
            Ok(())
        })
        .await?
    }

    // Children

    /// All children, newest first, with their party.
    pub async fn list_children_with_party(
        &self,
    ) -> Result<Vec<(ChildTree, Party)>, StorageError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<(ChildTree, Party)>, StorageError> {
            let mut conn = pool.get()?;
            let rows = children::table
                .inner_join(parties::table)
                .order((children::created_at.desc(), children::id.desc()))
                .select((Child::as_select(), Party::as_select()))
                .load::<(Child, Party)>(&mut conn)?;
            let (kids, ps): (Vec<Child>, Vec<Party>) = rows.into_iter().unzip();
            let trees = load_child_trees(&mut conn, kids)?;
            Ok(trees.into_iter().zip(ps).collect())
        })
        .await?
    }

    /// Inserts the child and one wishlist item per non-blank wish, atomically.
    pub async fn create_child(
        &self,
        fields: ChildFields,
        wishlist: Vec<String>,
    ) -> Result<ChildTree, StorageError> {
        let pool = self.pool.clone();
        let wishes = giftdrive_shared::domain::non_blank_wishes(wishlist);
        tokio::task::spawn_blocking(move || -> Result<ChildTree, StorageError> {
            let mut conn = pool.get()?;
            conn.transaction(|conn| -> Result<ChildTree, StorageError> {
                if !party_exists(conn, fields.party_id)? {
                    return Err(StorageError::not_found("Party", fields.party_id));
                }
                let now = Utc::now().naive_utc();
                let new_child = NewChild {
                    name: &fields.name,
                    age: fields.age,
                    party_id: fields.party_id,
                    pledged: fields.pledged,
                    created_at: now,
                    updated_at: now,
                };
                let child = diesel::insert_into(children::table)
                    .values(&new_child)
                    .returning(Child::as_returning())
                    .get_result(conn)?;
                insert_wishes(conn, child.id, &wishes, now)?;
                single_child_tree(conn, child)
            })
        })
        .await?
    }

    /// Overwrites the child's fields; when `wishlist` is given its items are
    /// replaced wholesale. One transaction, so a failed update keeps the old
    /// wishlist.
    pub async fn update_child(
        &self,
        child_id: i32,
        fields: ChildFields,
        wishlist: Option<Vec<String>>,
    ) -> Result<ChildTree, StorageError> {
        let pool = self.pool.clone();
        let wishes = wishlist.map(giftdrive_shared::domain::non_blank_wishes);
        tokio::task::spawn_blocking(move || -> Result<ChildTree, StorageError> {
            let mut conn = pool.get()?;
            conn.transaction(|conn| -> Result<ChildTree, StorageError> {
                if !party_exists(conn, fields.party_id)? {
                    return Err(StorageError::not_found("Party", fields.party_id));
                }
                let now = Utc::now().naive_utc();
                let changes = ChildChanges {
                    name: &fields.name,
                    age: fields.age,
                    party_id: fields.party_id,
                    pledged: fields.pledged,
                    updated_at: now,
                };
                let child = diesel::update(children::table.find(child_id))
                    .set(&changes)
                    .returning(Child::as_returning())
                    .get_result(conn)
                    .optional()?
                    .ok_or(StorageError::not_found("Child", child_id))?;
                if let Some(wishes) = wishes {
                    let removed = diesel::delete(
                        wishlist_items::table.filter(wishlist_items::child_id.eq(child_id)),
                    )
                    .execute(conn)?;
                    trace!(child_id, removed, added = wishes.len(), "wishlist replaced");
                    insert_wishes(conn, child_id, &wishes, now)?;
                }
                single_child_tree(conn, child)
            })
        })
        .await?
    }

    pub async fn delete_child(&self, child_id: i32) -> Result<(), StorageError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<(), StorageError> {
            let mut conn = pool.get()?;
            let deleted = diesel::delete(children::table.find(child_id)).execute(&mut conn)?;
            if deleted == 0 {
                return Err(StorageError::not_found("Child", child_id));
            }
            Ok(())
        })
        .await?
    }

    // Wishlist items

    /// All items, newest first, each with its child and the child's party.
    pub async fn list_wishlist_items(
        &self,
    ) -> Result<Vec<(WishlistItem, Child, Party)>, StorageError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(
            move || -> Result<Vec<(WishlistItem, Child, Party)>, StorageError> {
                let mut conn = pool.get()?;
                Ok(wishlist_items::table
                    .inner_join(children::table.inner_join(parties::table))
                    .order((wishlist_items::created_at.desc(), wishlist_items::id.desc()))
                    .select((
                        WishlistItem::as_select(),
                        Child::as_select(),
                        Party::as_select(),
                    ))
                    .load::<(WishlistItem, Child, Party)>(&mut conn)?)
            },
        )
        .await?
    }

    pub async fn create_wishlist_item(
        &self,
        child_id: i32,
        text: &str,
    ) -> Result<WishlistItem, StorageError> {
        let pool = self.pool.clone();
        let text = text.to_string();
        tokio::task::spawn_blocking(move || -> Result<WishlistItem, StorageError> {
            let mut conn = pool.get()?;
            conn.transaction(|conn| -> Result<WishlistItem, StorageError> {
                if !child_exists(conn, child_id)? {
                    return Err(StorageError::not_found("Child", child_id));
                }
                let row = NewWishlistItem {
                    text: &text,
                    child_id,
                    created_at: Utc::now().naive_utc(),
                };
                Ok(diesel::insert_into(wishlist_items::table)
                    .values(&row)
                    .returning(WishlistItem::as_returning())
                    .get_result(conn)?)
            })
        })
        .await?
    }

    /// Rewrites text and owner; the item may move to another child.
    pub async fn update_wishlist_item(
        &self,
        item_id: i32,
        child_id: i32,
        text: &str,
    ) -> Result<WishlistItem, StorageError> {
        let pool = self.pool.clone();
        let text = text.to_string();
        tokio::task::spawn_blocking(move || -> Result<WishlistItem, StorageError> {
            let mut conn = pool.get()?;
            conn.transaction(|conn| -> Result<WishlistItem, StorageError> {
                if !child_exists(conn, child_id)? {
                    return Err(StorageError::not_found("Child", child_id));
                }
                diesel::update(wishlist_items::table.find(item_id))
                    .set((
                        wishlist_items::child_id.eq(child_id),
                        wishlist_items::text.eq(&text),
                    ))
                    .returning(WishlistItem::as_returning())
                    .get_result(conn)
                    .optional()?
                    .ok_or(StorageError::not_found("Wishlist item", item_id))
            })
        })
        .await?
    }

    pub async fn delete_wishlist_item(&self, item_id: i32) -> Result<(), StorageError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<(), StorageError> {
            let mut conn = pool.get()?;
            let deleted =
                diesel::delete(wishlist_items::table.find(item_id)).execute(&mut conn)?;
            if deleted == 0 {
                return Err(StorageError::not_found("Wishlist item", item_id));
            }
            Ok(())
        })
        .await?
    }

    // Pledges

    /// Records a pledge for an unpledged child.
    ///
    /// The flag flip is a conditional UPDATE (`pledged = 0` in the filter)
    /// inside an IMMEDIATE transaction, so concurrent pledges for one child
    /// serialize on the SQLite write lock: exactly one flips the flag and
    /// inserts its row, every other caller gets `AlreadyPledged`.
    pub async fn pledge(&self, child_id: i32, donor: DonorFields) -> Result<Pledge, StorageError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<Pledge, StorageError> {
            let mut conn = pool.get()?;
            conn.immediate_transaction(|conn| -> Result<Pledge, StorageError> {
                let now = Utc::now().naive_utc();
                let flipped = diesel::update(
                    children::table
                        .filter(children::id.eq(child_id))
                        .filter(children::pledged.eq(false)),
                )
                .set((children::pledged.eq(true), children::updated_at.eq(now)))
                .execute(conn)?;
                if flipped != 1 {
                    return Err(if child_exists(conn, child_id)? {
                        StorageError::AlreadyPledged(child_id)
                    } else {
                        StorageError::not_found("Child", child_id)
                    });
                }
                let row = NewPledge {
                    child_id,
                    donor_name: donor.donor_name.as_deref(),
                    donor_email: donor.donor_email.as_deref(),
                    donor_phone: donor.donor_phone.as_deref(),
                    message: donor.message.as_deref(),
                    created_at: now,
                };
                Ok(diesel::insert_into(pledges::table)
                    .values(&row)
                    .returning(Pledge::as_returning())
                    .get_result(conn)?)
            })
        })
        .await?
    }

    pub async fn pledges_for_child(&self, child_id: i32) -> Result<Vec<Pledge>, StorageError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<Pledge>, StorageError> {
            let mut conn = pool.get()?;
            Ok(pledges::table
                .filter(pledges::child_id.eq(child_id))
                .order((pledges::created_at.desc(), pledges::id.desc()))
                .select(Pledge::as_select())
                .load(&mut conn)?)
        })
        .await?
    }

    pub async fn row_counts(&self) -> Result<RowCounts, StorageError> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<RowCounts, StorageError> {
            let mut conn = pool.get()?;
            Ok(RowCounts {
                parties: parties::table.count().get_result(&mut conn)?,
                children: children::table.count().get_result(&mut conn)?,
                wishlist_items: wishlist_items::table.count().get_result(&mut conn)?,
                pledges: pledges::table.count().get_result(&mut conn)?,
            })
        })
        .await?
    }

    // Session helpers for admin token inactivity windows

    pub async fn create_session(&self, jti_: &str, email_: &str) -> Result<(), StorageError> {
        let pool = self.pool.clone();
        let j = jti_.to_string();
        let e = email_.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), StorageError> {
            let mut conn = pool.get()?;
            let now = Utc::now().naive_utc();
            let new = NewAdminSession {
                jti: &j,
                email: &e,
                issued_at: now,
                last_used_at: now,
            };
            diesel::insert_into(admin_sessions::table)
                .values(&new)
                .on_conflict_do_nothing()
                .execute(&mut conn)?;
            Ok(())
        })
        .await?
    }

    pub async fn delete_session(&self, jti_: &str) -> Result<bool, StorageError> {
        let pool = self.pool.clone();
        let j = jti_.to_string();
        tokio::task::spawn_blocking(move || -> Result<bool, StorageError> {
            let mut conn = pool.get()?;
            let deleted = diesel::delete(admin_sessions::table.filter(admin_sessions::jti.eq(&j)))
                .execute(&mut conn)?;
            Ok(deleted > 0)
        })
        .await?
    }

    /// Touch session atomically, but only if it hasn't expired.
    /// Returns `true` if the session was found and updated, `false` otherwise.
    pub async fn touch_session_with_cutoff(
        &self,
        jti_: &str,
        cutoff: NaiveDateTime,
    ) -> Result<bool, StorageError> {
        let pool = self.pool.clone();
        let j = jti_.to_string();
        tokio::task::spawn_blocking(move || -> Result<bool, StorageError> {
            let mut conn = pool.get()?;
            let now = Utc::now().naive_utc();
            let updated = diesel::update(
                admin_sessions::table
                    .filter(admin_sessions::jti.eq(&j))
                    .filter(admin_sessions::last_used_at.ge(cutoff)),
            )
            .set(admin_sessions::last_used_at.eq(now))
            .execute(&mut conn)?;
            Ok(updated > 0)
        })
        .await?
    }
}

fn party_exists(conn: &mut SqliteConnection, party_id: i32) -> QueryResult<bool> {
    diesel::select(diesel::dsl::exists(parties::table.find(party_id))).get_result(conn)
}

fn child_exists(conn: &mut SqliteConnection, child_id: i32) -> QueryResult<bool> {
    diesel::select(diesel::dsl::exists(children::table.find(child_id))).get_result(conn)
}

fn insert_wishes(
    conn: &mut SqliteConnection,
    child_id: i32,
    wishes: &[String],
    now: NaiveDateTime,
) -> QueryResult<usize> {
    if wishes.is_empty() {
        return Ok(0);
    }
    let rows: Vec<NewWishlistItem<'_>> = wishes
        .iter()
        .map(|w| NewWishlistItem {
            text: w,
            child_id,
            created_at: now,
        })
        .collect();
    diesel::insert_into(wishlist_items::table)
        .values(&rows)
        .execute(conn)
}

fn single_child_tree(
    conn: &mut SqliteConnection,
    child: Child,
) -> Result<ChildTree, StorageError> {
    let child_id = child.id;
    load_child_trees(conn, vec![child])?
        .pop()
        .ok_or(StorageError::not_found("Child", child_id))
}

/// Attaches wishlist items (insertion order) and pledges (newest first),
/// keeping the order of `kids`.
fn load_child_trees(conn: &mut SqliteConnection, kids: Vec<Child>) -> QueryResult<Vec<ChildTree>> {
    if kids.is_empty() {
        return Ok(Vec::new());
    }
    let items = WishlistItem::belonging_to(&kids)
        .order(wishlist_items::id.asc())
        .select(WishlistItem::as_select())
        .load(conn)?;
    let pledge_rows = Pledge::belonging_to(&kids)
        .order((pledges::created_at.desc(), pledges::id.desc()))
        .select(Pledge::as_select())
        .load(conn)?;

    let mut items_by_child: HashMap<i32, Vec<WishlistItem>> = HashMap::new();
    for item in items {
        items_by_child.entry(item.child_id).or_default().push(item);
    }
    let mut pledges_by_child: HashMap<i32, Vec<Pledge>> = HashMap::new();
    for p in pledge_rows {
        pledges_by_child.entry(p.child_id).or_default().push(p);
    }

    Ok(kids
        .into_iter()
        .map(|child| ChildTree {
            wishlist: items_by_child.remove(&child.id).unwrap_or_default(),
            pledges: pledges_by_child.remove(&child.id).unwrap_or_default(),
            child,
        })
        .collect())
}

/// Children ordered by id within each party; keeps the order of `ps`.
fn load_party_trees(conn: &mut SqliteConnection, ps: Vec<Party>) -> QueryResult<Vec<PartyTree>> {
    if ps.is_empty() {
        return Ok(Vec::new());
    }
    let kids = Child::belonging_to(&ps)
        .order(children::id.asc())
        .select(Child::as_select())
        .load(conn)?;
    let mut by_party: HashMap<i32, Vec<ChildTree>> = HashMap::new();
    for tree in load_child_trees(conn, kids)? {
        by_party.entry(tree.child.party_id).or_default().push(tree);
    }
    Ok(ps
        .into_iter()
        .map(|party| PartyTree {
            children: by_party.remove(&party.id).unwrap_or_default(),
            party,
        })
        .collect())
}

fn configure_sqlite_conn(conn: &mut SqliteConnection) -> Result<(), diesel::result::Error> {
    // busy_timeout first so the journal switch itself waits on a busy database
    diesel::sql_query("PRAGMA busy_timeout=5000;").execute(conn)?;
    diesel::sql_query("PRAGMA journal_mode=WAL;").execute(conn)?;
    diesel::sql_query("PRAGMA synchronous=NORMAL;").execute(conn)?;
    // SQLite leaves foreign keys (and so ON DELETE CASCADE) off per connection
    diesel::sql_query("PRAGMA foreign_keys=ON;").execute(conn)?;
    Ok(())
}
