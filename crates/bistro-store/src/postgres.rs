//! # Postgres Store
//!
//! Production `Store` backend over sqlx/Postgres. Collections become
//! tables; the checkout bulk delete becomes a single
//! `DELETE ... WHERE id = ANY($1)`.
//!
//! Queries are runtime-checked (`sqlx::query_as`) against row types that
//! convert into the core documents.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use bistro_core::{
    ApiError, ApiResult, CartEntry, DeleteOutcome, InsertOutcome, MenuItem, MenuItemPatch,
    PaymentRecord, Store, UpdateOutcome, UserRecord, UserRole,
};

/// Role label stored on admin user rows
const ROLE_ADMIN: &str = "admin";

fn store_err(e: sqlx::Error) -> ApiError {
    ApiError::Store(e.to_string())
}

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    id: String,
    name: String,
    category: String,
    price: f64,
    recipe: Option<String>,
    image: Option<String>,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            category: row.category,
            price: row.price,
            recipe: row.recipe,
            image: row.image,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CartEntryRow {
    id: String,
    email: String,
    menu_item_id: String,
    name: String,
    price: f64,
    image: Option<String>,
}

impl From<CartEntryRow> for CartEntry {
    fn from(row: CartEntryRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            menu_item_id: row.menu_item_id,
            name: row.name,
            price: row.price,
            image: row.image,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    name: Option<String>,
    email: String,
    role: Option<String>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            // Unknown labels are treated as no role at all
            role: row
                .role
                .as_deref()
                .filter(|r| *r == ROLE_ADMIN)
                .map(|_| UserRole::Admin),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: String,
    email: String,
    amount: f64,
    transaction_id: Option<String>,
    status: Option<String>,
    cart_ids: Vec<String>,
    created_at: DateTime<Utc>,
}

impl From<PaymentRow> for PaymentRecord {
    fn from(row: PaymentRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            amount: row.amount,
            transaction_id: row.transaction_id,
            status: row.status,
            cart_ids: row.cart_ids,
            created_at: row.created_at,
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// Postgres-backed store. One pool is opened at process start and shared
/// across all requests.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to the database and run pending migrations.
    pub async fn connect(database_url: &str) -> ApiResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(store_err)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| ApiError::Store(format!("migration failed: {e}")))?;

        info!("connected to Postgres store");
        Ok(Self { pool })
    }

    /// Wrap an existing pool (used by tooling and tests)
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_menu(&self) -> ApiResult<Vec<MenuItem>> {
        let rows = sqlx::query_as::<_, MenuItemRow>(
            "SELECT id, name, category, price, recipe, image FROM menu_items ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_menu_item(&self, id: &str) -> ApiResult<Option<MenuItem>> {
        let row = sqlx::query_as::<_, MenuItemRow>(
            "SELECT id, name, category, price, recipe, image FROM menu_items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.map(Into::into))
    }

    async fn insert_menu_item(&self, item: &MenuItem) -> ApiResult<InsertOutcome> {
        sqlx::query(
            "INSERT INTO menu_items (id, name, category, price, recipe, image) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(item.price)
        .bind(&item.recipe)
        .bind(&item.image)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(InsertOutcome::inserted(item.id.clone()))
    }

    async fn delete_menu_item(&self, id: &str) -> ApiResult<DeleteOutcome> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;

        Ok(DeleteOutcome::deleted(result.rows_affected()))
    }

    async fn upsert_menu_item(&self, id: &str, patch: &MenuItemPatch) -> ApiResult<UpdateOutcome> {
        let result = sqlx::query(
            "INSERT INTO menu_items (id, name, category, price, recipe) \
             VALUES ($1, COALESCE($2, ''), COALESCE($3, ''), COALESCE($4, 0), $5) \
             ON CONFLICT (id) DO UPDATE SET \
                 name = COALESCE($2, menu_items.name), \
                 category = COALESCE($3, menu_items.category), \
                 price = COALESCE($4, menu_items.price), \
                 recipe = COALESCE($5, menu_items.recipe)",
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.category)
        .bind(patch.price)
        .bind(&patch.recipe)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(UpdateOutcome::modified(result.rows_affected()))
    }

    async fn insert_cart_entry(&self, entry: &CartEntry) -> ApiResult<InsertOutcome> {
        sqlx::query(
            "INSERT INTO cart_entries (id, email, menu_item_id, name, price, image) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&entry.id)
        .bind(&entry.email)
        .bind(&entry.menu_item_id)
        .bind(&entry.name)
        .bind(entry.price)
        .bind(&entry.image)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(InsertOutcome::inserted(entry.id.clone()))
    }

    async fn list_cart_entries(&self, email: &str) -> ApiResult<Vec<CartEntry>> {
        let rows = sqlx::query_as::<_, CartEntryRow>(
            "SELECT id, email, menu_item_id, name, price, image \
             FROM cart_entries WHERE email = $1",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_cart_entry(&self, id: &str) -> ApiResult<DeleteOutcome> {
        let result = sqlx::query("DELETE FROM cart_entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;

        Ok(DeleteOutcome::deleted(result.rows_affected()))
    }

    async fn delete_cart_entries(&self, ids: &[String]) -> ApiResult<DeleteOutcome> {
        let result = sqlx::query("DELETE FROM cart_entries WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;

        Ok(DeleteOutcome::deleted(result.rows_affected()))
    }

    async fn find_user_by_email(&self, email: &str) -> ApiResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, role FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(row.map(Into::into))
    }

    async fn list_users(&self) -> ApiResult<Vec<UserRecord>> {
        let rows = sqlx::query_as::<_, UserRow>("SELECT id, name, email, role FROM users")
            .fetch_all(&self.pool)
            .await
            .map_err(store_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_user(&self, user: &UserRecord) -> ApiResult<InsertOutcome> {
        sqlx::query("INSERT INTO users (id, name, email, role) VALUES ($1, $2, $3, $4)")
            .bind(&user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.role.map(|_| ROLE_ADMIN))
            .execute(&self.pool)
            .await
            .map_err(store_err)?;

        Ok(InsertOutcome::inserted(user.id.clone()))
    }

    async fn delete_user(&self, id: &str) -> ApiResult<DeleteOutcome> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;

        Ok(DeleteOutcome::deleted(result.rows_affected()))
    }

    async fn promote_user(&self, id: &str) -> ApiResult<UpdateOutcome> {
        let result = sqlx::query("UPDATE users SET role = $2 WHERE id = $1")
            .bind(id)
            .bind(ROLE_ADMIN)
            .execute(&self.pool)
            .await
            .map_err(store_err)?;

        Ok(UpdateOutcome::modified(result.rows_affected()))
    }

    async fn insert_payment(&self, payment: &PaymentRecord) -> ApiResult<InsertOutcome> {
        sqlx::query(
            "INSERT INTO payments (id, email, amount, transaction_id, status, cart_ids, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&payment.id)
        .bind(&payment.email)
        .bind(payment.amount)
        .bind(&payment.transaction_id)
        .bind(&payment.status)
        .bind(&payment.cart_ids)
        .bind(payment.created_at)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(InsertOutcome::inserted(payment.id.clone()))
    }

    async fn list_payments(&self, email: &str) -> ApiResult<Vec<PaymentRecord>> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            "SELECT id, email, amount, transaction_id, status, cart_ids, created_at \
             FROM payments WHERE email = $1 ORDER BY created_at DESC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(store_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_row_role_mapping() {
        let admin: UserRecord = UserRow {
            id: "u1".into(),
            name: None,
            email: "a@x.com".into(),
            role: Some("admin".into()),
        }
        .into();
        assert!(admin.is_admin());

        let labeled: UserRecord = UserRow {
            id: "u2".into(),
            name: None,
            email: "b@x.com".into(),
            role: Some("chef".into()),
        }
        .into();
        assert!(!labeled.is_admin());

        let plain: UserRecord = UserRow {
            id: "u3".into(),
            name: None,
            email: "c@x.com".into(),
            role: None,
        }
        .into();
        assert!(!plain.is_admin());
    }
}
