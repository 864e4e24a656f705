//! # Client Repository
//!
//! Database operations for the client registry.
//!
//! Clients exist so remitos and facturas can name their receptor. The
//! `document` column holds digits only (CUIT or DNI), or the sentinel `'0'`
//! for the generic walk-in buyer; normalization happens upstream in the
//! checkout service before anything reaches this repository.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pampa_core::Client;

/// Fields the operator controls when registering a client.
#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub last_name: Option<String>,
    /// Digits only, or `'0'` for the generic buyer.
    pub document: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Repository for client database operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Inserts a new client.
    pub async fn insert(&self, new: NewClient) -> DbResult<Client> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, name = %new.name, "Inserting client");

        let client = Client {
            id: id.clone(),
            name: new.name,
            last_name: new.last_name,
            document: new.document,
            address: new.address,
            phone: new.phone,
            email: new.email,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO clients (
                id, name, last_name, document,
                address, phone, email,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&client.id)
        .bind(&client.name)
        .bind(&client.last_name)
        .bind(&client.document)
        .bind(&client.address)
        .bind(&client.phone)
        .bind(&client.email)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(client)
    }

    /// Updates an existing client.
    ///
    /// ## Errors
    /// `NotFound` if the client doesn't exist.
    pub async fn update(&self, client: &Client) -> DbResult<()> {
        debug!(id = %client.id, "Updating client");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE clients SET
                name = ?2,
                last_name = ?3,
                document = ?4,
                address = ?5,
                phone = ?6,
                email = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&client.id)
        .bind(&client.name)
        .bind(&client.last_name)
        .bind(&client.document)
        .bind(&client.address)
        .bind(&client.phone)
        .bind(&client.email)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", &client.id));
        }

        Ok(())
    }

    /// Gets a client by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT
                id, name, last_name, document,
                address, phone, email,
                created_at, updated_at
            FROM clients
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// Lists clients sorted by name.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT
                id, name, last_name, document,
                address, phone, email,
                created_at, updated_at
            FROM clients
            ORDER BY name COLLATE NOCASE
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    /// Searches clients by name, last name, or document.
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Client>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "Searching clients");

        if query.is_empty() {
            return self.list(limit).await;
        }

        let pattern = format!("%{}%", query);

        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT
                id, name, last_name, document,
                address, phone, email,
                created_at, updated_at
            FROM clients
            WHERE name LIKE ?1 OR last_name LIKE ?1 OR document LIKE ?1
            ORDER BY name COLLATE NOCASE
            LIMIT ?2
            "#,
        )
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    /// Deletes a client.
    ///
    /// Ledger history is unaffected: movements reference clients by name in
    /// their description, never by row id.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting client");

        let result = sqlx::query("DELETE FROM clients WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", id));
        }

        Ok(())
    }

    /// Counts total clients (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn sample() -> NewClient {
        NewClient {
            name: "Marta".to_string(),
            last_name: Some("Giménez".to_string()),
            document: "27223334445".to_string(),
            address: Some("Av. Rivadavia 1234".to_string()),
            phone: None,
            email: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.clients();

        let client = repo.insert(sample()).await.unwrap();
        let stored = repo.get_by_id(&client.id).await.unwrap().unwrap();
        assert_eq!(stored.display_name(), "Marta Giménez");
        assert_eq!(stored.document, "27223334445");
    }

    #[tokio::test]
    async fn test_search_by_name_and_document() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.clients();

        repo.insert(sample()).await.unwrap();
        repo.insert(NewClient {
            name: "Consumidor Final".to_string(),
            last_name: None,
            document: "0".to_string(),
            address: None,
            phone: None,
            email: None,
        })
        .await
        .unwrap();

        let by_name = repo.search("marta", 20).await.unwrap();
        assert_eq!(by_name.len(), 1);

        let by_document = repo.search("2722333", 20).await.unwrap();
        assert_eq!(by_document.len(), 1);
        assert_eq!(by_document[0].name, "Marta");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.clients();

        let mut client = repo.insert(sample()).await.unwrap();
        client.phone = Some("11-5555-0000".to_string());
        repo.update(&client).await.unwrap();

        let stored = repo.get_by_id(&client.id).await.unwrap().unwrap();
        assert_eq!(stored.phone.as_deref(), Some("11-5555-0000"));

        repo.delete(&client.id).await.unwrap();
        assert!(repo.get_by_id(&client.id).await.unwrap().is_none());
    }
}
