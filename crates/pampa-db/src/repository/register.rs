//! # Register Repository
//!
//! Database operations for register sessions and the movement ledger.
//!
//! ## Register Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Register Lifecycle                                 │
//! │                                                                         │
//! │  1. OPEN                                                               │
//! │     └── open(opening_balance) → Register { status: Open }              │
//! │         (fails RegisterAlreadyOpen if another session is open)         │
//! │                                                                         │
//! │  2. RECORD MOVEMENTS                                                   │
//! │     └── record_movement() → ingreso  (+amount)                         │
//! │     └── record_movement() → egreso   (−amount)                         │
//! │     └── record_movement() → sistema  (no balance effect)               │
//! │         Sale movements carry line items; each line also                │
//! │         decrements the product's stock in the same transaction.        │
//! │                                                                         │
//! │  3. CLOSE                                                              │
//! │     └── close(id, closing_balance, user)                               │
//! │         → Register { status: Closed } + terminal "cierre" movement     │
//! │         After this, record_movement() fails RegisterNotOpen.           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity
//! The balance update is a single relative `UPDATE ... SET current_balance_cents
//! = current_balance_cents + ?` guarded by `status = 'open'`. Two concurrent
//! movements against the same register can never lose an increment, and a
//! movement can never land on a closed register. Movement row, line items,
//! stock decrements, and the balance adjustment commit together or not at all.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pampa_core::{
    ActingUser, Money, Movement, MovementKind, MovementLine, PaymentMethod, Register,
    RegisterStatus,
};

/// A movement to append to the ledger.
///
/// The repository assigns the id and the timestamp; callers supply the rest.
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub register_id: String,
    pub kind: MovementKind,
    /// Non-negative magnitude. The kind carries the ledger direction.
    pub amount: Money,
    pub description: String,
    pub payment_method: Option<PaymentMethod>,
    pub user: ActingUser,
    /// Line-item snapshots when the movement represents a sale.
    /// Each line also decrements the product's stock.
    pub lines: Vec<NewMovementLine>,
}

/// One sale line inside a [`NewMovement`].
#[derive(Debug, Clone)]
pub struct NewMovementLine {
    pub product_id: String,
    /// Product title at sale time, frozen into the ledger.
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl NewMovementLine {
    fn subtotal_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }
}

/// Repository for register and movement database operations.
#[derive(Debug, Clone)]
pub struct RegisterRepository {
    pool: SqlitePool,
}

impl RegisterRepository {
    /// Creates a new RegisterRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RegisterRepository { pool }
    }

    /// Opens a new register session with the given opening balance.
    ///
    /// ## Errors
    /// `RegisterAlreadyOpen` if a session is already open. The check runs as
    /// a precondition query, and the partial unique index on
    /// `registers(status) WHERE status = 'open'` settles the race if two
    /// opens slip past it concurrently.
    pub async fn open(&self, opening_balance: Money) -> DbResult<Register> {
        if self.find_open().await?.is_some() {
            return Err(DbError::RegisterAlreadyOpen);
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, opening_balance = %opening_balance, "Opening register");

        let register = Register {
            id: id.clone(),
            opened_at: now,
            opening_balance_cents: opening_balance.cents(),
            current_balance_cents: opening_balance.cents(),
            status: RegisterStatus::Open,
            closed_at: None,
            closing_balance_cents: None,
            closed_by_name: None,
            closed_by_id: None,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO registers (
                id, opened_at, opening_balance_cents, current_balance_cents,
                status, closed_at, closing_balance_cents, closed_by_name, closed_by_id,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&register.id)
        .bind(register.opened_at)
        .bind(register.opening_balance_cents)
        .bind(register.current_balance_cents)
        .bind(register.status)
        .bind(register.closed_at)
        .bind(register.closing_balance_cents)
        .bind(&register.closed_by_name)
        .bind(&register.closed_by_id)
        .bind(register.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(register)
    }

    /// Returns the single open register, or None.
    pub async fn find_open(&self) -> DbResult<Option<Register>> {
        let register = sqlx::query_as::<_, Register>(
            r#"
            SELECT
                id, opened_at, opening_balance_cents, current_balance_cents,
                status, closed_at, closing_balance_cents, closed_by_name, closed_by_id,
                updated_at
            FROM registers
            WHERE status = 'open'
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(register)
    }

    /// Gets a register by ID.
    pub async fn get(&self, id: &str) -> DbResult<Register> {
        let register = sqlx::query_as::<_, Register>(
            r#"
            SELECT
                id, opened_at, opening_balance_cents, current_balance_cents,
                status, closed_at, closing_balance_cents, closed_by_name, closed_by_id,
                updated_at
            FROM registers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        register.ok_or_else(|| DbError::RegisterNotFound(id.to_string()))
    }

    /// Appends a movement to an open register's ledger.
    ///
    /// ## What Commits Together
    /// 1. Relative balance adjustment on the register (guarded by open status)
    /// 2. The movement row
    /// 3. Line-item snapshots, when present
    /// 4. A relative stock decrement per line
    ///
    /// ## Errors
    /// `RegisterNotOpen` if the register exists but is closed,
    /// `RegisterNotFound` if the id is unknown. Either way nothing is written.
    pub async fn record_movement(&self, movement: NewMovement) -> DbResult<Movement> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let delta = movement.kind.balance_delta(movement.amount).cents();

        debug!(
            id = %id,
            register_id = %movement.register_id,
            kind = %movement.kind,
            amount = %movement.amount,
            "Recording movement"
        );

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE registers SET
                current_balance_cents = current_balance_cents + ?1,
                updated_at = ?2
            WHERE id = ?3 AND status = 'open'
            "#,
        )
        .bind(delta)
        .bind(now)
        .bind(&movement.register_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            let exists: Option<String> =
                sqlx::query_scalar("SELECT id FROM registers WHERE id = ?1")
                    .bind(&movement.register_id)
                    .fetch_optional(&mut *tx)
                    .await?;

            return Err(match exists {
                Some(_) => DbError::RegisterNotOpen(movement.register_id),
                None => DbError::RegisterNotFound(movement.register_id),
            });
        }

        sqlx::query(
            r#"
            INSERT INTO movements (
                id, register_id, kind, amount_cents,
                description, payment_method, user_name, user_id,
                recorded_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&id)
        .bind(&movement.register_id)
        .bind(movement.kind)
        .bind(movement.amount.cents())
        .bind(&movement.description)
        .bind(movement.payment_method)
        .bind(&movement.user.name)
        .bind(&movement.user.id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for line in &movement.lines {
            sqlx::query(
                r#"
                INSERT INTO movement_items (
                    id, movement_id, product_id, product_name,
                    quantity, unit_price_cents, subtotal_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&id)
            .bind(&line.product_id)
            .bind(&line.product_name)
            .bind(line.quantity)
            .bind(line.unit_price_cents)
            .bind(line.subtotal_cents())
            .execute(&mut *tx)
            .await?;

            let stock_result = sqlx::query(
                r#"
                UPDATE products SET
                    stock = stock - ?1,
                    updated_at = ?2
                WHERE id = ?3
                "#,
            )
            .bind(line.quantity)
            .bind(now)
            .bind(&line.product_id)
            .execute(&mut *tx)
            .await?;

            if stock_result.rows_affected() == 0 {
                return Err(DbError::not_found("Product", &line.product_id));
            }
        }

        tx.commit().await?;

        Ok(Movement {
            id,
            register_id: movement.register_id,
            kind: movement.kind,
            amount_cents: movement.amount.cents(),
            description: movement.description,
            payment_method: movement.payment_method,
            user_name: movement.user.name,
            user_id: movement.user.id,
            recorded_at: now,
        })
    }

    /// Closes an open register session.
    ///
    /// Stamps the closing timestamp, actor, and balance, then appends the
    /// terminal "cierre" movement. Once closed, the session takes no further
    /// movements.
    pub async fn close(
        &self,
        id: &str,
        closing_balance: Money,
        closed_by: &ActingUser,
    ) -> DbResult<Register> {
        let now = Utc::now();

        debug!(id = %id, closing_balance = %closing_balance, closed_by = %closed_by.name, "Closing register");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE registers SET
                status = 'closed',
                closed_at = ?2,
                closing_balance_cents = ?3,
                closed_by_name = ?4,
                closed_by_id = ?5,
                updated_at = ?2
            WHERE id = ?1 AND status = 'open'
            "#,
        )
        .bind(id)
        .bind(now)
        .bind(closing_balance.cents())
        .bind(&closed_by.name)
        .bind(&closed_by.id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            let exists: Option<String> =
                sqlx::query_scalar("SELECT id FROM registers WHERE id = ?1")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?;

            return Err(match exists {
                Some(_) => DbError::RegisterNotOpen(id.to_string()),
                None => DbError::RegisterNotFound(id.to_string()),
            });
        }

        sqlx::query(
            r#"
            INSERT INTO movements (
                id, register_id, kind, amount_cents,
                description, payment_method, user_name, user_id,
                recorded_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(id)
        .bind(MovementKind::Cierre)
        .bind(0i64)
        .bind("Cierre de caja")
        .bind(None::<PaymentMethod>)
        .bind(&closed_by.name)
        .bind(&closed_by.id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get(id).await
    }

    /// Lists all movements for a register, most recent first.
    pub async fn list_movements(&self, register_id: &str) -> DbResult<Vec<Movement>> {
        let movements = sqlx::query_as::<_, Movement>(
            r#"
            SELECT
                id, register_id, kind, amount_cents,
                description, payment_method, user_name, user_id,
                recorded_at
            FROM movements
            WHERE register_id = ?1
            ORDER BY recorded_at DESC
            "#,
        )
        .bind(register_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Gets the line items for one movement.
    pub async fn movement_lines(&self, movement_id: &str) -> DbResult<Vec<MovementLine>> {
        let lines = sqlx::query_as::<_, MovementLine>(
            r#"
            SELECT
                id, movement_id, product_id, product_name,
                quantity, unit_price_cents, subtotal_cents
            FROM movement_items
            WHERE movement_id = ?1
            "#,
        )
        .bind(movement_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Gets every sale line recorded against a register, across all of its
    /// movements. Feeds the per-product sales summary at close time.
    pub async fn lines_for_register(&self, register_id: &str) -> DbResult<Vec<MovementLine>> {
        let lines = sqlx::query_as::<_, MovementLine>(
            r#"
            SELECT
                mi.id, mi.movement_id, mi.product_id, mi.product_name,
                mi.quantity, mi.unit_price_cents, mi.subtotal_cents
            FROM movement_items mi
            JOIN movements m ON m.id = mi.movement_id
            WHERE m.register_id = ?1
            "#,
        )
        .bind(register_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Lists recent register sessions, newest first.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<Register>> {
        let registers = sqlx::query_as::<_, Register>(
            r#"
            SELECT
                id, opened_at, opening_balance_cents, current_balance_cents,
                status, closed_at, closing_balance_cents, closed_by_name, closed_by_id,
                updated_at
            FROM registers
            ORDER BY opened_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(registers)
    }
}
