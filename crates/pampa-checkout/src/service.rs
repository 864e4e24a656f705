//! # Checkout Service
//!
//! The single entry point for operator actions. Every mutation the terminal
//! performs goes through here: register lifecycle, manual movements, catalog
//! and client upkeep, and the sale flow itself.
//!
//! ## Finalize Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        finalize_sale                                    │
//! │                                                                         │
//! │  cart ──► guard: non-empty ──► guard: open register ──► totals (IVA)   │
//! │                                                              │          │
//! │                          ┌───────────────────────────────────┤          │
//! │                          ▼                                   ▼          │
//! │                     Factura C                         Remito / Recibo   │
//! │                          │                                   │          │
//! │                 emit to AFIP ──► rejected? ──► abort,        │          │
//! │                          │        timeout?     cart intact   │          │
//! │                          ▼                                   ▼          │
//! │                 ┌────────────────────────────────────────────────────┐ │
//! │                 │ record_movement: ledger entry + balance + stock,   │ │
//! │                 │ one transaction                                    │ │
//! │                 └────────────────────────────────────────────────────┘ │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                 ticket built ──► cart cleared                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The fiscal call always happens BEFORE the ledger write. An authorization
//! we fail to persist is recoverable (AFIP accepts re-consultation by
//! number); a ledger entry for an invoice that was never authorized is not.

use chrono::Utc;
use tracing::{debug, info, warn};

use pampa_core::document::resolve_receptor;
use pampa_core::report::{self, ProductStat, RegisterSummary};
use pampa_core::validation::{
    validate_client_name, validate_cost_cents, validate_margin_bps, validate_movement_amount,
    validate_movement_description, validate_product_title, validate_search_query,
};
use pampa_core::{
    classify_document, ActingUser, Cart, Client, DocumentId, DocumentNumber, DocumentType, Money,
    Movement, MovementKind, PaymentMethod, Product, Register, ValidationError,
};
use pampa_db::{Database, NewClient, NewMovement, NewMovementLine, NewProduct};
use pampa_fiscal::{FiscalAuthority, InvoiceRequest, QrPayload};

use crate::error::{CheckoutError, CheckoutResult};
use crate::ticket::{FacturaTicket, ReceiptTicket, RemitoTicket, SaleTicket, TicketLine};

// =============================================================================
// Store Info
// =============================================================================

/// Store identity the service stamps onto documents.
///
/// Built from [`crate::config::AppConfig::store_info`]; the CUIT arrives
/// already validated and numeric.
#[derive(Debug, Clone)]
pub struct StoreInfo {
    /// Printed on every ticket header.
    pub name: String,
    /// Issuer CUIT for fiscal documents and their QR payload.
    pub cuit: u64,
    /// Point of sale for locally numbered remitos.
    pub remito_point_of_sale: u32,
}

// =============================================================================
// Checkout Service
// =============================================================================

/// Orchestrates the domain, the ledger and the fiscal authority.
///
/// Generic over [`FiscalAuthority`] so tests drive the full sale flow
/// against a scripted double instead of a live backend.
pub struct CheckoutService<F> {
    db: Database,
    fiscal: F,
    store: StoreInfo,
}

impl<F: FiscalAuthority> CheckoutService<F> {
    pub fn new(db: Database, fiscal: F, store: StoreInfo) -> Self {
        CheckoutService { db, fiscal, store }
    }

    /// Direct database access for reporting and admin tooling that does not
    /// go through an operator action.
    pub fn database(&self) -> &Database {
        &self.db
    }

    // =========================================================================
    // Register Lifecycle
    // =========================================================================

    /// Opens a new register session with the counted drawer amount.
    ///
    /// `opening_balance` is the operator-typed text; rejects anything that
    /// is not a non-negative amount.
    pub async fn open_register(&self, opening_balance: &str) -> CheckoutResult<Register> {
        let opening = Money::parse(opening_balance)?;
        let register = self.db.registers().open(opening).await?;

        info!(register_id = %register.id, opening = %opening, "Register opened");
        Ok(register)
    }

    /// The currently open register, if any.
    pub async fn get_open_register(&self) -> CheckoutResult<Option<Register>> {
        Ok(self.db.registers().find_open().await?)
    }

    /// Records a manual ingreso/egreso/sistema entry against an open
    /// register.
    ///
    /// Cierre entries are refused here; only [`close_register`] writes
    /// them.
    ///
    /// [`close_register`]: CheckoutService::close_register
    pub async fn record_movement(
        &self,
        register_id: &str,
        kind: MovementKind,
        amount: &str,
        description: &str,
        payment_method: Option<PaymentMethod>,
        user: &ActingUser,
    ) -> CheckoutResult<Movement> {
        if matches!(kind, MovementKind::Cierre) {
            return Err(ValidationError::InvalidFormat {
                field: "kind".to_string(),
                reason: "cierre entries are written by close_register".to_string(),
            }
            .into());
        }

        validate_movement_description(description)?;
        let amount = Money::parse(amount)?;
        // Sistema entries are informational and may carry amount 0; cash
        // movements must move cash.
        if !matches!(kind, MovementKind::Sistema) {
            validate_movement_amount(amount.cents())?;
        }

        let movement = self
            .db
            .registers()
            .record_movement(NewMovement {
                register_id: register_id.to_string(),
                kind,
                amount,
                description: description.trim().to_string(),
                payment_method,
                user: user.clone(),
                lines: Vec::new(),
            })
            .await?;

        info!(
            register_id,
            kind = %movement.kind,
            amount = %movement.amount(),
            "Movement recorded"
        );
        Ok(movement)
    }

    /// Closes the register: stamps the counted balance and the closing
    /// actor, writes the terminal cierre entry.
    pub async fn close_register(
        &self,
        register_id: &str,
        closing_balance: &str,
        user: &ActingUser,
    ) -> CheckoutResult<Register> {
        let closing = Money::parse(closing_balance)?;
        let register = self.db.registers().close(register_id, closing, user).await?;

        let movements = self.db.registers().list_movements(register_id).await?;
        let summary = RegisterSummary::compute(&register, &movements);
        if !summary.is_consistent_with(&register) {
            warn!(
                register_id,
                expected = %summary.expected_balance,
                stored = %register.current_balance(),
                "Ledger does not support the stored balance"
            );
        }

        info!(
            register_id,
            closing = %closing,
            expected = %summary.expected_balance,
            closed_by = %user.name,
            "Register closed"
        );
        Ok(register)
    }

    /// Full movement history for a register, most recent first.
    pub async fn list_movements(&self, register_id: &str) -> CheckoutResult<Vec<Movement>> {
        Ok(self.db.registers().list_movements(register_id).await?)
    }

    /// Session totals recomputed from the ledger.
    pub async fn register_summary(&self, register_id: &str) -> CheckoutResult<RegisterSummary> {
        let register = self.db.registers().get(register_id).await?;
        let movements = self.db.registers().list_movements(register_id).await?;
        Ok(RegisterSummary::compute(&register, &movements))
    }

    /// Units and revenue per product sold in a session, highest revenue
    /// first.
    pub async fn register_product_stats(
        &self,
        register_id: &str,
    ) -> CheckoutResult<Vec<ProductStat>> {
        let lines = self.db.registers().lines_for_register(register_id).await?;
        Ok(report::product_stats(&lines))
    }

    // =========================================================================
    // Finalize Sale
    // =========================================================================

    /// Turns the cart into a recorded, printable sale.
    ///
    /// On success the cart is cleared and the returned ticket is ready for
    /// the printing layer. On any failure the cart keeps its lines and the
    /// register balance and stock are exactly as they were, so the operator
    /// can correct and retry.
    pub async fn finalize_sale(
        &self,
        cart: &mut Cart,
        client: Option<&Client>,
        document_type: DocumentType,
        payment_method: PaymentMethod,
        user: &ActingUser,
    ) -> CheckoutResult<SaleTicket> {
        debug!(document = %document_type, items = cart.len(), "finalize_sale");

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let register = self
            .db
            .registers()
            .find_open()
            .await?
            .ok_or(CheckoutError::NoOpenRegister)?;

        // Unit prices are IVA-inclusive; the 21% component is split out for
        // fiscal documents.
        let total = cart.total();
        let (net, iva) = total.split_iva();
        let now = Utc::now();

        let client_name = client
            .map(Client::display_name)
            .unwrap_or_else(|| "Consumidor Final".to_string());
        let client_document = client
            .map(|c| c.document.clone())
            .unwrap_or_else(|| "0".to_string());

        let movement_lines: Vec<NewMovementLine> = cart
            .items()
            .iter()
            .map(|item| NewMovementLine {
                product_id: item.product_id.clone(),
                product_name: item.title.clone(),
                quantity: item.quantity,
                unit_price_cents: item.unit_price_cents,
            })
            .collect();
        let ticket_lines: Vec<TicketLine> = cart.items().iter().map(TicketLine::from).collect();

        let ticket = match document_type {
            DocumentType::Remito => {
                let sequence = self.db.counters().next_remito_number().await?;
                let number = DocumentNumber::new(self.store.remito_point_of_sale, sequence);
                let description = format!("Venta Remito {} - {}", number, client_name);

                self.db
                    .registers()
                    .record_movement(NewMovement {
                        register_id: register.id.clone(),
                        kind: MovementKind::Ingreso,
                        amount: total,
                        description,
                        payment_method: Some(payment_method),
                        user: user.clone(),
                        lines: movement_lines,
                    })
                    .await?;

                let has_document = !client_document.is_empty() && client_document != "0";
                SaleTicket::Remito(RemitoTicket {
                    store_name: self.store.name.clone(),
                    number,
                    issued_at: now,
                    client_name,
                    client_document: has_document.then_some(client_document),
                    lines: ticket_lines,
                    total,
                    payment_method,
                })
            }

            DocumentType::FacturaC => {
                let receptor = resolve_receptor(&client_name, &client_document, total)?;
                let request = InvoiceRequest::new(&receptor, total, net, now.date_naive());

                // Authorization first. A rejection, timeout or backend error
                // aborts here, before anything is written.
                let authorization = self.fiscal.emit_factura_c(request).await?;

                // QR is pure encoding; build it before the ledger write so a
                // malformed CAE also aborts cleanly.
                let qr_url = QrPayload::factura_c(
                    self.store.cuit,
                    &authorization,
                    &receptor,
                    total,
                    now.date_naive(),
                )?
                .to_url()?;

                let description =
                    format!("Venta Factura C {} - {}", authorization.number, receptor.name);
                self.db
                    .registers()
                    .record_movement(NewMovement {
                        register_id: register.id.clone(),
                        kind: MovementKind::Ingreso,
                        amount: total,
                        description,
                        payment_method: Some(payment_method),
                        user: user.clone(),
                        lines: movement_lines,
                    })
                    .await?;

                SaleTicket::FacturaC(FacturaTicket {
                    store_name: self.store.name.clone(),
                    store_cuit: self.store.cuit,
                    number: authorization.number,
                    issued_at: now,
                    receptor,
                    lines: ticket_lines,
                    net,
                    iva,
                    total,
                    payment_method,
                    cae: authorization.cae,
                    cae_due_date: authorization.cae_due_date,
                    qr_url,
                })
            }

            DocumentType::Recibo | DocumentType::NotaCredito => {
                let description = format!("Venta {} - {}", document_type, client_name);
                self.db
                    .registers()
                    .record_movement(NewMovement {
                        register_id: register.id.clone(),
                        kind: MovementKind::Ingreso,
                        amount: total,
                        description,
                        payment_method: Some(payment_method),
                        user: user.clone(),
                        lines: movement_lines,
                    })
                    .await?;

                SaleTicket::Receipt(ReceiptTicket {
                    store_name: self.store.name.clone(),
                    document_type,
                    issued_at: now,
                    client_name,
                    lines: ticket_lines,
                    total,
                    payment_method,
                })
            }
        };

        cart.clear();
        info!(
            document = %ticket.document_type(),
            total = %total,
            register_id = %register.id,
            "Sale finalized"
        );
        Ok(ticket)
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Adds a product. Sale price is derived from cost and margin; it is
    /// never accepted from the caller.
    pub async fn save_product(&self, new: NewProduct) -> CheckoutResult<Product> {
        validate_product_title(&new.title)?;
        validate_cost_cents(new.cost_cents)?;
        validate_margin_bps(new.margin_bps)?;
        Ok(self.db.products().insert(new).await?)
    }

    /// Updates a product, re-deriving its sale price.
    pub async fn update_product(&self, product: &Product) -> CheckoutResult<Product> {
        validate_product_title(&product.title)?;
        validate_cost_cents(product.cost_cents)?;
        validate_margin_bps(product.margin_bps)?;
        Ok(self.db.products().update(product).await?)
    }

    /// Looks a product up by its id, which doubles as the barcode.
    pub async fn get_product(&self, id: &str) -> CheckoutResult<Option<Product>> {
        Ok(self.db.products().get_by_id(id).await?)
    }

    pub async fn list_products(&self, limit: u32) -> CheckoutResult<Vec<Product>> {
        Ok(self.db.products().list(limit).await?)
    }

    /// Substring search over title and category.
    pub async fn search_products(&self, query: &str, limit: u32) -> CheckoutResult<Vec<Product>> {
        let query = validate_search_query(query)?;
        Ok(self.db.products().search(&query, limit).await?)
    }

    /// Manual stock correction (recount, breakage). Sales adjust stock on
    /// their own inside the movement transaction.
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> CheckoutResult<()> {
        self.db.products().adjust_stock(id, delta).await?;
        info!(product_id = %id, delta, "Stock adjusted");
        Ok(())
    }

    pub async fn delete_product(&self, id: &str) -> CheckoutResult<()> {
        Ok(self.db.products().delete(id).await?)
    }

    // =========================================================================
    // Clients
    // =========================================================================

    /// Registers a client, normalizing the document to bare digits (or the
    /// `"0"` generic-buyer sentinel). Malformed documents are rejected here
    /// so the registry never holds an unclassifiable buyer.
    pub async fn save_client(&self, mut new: NewClient) -> CheckoutResult<Client> {
        validate_client_name(&new.name)?;
        new.document = normalize_document(&new.document)?;
        Ok(self.db.clients().insert(new).await?)
    }

    /// Updates a client, re-normalizing the document field.
    pub async fn update_client(&self, mut client: Client) -> CheckoutResult<Client> {
        validate_client_name(&client.name)?;
        client.document = normalize_document(&client.document)?;
        self.db.clients().update(&client).await?;
        Ok(client)
    }

    pub async fn list_clients(&self, limit: u32) -> CheckoutResult<Vec<Client>> {
        Ok(self.db.clients().list(limit).await?)
    }

    /// Substring search over name, last name and document.
    pub async fn search_clients(&self, query: &str, limit: u32) -> CheckoutResult<Vec<Client>> {
        let query = validate_search_query(query)?;
        Ok(self.db.clients().search(&query, limit).await?)
    }

    pub async fn delete_client(&self, id: &str) -> CheckoutResult<()> {
        Ok(self.db.clients().delete(id).await?)
    }
}

/// Digits-only form of a buyer document, with `"0"` for the generic buyer.
/// Keeps leading zeros, which a numeric round-trip would drop.
fn normalize_document(raw: &str) -> CheckoutResult<String> {
    match classify_document(raw)? {
        DocumentId::Generic => Ok("0".to_string()),
        _ => Ok(raw.chars().filter(|c| c.is_ascii_digit()).collect()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use chrono::Utc;
    use pampa_core::CaeAuthorization;
    use pampa_db::DbConfig;
    use pampa_fiscal::{FiscalError, FiscalResult};

    // -------------------------------------------------------------------------
    // Scripted fiscal authority
    // -------------------------------------------------------------------------

    enum FiscalOutcome {
        Approve(CaeAuthorization),
        Reject(String),
        Timeout,
    }

    /// Captures the request it saw so tests can assert on the wire payload.
    #[derive(Clone)]
    struct FakeAfip {
        outcome: Arc<FiscalOutcome>,
        seen: Arc<Mutex<Option<InvoiceRequest>>>,
    }

    impl FakeAfip {
        fn approving(number: &str, cae: &str, due: &str) -> Self {
            FakeAfip::with_outcome(FiscalOutcome::Approve(CaeAuthorization {
                number: DocumentNumber::parse(number).unwrap(),
                cae: cae.to_string(),
                cae_due_date: due.to_string(),
            }))
        }

        fn rejecting(reason: &str) -> Self {
            FakeAfip::with_outcome(FiscalOutcome::Reject(reason.to_string()))
        }

        fn timing_out() -> Self {
            FakeAfip::with_outcome(FiscalOutcome::Timeout)
        }

        fn with_outcome(outcome: FiscalOutcome) -> Self {
            FakeAfip {
                outcome: Arc::new(outcome),
                seen: Arc::new(Mutex::new(None)),
            }
        }

        fn last_request(&self) -> Option<InvoiceRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl FiscalAuthority for FakeAfip {
        async fn emit_factura_c(&self, request: InvoiceRequest) -> FiscalResult<CaeAuthorization> {
            *self.seen.lock().unwrap() = Some(request);
            match &*self.outcome {
                FiscalOutcome::Approve(auth) => Ok(auth.clone()),
                FiscalOutcome::Reject(reason) => Err(FiscalError::Rejected {
                    reason: reason.clone(),
                }),
                FiscalOutcome::Timeout => Err(FiscalError::Timeout { seconds: 30 }),
            }
        }
    }

    // -------------------------------------------------------------------------
    // Fixtures
    // -------------------------------------------------------------------------

    fn store() -> StoreInfo {
        StoreInfo {
            name: "Dietética La Pampa".to_string(),
            cuit: 30712345675,
            remito_point_of_sale: 1,
        }
    }

    fn operator() -> ActingUser {
        ActingUser {
            id: "u-1".to_string(),
            name: "Ana".to_string(),
        }
    }

    async fn service(fiscal: FakeAfip) -> CheckoutService<FakeAfip> {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        CheckoutService::new(db, fiscal, store())
    }

    async fn product_with(
        svc: &CheckoutService<FakeAfip>,
        title: &str,
        cost_cents: i64,
        margin_bps: i64,
        stock: i64,
    ) -> Product {
        svc.save_product(NewProduct {
            title: title.to_string(),
            description: None,
            cost_cents,
            margin_bps,
            stock,
            category: None,
            supplier: None,
            image_url: None,
        })
        .await
        .unwrap()
    }

    fn cuit_client(name: &str, document: &str) -> Client {
        Client {
            id: "c-1".to_string(),
            name: name.to_string(),
            last_name: None,
            document: document.to_string(),
            address: None,
            phone: None,
            email: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    // -------------------------------------------------------------------------
    // Register lifecycle
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_open_register_parses_operator_text() {
        let svc = service(FakeAfip::timing_out()).await;

        let register = svc.open_register("1000").await.unwrap();
        assert_eq!(register.opening_balance(), Money::from_cents(100_000));
        assert!(register.is_open());

        let err = svc.open_register("-50").await.unwrap_err();
        assert!(matches!(err, CheckoutError::Core(_)));
    }

    #[tokio::test]
    async fn test_second_open_is_a_conflict() {
        let svc = service(FakeAfip::timing_out()).await;
        svc.open_register("0").await.unwrap();

        let err = svc.open_register("500").await.unwrap_err();
        assert!(matches!(err, CheckoutError::RegisterConflict(_)));
        assert!(err.is_state_conflict());
    }

    #[tokio::test]
    async fn test_manual_movements_move_the_balance() {
        let svc = service(FakeAfip::timing_out()).await;
        let register = svc.open_register("1000").await.unwrap();

        svc.record_movement(
            &register.id,
            MovementKind::Egreso,
            "250,50",
            "Pago proveedor harinas",
            Some(PaymentMethod::Efectivo),
            &operator(),
        )
        .await
        .unwrap();

        let current = svc.get_open_register().await.unwrap().unwrap();
        assert_eq!(current.current_balance(), Money::from_cents(74_950));
    }

    #[tokio::test]
    async fn test_record_movement_rejects_bad_input() {
        let svc = service(FakeAfip::timing_out()).await;
        let register = svc.open_register("1000").await.unwrap();
        let user = operator();

        // Unparseable amount.
        let err = svc
            .record_movement(
                &register.id,
                MovementKind::Ingreso,
                "abc",
                "Venta mostrador",
                None,
                &user,
            )
            .await
            .unwrap_err();
        assert!(err.is_validation());

        // Empty description.
        let err = svc
            .record_movement(&register.id, MovementKind::Ingreso, "100", "  ", None, &user)
            .await
            .unwrap_err();
        assert!(err.is_validation());

        // Cierre is reserved for close_register.
        let err = svc
            .record_movement(
                &register.id,
                MovementKind::Cierre,
                "0",
                "Cierre manual",
                None,
                &user,
            )
            .await
            .unwrap_err();
        assert!(err.is_validation());

        // Nothing got through.
        let movements = svc.list_movements(&register.id).await.unwrap();
        assert!(movements.is_empty());
    }

    #[tokio::test]
    async fn test_close_register_writes_cierre_and_blocks_the_session() {
        let svc = service(FakeAfip::timing_out()).await;
        let register = svc.open_register("1000").await.unwrap();
        let user = operator();

        let closed = svc.close_register(&register.id, "1000", &user).await.unwrap();
        assert!(!closed.is_open());
        assert_eq!(closed.closing_balance(), Some(Money::from_cents(100_000)));

        let movements = svc.list_movements(&register.id).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].kind, MovementKind::Cierre);
        assert_eq!(movements[0].amount_cents, 0);

        // The session is sealed.
        let err = svc
            .record_movement(
                &register.id,
                MovementKind::Ingreso,
                "100",
                "Venta tardía",
                None,
                &user,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::RegisterConflict(_)));
    }

    // -------------------------------------------------------------------------
    // Finalize: receipt flow
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_receipt_sale_updates_balance_and_stock() {
        let svc = service(FakeAfip::timing_out()).await;
        let register = svc.open_register("1000").await.unwrap();

        // $100.00 sale price (cost 100.00, margin 0).
        let product = product_with(&svc, "Pan de molde sin TACC", 10_000, 0, 10).await;
        assert_eq!(product.price(), Money::from_cents(10_000));

        let mut cart = Cart::new();
        cart.add(&product, 3).unwrap();

        let ticket = svc
            .finalize_sale(
                &mut cart,
                None,
                DocumentType::Recibo,
                PaymentMethod::Efectivo,
                &operator(),
            )
            .await
            .unwrap();

        assert_eq!(ticket.total(), Money::from_cents(30_000));
        assert!(cart.is_empty());

        let current = svc.get_open_register().await.unwrap().unwrap();
        assert_eq!(current.current_balance(), Money::from_cents(130_000));

        let movements = svc.list_movements(&register.id).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].kind, MovementKind::Ingreso);
        assert_eq!(movements[0].amount(), Money::from_cents(30_000));
        assert!(movements[0].description.contains("RECIBO"));
        assert!(movements[0].description.contains("Consumidor Final"));

        let restocked = svc.get_product(&product.id).await.unwrap().unwrap();
        assert_eq!(restocked.stock, 7);
    }

    #[tokio::test]
    async fn test_finalize_without_register_fails_cleanly() {
        let svc = service(FakeAfip::timing_out()).await;
        let product = product_with(&svc, "Galletitas de arroz", 5_000, 2_000, 5).await;

        let mut cart = Cart::new();
        cart.add(&product, 2).unwrap();

        let err = svc
            .finalize_sale(
                &mut cart,
                None,
                DocumentType::Recibo,
                PaymentMethod::Debito,
                &operator(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::NoOpenRegister));
        assert_eq!(cart.len(), 1);

        let untouched = svc.get_product(&product.id).await.unwrap().unwrap();
        assert_eq!(untouched.stock, 5);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected_before_anything_else() {
        // No register open either; the cart check must win.
        let svc = service(FakeAfip::timing_out()).await;
        let mut cart = Cart::new();

        let err = svc
            .finalize_sale(
                &mut cart,
                None,
                DocumentType::Remito,
                PaymentMethod::Efectivo,
                &operator(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    // -------------------------------------------------------------------------
    // Finalize: remito flow
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_remito_numbers_advance_per_sale() {
        let svc = service(FakeAfip::timing_out()).await;
        let register = svc.open_register("0").await.unwrap();
        let product = product_with(&svc, "Premezcla 1kg", 20_000, 2_500, 50).await;

        let mut cart = Cart::new();
        cart.add(&product, 1).unwrap();
        let first = svc
            .finalize_sale(
                &mut cart,
                None,
                DocumentType::Remito,
                PaymentMethod::Efectivo,
                &operator(),
            )
            .await
            .unwrap();

        cart.add(&product, 2).unwrap();
        let second = svc
            .finalize_sale(
                &mut cart,
                None,
                DocumentType::Remito,
                PaymentMethod::Efectivo,
                &operator(),
            )
            .await
            .unwrap();

        let (first, second) = match (first, second) {
            (SaleTicket::Remito(a), SaleTicket::Remito(b)) => (a, b),
            other => panic!("expected remito tickets, got {other:?}"),
        };
        assert_eq!(first.number.to_string(), "0001-00000001");
        assert_eq!(second.number.to_string(), "0001-00000002");

        let movements = svc.list_movements(&register.id).await.unwrap();
        assert_eq!(movements.len(), 2);
        // Most recent first.
        assert!(movements[0].description.contains("0001-00000002"));
        assert!(movements[1].description.contains("0001-00000001"));
    }

    // -------------------------------------------------------------------------
    // Finalize: Factura C flow
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_factura_c_approved_end_to_end() {
        let afip = FakeAfip::approving("0003-00000050", "123", "2026-09-05");
        let svc = service(afip.clone()).await;
        let register = svc.open_register("0").await.unwrap();

        // Cost $220.00 + 10% margin = $242.00 IVA-inclusive.
        let product = product_with(&svc, "Aceite de coco 360g", 22_000, 1_000, 8).await;
        assert_eq!(product.price(), Money::from_cents(24_200));

        let client = cuit_client("Jorge Paz", "20267036099");
        let mut cart = Cart::new();
        cart.add(&product, 1).unwrap();

        let ticket = svc
            .finalize_sale(
                &mut cart,
                Some(&client),
                DocumentType::FacturaC,
                PaymentMethod::Transferencia,
                &operator(),
            )
            .await
            .unwrap();

        let factura = match ticket {
            SaleTicket::FacturaC(f) => f,
            other => panic!("expected factura ticket, got {other:?}"),
        };
        assert_eq!(factura.number.to_string(), "0003-00000050");
        assert_eq!(factura.cae, "123");
        assert_eq!(factura.total, Money::from_cents(24_200));
        assert_eq!(factura.net, Money::from_cents(20_000));
        assert_eq!(factura.iva, Money::from_cents(4_200));
        assert!(factura.qr_url.starts_with("https://www.afip.gob.ar/fe/qr/?p="));
        assert!(cart.is_empty());

        // Wire payload carried the identified buyer and both amounts.
        let request = afip.last_request().unwrap();
        assert_eq!(request.cliente.nombre, "Jorge Paz");
        assert_eq!(request.cliente.tipo_doc, 80);
        assert_eq!(request.cliente.nro_doc, 20267036099);
        assert!((request.importe_total - 242.0).abs() < f64::EPSILON);
        assert!((request.importe_neto - 200.0).abs() < f64::EPSILON);
        assert_eq!(request.fecha, Utc::now().format("%Y%m%d").to_string());

        // Ledger entry carries the AFIP-assigned number.
        let movements = svc.list_movements(&register.id).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].amount(), Money::from_cents(24_200));
        assert!(movements[0].description.contains("0003-00000050"));

        let current = svc.get_open_register().await.unwrap().unwrap();
        assert_eq!(current.current_balance(), Money::from_cents(24_200));
    }

    #[tokio::test]
    async fn test_factura_c_rejection_preserves_everything() {
        let afip = FakeAfip::rejecting("CUIT inexistente");
        let svc = service(afip).await;
        let register = svc.open_register("1000").await.unwrap();
        let product = product_with(&svc, "Fideos de arroz 500g", 22_000, 1_000, 8).await;

        let client = cuit_client("Jorge Paz", "20267036099");
        let mut cart = Cart::new();
        cart.add(&product, 1).unwrap();

        let err = svc
            .finalize_sale(
                &mut cart,
                Some(&client),
                DocumentType::FacturaC,
                PaymentMethod::Efectivo,
                &operator(),
            )
            .await
            .unwrap_err();

        match &err {
            CheckoutError::Fiscal(FiscalError::Rejected { reason }) => {
                assert!(reason.contains("CUIT inexistente"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert!(!err.is_retryable());

        // Nothing moved: no ledger entry, balance intact, stock intact,
        // cart still loaded for the retry.
        assert!(svc.list_movements(&register.id).await.unwrap().is_empty());
        let current = svc.get_open_register().await.unwrap().unwrap();
        assert_eq!(current.current_balance(), Money::from_cents(100_000));
        let untouched = svc.get_product(&product.id).await.unwrap().unwrap();
        assert_eq!(untouched.stock, 8);
        assert_eq!(cart.len(), 1);
    }

    #[tokio::test]
    async fn test_factura_c_timeout_is_distinct_and_retryable() {
        let svc = service(FakeAfip::timing_out()).await;
        let register = svc.open_register("0").await.unwrap();
        let product = product_with(&svc, "Harina de garbanzo", 9_000, 3_000, 4).await;

        let mut cart = Cart::new();
        cart.add(&product, 1).unwrap();

        let err = svc
            .finalize_sale(
                &mut cart,
                None,
                DocumentType::FacturaC,
                PaymentMethod::Efectivo,
                &operator(),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Fiscal(FiscalError::Timeout { .. })
        ));
        assert!(err.is_retryable());
        assert!(svc.list_movements(&register.id).await.unwrap().is_empty());
        assert_eq!(cart.len(), 1);
    }

    #[tokio::test]
    async fn test_named_consumidor_final_forces_generic_receptor() {
        let afip = FakeAfip::approving("0003-00000051", "456", "2026-09-05");
        let svc = service(afip.clone()).await;
        svc.open_register("0").await.unwrap();
        let product = product_with(&svc, "Snack de maíz", 4_000, 0, 20).await;

        // Document on record, but the buyer is literally "consumidor final"
        // and the sale is far below the identification threshold.
        let client = cuit_client("consumidor final", "20267036099");
        let mut cart = Cart::new();
        cart.add(&product, 1).unwrap();

        svc.finalize_sale(
            &mut cart,
            Some(&client),
            DocumentType::FacturaC,
            PaymentMethod::Efectivo,
            &operator(),
        )
        .await
        .unwrap();

        let request = afip.last_request().unwrap();
        assert_eq!(request.cliente.tipo_doc, 99);
        assert_eq!(request.cliente.nro_doc, 0);
        assert_eq!(request.cliente.nombre, "Consumidor Final");
    }

    // -------------------------------------------------------------------------
    // Reports
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_summary_matches_stored_balance_after_sales() {
        let svc = service(FakeAfip::timing_out()).await;
        let register = svc.open_register("1000").await.unwrap();
        let product = product_with(&svc, "Tostadas de arroz", 10_000, 0, 30).await;

        let mut cart = Cart::new();
        cart.add(&product, 3).unwrap();
        svc.finalize_sale(
            &mut cart,
            None,
            DocumentType::Recibo,
            PaymentMethod::Efectivo,
            &operator(),
        )
        .await
        .unwrap();

        svc.record_movement(
            &register.id,
            MovementKind::Egreso,
            "50",
            "Cambio para el kiosco",
            Some(PaymentMethod::Efectivo),
            &operator(),
        )
        .await
        .unwrap();

        let summary = svc.register_summary(&register.id).await.unwrap();
        assert_eq!(summary.total_ingresos, Money::from_cents(30_000));
        assert_eq!(summary.total_egresos, Money::from_cents(5_000));
        assert_eq!(summary.expected_balance, Money::from_cents(125_000));

        let stored = svc.get_open_register().await.unwrap().unwrap();
        assert!(summary.is_consistent_with(&stored));

        let stats = svc.register_product_stats(&register.id).await.unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].units_sold, 3);
        assert_eq!(stats[0].revenue, Money::from_cents(30_000));
    }

    // -------------------------------------------------------------------------
    // Catalog and clients
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_save_product_validates_fields() {
        let svc = service(FakeAfip::timing_out()).await;

        let err = svc
            .save_product(NewProduct {
                title: "   ".to_string(),
                description: None,
                cost_cents: 1_000,
                margin_bps: 3_000,
                stock: 0,
                category: None,
                supplier: None,
                image_url: None,
            })
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let err = svc
            .save_product(NewProduct {
                title: "Harina de almendras".to_string(),
                description: None,
                cost_cents: 1_000,
                margin_bps: 200_000,
                stock: 0,
                category: None,
                supplier: None,
                image_url: None,
            })
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_save_client_normalizes_documents() {
        let svc = service(FakeAfip::timing_out()).await;

        let client = svc
            .save_client(NewClient {
                name: "Jorge".to_string(),
                last_name: Some("Paz".to_string()),
                document: "20-26703609-9".to_string(),
                address: None,
                phone: None,
                email: None,
            })
            .await
            .unwrap();
        assert_eq!(client.document, "20267036099");

        let walk_in = svc
            .save_client(NewClient {
                name: "Marta".to_string(),
                last_name: None,
                document: "".to_string(),
                address: None,
                phone: None,
                email: None,
            })
            .await
            .unwrap();
        assert_eq!(walk_in.document, "0");

        let err = svc
            .save_client(NewClient {
                name: "Luz".to_string(),
                last_name: None,
                document: "12-34".to_string(),
                address: None,
                phone: None,
                email: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Core(pampa_core::CoreError::InvalidDocument { .. })
        ));
    }
}
