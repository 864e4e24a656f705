//! # Seed Data Generator
//!
//! Populates the database with a development catalog and a few clients.
//!
//! ## Usage
//! ```bash
//! # Seed the full catalog
//! cargo run -p pampa-db --bin seed
//!
//! # Cap the number of products
//! cargo run -p pampa-db --bin seed -- --count 50
//!
//! # Specify database path
//! cargo run -p pampa-db --bin seed -- --db ./data/pampa.db
//! ```
//!
//! ## Generated Data
//! Products across the categories a gluten-free dietética actually stocks:
//! - Harinas (rice flour, almond flour, premixes)
//! - Galletitas (crackers, cookies, alfajores)
//! - Fideos (rice and corn pasta)
//! - Snacks (chips, nuts, cereal bars)
//! - Despensa (oil, honey, cocoa, baking)
//!
//! Each product has a cost, a margin in basis points, and a starting stock;
//! the sale price is derived by the repository, never written here.

use std::env;

use pampa_db::{Database, DbConfig, NewClient, NewProduct};
use tracing_subscriber::EnvFilter;

/// Product titles by category.
const CATALOG: &[(&str, &[&str])] = &[
    (
        "Harinas",
        &[
            "Harina de arroz",
            "Harina de almendras",
            "Premezcla universal",
            "Fécula de mandioca",
            "Harina de garbanzos",
            "Almidón de maíz",
            "Harina de coco",
            "Harina de sorgo blanco",
        ],
    ),
    (
        "Galletitas",
        &[
            "Galletitas de arroz",
            "Vainillas sin TACC",
            "Cookies de limón",
            "Grisines de queso",
            "Tostadas de arroz",
            "Scones de maíz",
            "Alfajores de maicena",
            "Polvorones",
        ],
    ),
    (
        "Fideos",
        &[
            "Fideos de arroz codito",
            "Fideos de maíz tirabuzón",
            "Ñoquis de papa",
            "Tallarines de arroz",
            "Ravioles sin TACC",
            "Cintas de quinoa",
        ],
    ),
    (
        "Snacks",
        &[
            "Chips de batata",
            "Mix de frutos secos",
            "Maní tostado",
            "Pasas de uva",
            "Barritas de cereal",
            "Granola sin TACC",
            "Semillas de chía",
            "Semillas de lino",
        ],
    ),
    (
        "Despensa",
        &[
            "Aceite de coco",
            "Miel pura",
            "Azúcar mascabo",
            "Cacao amargo",
            "Levadura seca",
            "Polvo de hornear",
            "Esencia de vainilla",
            "Dulce de leche sin TACC",
        ],
    ),
];

/// Package formats with their cost addon in cents.
const FORMATS: &[(&str, i64)] = &[
    ("250g", 0),
    ("500g", 60_000),
    ("1kg", 110_000),
    ("x12", 160_000),
];

/// Margins in basis points (2500 = 25%).
const MARGINS_BPS: &[i64] = &[2_500, 3_000, 3_500, 4_000];

/// Development clients, including the generic walk-in buyer.
const CLIENTS: &[(&str, Option<&str>, &str)] = &[
    ("Consumidor Final", None, "0"),
    ("Marta", Some("Giménez"), "27223334445"),
    ("Jorge", Some("Paz"), "20187654329"),
    ("Romina", Some("Suárez"), "28456123"),
    ("Dietética El Trigal", None, "30712345675"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 500;
    let mut db_path = String::from("./pampa_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(500);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Pampa POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Max products to generate (default: 500)");
                println!("  -d, --db <PATH>    Database file path (default: ./pampa_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Pampa POS Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Generate products
    println!();
    println!("Generating products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    for (category_idx, (category, titles)) in CATALOG.iter().enumerate() {
        for (title_idx, title) in titles.iter().enumerate() {
            for (format_idx, (format, cost_addon)) in FORMATS.iter().enumerate() {
                if generated >= count {
                    break;
                }

                let product = generate_product(
                    category,
                    title,
                    format,
                    *cost_addon,
                    category_idx * 100 + title_idx * 10 + format_idx,
                );

                let label = product.title.clone();
                if let Err(e) = db.products().insert(product).await {
                    eprintln!("Failed to insert {}: {}", label, e);
                    continue;
                }

                generated += 1;

                if generated % 50 == 0 {
                    println!("  Generated {} products...", generated);
                }
            }

            if generated >= count {
                break;
            }
        }

        if generated >= count {
            break;
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    // Seed clients
    println!();
    println!("Seeding clients...");

    for (name, last_name, document) in CLIENTS {
        let client = NewClient {
            name: name.to_string(),
            last_name: last_name.map(String::from),
            document: document.to_string(),
            address: None,
            phone: None,
            email: None,
        };
        if let Err(e) = db.clients().insert(client).await {
            eprintln!("Failed to insert client {}: {}", name, e);
        }
    }

    println!("✓ Seeded {} clients", CLIENTS.len());

    // Verify search
    println!();
    println!("Verifying catalog search...");
    let search_results = db.products().search("harina", 10).await?;
    println!("  Search 'harina': {} results", search_results.len());

    let search_results = db.products().search("Snacks", 10).await?;
    println!("  Search 'Snacks': {} results", search_results.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Initializes structured logging for the seed run.
///
/// Quiet by default so the progress output stays readable; raise with
/// `RUST_LOG=pampa_db=debug` to watch migrations and inserts.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Generates a single product with plausible dietética numbers.
fn generate_product(
    category: &str,
    title: &str,
    format: &str,
    cost_addon: i64,
    seed: usize,
) -> NewProduct {
    // Cost: $800.00 - $2,800.00 base plus the format addon
    let base_cost = 80_000 + ((seed * 17) % 200_000) as i64;
    let cost_cents = base_cost + cost_addon;

    let margin_bps = MARGINS_BPS[seed % MARGINS_BPS.len()];
    let stock = (seed % 25) as i64;

    NewProduct {
        title: format!("{} {}", title, format),
        description: None,
        cost_cents,
        margin_bps,
        stock,
        category: Some(category.to_string()),
        supplier: None,
        image_url: None,
    }
}
