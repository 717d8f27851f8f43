//! Test data generation for benchmarks.
//!
//! Generators are seeded so every run sees the same orders.

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Scale factor for benchmark data generation.
#[derive(Clone, Copy, Debug, Default)]
pub enum Scale {
    /// 10 orders. Use for quick tests and development iteration.
    Tiny,
    /// 100 orders.
    Small,
    /// 2,000 orders.
    #[default]
    Medium,
    /// 50,000 orders.
    Large,
}

impl Scale {
    /// Number of purchase orders at this scale.
    pub fn count(&self) -> usize {
        match self {
            Scale::Tiny => 10,
            Scale::Small => 100,
            Scale::Medium => 2_000,
            Scale::Large => 50_000,
        }
    }

    /// Order lines per purchase order.
    pub fn lines_per_order(&self) -> usize {
        match self {
            Scale::Tiny => 2,
            Scale::Small => 3,
            Scale::Medium => 3,
            Scale::Large => 5,
        }
    }
}

/// A purchase order header.
pub struct OrderData {
    pub name: String,
    pub transaction_date: String,
    pub customer: String,
    pub client_po: String,
    pub modified: String,
    pub lines: Vec<LineData>,
    /// Invoice raised against this order's sale order, if any.
    pub invoice: Option<InvoiceData>,
}

/// A purchase order line.
pub struct LineData {
    pub idx: i64,
    pub item_code: String,
    pub item_name: String,
    pub qty: f64,
    pub rate: f64,
    pub sale: Option<SaleLink>,
}

/// The sale line an order line was raised for.
pub struct SaleLink {
    pub sales_order_item: String,
    pub sales_order: String,
    pub sales_rate: f64,
}

pub struct InvoiceData {
    pub name: String,
    pub posting_date: String,
    pub grand_total: f64,
}

pub const CUSTOMERS: [&str; 6] = [
    "Store North",
    "Store South",
    "Store East",
    "Store West",
    "Warehouse 1",
    "Warehouse 2",
];

const ITEMS: [&str; 8] = [
    "Widget", "Gadget", "Bolt", "Nut", "Bracket", "Hinge", "Spring", "Washer",
];

/// Generate a random string of specified length.
fn random_string(rng: &mut StdRng, len: usize) -> String {
    (0..len).map(|_| rng.sample(Alphanumeric) as char).collect()
}

/// A date in 2024 derived from an index; days are capped at 28.
fn date_for(index: usize) -> String {
    format!("2024-{:02}-{:02}", 1 + (index / 28) % 12, 1 + index % 28)
}

/// Generate purchase orders with a mix of unlinked, allocated and invoiced lines.
///
/// Roughly a third of lines have no sale link. Every order's lines share
/// one sale order, and half of the orders carry an invoice for it.
pub fn generate_orders(scale: Scale) -> Vec<OrderData> {
    const SEED: u64 = 12345;
    let mut rng = StdRng::seed_from_u64(SEED);

    (0..scale.count())
        .map(|i| {
            let name = format!("PO-{:05}", i);
            let lines: Vec<LineData> = (0..scale.lines_per_order())
                .map(|j| {
                    let item = ITEMS[rng.gen_range(0..ITEMS.len())];
                    let qty = rng.gen_range(1..500) as f64;
                    let rate = (rng.gen_range(10..10_000) as f64) / 100.0;
                    let sale = rng.gen_bool(2.0 / 3.0).then(|| SaleLink {
                        sales_order_item: format!("SOI-{:05}-{}", i, j + 1),
                        sales_order: format!("SO-{:05}", i),
                        sales_rate: rate * 1.2,
                    });

                    LineData {
                        idx: (j + 1) as i64,
                        item_code: format!("{}-{}", item.to_uppercase(), random_string(&mut rng, 4)),
                        item_name: item.to_string(),
                        qty,
                        rate,
                        sale,
                    }
                })
                .collect();

            let invoice = rng.gen_bool(0.5).then(|| InvoiceData {
                name: format!("SINV-{:05}", i),
                posting_date: date_for(i + 14),
                grand_total: lines.iter().map(|l| l.qty * l.rate * 1.2).sum(),
            });

            OrderData {
                name,
                transaction_date: date_for(i),
                customer: CUSTOMERS[i % CUSTOMERS.len()].to_string(),
                client_po: format!("CPO-{}", random_string(&mut rng, 6)),
                modified: format!(
                    "{} {:02}:{:02}:{:02}",
                    date_for(i),
                    (i / 3600) % 24,
                    (i / 60) % 60,
                    i % 60
                ),
                lines,
                invoice,
            }
        })
        .collect()
}
