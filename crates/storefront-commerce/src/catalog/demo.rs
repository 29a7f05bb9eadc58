//! Built-in demo catalog, served when the live product source is down.

use crate::catalog::Product;
use crate::money::Money;
use chrono::{TimeZone, Utc};

/// Notice shown to shoppers while the demo catalog is in use.
pub const DEMO_NOTICE: &str = "Showing demo data: the product service is unavailable";

struct Seed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    cents: i64,
    category: &'static str,
    stock: u32,
    rating: f64,
    is_new: bool,
    created: (i32, u32, u32),
    brand: &'static str,
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "demo-1",
        name: "Gaming Laptop",
        description: "15.6\" gaming laptop with a dedicated graphics card",
        cents: 120_000,
        category: "laptops",
        stock: 8,
        rating: 4.5,
        is_new: false,
        created: (2024, 1, 15),
        brand: "Vortex",
    },
    Seed {
        id: "demo-2",
        name: "Mechanical Keyboard",
        description: "Mechanical keyboard with blue switches and RGB backlight",
        cents: 8_000,
        category: "peripherals",
        stock: 25,
        rating: 4.2,
        is_new: false,
        created: (2024, 2, 3),
        brand: "Keyforge",
    },
    Seed {
        id: "demo-3",
        name: "Gaming Monitor",
        description: "27 inch 144Hz monitor with 1ms response time",
        cents: 60_000,
        category: "monitors",
        stock: 0,
        rating: 4.7,
        is_new: false,
        created: (2024, 2, 20),
        brand: "Lumen",
    },
    Seed {
        id: "demo-4",
        name: "NVMe SSD 1TB",
        description: "PCIe 4.0 solid state drive with 7000MB/s reads",
        cents: 9_999,
        category: "storage",
        stock: 40,
        rating: 4.8,
        is_new: true,
        created: (2024, 5, 2),
        brand: "Datacore",
    },
    Seed {
        id: "demo-5",
        name: "Wi-Fi 6 Router",
        description: "Dual band wireless router for the whole home",
        cents: 14_950,
        category: "networking",
        stock: 12,
        rating: 4.1,
        is_new: false,
        created: (2024, 3, 11),
        brand: "Netwave",
    },
    Seed {
        id: "demo-6",
        name: "Graphics Card",
        description: "High end graphics card with 16GB of video memory",
        cents: 79_900,
        category: "components",
        stock: 3,
        rating: 4.6,
        is_new: true,
        created: (2024, 6, 1),
        brand: "Vortex",
    },
    Seed {
        id: "demo-7",
        name: "Office Suite License",
        description: "One year subscription for five devices",
        cents: 6_999,
        category: "software",
        stock: 99,
        rating: 3.9,
        is_new: false,
        created: (2023, 11, 30),
        brand: "Deskware",
    },
    Seed {
        id: "demo-8",
        name: "Laptop Backpack",
        description: "Water resistant backpack that fits 17 inch laptops",
        cents: 4_500,
        category: "accessories",
        stock: 30,
        rating: 4.3,
        is_new: false,
        created: (2024, 4, 18),
        brand: "Trailpack",
    },
];

/// The demo catalog, in a fixed order.
pub fn demo_products() -> Vec<Product> {
    SEEDS
        .iter()
        .map(|s| {
            let (y, m, d) = s.created;
            let mut product = Product::new(s.id, s.name, Money::new(s.cents))
                .with_description(s.description)
                .with_category(s.category)
                .with_stock(s.stock)
                .with_rating(s.rating)
                .with_brand(s.brand);
            if let Some(created) = Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).single() {
                product = product.with_created_at(created);
            }
            product.is_new = s.is_new;
            product
        })
        .collect()
}
