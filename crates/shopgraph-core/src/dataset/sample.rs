//! Built-in sample data for a small electronics shop.

use chrono::NaiveDate;

use super::Dataset;
use crate::catalog::{Category, Product, ProductCategory};
use crate::customer::Customer;
use crate::purchase::{Purchase, PurchaseLine};
use crate::review::Review;

/// (sku, name, description, price, stock, category)
const PRODUCTS: &[(&str, &str, &str, i64, i64, &str)] = &[
    ("KB-RGB-001", "RGB Mechanical Keyboard", "Full-size keyboard with hot-swappable switches and per-key RGB", 120, 35, "Peripherals"),
    ("MSE-WL-02", "Wireless Mouse", "Ergonomic 2.4GHz mouse with 16000 DPI sensor", 45, 80, "Peripherals"),
    ("CAM-HD-1080", "1080p Webcam", "Full HD webcam with dual microphones", 70, 30, "Peripherals"),
    ("MON-27-IPS", "27\" IPS Monitor", "27 inch QHD IPS panel, 144Hz", 320, 12, "Monitors"),
    ("HS-BT-07", "Bluetooth Headset", "Over-ear headset with active noise cancelling", 90, 40, "Audio"),
    ("SPK-USB-03", "USB Desktop Speakers", "Compact stereo speakers powered over USB", 60, 25, "Audio"),
    ("LAP-14-PRO", "14\" Pro Laptop", "14 inch laptop, 16GB RAM, 1TB SSD", 1450, 8, "Computers"),
    ("HUB-USBC-07", "USB-C 7-in-1 Hub", "HDMI, 3x USB-A, SD, microSD and PD passthrough", 55, 60, "Accessories"),
];

const CATEGORIES: &[&str] = &["Peripherals", "Monitors", "Audio", "Computers", "Accessories"];

/// (sku, text, rating)
const REVIEWS: &[(&str, &str, i64)] = &[
    ("KB-RGB-001", "Great switches, the lighting software is a bit clunky", 5),
    ("MSE-WL-02", "Comfortable for long sessions, battery lasts weeks", 4),
    ("MON-27-IPS", "Colors are excellent out of the box", 5),
    ("LAP-14-PRO", "Fast and quiet, runs warm under load", 4),
    ("HS-BT-07", "Good noise cancelling, mediocre microphone", 3),
];

/// (id, name, email)
const CUSTOMERS: &[(&str, &str, &str)] = &[
    ("CUST-001", "Ana Torres", "ana.torres@example.com"),
    ("CUST-002", "Bruno Diaz", "bruno.diaz@example.com"),
    ("CUST-003", "Carla Mendez", "carla.mendez@example.com"),
];

/// (id, customer, (year, month, day), total, lines)
#[allow(clippy::type_complexity)]
const PURCHASES: &[(&str, &str, (i32, u32, u32), i64, &[(&str, i64)])] = &[
    ("ORD-001", "CUST-001", (2024, 3, 2), 1505, &[("LAP-14-PRO", 1), ("HUB-USBC-07", 1)]),
    ("ORD-002", "CUST-002", (2024, 3, 5), 165, &[("KB-RGB-001", 1), ("MSE-WL-02", 1)]),
    ("ORD-003", "CUST-001", (2024, 3, 11), 410, &[("MSE-WL-02", 2), ("MON-27-IPS", 1)]),
    ("ORD-004", "CUST-003", (2024, 3, 15), 220, &[("HS-BT-07", 1), ("CAM-HD-1080", 1), ("SPK-USB-03", 1)]),
];

pub(super) fn build() -> Dataset {
    let categories = CATEGORIES.iter().map(|name| Category::new(*name)).collect();

    let products = PRODUCTS
        .iter()
        .map(|(sku, name, description, price, stock, _)| Product {
            sku: sku.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            price: *price,
            stock: *stock,
        })
        .collect();

    let memberships = PRODUCTS
        .iter()
        .map(|(sku, .., category)| ProductCategory {
            sku: sku.to_string(),
            category: category.to_string(),
        })
        .collect();

    let reviews = REVIEWS
        .iter()
        .map(|(sku, text, rating)| Review {
            sku: sku.to_string(),
            text: text.to_string(),
            rating: *rating,
        })
        .collect();

    let customers = CUSTOMERS
        .iter()
        .map(|(id, name, email)| Customer {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
        })
        .collect();

    let purchases = PURCHASES
        .iter()
        .map(|(id, customer, (y, m, d), total, lines)| Purchase {
            id: id.to_string(),
            customer_id: customer.to_string(),
            date: NaiveDate::from_ymd_opt(*y, *m, *d).unwrap_or_default(),
            total: *total,
            lines: lines
                .iter()
                .map(|(sku, qty)| PurchaseLine::new(*sku, *qty))
                .collect(),
        })
        .collect();

    Dataset {
        categories,
        products,
        memberships,
        reviews,
        customers,
        purchases,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_is_clean() {
        let ds = build();
        assert!(ds.audit().is_empty(), "{:?}", ds.audit());
    }

    #[test]
    fn test_every_sample_purchase_has_two_products() {
        for p in &build().purchases {
            assert!(p.distinct_skus().len() >= 2, "{} is single-item", p.id);
        }
    }

    #[test]
    fn test_no_pair_co_occurs_twice() {
        let mut seen = HashSet::new();
        for p in &build().purchases {
            let skus = p.distinct_skus();
            for a in &skus {
                for b in &skus {
                    if a < b {
                        assert!(seen.insert((*a, *b)), "{} + {} repeated", a, b);
                    }
                }
            }
        }
    }

    #[test]
    fn test_wireless_mouse_in_two_purchases() {
        let ds = build();
        let ids: Vec<&str> = ds
            .purchases
            .iter()
            .filter(|p| p.lines.iter().any(|l| l.sku == "MSE-WL-02"))
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["ORD-002", "ORD-003"]);
    }
}
