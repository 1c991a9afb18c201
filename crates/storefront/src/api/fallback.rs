//! Fixed fallback catalog shown when the product listing cannot be loaded.
//!
//! When the remote API is unreachable the flat product list falls back to
//! this small hardcoded set instead of rendering an empty page. Pagination
//! over the set is simulated with the same page arithmetic the server uses.

use rust_decimal::Decimal;

use bazaar_core::{CategoryId, ProductId};

use super::types::{CategoryRef, Product, ProductAttributes, ProductPage};

struct Seed {
    id: &'static str,
    name: &'static str,
    sku: &'static str,
    description: &'static str,
    price: i64,
    discount: i64,
    category: &'static str,
    brand: &'static str,
    image: &'static str,
    stock: u32,
    rating: f64,
    num_reviews: u32,
    color: &'static str,
    material: &'static str,
    warranty: &'static str,
    is_featured: bool,
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "1",
        name: "Professional DSLR Camera",
        sku: "CAM-001",
        description: "High-resolution camera with advanced features for professional photography.",
        price: 45_999,
        discount: 18,
        category: "electronics",
        brand: "Canon",
        image: "/images/camera.png",
        stock: 25,
        rating: 4.8,
        num_reviews: 127,
        color: "Black",
        material: "Metal",
        warranty: "24 Months",
        is_featured: true,
    },
    Seed {
        id: "2",
        name: "Handcrafted Wooden Vases",
        sku: "HOME-002",
        description: "Beautiful handcrafted wooden decorative vases for your home decor.",
        price: 2_499,
        discount: 29,
        category: "home-decor",
        brand: "Artisan Crafts",
        image: "/images/wooden-vases.jpg",
        stock: 15,
        rating: 4.2,
        num_reviews: 89,
        color: "Brown",
        material: "Wood",
        warranty: "6 Months",
        is_featured: false,
    },
    Seed {
        id: "3",
        name: "Indoor Plant Collection",
        sku: "PLANT-003",
        description: "Premium indoor plants perfect for home and office spaces.",
        price: 899,
        discount: 31,
        category: "plants",
        brand: "Green Paradise",
        image: "/images/indoor-plants.jpg",
        stock: 50,
        rating: 4.9,
        num_reviews: 203,
        color: "Green",
        material: "Natural",
        warranty: "30 Days",
        is_featured: true,
    },
    Seed {
        id: "4",
        name: "Abstract Wall Art Set",
        sku: "ART-004",
        description: "Modern abstract circle wall art set to beautify your living space.",
        price: 3_299,
        discount: 34,
        category: "art",
        brand: "Modern Designs",
        image: "/images/abstract-wall-art.jpg",
        stock: 12,
        rating: 4.1,
        num_reviews: 67,
        color: "Multi-color",
        material: "Canvas",
        warranty: "12 Months",
        is_featured: false,
    },
    Seed {
        id: "5",
        name: "Modern Entryway Furniture",
        sku: "FURN-005",
        description: "Stylish modern furniture set perfect for your home entryway.",
        price: 15_999,
        discount: 27,
        category: "furniture",
        brand: "Elite Furniture",
        image: "/images/entryway-furniture.jpg",
        stock: 8,
        rating: 4.7,
        num_reviews: 156,
        color: "White",
        material: "Wood & Metal",
        warranty: "36 Months",
        is_featured: true,
    },
    Seed {
        id: "6",
        name: "Wireless Bluetooth Headphones",
        sku: "AUDIO-006",
        description: "Premium wireless headphones with noise cancellation technology.",
        price: 8_999,
        discount: 31,
        category: "electronics",
        brand: "SoundTech",
        image: "/images/headphones.png",
        stock: 35,
        rating: 4.6,
        num_reviews: 341,
        color: "Black",
        material: "Plastic & Metal",
        warranty: "18 Months",
        is_featured: false,
    },
];

/// The full fallback catalog.
#[must_use]
pub fn catalog() -> Vec<Product> {
    SEEDS
        .iter()
        .map(|seed| Product {
            id: ProductId::new(seed.id),
            name: seed.name.to_owned(),
            sku: seed.sku.to_owned(),
            description: seed.description.to_owned(),
            price: Decimal::from(seed.price),
            discount: Decimal::from(seed.discount),
            category: CategoryRef::Id(CategoryId::new(seed.category)),
            brand: seed.brand.to_owned(),
            images: vec![seed.image.to_owned()],
            stock: seed.stock,
            rating: seed.rating,
            num_reviews: seed.num_reviews,
            attributes: ProductAttributes {
                color: seed.color.to_owned(),
                material: seed.material.to_owned(),
                warranty: seed.warranty.to_owned(),
            },
            is_featured: seed.is_featured,
            created_at: None,
            updated_at: None,
        })
        .collect()
}

/// Slice the fallback catalog into a server-style page.
#[must_use]
pub fn paginate(page: u32, per_page: u32) -> ProductPage {
    let products = catalog();
    let total = products.len() as u64;
    let per_page = per_page.max(1);
    let pages = total.div_ceil(u64::from(per_page)) as u32;

    let start = (page.saturating_sub(1) as usize).saturating_mul(per_page as usize);
    let page_products: Vec<Product> = products
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .collect();

    ProductPage {
        products: page_products,
        total,
        page,
        pages,
    }
}
