//! Wire types for the remote catalog and auth API.
//!
//! These mirror the response envelopes the backend actually sends. Field
//! tolerance is deliberate: the API contract is not under this crate's
//! control, so everything that can be absent without breaking the views is
//! defaulted rather than required.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use bazaar_core::{CategoryId, ProductId, discounted_price};

// =============================================================================
// Catalog Types
// =============================================================================

/// A sellable catalog item.
///
/// Products are read-only from the client's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Server-issued identifier.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Stock-keeping unit code.
    #[serde(default)]
    pub sku: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Unit price before discount.
    pub price: Decimal,
    /// Discount percentage, 0-100 inclusive.
    #[serde(default)]
    pub discount: Decimal,
    /// Owning category, either a bare id or an embedded `{_id, name}` pair.
    #[serde(rename = "categoryId")]
    pub category: CategoryRef,
    /// Brand name.
    #[serde(default)]
    pub brand: String,
    /// Ordered image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Units in stock.
    #[serde(default)]
    pub stock: u32,
    /// Average rating, 0-5.
    #[serde(default)]
    pub rating: f64,
    /// Number of reviews behind the rating.
    #[serde(default)]
    pub num_reviews: u32,
    /// Free-form descriptive attributes.
    #[serde(default)]
    pub attributes: ProductAttributes,
    /// Whether the product is featured on the home page.
    #[serde(default)]
    pub is_featured: bool,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last-update timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Price after applying the discount percentage.
    #[must_use]
    pub fn discounted_price(&self) -> Decimal {
        discounted_price(self.price, self.discount)
    }

    /// Resolve the category display name from either wire shape.
    ///
    /// A bare id reference displays as the id itself; an embedded reference
    /// displays as its name.
    #[must_use]
    pub fn category_name(&self) -> &str {
        match &self.category {
            CategoryRef::Id(id) => id.as_str(),
            CategoryRef::Embedded { name, .. } => name,
        }
    }
}

/// Free-form product attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductAttributes {
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub warranty: String,
}

/// A product's category reference.
///
/// The backend sends either the raw category id or an embedded summary,
/// depending on whether the listing endpoint populated the reference.
/// Callers must handle both shapes uniformly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    /// Bare category id.
    Id(CategoryId),
    /// Embedded `{_id, name}` summary.
    Embedded {
        #[serde(rename = "_id")]
        id: CategoryId,
        name: String,
    },
}

impl CategoryRef {
    /// The category id in either shape.
    #[must_use]
    pub const fn id(&self) -> &CategoryId {
        match self {
            Self::Id(id) | Self::Embedded { id, .. } => id,
        }
    }
}

/// A browsable product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Server-issued identifier.
    #[serde(rename = "_id")]
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// URL slug.
    #[serde(default)]
    pub slug: String,
    /// Parent category, if nested.
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    /// Banner image URL.
    #[serde(default)]
    pub image: String,
}

// =============================================================================
// Response Envelopes
// =============================================================================

/// Envelope of `GET products` listings.
///
/// Fields are defaulted so a structurally wrong body parses into a shape the
/// client can recognize as invalid, instead of failing opaquely.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductListEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub data: Option<Vec<Product>>,
}

/// Envelope of `GET products/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SingleProductEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Product>,
}

/// Envelope of `GET categories`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoriesEnvelope {
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
}

/// One server page of products, plus the pagination bounds the server
/// reported for the whole result set.
#[derive(Debug, Clone)]
pub struct ProductPage {
    /// Products on this page.
    pub products: Vec<Product>,
    /// Total matching products across all pages.
    pub total: u64,
    /// 1-based index of this page.
    pub page: u32,
    /// Total number of pages.
    pub pages: u32,
}

// =============================================================================
// Auth Request Payloads
// =============================================================================

/// Login credentials.
///
/// The password is held as a [`SecretString`] so it never appears in `Debug`
/// output; it is exposed only at serialization time.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    /// Build credentials from raw form input.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

impl Serialize for Credentials {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Credentials", 2)?;
        state.serialize_field("email", &self.email)?;
        state.serialize_field("password", self.password.expose_secret())?;
        state.end()
    }
}

/// Account role requested at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Admin,
}

/// Registration form payload.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub role: Role,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl Serialize for RegisterRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RegisterRequest", 7)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("email", &self.email)?;
        state.serialize_field("password", self.password.expose_secret())?;
        state.serialize_field("confirmPassword", self.confirm_password.expose_secret())?;
        state.serialize_field("role", &self.role)?;
        match &self.phone {
            Some(phone) => state.serialize_field("phone", phone)?,
            None => state.skip_field("phone")?,
        }
        match &self.address {
            Some(address) => state.serialize_field("address", address)?,
            None => state.skip_field("address")?,
        }
        state.end()
    }
}

// =============================================================================
// Rating Display
// =============================================================================

/// One of the five rating stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Star {
    Full,
    Half,
    Empty,
}

/// Break a 0-5 rating into five display stars.
///
/// Whole part renders as full stars; a fractional part of at least 0.5 adds
/// one half star; the rest pad out as empty.
#[must_use]
pub fn star_breakdown(rating: f64) -> Vec<Star> {
    let clamped = rating.clamp(0.0, 5.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let full = clamped.floor() as usize;
    let half = clamped.fract() >= 0.5 && full < 5;

    let mut stars = vec![Star::Full; full];
    if half {
        stars.push(Star::Half);
    }
    stars.resize(5, Star::Empty);
    stars
}
