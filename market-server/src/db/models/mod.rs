//! Database models
//!
//! Serde entities for the embedded SurrealDB store. Record links between
//! tables use [`surrealdb::RecordId`]; user identities come from the external
//! auth layer and are stored as plain strings.

pub mod serde_helpers;

pub mod batch;
pub mod cart;
pub mod ingredient;
pub mod notification;
pub mod order;
pub mod product;
pub mod purchase;

pub use batch::{IngredientBatch, IngredientBatchItem};
pub use cart::{CartItem, CartItemView};
pub use ingredient::{Ingredient, IngredientCreate, IngredientUpdate};
pub use notification::{Notification, NotificationKind};
pub use order::{ContactInfo, Order, OrderDetail, OrderItem, OrderItemDetail, OrderStatus};
pub use product::{Product, ProductCreate, ProductUpdate};
pub use purchase::Purchase;
