// src/models/mod.rs

//! Data structures representing database entities.

pub mod cart_item;
pub mod invoice;
pub mod order;
pub mod order_item;
pub mod product;
pub mod report;
pub mod review;
pub mod session;
pub mod user;
pub mod wishlist;

pub use cart_item::CartItem;
pub use invoice::Invoice;
pub use order::{Order, OrderStatus};
pub use order_item::OrderItem;
pub use product::Product;
pub use report::{Report, ReportStatus, ReportType};
pub use review::Review;
pub use session::Session;
pub use user::User;
pub use wishlist::WishlistItem;
