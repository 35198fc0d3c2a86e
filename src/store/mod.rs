//! Read-modify-write stores over a [`StorageHandle`](crate::storage::StorageHandle).

pub mod cart;
pub mod orders;
pub mod users;
pub mod wishlist;

pub use cart::{CartStore, CartView};
pub use orders::OrderHistory;
pub use users::UserStore;
pub use wishlist::{WishlistButton, WishlistStore, WishlistToggle};
