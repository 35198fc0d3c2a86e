pub mod auth;
pub mod cart;
pub mod checkout;
pub mod products;
pub mod tabs;
pub mod wishlist;
