pub mod auth;
pub mod health;
pub mod menu_items;
pub mod pages;
pub mod permissions;
pub mod roles;
