pub(crate) mod attempts;
pub(crate) mod completed_tests;
pub(crate) mod health;
pub(crate) mod products;
pub(crate) mod questions;
pub(crate) mod users;
