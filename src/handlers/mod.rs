pub mod borrow;
pub mod health;
