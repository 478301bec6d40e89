//! Lattice Gifts
//!
//! Gift line reconciliation for shopping carts. A gifting rule decides which
//! complimentary lines a cart should hold; the gift item manager adds, removes and
//! resizes those lines, and the totals pipeline prices them at zero.

pub mod cart;
pub mod catalog;
pub mod fixtures;
pub mod gifts;
pub mod items;
pub mod options;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod totals;
pub mod utils;
