//! Game system rules.
//!
//! Only Dragonbane is implemented.

pub mod dragonbane;
