//! Entities mirrored from the hosted tables, plus write payloads.

pub mod attachment;
pub mod farmer;
pub mod order;
pub mod product;

pub use attachment::*;
pub use farmer::*;
pub use order::*;
pub use product::*;
