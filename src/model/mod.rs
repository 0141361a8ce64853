pub mod bean;
pub mod common;
pub mod note;
pub mod recipe;

pub use bean::*;
pub use common::*;
pub use note::*;
pub use recipe::*;
