//! End-to-end flows from one kind of input to a [`NormalizedRecipe`].
//!
//! Each pipeline makes at most one page fetch or one endpoint call (plus
//! the OCR call for images) and stops at the first successful strategy.
//!
//! [`NormalizedRecipe`]: crate::model::NormalizedRecipe

pub mod generate;
pub mod image;
pub mod text;
pub mod url;
