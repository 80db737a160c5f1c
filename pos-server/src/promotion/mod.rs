//! Promotion Module
//!
//! - [`evaluator`] - pure evaluation of one promotion against cart lines
//! - [`service`] - tenant-scoped management and apply-by-code

mod evaluator;
mod service;

pub use evaluator::{Evaluation, Rejection, evaluate};
pub use service::{AppliedPromotion, PromotionService};
