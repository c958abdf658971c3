//! API route modules

pub mod annotation_types;
pub mod annotations;
pub mod health;
pub mod highlight;
