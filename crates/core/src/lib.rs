#![allow(clippy::should_implement_trait)]
pub mod embed;
pub mod error;
pub mod types;
