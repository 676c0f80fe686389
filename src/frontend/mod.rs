//! Frontend module - Token model and Scanner

pub mod token;
pub mod scanner;
