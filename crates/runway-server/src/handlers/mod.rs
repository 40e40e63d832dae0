//! HTTP request handlers

mod forecast;

pub use forecast::*;
