#![allow(clippy::doc_markdown, clippy::missing_errors_doc)]
#![doc = include_str!("../README.md")]

pub mod api;
pub mod cache;
pub mod cli;
pub mod entity;
pub mod error;
pub mod fetcher;
mod prelude;
pub mod tables;

pub use crate::error::{Error, Result};
