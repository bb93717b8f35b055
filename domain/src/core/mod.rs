//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`issue::ConfigIssue`]: structured configuration problems
//! - [`string`]: small text helpers used by checks and formatters

pub mod error;
pub mod issue;
pub mod string;
