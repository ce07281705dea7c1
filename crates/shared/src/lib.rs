//! Shared utilities and common types for the meeWarp backend.
//!
//! This crate provides functionality used across all other crates:
//! - Webhook signature signing and verification
//! - Password hashing with Argon2id
//! - JWT token generation and validation
//! - Pagination helpers

pub mod crypto;
pub mod pagination;
pub mod password;

pub mod jwt;
