//! # MarketOps Testkit
//!
//! Testing utilities for the MarketOps catalog.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Grant vectors**: Known commands with the exact messages they must produce
//! - **Generators**: Proptest strategies for users, actions, targets and grant text
//! - **Fixtures**: A ready catalog over an in-memory store, plus sample records
//! - **Failing store**: A [`Store`](marketops_store::Store) that fails on demand
//!
//! ## Grant Vectors
//!
//! ```rust
//! use marketops_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, message) in verify_all_vectors() {
//!     assert!(matches, "{name}: {message}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use marketops_perms::AccessControl;
//! use marketops_testkit::generators::GrantParams;
//!
//! proptest! {
//!     #[test]
//!     fn grants_apply(params: GrantParams) {
//!         let engine = AccessControl::new();
//!         prop_assert!(engine.execute_grant(&params.text()).starts_with("SUCCESS"));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,ignore
//! use marketops_testkit::fixtures::{sample_asset, TestFixture};
//!
//! let fixture = TestFixture::new().await;
//! fixture.grant("GRANT ADMIN ON market-assets TO trader").await;
//! fixture.create_as_admin(sample_asset("GOLD", 2300.0, 0.4)).await;
//! ```

pub mod failing;
pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use failing::FailingStore;
pub use fixtures::{sample_asset, sample_records, TestFixture};
pub use generators::GrantParams;
pub use vectors::{all_vectors, verify_all_vectors, GrantVector};
