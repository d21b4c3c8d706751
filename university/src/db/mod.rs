//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL.
//! It follows the Repository pattern to provide clean abstractions over database operations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Services   │  (per-entity facades, one transaction per operation)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - entity store, associations, schedule search)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │   Models    │  (db::models - database records)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`handlers`]: Repository implementations, existence checks and association mutations
//! - [`models`]: Database record structures matching table schemas
//! - [`errors`]: Database-specific error types
//!
//! # Transactions
//!
//! Repositories borrow a `PgConnection`, so they work equally on a pooled connection or
//! inside a transaction. Anything that writes should run inside one:
//!
//! ```ignore
//! let mut tx = pool.begin().await?;
//! let mut courses = Courses::new(&mut tx);
//! let course = courses.create(&request).await?;
//! tx.commit().await?;
//! ```

pub mod errors;
pub mod handlers;
pub mod models;
