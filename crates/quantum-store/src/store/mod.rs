//! # Entity Stores
//!
//! One module per entity kind. Every store follows the same contract:
//!
//! - `load(snapshot)` — read the persisted container or start empty
//! - `create(input)` — assign the next sequential ID, apply entity
//!   defaults, persist, return the record
//! - `update(id, patch)` — merge a partial update; missing id is a
//!   silent no-op (`false`), never an error
//! - `delete(id)` — remove; missing id is a silent no-op
//! - entity-specific queries and period summaries
//!
//! Cross-store coordination (customer → order spawn, vendor → order
//! patch, archival, the order → commission hook) lives in
//! [`crate::sync`], keeping each store free of other stores' types.

pub mod archive;
pub mod commission;
pub mod customer;
pub mod invoice;
pub mod order;
pub mod purchase_order;
pub mod settings;
pub mod vendor;
