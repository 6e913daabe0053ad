//! Patlang Core Types and Definitions
//!
//! This crate provides the foundational types for the patlang box-and-wire
//! diagram editor. It includes:
//!
//! - **Identifiers**: Typed, serde-transparent identifiers ([`identifier`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Handles**: Indexed port references in `in-<n>` / `out-<n>` form ([`handle::Handle`])
//! - **Items**: Catalog item types: wire types, box types, diagrams, equations ([`item`] module)
//! - **Elements**: Placed node and edge instances ([`element`] module)

pub mod color;
pub mod element;
pub mod handle;
pub mod identifier;
pub mod item;
