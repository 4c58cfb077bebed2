//! threadscribe-core: data model for discussion threads.
//!
//! This crate provides the types shared by the thread parser and the
//! reply-insertion engine: the [`MarkupNode`] tree abstraction, non-owning
//! [`Range`]s, [`ThreadItem`]s and their [`Threads`] arena, diagnostics,
//! errors, and the [`LocaleConfig`] bundle.

mod config;
#[cfg(test)]
mod fixture;
mod item;
mod node;
mod range;
mod threads;
mod traits;
mod transclusion;
mod walk;
mod warning;

pub use config::*;
pub use item::*;
pub use node::*;
pub use range::*;
pub use threads::*;
pub use traits::*;
pub use transclusion::*;
pub use walk::*;
pub use warning::*;
