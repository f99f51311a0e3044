//! mdtree Core
//!
//! This crate provides the token and syntax tree types, the tree builder
//! and error definitions for mdtree.
//!
//! # Overview
//!
//! The core crate contains:
//! - [`Token`] - A markdown-it style token, the tokenizer's output unit
//! - [`SyntaxTree`], [`SyntaxTreeNode`] - The tree rebuilt from a flat token stream
//! - [`Walk`] - Depth-first traversal over a tree
//! - [`Preset`] - Named tokenizer presets
//! - [`TreeError`], [`MdtreeError`] - Error types

pub mod enums;
pub mod error;
pub mod token;
pub mod tree;
pub mod walk;

pub use enums::Preset;
pub use error::{MdtreeError, Result, TreeError};
pub use token::{AttrValue, Token, CLOSING, OPENING, SELF_CONTAINED};
pub use tree::{NodeId, NodeKind, SyntaxTree, SyntaxTreeNode, ROOT_TYPE};
pub use walk::Walk;
