//! This module defines the building blocks of the catalog storage.
mod avl;
mod chain;
mod rank;
mod sparse;

pub(crate) use chain::ChainTable;
pub(crate) use rank::RankedAvl;
pub(crate) use sparse::SparseArray;
