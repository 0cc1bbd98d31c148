//! Document chunking into overlapping character windows.

pub mod recursive;

pub use recursive::RecursiveCharacterSplitter;
