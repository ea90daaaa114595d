//! # Base types for chessrules
//!
//! This is an auxiliary crate for `chessrules`, which contains coordinates, piece kinds,
//! board geometry and square sets. Normally you don't want to use this crate directly. Use
//! `chessrules` instead, which re-exports everything declared here.

pub mod geometry;
pub mod squares;
pub mod types;
