//! Data module for autograde
//!
//! Contains the compiled-in reference answers the checks grade against.

pub mod reference;
