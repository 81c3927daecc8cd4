#![allow(non_snake_case)]

#[macro_use]
pub mod ring;
pub mod truth;
pub mod status;
pub mod capability;
pub mod tuning;
pub mod tracing;
pub mod vector;
pub mod matrix;
pub mod algorithms;
pub mod rings;
