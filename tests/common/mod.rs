#![allow(dead_code)]

pub mod mocks;
pub mod offline_support;

pub use mocks::*;
pub use offline_support::*;
