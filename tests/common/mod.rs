//! Shared helpers for the `ams` integration tests.

#![allow(dead_code)]

pub mod cli;
