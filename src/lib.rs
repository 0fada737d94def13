//! memstress - HTTP memory-pressure test server
//!
//! A small server for exercising container memory limits and OOM handling.
//! It allocates and frees blocks of native memory on demand over HTTP and
//! reports what it currently holds.

pub mod block;
pub mod bootstrap;
pub mod config;
pub mod registry;
pub mod rest;
