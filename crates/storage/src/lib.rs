#![warn(clippy::pedantic)]

pub mod local_storage;
pub mod rest;
pub mod search;
