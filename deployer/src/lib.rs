//! Scripts for deploying and configuring yield vaults and their strategies.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod cli;
pub mod client;
mod commands;
pub mod config;
pub mod constants;
pub mod deploy;
pub mod errors;
pub mod network;
mod solidity;
pub mod types;
pub mod utils;
pub mod verify;
