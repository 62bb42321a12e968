// SPDX-License-Identifier: MPL-2.0

#[macro_use]
extern crate log;

mod cli;
mod commands;
mod config;
mod error;
mod util;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .init();
    cli::main();
}
