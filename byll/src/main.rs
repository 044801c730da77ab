#![warn(clippy::uninlined_format_args)]

mod bootstrap;
mod config;
mod handler;
mod messenger;
mod signature;
#[cfg(test)]
mod test_utils;
mod webhook;

#[tokio::main]
async fn main() {
    bootstrap::run().await;
}
