pub mod client;
pub mod codec;
pub mod http;
pub mod range;
pub mod transport;

#[cfg(test)]
pub mod memory;
