//! Paper backups for GPG private keys. The encrypted key is base64 encoded,
//! split into ordered fragments, rendered as QR codes and laid out on pages so
//! it can be scanned back and reassembled byte for byte.

pub mod codec;
pub mod config;
pub mod gpg;
pub mod layout;
pub mod pipeline;
pub mod render;
