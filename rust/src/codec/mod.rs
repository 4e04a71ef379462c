//! Payload codec: splitting the encoded secret into ordered fragments and
//! tagging the whole payload with a digest so a reconstruction can be checked.
//! Fragments carry no index of their own; their position is their order.

pub mod chunker;
pub mod tag;
