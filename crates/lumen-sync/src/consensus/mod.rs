pub mod assembler;
pub mod domain;
pub mod merkle;
pub mod signature;
pub mod tree_hash;
pub mod verifier;

pub use assembler::*;
pub use domain::*;
pub use merkle::*;
pub use signature::*;
pub use verifier::*;
