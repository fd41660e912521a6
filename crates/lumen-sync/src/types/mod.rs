pub mod beacon;
pub mod fork;
pub mod wire;
