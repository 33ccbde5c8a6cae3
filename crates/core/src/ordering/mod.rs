//! Display-order persistence for sibling records

pub mod ports;
pub mod service;

pub use ports::ReorderStore;
pub use service::ReorderService;
