pub mod channel_engine;
pub mod context;
pub mod error;
pub mod succession;
pub mod validation;
