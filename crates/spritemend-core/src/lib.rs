pub mod analyze;
pub mod codec;
pub mod consts;
pub mod detect;
pub mod error;
pub mod frame;
pub mod pipeline;
pub mod replace;
pub mod stabilize;
pub mod stats;
pub mod verify;
