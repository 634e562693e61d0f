pub mod archive;
pub mod control;
pub mod error;
pub mod naming;
pub mod pack;
pub mod platform;
pub mod prefab;
pub mod stage;
