pub mod cooldown;
pub mod monitor;
