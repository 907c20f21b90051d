pub mod collectors;
pub mod logging;
pub mod notifications;
