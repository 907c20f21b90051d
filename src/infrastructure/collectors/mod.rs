pub mod sysinfo_collector;
