pub mod device;
pub mod system_metric;
