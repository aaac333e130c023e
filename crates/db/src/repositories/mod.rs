mod device_repo;
mod system_metric_repo;

pub use device_repo::DeviceRepo;
pub use system_metric_repo::SystemMetricRepo;
