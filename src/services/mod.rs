pub mod clients;
pub mod dashboard;
pub mod orders;

pub use clients::ClientService;
pub use dashboard::DashboardService;
pub use orders::OrderService;
