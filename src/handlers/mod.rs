pub mod clients;
pub mod dashboard;
pub mod health;
pub mod orders;

use crate::services::{ClientService, DashboardService, OrderService};

/// Bundle of constructed services carried in the application state.
#[derive(Clone)]
pub struct AppServices {
    pub orders: OrderService,
    pub clients: ClientService,
    pub dashboard: DashboardService,
}
