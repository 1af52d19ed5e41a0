use crate::db::DbConnection;
use crate::domain::{
    AnalyticsService, AppointmentService, CustomerService, OrderService, ProductService,
    SellerService,
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub api_key: String,
    pub sellers: SellerService,
    pub appointments: AppointmentService,
    pub customers: CustomerService,
    pub products: ProductService,
    pub orders: OrderService,
    pub analytics: AnalyticsService,
}

impl AppState {
    pub fn new(db: DbConnection, api_key: String) -> Self {
        Self {
            api_key,
            sellers: SellerService::new(db.clone()),
            appointments: AppointmentService::new(db.clone()),
            customers: CustomerService::new(db.clone()),
            products: ProductService::new(db.clone()),
            orders: OrderService::new(db.clone()),
            analytics: AnalyticsService::new(db),
        }
    }
}
