//! Domain services. Each service owns a database handle and exposes the
//! operations one dashboard page performs.

pub mod analytics_service;
pub mod appointment_service;
pub mod calendar;
pub mod customer_service;
pub mod order_service;
pub mod product_service;
pub mod seller_service;

pub use analytics_service::AnalyticsService;
pub use appointment_service::AppointmentService;
pub use customer_service::CustomerService;
pub use order_service::OrderService;
pub use product_service::ProductService;
pub use seller_service::SellerService;
