//! Wire types shared between the Omnishop backend and its clients.
//!
//! Everything here is plain data: resource DTOs, request/response shapes,
//! the appointment status set with its display classification, and the
//! typed seller preferences record. The planner state machine for the
//! scheduling view lives in [`planner`].

use serde::{Deserialize, Serialize};

pub mod planner;

/// Placeholder display name used when a seller has not set one.
pub const DEFAULT_DISPLAY_NAME: &str = "Seller";

/// The fixed set of appointment durations the form offers, in minutes.
pub const ALLOWED_DURATIONS: [u32; 6] = [15, 30, 45, 60, 90, 120];

// ---------------------------------------------------------------------------
// Appointments
// ---------------------------------------------------------------------------

/// One scheduled customer meeting, as returned by the calendar endpoints.
///
/// `customer` and `product` are weak references: the appointment stores the
/// foreign id and the summaries are joined at fetch time, not owned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    /// Calendar date in normalized `yyyy-MM-dd` form.
    pub appointment_date: String,
    /// Time of day in `HH:MM` form.
    pub appointment_time: String,
    pub duration_minutes: u32,
    /// Status label; one of [`AppointmentStatus::ALL`] for well-formed rows,
    /// but unknown labels are carried through rather than rejected.
    pub status: String,
    /// Estimated, non-binding revenue attached to the meeting.
    pub potential_revenue: f64,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub customer: Option<CustomerSummary>,
    pub product: Option<ProductSummary>,
}

/// Joined customer fields carried on an appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub id: String,
    pub full_name: String,
    pub whatsapp_number: Option<String>,
}

/// Joined product fields carried on an appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub price: f64,
}

/// Mutation payload for creating or replacing an appointment.
///
/// The owning seller is never part of the payload; inserts stamp it from the
/// authenticated session server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentPayload {
    pub appointment_date: String,
    pub appointment_time: String,
    pub duration_minutes: u32,
    pub status: String,
    pub potential_revenue: f64,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub customer_id: Option<String>,
    pub product_id: Option<String>,
}

/// The closed set of appointment workflow statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 6] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Confirmed,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::NoShow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::InProgress => "In-progress",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::NoShow => "No-show",
        }
    }

    /// Parse a stored label. Unknown labels return `None`; callers decide
    /// whether that is a validation error (mutations) or a display fallback
    /// (badges).
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_str() == label)
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        AppointmentStatus::Scheduled
    }
}

/// Visual classification tuple for a status badge or calendar cell tint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusPalette {
    pub background: &'static str,
    pub text: &'static str,
    pub border: &'static str,
}

/// Neutral classification applied to any label outside the closed set.
/// A defined default, not an error.
pub const NEUTRAL_PALETTE: StatusPalette = StatusPalette {
    background: "gray-500/15",
    text: "gray-500",
    border: "gray-500/20",
};

/// Map a status label to its display classification.
pub fn status_palette(label: &str) -> StatusPalette {
    match AppointmentStatus::parse(label) {
        Some(AppointmentStatus::Scheduled) => StatusPalette {
            background: "blue-500/15",
            text: "blue-500",
            border: "blue-500/20",
        },
        Some(AppointmentStatus::Confirmed) => StatusPalette {
            background: "green-500/15",
            text: "green-500",
            border: "green-500/20",
        },
        Some(AppointmentStatus::InProgress) => StatusPalette {
            background: "orange-500/15",
            text: "orange-500",
            border: "orange-500/20",
        },
        Some(AppointmentStatus::Completed) => StatusPalette {
            background: "purple-500/15",
            text: "purple-500",
            border: "purple-500/20",
        },
        Some(AppointmentStatus::Cancelled) => StatusPalette {
            background: "red-500/15",
            text: "red-500",
            border: "red-500/20",
        },
        Some(AppointmentStatus::NoShow) | None => NEUTRAL_PALETTE,
    }
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

/// Which window the calendar view is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarMode {
    /// The Monday-start week containing the reference date.
    Week,
    /// The full 7-column grid covering the reference date's month.
    Month,
}

/// One day of the visible window with its appointments and revenue sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// Normalized `yyyy-MM-dd` date.
    pub date: String,
    pub appointments: Vec<Appointment>,
    /// Sum of `potential_revenue` across the day, missing values as 0.
    pub total_potential_revenue: f64,
}

/// Everything the scheduling view needs for one visible window.
///
/// Replaces client state wholesale; there is no delta protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarResponse {
    /// Inclusive window start, `yyyy-MM-dd`.
    pub start: String,
    /// Inclusive window end, `yyyy-MM-dd`.
    pub end: String,
    /// Appointments in the window, ordered ascending by date.
    pub appointments: Vec<Appointment>,
    /// Per-day grouping of the same appointments.
    pub days: Vec<CalendarDay>,
    /// All customers for the seller, ordered by name (selector population).
    pub customers: Vec<Customer>,
    /// Products with positive stock, ordered by name (selector population).
    pub products: Vec<Product>,
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

/// A buyer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub full_name: String,
    pub whatsapp_number: Option<String>,
    pub instagram_handle: Option<String>,
    pub address: Option<String>,
    /// Running counter; not atomically maintained by the dashboard views.
    pub total_orders: i64,
}

/// Create/update payload for a customer. Empty optional fields are stored
/// as null; `total_orders` starts at 0 on insert and is not settable here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerPayload {
    pub full_name: String,
    pub whatsapp_number: Option<String>,
    pub instagram_handle: Option<String>,
    pub address: Option<String>,
}

/// Headline numbers for the customers page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerStats {
    pub total_customers: i64,
    pub total_orders: i64,
    /// Customers with at least 5 recorded orders.
    pub vip_customers: i64,
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock_quantity: i64,
    pub image_url: Option<String>,
}

/// Create/update payload for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock_quantity: i64,
    pub image_url: Option<String>,
}

/// Threshold-derived stock label for inventory badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    OutOfStock,
    Critical,
    Low,
    InStock,
}

impl StockStatus {
    /// Classify a stock quantity: 0, under 10, under 50, otherwise in stock.
    pub fn classify(stock_quantity: i64) -> Self {
        if stock_quantity <= 0 {
            StockStatus::OutOfStock
        } else if stock_quantity < 10 {
            StockStatus::Critical
        } else if stock_quantity < 50 {
            StockStatus::Low
        } else {
            StockStatus::InStock
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "Out of stock",
            StockStatus::Critical => "Critical",
            StockStatus::Low => "Low",
            StockStatus::InStock => "In stock",
        }
    }

    pub fn palette(&self) -> StatusPalette {
        match self {
            StockStatus::OutOfStock => StatusPalette {
                background: "red-500/15",
                text: "red-500",
                border: "red-500/20",
            },
            StockStatus::Critical => StatusPalette {
                background: "orange-500/15",
                text: "orange-500",
                border: "orange-500/20",
            },
            StockStatus::Low => StatusPalette {
                background: "yellow-500/15",
                text: "yellow-500",
                border: "yellow-500/20",
            },
            StockStatus::InStock => StatusPalette {
                background: "green-500/15",
                text: "green-500",
                border: "green-500/20",
            },
        }
    }
}

/// Headline numbers for the inventory page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryStats {
    pub total_products: i64,
    /// Sum of `price * stock_quantity` across the catalog.
    pub total_value: f64,
    pub low_stock: i64,
    pub out_of_stock: i64,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Delivered,
    InTransit,
    Processing,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Delivered => "Delivered",
            OrderStatus::InTransit => "In Transit",
            OrderStatus::Processing => "Processing",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Delivered" => Some(OrderStatus::Delivered),
            "In Transit" => Some(OrderStatus::InTransit),
            "Processing" => Some(OrderStatus::Processing),
            "Cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

/// A tracked sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub amount: f64,
    pub status: String,
    pub tracking_url: Option<String>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    pub customer: Option<CustomerSummary>,
    pub product: Option<ProductSummary>,
}

/// Create payload for an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPayload {
    pub amount: f64,
    pub status: String,
    pub tracking_url: Option<String>,
    pub customer_id: Option<String>,
    pub product_id: Option<String>,
}

/// Status-only update for an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: String,
}

// ---------------------------------------------------------------------------
// Dashboard & analytics
// ---------------------------------------------------------------------------

/// Stats-card numbers: appointments dated today or later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub upcoming_appointments: i64,
    pub potential_revenue: f64,
}

/// Revenue summed over one calendar month of the requested range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    /// `yyyy-MM` bucket key.
    pub month: String,
    pub revenue: f64,
}

/// Order count for one weekday, Monday first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayOrders {
    pub weekday: String,
    pub count: i64,
}

/// One row of the top-products table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProduct {
    pub name: String,
    pub sales: i64,
    pub revenue: f64,
}

/// Aggregates for the analytics page over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    /// Revenue across the range, cancelled orders excluded.
    pub total_revenue: f64,
    pub order_count: i64,
    pub active_customers: i64,
    pub products_sold: i64,
    pub revenue_by_month: Vec<MonthlyRevenue>,
    pub orders_by_weekday: Vec<WeekdayOrders>,
    pub top_products: Vec<TopProduct>,
}

// ---------------------------------------------------------------------------
// Sellers, sessions, preferences
// ---------------------------------------------------------------------------

/// Current schema version of [`SellerPreferences`].
pub const PREFERENCES_VERSION: u32 = 1;

/// Typed, versioned seller preferences.
///
/// Replaces the original free-form metadata blob: every key is named and
/// typed, and missing keys take these defaults when older records are
/// loaded (`#[serde(default)]` is the migration policy).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerPreferences {
    #[serde(default = "default_preferences_version")]
    pub version: u32,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub store_name: Option<String>,
    #[serde(default)]
    pub store_url: Option<String>,
    #[serde(default)]
    pub onboarding_completed: bool,
    #[serde(default)]
    pub sales_platform: Option<String>,
    #[serde(default)]
    pub main_focus: Option<String>,
    #[serde(default = "default_true")]
    pub email_notifications: bool,
    #[serde(default = "default_true")]
    pub order_notifications: bool,
    #[serde(default = "default_true")]
    pub stock_notifications: bool,
}

fn default_preferences_version() -> u32 {
    PREFERENCES_VERSION
}

fn default_true() -> bool {
    true
}

impl Default for SellerPreferences {
    fn default() -> Self {
        SellerPreferences {
            version: PREFERENCES_VERSION,
            full_name: None,
            store_name: None,
            store_url: None,
            onboarding_completed: false,
            sales_platform: None,
            main_focus: None,
            email_notifications: true,
            order_notifications: true,
            stock_notifications: true,
        }
    }
}

impl SellerPreferences {
    /// Display name with the fixed placeholder fallback.
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(DEFAULT_DISPLAY_NAME)
    }
}

/// The authenticated identity as every protected view sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerProfile {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub preferences: SellerPreferences,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Fresh session token plus the resolved profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResponse {
    pub token: String,
    pub seller: SellerProfile,
}

/// Partial preferences update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub full_name: Option<String>,
    pub store_name: Option<String>,
    pub store_url: Option<String>,
    pub email_notifications: Option<bool>,
    pub order_notifications: Option<bool>,
    pub stock_notifications: Option<bool>,
}

/// One-shot onboarding completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingRequest {
    pub sales_platform: String,
    pub main_focus: String,
}
