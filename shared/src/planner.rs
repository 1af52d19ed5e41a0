//! State machine for the appointment scheduling view.
//!
//! The planner owns everything the calendar page keeps in memory: the
//! visible window, the wholesale-replaced fetch results, the create/edit
//! modal with its single shared form model, and the sequence tags that keep
//! an out-of-order fetch completion from overwriting newer state. It is
//! pure: the caller performs the actual HTTP round trips and feeds the
//! results back in.

use chrono::{Days, Months, NaiveDate};

use crate::{
    Appointment, AppointmentPayload, AppointmentStatus, CalendarDay, CalendarMode,
    CalendarResponse, Customer, Product,
};

/// Filter the fetched window down to one date and sum its revenue.
///
/// Membership is string equality on the normalized `yyyy-MM-dd` form;
/// recomputed on demand, never cached.
pub fn day_index(date: &str, appointments: &[Appointment]) -> CalendarDay {
    let day: Vec<Appointment> = appointments
        .iter()
        .filter(|a| a.appointment_date == date)
        .cloned()
        .collect();
    let total_potential_revenue = day.iter().map(|a| a.potential_revenue).sum();
    CalendarDay {
        date: date.to_string(),
        appointments: day,
        total_potential_revenue,
    }
}

/// The single form model shared between create and edit modes.
///
/// Fields hold display values: optional columns are empty strings until
/// submission coerces them back to null, and revenue is the raw input text
/// so a cleared field round-trips as 0 rather than NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentForm {
    /// Selected customer id, empty for "no client".
    pub customer_id: String,
    /// Selected product id, empty for "no product".
    pub product_id: String,
    pub appointment_time: String,
    pub duration_minutes: u32,
    pub status: AppointmentStatus,
    pub potential_revenue: String,
    pub location: String,
    pub notes: String,
}

impl Default for AppointmentForm {
    fn default() -> Self {
        AppointmentForm {
            customer_id: String::new(),
            product_id: String::new(),
            appointment_time: "14:00".to_string(),
            duration_minutes: 30,
            status: AppointmentStatus::Scheduled,
            potential_revenue: String::new(),
            location: String::new(),
            notes: String::new(),
        }
    }
}

impl AppointmentForm {
    /// Pre-populate from an existing appointment, nullable fields becoming
    /// empty display strings.
    pub fn prefill(appointment: &Appointment) -> Self {
        AppointmentForm {
            customer_id: appointment
                .customer
                .as_ref()
                .map(|c| c.id.clone())
                .unwrap_or_default(),
            product_id: appointment
                .product
                .as_ref()
                .map(|p| p.id.clone())
                .unwrap_or_default(),
            appointment_time: appointment.appointment_time.clone(),
            duration_minutes: appointment.duration_minutes,
            status: AppointmentStatus::parse(&appointment.status).unwrap_or_default(),
            potential_revenue: if appointment.potential_revenue == 0.0 {
                String::new()
            } else {
                appointment.potential_revenue.to_string()
            },
            location: appointment.location.clone().unwrap_or_default(),
            notes: appointment.notes.clone().unwrap_or_default(),
        }
    }

    /// Build the mutation payload for the given target date.
    ///
    /// Revenue that fails to parse (or parses to a non-finite value)
    /// becomes 0; empty optional strings become null.
    pub fn payload(&self, date: NaiveDate) -> AppointmentPayload {
        let potential_revenue = self
            .potential_revenue
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0);
        AppointmentPayload {
            appointment_date: date.format("%Y-%m-%d").to_string(),
            appointment_time: self.appointment_time.clone(),
            duration_minutes: self.duration_minutes,
            status: self.status.as_str().to_string(),
            potential_revenue,
            location: none_if_empty(&self.location),
            notes: none_if_empty(&self.notes),
            customer_id: none_if_empty(&self.customer_id),
            product_id: none_if_empty(&self.product_id),
        }
    }
}

fn none_if_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Whether the open form targets a new or an existing appointment.
#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Create,
    Edit { appointment_id: String },
}

/// Modal lifecycle: closed, or open over a form in one of two modes.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalState {
    Closed,
    Open {
        mode: FormMode,
        /// The date the submission will target. `None` only when an edited
        /// row carried an unparsable date; submission then refuses.
        date: Option<NaiveDate>,
        form: AppointmentForm,
    },
}

/// Mutation produced by a submit: insert, or full replace by id.
#[derive(Debug, Clone, PartialEq)]
pub enum AppointmentWrite {
    Create(AppointmentPayload),
    Update {
        appointment_id: String,
        payload: AppointmentPayload,
    },
}

/// Opaque handle for one window fetch; see [`Planner::begin_fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTag(u64);

/// In-memory state of the scheduling page.
#[derive(Debug, Clone, PartialEq)]
pub struct Planner {
    pub mode: CalendarMode,
    pub reference_date: NaiveDate,
    pub appointments: Vec<Appointment>,
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    /// True while the newest fetch is still in flight.
    pub loading: bool,
    /// Reason the newest fetch failed, if it did; prior lists stay visible.
    pub error: Option<String>,
    pub modal: ModalState,
    latest_fetch: u64,
}

impl Planner {
    pub fn new(reference_date: NaiveDate, mode: CalendarMode) -> Self {
        Planner {
            mode,
            reference_date,
            appointments: Vec::new(),
            customers: Vec::new(),
            products: Vec::new(),
            loading: false,
            error: None,
            modal: ModalState::Closed,
            latest_fetch: 0,
        }
    }

    /// Move the window back one week or one month.
    pub fn previous_period(&mut self) {
        self.reference_date = match self.mode {
            CalendarMode::Week => self.reference_date - Days::new(7),
            CalendarMode::Month => self
                .reference_date
                .checked_sub_months(Months::new(1))
                .unwrap_or(self.reference_date),
        };
    }

    /// Move the window forward one week or one month.
    pub fn next_period(&mut self) {
        self.reference_date = match self.mode {
            CalendarMode::Week => self.reference_date + Days::new(7),
            CalendarMode::Month => self
                .reference_date
                .checked_add_months(Months::new(1))
                .unwrap_or(self.reference_date),
        };
    }

    /// Start a window fetch and return its tag.
    ///
    /// Tags increase monotonically; a response is only ever applied if its
    /// tag is still the newest one issued, so a slow early request can
    /// never clobber the result of a later one.
    pub fn begin_fetch(&mut self) -> FetchTag {
        self.latest_fetch += 1;
        self.loading = true;
        FetchTag(self.latest_fetch)
    }

    /// Apply a completed fetch. Returns false (state untouched) for any
    /// tag that is no longer the newest.
    pub fn apply_fetch(&mut self, tag: FetchTag, response: CalendarResponse) -> bool {
        if tag.0 != self.latest_fetch {
            return false;
        }
        self.appointments = response.appointments;
        self.customers = response.customers;
        self.products = response.products;
        self.loading = false;
        self.error = None;
        true
    }

    /// Record a failed fetch. Stale failures are ignored; the newest one
    /// clears the loading flag, surfaces the reason, and leaves the prior
    /// lists in place.
    pub fn fetch_failed(&mut self, tag: FetchTag, reason: impl Into<String>) -> bool {
        if tag.0 != self.latest_fetch {
            return false;
        }
        self.loading = false;
        self.error = Some(reason.into());
        true
    }

    /// Day click on an empty cell: open the form blank over that date.
    pub fn open_create(&mut self, date: NaiveDate) {
        self.modal = ModalState::Open {
            mode: FormMode::Create,
            date: Some(date),
            form: AppointmentForm::default(),
        };
    }

    /// Click on an existing entry: open the form pre-filled. The caller
    /// must stop event propagation so the underlying day click does not
    /// also fire.
    pub fn open_edit(&mut self, appointment: &Appointment) {
        self.modal = ModalState::Open {
            mode: FormMode::Edit {
                appointment_id: appointment.id.clone(),
            },
            date: NaiveDate::parse_from_str(&appointment.appointment_date, "%Y-%m-%d").ok(),
            form: AppointmentForm::prefill(appointment),
        };
    }

    /// Cancel or backdrop dismissal; uncommitted edits are discarded.
    pub fn close_modal(&mut self) {
        self.modal = ModalState::Closed;
    }

    /// Mutable access to the open form, if any.
    pub fn form_mut(&mut self) -> Option<&mut AppointmentForm> {
        match &mut self.modal {
            ModalState::Open { form, .. } => Some(form),
            ModalState::Closed => None,
        }
    }

    /// Build the mutation for the open form. `None` when the modal is
    /// closed or no target date is known.
    pub fn submit(&self) -> Option<AppointmentWrite> {
        match &self.modal {
            ModalState::Open {
                mode,
                date: Some(date),
                form,
            } => {
                let payload = form.payload(*date);
                Some(match mode {
                    FormMode::Create => AppointmentWrite::Create(payload),
                    FormMode::Edit { appointment_id } => AppointmentWrite::Update {
                        appointment_id: appointment_id.clone(),
                        payload,
                    },
                })
            }
            _ => None,
        }
    }

    /// Id to delete, available only while editing an existing appointment.
    pub fn delete_target(&self) -> Option<&str> {
        match &self.modal {
            ModalState::Open {
                mode: FormMode::Edit { appointment_id },
                ..
            } => Some(appointment_id),
            _ => None,
        }
    }

    /// Derived view of one day of the fetched window.
    pub fn day(&self, date: NaiveDate) -> CalendarDay {
        day_index(&date.format("%Y-%m-%d").to_string(), &self.appointments)
    }
}
