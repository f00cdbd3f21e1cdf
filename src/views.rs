//! Typed view-models and the Handlebars registry that renders them.

use axum::response::Html;
use chrono::{DateTime, Utc};
use handlebars::{Handlebars, TemplateError};
use model::entities::{document, hr_record, trip, vehicle};
use serde::Serialize;

use crate::error::AppResult;
use crate::session::{Flash, Identity};

const TEMPLATES: &[(&str, &str)] = &[
    ("header", include_str!("../templates/partials/header.hbs")),
    ("footer", include_str!("../templates/partials/footer.hbs")),
    ("flashes", include_str!("../templates/partials/flashes.hbs")),
    ("login", include_str!("../templates/login.hbs")),
    ("dashboard", include_str!("../templates/dashboard.hbs")),
    ("documents", include_str!("../templates/documents.hbs")),
    ("fleet", include_str!("../templates/fleet.hbs")),
    ("trips", include_str!("../templates/trips.hbs")),
    ("hr", include_str!("../templates/hr.hbs")),
];

/// Category choices offered on the upload form.
pub const DOCUMENT_CATEGORIES: &[&str] = &["invoice", "contract", "receipt", "hr", "fleet", "other"];

#[derive(Debug)]
pub struct Views {
    registry: Handlebars<'static>,
}

impl Views {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        for (name, source) in TEMPLATES {
            registry.register_template_string(name, *source)?;
        }
        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(&self, template: &str, page: &T) -> AppResult<Html<String>> {
        Ok(Html(self.registry.render(template, page)?))
    }
}

/// Data shared by every page, plus the page-specific `body`.
#[derive(Debug, Serialize)]
pub struct Page<'a, T: Serialize> {
    pub title: &'a str,
    /// Which navigation entry to highlight.
    pub nav: &'a str,
    pub user: Option<&'a Identity>,
    pub flashes: Vec<Flash>,
    #[serde(flatten)]
    pub body: T,
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

/// The login form needs nothing beyond the shared page data.
#[derive(Debug, Serialize)]
pub struct LoginView {}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub document_count: u64,
    pub vehicle_count: u64,
    pub trip_count: u64,
    pub hr_count: u64,
    pub recent_vehicles: Vec<VehicleRow>,
}

#[derive(Debug, Serialize)]
pub struct DocumentRow {
    pub id: i32,
    pub filename: String,
    pub file_type: String,
    pub category: String,
    pub upload_date: String,
}

impl From<document::Model> for DocumentRow {
    fn from(model: document::Model) -> Self {
        Self {
            id: model.id,
            filename: model.filename,
            file_type: model.file_type,
            category: model.category,
            upload_date: format_timestamp(model.upload_date),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentsView {
    pub documents: Vec<DocumentRow>,
    pub categories: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct VehicleRow {
    pub id: i32,
    pub name: String,
    pub registration: String,
    pub vehicle_type: String,
    pub fuel_counter: Option<f64>,
    pub service_date: Option<String>,
    pub insurance_date: Option<String>,
    pub notes: Option<String>,
}

impl From<vehicle::Model> for VehicleRow {
    fn from(model: vehicle::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            registration: model.registration,
            vehicle_type: model.vehicle_type,
            fuel_counter: model.fuel_counter,
            service_date: model.service_date,
            insurance_date: model.insurance_date,
            notes: model.notes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FleetView {
    pub vehicles: Vec<VehicleRow>,
}

/// A trip with the name and registration of its vehicle. Both are empty when
/// the vehicle does not exist.
#[derive(Debug, Serialize)]
pub struct TripRow {
    pub id: i32,
    pub date: String,
    pub driver: String,
    pub vehicle_id: Option<i32>,
    pub vehicle_name: String,
    pub vehicle_registration: String,
    pub distance: Option<f64>,
    pub fuel_used: Option<f64>,
    pub destination: String,
    pub purpose: Option<String>,
}

impl From<(trip::Model, Option<vehicle::Model>)> for TripRow {
    fn from((trip, vehicle): (trip::Model, Option<vehicle::Model>)) -> Self {
        let (vehicle_name, vehicle_registration) = vehicle
            .map(|v| (v.name, v.registration))
            .unwrap_or_default();

        Self {
            id: trip.id,
            date: trip.date,
            driver: trip.driver,
            vehicle_id: trip.vehicle_id,
            vehicle_name,
            vehicle_registration,
            distance: trip.distance,
            fuel_used: trip.fuel_used,
            destination: trip.destination,
            purpose: trip.purpose,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TripsView {
    pub trips: Vec<TripRow>,
    /// Choices for the vehicle selector of the add form.
    pub vehicles: Vec<VehicleRow>,
}

#[derive(Debug, Serialize)]
pub struct HrRow {
    pub id: i32,
    pub employee_name: String,
    pub record_type: String,
    pub amount: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl From<hr_record::Model> for HrRow {
    fn from(model: hr_record::Model) -> Self {
        Self {
            id: model.id,
            employee_name: model.employee_name,
            record_type: model.record_type,
            amount: model.amount.map(|a| format!("{:.2}", a)),
            date_from: model.date_from,
            date_to: model.date_to,
            status: model.status,
            created_at: format_timestamp(model.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HrView {
    pub records: Vec<HrRow>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::FlashCategory;

    fn views() -> Views {
        Views::new().expect("templates compile")
    }

    fn admin() -> Identity {
        Identity { user_id: 1, username: "admin".to_string(), role: "admin".to_string() }
    }

    #[test]
    fn test_all_templates_register() {
        let views = views();
        for (name, _) in TEMPLATES {
            assert!(views.registry.has_template(name), "missing template {name}");
        }
    }

    #[test]
    fn test_fleet_renders_rows_and_flashes() {
        let user = admin();
        let page = Page {
            title: "Fleet",
            nav: "fleet",
            user: Some(&user),
            flashes: vec![Flash::error("A vehicle with registration WA12345 already exists")],
            body: FleetView {
                vehicles: vec![VehicleRow {
                    id: 1,
                    name: "Sprinter".to_string(),
                    registration: "WA12345".to_string(),
                    vehicle_type: "bus".to_string(),
                    fuel_counter: None,
                    service_date: None,
                    insurance_date: None,
                    notes: None,
                }],
            },
        };

        let html = views().render("fleet", &page).unwrap().0;
        assert!(html.contains("<td>Sprinter</td>"));
        assert!(html.contains("<td>WA12345</td>"));
        assert!(html.contains("<td>bus</td>"));
        assert!(html.contains("flash-error"));
        assert!(html.contains("admin"));
        assert_eq!(FlashCategory::Error, page.flashes[0].category);
    }

    #[test]
    fn test_values_are_html_escaped() {
        let user = admin();
        let page = Page {
            title: "HR",
            nav: "hr",
            user: Some(&user),
            flashes: Vec::new(),
            body: HrView {
                records: vec![HrRow {
                    id: 1,
                    employee_name: "<script>alert(1)</script>".to_string(),
                    record_type: "leave".to_string(),
                    amount: None,
                    date_from: Some("2026-07-01".to_string()),
                    date_to: Some("2026-07-14".to_string()),
                    status: "pending".to_string(),
                    created_at: "2026-06-01 10:00".to_string(),
                }],
            },
        };

        let html = views().render("hr", &page).unwrap().0;
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_trip_row_without_vehicle() {
        let trip = trip::Model {
            id: 3,
            vehicle_id: Some(42),
            driver: "Ola".to_string(),
            date: "2026-02-02".to_string(),
            distance: Some(10.0),
            fuel_used: None,
            destination: "Poznań".to_string(),
            purpose: None,
            created_at: Utc::now(),
        };

        let row = TripRow::from((trip, None));
        assert_eq!(row.vehicle_name, "");
        assert_eq!(row.vehicle_registration, "");
        assert_eq!(row.vehicle_id, Some(42));
    }
}
