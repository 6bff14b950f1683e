//! Client-side controller for the GeneXium training plan service.
//!
//! The crate owns everything the web front end of the service did, minus the
//! DOM: typed request/response plumbing for the two generation endpoints, a
//! single application-state object that drives one of four view sections,
//! markdown rendering, the "download as markdown" export converter and
//! transient notifications.

pub mod api;
pub mod controller;
pub mod export;
pub mod notify;
pub mod render;
pub mod view;

pub use api::{ApiError, HttpPlanClient, PlanApi};
pub use controller::AppState;
pub use export::{ExportDocument, ExportError, ExportOptions, ResultTab};
pub use notify::{Level, NotificationCenter};
pub use render::{MarkdownRenderer, RenderOptions};
pub use view::{Section, ViewState};
