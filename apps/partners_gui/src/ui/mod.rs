//! UI layer for the partners window: app shell, filter form and sortable table.

pub mod app;
pub mod filter_form;
pub mod sortable_table;

pub use app::PartnersApp;
