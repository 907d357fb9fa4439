pub mod client_service;
pub mod dashboard_service;
pub mod invoice_service;
pub mod ledger;
