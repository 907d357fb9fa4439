pub mod clients;
pub mod dashboard;
pub mod invoices;
