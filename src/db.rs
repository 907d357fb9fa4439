pub mod backend;
pub use backend::{CollectionBackend, CollectionName};
pub mod collection;
pub mod json_file;
pub use json_file::JsonFileBackend;
pub mod in_memory;
pub use in_memory::InMemoryBackend;
pub mod client_repo;
pub use client_repo::ClientRepository;
pub mod invoice_repo;
pub use invoice_repo::InvoiceRepository;
