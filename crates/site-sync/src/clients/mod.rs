//! Resource-specific services built on [`store_framework::ResourceAccess`].

pub mod project_service;
pub mod supplier_service;

pub use project_service::ProjectService;
pub use supplier_service::SupplierService;
