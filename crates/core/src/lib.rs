pub mod audit;
pub mod carriers;
pub mod config;
pub mod directory;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod hours;
pub mod routing;

pub use audit::{AuditContext, AuditEvent, AuditSink, InMemoryAuditSink};
pub use carriers::{CarrierContact, CarrierTable, PhoneNumber};
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use directory::{
    Directory, DirectoryError, DirectoryHandle, LoadedDirectory, ValidationMode, ValidationReport,
};
pub use dispatch::{decide, DispatchEngine, DispatchRuntime, StaffPresence};
pub use domain::call::{CallIntent, CallState, InsuranceType};
pub use domain::decision::{DispatchDecision, FallbackReason};
pub use domain::staff::{DepartmentId, Extension, StaffEntry};
pub use errors::{ApplicationError, DomainError};
pub use hours::{BusinessHours, BusinessHoursState, StaffAvailability};
pub use routing::{find_staff, is_transferable, resolve_route_key, RouteKey};
