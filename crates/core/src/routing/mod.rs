pub mod alpha;
pub mod names;
pub mod route_key;
pub mod transfer;

pub use alpha::find_staff;
pub use names::{match_restricted_name, match_staff_name, normalize_name, NameMatch};
pub use route_key::{resolve_route_key, strip_exception_prefixes, RouteKey};
pub use transfer::{is_restricted_entry, is_transferable};
