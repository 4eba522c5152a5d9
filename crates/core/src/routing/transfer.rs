use crate::directory::Directory;
use crate::domain::staff::StaffEntry;
use crate::routing::names::{match_staff_name, normalize_name};

impl Directory {
    /// Configured spelling of a restricted name, on exact normalized equality.
    pub fn restricted_name(&self, name: &str) -> Option<&str> {
        let wanted = normalize_name(name);
        if wanted.is_empty() {
            return None;
        }
        self.restricted_names()
            .iter()
            .find(|restricted| normalize_name(restricted) == wanted)
            .map(String::as_str)
    }

    /// Exact, case-insensitive membership in the restricted set.
    pub fn is_restricted(&self, name: &str) -> bool {
        self.restricted_name(name).is_some()
    }
}

/// Whether an automated transfer to this entry must be refused outright.
pub fn is_restricted_entry(directory: &Directory, entry: &StaffEntry) -> bool {
    !entry.transferable || directory.is_restricted(&entry.name)
}

/// False for restricted names, non-transferable entries, and inactive entries. A name that
/// matches no entry is transferable: a missing route is not a policy question.
pub fn is_transferable(directory: &Directory, staff_name: &str) -> bool {
    if directory.is_restricted(staff_name) {
        return false;
    }
    match match_staff_name(directory, staff_name).unique() {
        Some(entry) => entry.active && !is_restricted_entry(directory, entry),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::is_transferable;
    use crate::directory::{Directory, ValidationMode};

    fn directory() -> Directory {
        let raw = r#"
restricted = ["Jason L.", "Owner"]

[departments]
business = "CL"
personal = "CL"

[business_hours]
timezone = "America/New_York"
weekdays = ["mon"]
open = "09:00"
close = "17:00"

[[staff]]
department = "CL"
name = "Jason L."
assignment = "Principal"
extension = "250"

[[staff]]
department = "CL"
name = "Amy Chen"
assignment = "A-Z"
extension = "201"

[[staff]]
department = "CL"
name = "Hal Brooks"
assignment = "Producer"
extension = "205"
transferable = false

[[staff]]
department = "CL"
name = "Ivy Stone"
assignment = "CSR"
extension = "2O6"
"#;
        Directory::from_toml_str(raw, ValidationMode::Lenient).expect("lenient load").directory
    }

    #[test]
    fn restricted_names_are_never_transferable() {
        let directory = directory();
        for name in directory.restricted_names() {
            assert!(!is_transferable(&directory, name), "{name} must be restricted");
        }
        assert!(!is_transferable(&directory, "jason l."));
        assert!(!is_transferable(&directory, "  JASON   L "));
    }

    #[test]
    fn entry_flags_gate_transfer() {
        let directory = directory();
        assert!(is_transferable(&directory, "Amy Chen"));
        assert!(!is_transferable(&directory, "Hal Brooks"));
        assert!(!is_transferable(&directory, "Ivy Stone"), "inactive after bad extension");
    }

    #[test]
    fn prefix_match_to_restricted_entry_is_not_transferable() {
        let directory = directory();
        assert!(!is_transferable(&directory, "Jason"));
    }

    #[test]
    fn unknown_names_are_transferable() {
        let directory = directory();
        assert!(is_transferable(&directory, "Nobody Here"));
    }
}
