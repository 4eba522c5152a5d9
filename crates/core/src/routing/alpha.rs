use crate::directory::Directory;
use crate::domain::staff::{BusinessPool, DepartmentId, StaffEntry};

/// Alpha-range entries of a department that serve `pool`.
///
/// A department without staff dedicated to `pool` has a single partition, so every alpha
/// entry of the department is a candidate.
pub fn alpha_candidates<'a>(
    staff: &'a [StaffEntry],
    department: &DepartmentId,
    pool: BusinessPool,
) -> Vec<&'a StaffEntry> {
    let in_department: Vec<&StaffEntry> = staff
        .iter()
        .filter(|entry| &entry.department == department && entry.alpha_range().is_some())
        .collect();

    if in_department.iter().any(|entry| entry.pool == Some(pool)) {
        in_department.into_iter().filter(|entry| entry.serves(pool)).collect()
    } else {
        in_department
    }
}

/// The single entry whose range contains `letter`. Gaps and overlaps both yield `None`.
pub fn find_staff<'a>(
    staff: &'a [StaffEntry],
    letter: char,
    department: &DepartmentId,
    is_new_business: bool,
) -> Option<&'a StaffEntry> {
    let letter = letter.to_ascii_uppercase();
    let mut matches = alpha_candidates(staff, department, BusinessPool::from_flag(is_new_business))
        .into_iter()
        .filter(|entry| entry.alpha_range().is_some_and(|range| range.contains(letter)));

    let found = matches.next()?;
    match matches.next() {
        Some(_) => None,
        None => Some(found),
    }
}

impl Directory {
    pub fn find_staff(
        &self,
        letter: char,
        department: &DepartmentId,
        is_new_business: bool,
    ) -> Option<&StaffEntry> {
        find_staff(self.staff(), letter, department, is_new_business)
    }
}
