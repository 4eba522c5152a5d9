use std::collections::BTreeSet;

use crate::domain::staff::Extension;

/// Live reachability reported by the telephony layer.
pub trait StaffPresence: Send + Sync {
    fn is_reachable(&self, extension: &Extension) -> bool;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AssumeReachable;

impl StaffPresence for AssumeReachable {
    fn is_reachable(&self, _extension: &Extension) -> bool {
        true
    }
}

/// Every extension is reachable except the listed ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnreachableExtensions {
    extensions: BTreeSet<Extension>,
}

impl UnreachableExtensions {
    pub fn new(extensions: impl IntoIterator<Item = Extension>) -> Self {
        Self { extensions: extensions.into_iter().collect() }
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

impl StaffPresence for UnreachableExtensions {
    fn is_reachable(&self, extension: &Extension) -> bool {
        !self.extensions.contains(extension)
    }
}

impl<P: StaffPresence + ?Sized> StaffPresence for &P {
    fn is_reachable(&self, extension: &Extension) -> bool {
        (**self).is_reachable(extension)
    }
}

#[cfg(test)]
mod tests {
    use super::{AssumeReachable, StaffPresence, UnreachableExtensions};
    use crate::domain::staff::Extension;

    #[test]
    fn unreachable_set_only_blocks_listed_extensions() {
        let presence = UnreachableExtensions::new([Extension("301".to_string())]);

        assert!(!presence.is_reachable(&Extension("301".to_string())));
        assert!(presence.is_reachable(&Extension("302".to_string())));
        assert!(AssumeReachable.is_reachable(&Extension("301".to_string())));
    }
}
