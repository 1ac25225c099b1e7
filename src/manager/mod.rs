//! Collection managers
//!
//! A manager drives one collection pass for a cloud-service type. Shared
//! state that outlives a single item (the region codes seen so far) is passed
//! in explicitly as a [`RegionTracker`].

pub mod function;

use std::collections::BTreeSet;

pub use function::{DisplayOffset, FunctionManager};

/// Region code recorded for resources without a location
pub const GLOBAL_REGION: &str = "global";

/// Receives the region of every successfully collected resource
pub trait RegionTracker: Send {
    fn set_region_code(&mut self, region: &str);
}

/// Region codes seen during a pass, deduplicated and sorted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedRegions {
    codes: BTreeSet<String>,
}

impl CollectedRegions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn codes(&self) -> Vec<String> {
        self.codes.iter().cloned().collect()
    }

    pub fn contains(&self, region: &str) -> bool {
        self.codes.contains(region)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl RegionTracker for CollectedRegions {
    fn set_region_code(&mut self, region: &str) {
        let code = region.trim();
        let code = if code.is_empty() { GLOBAL_REGION } else { code };
        self.codes.insert(code.to_string());
    }
}
