mod summary;
pub mod views;

pub use summary::{
    upcoming_expirations, EntityCompliance, ExpiringItem, FleetReport, OrphanEntry, RollupNode,
};

pub(crate) use summary::build_report;
