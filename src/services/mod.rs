// Service layer: business operations on a Session, one module per entity.
// Views (boards, detail pages, dashboard) borrow from the session's store.

pub mod dashboard;
pub mod deals;
pub mod leads;
pub mod notes;
pub mod tasks;
