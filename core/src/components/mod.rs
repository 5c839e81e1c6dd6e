//! The two kinds of process living in a clinic replication.

mod arrivals;
mod pathway;

pub use arrivals::PatientGenerator;
pub use pathway::CarePathway;
