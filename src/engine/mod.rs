pub mod announcement;
pub mod exemption;
pub mod hall_of_fame;
pub mod moderation;
pub mod rotation;
pub mod selector;

pub use exemption::ExemptionFilter;
pub use selector::{select, EmptyReason, RankedPair, SelectError};
