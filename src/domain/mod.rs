pub mod building;
pub mod milestone;
pub mod money;
pub mod unit;

pub use building::Building;
pub use milestone::Milestone;
pub use unit::{Payment, PaymentPlan, Unit};
