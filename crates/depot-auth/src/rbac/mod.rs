//! Role-based access control: capability table and the access gate.

pub mod gate;
pub mod policy;

pub use gate::AccessGate;
pub use policy::{Action, RbacPolicies, Resource};
