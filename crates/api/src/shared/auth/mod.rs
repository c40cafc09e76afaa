mod policy;
mod route_guards;

pub use policy::{Permission, Policy};
pub use route_guards::{policy_for_user, protect_webhook_route};
