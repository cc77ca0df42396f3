// Jade templates: user-uploaded conversion targets. At most one template per
// owner is active; conversion renders a resume against the active one.

pub mod convert;
pub mod handlers;
pub mod store;
