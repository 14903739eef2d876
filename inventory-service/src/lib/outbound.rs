pub mod provisioning;
pub mod repositories;
