pub mod analytics;
pub mod deployment_mode;
pub mod waitlist_user;
