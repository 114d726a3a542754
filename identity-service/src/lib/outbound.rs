pub mod notifier;
pub mod repositories;
