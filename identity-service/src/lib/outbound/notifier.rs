pub mod smtp;
pub mod templates;

pub use smtp::SmtpNotifier;
