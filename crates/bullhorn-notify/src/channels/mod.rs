pub mod email;
pub mod in_app;
pub mod sms;

pub use email::EmailChannel;
pub use in_app::InAppChannel;
pub use sms::SmsChannel;
