// Form Collector: mutation, validation, image intake and submission of the in-progress record.

pub mod collector;
pub mod drafts;
pub mod image;
pub mod notify;
pub mod validation;

pub use collector::{FormCollector, FormCommand, FormError, FormState};
pub use notify::Notification;
