//! Interactive parameter form: edit tracking, debounced validation and apply

mod controller;
mod debounce;
mod host;
mod state;
mod view;

pub use controller::{
    ApplyOutcome, FormController, ResetOutcome, APPLY_BLOCKED_MESSAGE, APPLY_SUCCESS_MESSAGE,
    RESET_CONFIRMATION, RESET_SUCCESS_MESSAGE,
};
pub use debounce::Debouncer;
pub use host::{ApplyMetadata, FormHost, HostSaveError, Notification, NotificationLevel};
pub use state::{FormOptions, VALIDATION_DEBOUNCE};
pub use view::{FieldView, FormView, SectionView, ValidationBanner, BANNER_FIELD_LIMIT};

#[cfg(test)]
pub use host::MockFormHost;
