//! Form controller: edits, debounced validation, apply and reset

use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::debounce::Debouncer;
use super::host::{ApplyMetadata, FormHost, HostSaveError, Notification};
use super::state::{FormOptions, FormState};
use super::view::{project, FormView};
use crate::domain::parameter::{
    filter_categories, validate_parameter, Configuration, FilteredCategory, ParameterRegistry,
    ParameterValue, ValidationReport, ValidationResult, ValidationSummary,
};

pub const APPLY_BLOCKED_MESSAGE: &str = "Please fix validation errors before applying";
pub const APPLY_SUCCESS_MESSAGE: &str = "Settings applied successfully";
pub const RESET_CONFIRMATION: &str = "Reset all parameters to defaults?";
pub const RESET_SUCCESS_MESSAGE: &str = "All settings reset to defaults";

/// Result of [`FormController::handle_apply`]
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    Applied,
    /// Validation failed; nothing was sent to the host
    Blocked(ValidationSummary),
    SaveFailed(HostSaveError),
}

/// Result of [`FormController::handle_reset_all`]
#[derive(Debug, Clone, PartialEq)]
pub enum ResetOutcome {
    Reset,
    Cancelled,
    SaveFailed(HostSaveError),
}

struct Shared {
    registry: Arc<ParameterRegistry>,
    host: Arc<dyn FormHost>,
    state: Mutex<FormState>,
    debouncer: Debouncer,
}

impl Shared {
    fn validate_field(&self, field: &str, value: &ParameterValue) -> ValidationResult {
        let result = validate_parameter(&self.registry, field, value);
        self.state.lock().record_validation(field, result.clone());

        debug!(field = %field, valid = result.valid, "Field validated");
        self.host.on_validate(field, &result);
        result
    }
}

/// Drives a parameter form on behalf of a [`FormHost`]
///
/// Methods that schedule validation must run inside a tokio runtime. The
/// state lock is never held across an await.
pub struct FormController {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for FormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("state", &*self.shared.state.lock())
            .finish_non_exhaustive()
    }
}

impl FormController {
    pub fn new(
        registry: Arc<ParameterRegistry>,
        host: Arc<dyn FormHost>,
        options: FormOptions,
    ) -> Self {
        let debouncer = Debouncer::new(options.debounce);
        let state = FormState::new(&registry, options);

        Self {
            shared: Arc::new(Shared {
                registry,
                host,
                state: Mutex::new(state),
                debouncer,
            }),
        }
    }

    pub fn registry(&self) -> &ParameterRegistry {
        &self.shared.registry
    }

    /// Record an edit and schedule its validation
    ///
    /// Returns `false` without touching state when the field is not editable.
    pub fn change_field(&self, field: &str, value: impl Into<ParameterValue>) -> bool {
        let value = value.into();

        {
            let mut state = self.shared.state.lock();
            if !state.is_editable(field) {
                debug!(field = %field, "Ignoring edit to read-only field");
                return false;
            }
            state.set_field(field, value.clone());
        }

        self.shared.host.on_field_change(field, &value);

        let shared: Weak<Shared> = Arc::downgrade(&self.shared);
        let key = field.to_string();
        self.shared.debouncer.schedule(field, async move {
            if let Some(shared) = shared.upgrade() {
                shared.validate_field(&key, &value);
            }
        });

        true
    }

    /// Validate a field immediately, dropping any pending debounced run
    pub fn validate_field_now(&self, field: &str) -> ValidationResult {
        self.shared.debouncer.cancel(field);

        let value = self
            .shared
            .state
            .lock()
            .config
            .get(field)
            .cloned()
            .unwrap_or(ParameterValue::Null);

        self.shared.validate_field(field, &value)
    }

    pub fn pending_validations(&self) -> usize {
        self.shared.debouncer.pending_count()
    }

    /// Validate the whole configuration and hand it to the host when valid
    pub async fn handle_apply(&self) -> ApplyOutcome {
        let (config, metadata) = {
            let mut state = self.shared.state.lock();
            let report = state.revalidate(&self.shared.registry);

            if !report.valid {
                state.show_validation_summary = true;
                let summary = report.summary();
                drop(state);

                warn!(
                    error_count = summary.error_count,
                    fields = ?summary.error_fields,
                    "Apply blocked by validation errors"
                );
                self.shared
                    .host
                    .notify(Notification::warning(APPLY_BLOCKED_MESSAGE));
                return ApplyOutcome::Blocked(summary);
            }

            let metadata = ApplyMetadata {
                changed: state.changed(),
                validation: report,
            };
            (state.config.clone(), metadata)
        };

        self.shared.debouncer.cancel_all();

        match self.shared.host.on_apply(&config, &metadata).await {
            Ok(()) => {
                self.shared.state.lock().changed_fields.clear();
                info!(changed = ?metadata.changed, "Settings applied");
                self.shared
                    .host
                    .notify(Notification::success(APPLY_SUCCESS_MESSAGE));
                ApplyOutcome::Applied
            }
            Err(e) => {
                warn!(error = %e, "Host failed to save settings");
                self.shared
                    .host
                    .notify(Notification::error(format!("Failed to save settings: {}", e)));
                ApplyOutcome::SaveFailed(e)
            }
        }
    }

    /// After confirmation, restore every declared default and save it
    pub async fn handle_reset_all(&self) -> ResetOutcome {
        if !self.shared.host.confirm(RESET_CONFIRMATION) {
            return ResetOutcome::Cancelled;
        }

        let defaults = self.shared.registry.defaults();
        self.shared.debouncer.cancel_all();
        self.shared.state.lock().reset_to(defaults.clone());

        let metadata = ApplyMetadata {
            changed: Vec::new(),
            validation: ValidationReport::default(),
        };

        match self.shared.host.on_apply(&defaults, &metadata).await {
            Ok(()) => {
                info!("Settings reset to defaults");
                self.shared
                    .host
                    .notify(Notification::info(RESET_SUCCESS_MESSAGE));
                ResetOutcome::Reset
            }
            Err(e) => {
                warn!(error = %e, "Host failed to save reset settings");
                self.shared
                    .host
                    .notify(Notification::error(format!("Failed to save settings: {}", e)));
                ResetOutcome::SaveFailed(e)
            }
        }
    }

    /// Discard edits and return to the configuration the form was opened with
    pub fn reset(&self) {
        self.shared.debouncer.cancel_all();
        let mut state = self.shared.state.lock();
        let initial = state.initial_config.clone();
        state.reset_to(initial);
    }

    /// Validate the working configuration without applying it
    pub fn validate(&self) -> ValidationReport {
        self.shared.state.lock().revalidate(&self.shared.registry)
    }

    pub fn config(&self) -> Configuration {
        self.shared.state.lock().config.clone()
    }

    /// Replace the working configuration, e.g. after the host reloads it
    pub fn set_config(&self, config: Configuration) {
        self.shared.debouncer.cancel_all();
        let mut state = self.shared.state.lock();
        state.initial_config = config.clone();
        state.reset_to(config);
    }

    pub fn changed_fields(&self) -> Vec<String> {
        self.shared.state.lock().changed()
    }

    pub fn field_result(&self, field: &str) -> Option<ValidationResult> {
        self.shared.state.lock().field_results.get(field).cloned()
    }

    pub fn errors(&self) -> IndexMap<String, Vec<String>> {
        self.shared.state.lock().errors.clone()
    }

    pub fn warnings(&self) -> IndexMap<String, Vec<String>> {
        self.shared.state.lock().warnings.clone()
    }

    pub fn summary(&self) -> Option<ValidationSummary> {
        self.shared.state.lock().summary.clone()
    }

    pub fn toggle_validation_summary(&self) -> bool {
        let mut state = self.shared.state.lock();
        state.show_validation_summary = !state.show_validation_summary;
        state.show_validation_summary
    }

    /// Store the search text lower-cased and trimmed
    pub fn set_filter(&self, filter: impl Into<String>) {
        let filter = filter.into().trim().to_lowercase();
        self.shared.state.lock().filter = filter;
    }

    pub fn filter(&self) -> String {
        self.shared.state.lock().filter.clone()
    }

    /// Categories narrowed by the current filter
    pub fn filtered_categories(&self) -> Vec<FilteredCategory<'_>> {
        let filter = self.filter();
        filter_categories(&self.shared.registry, &filter)
    }

    pub fn toggle_section(&self, section: &str) -> bool {
        self.shared.state.lock().toggle_section(section)
    }

    pub fn expand_all(&self) {
        self.shared.state.lock().set_all_sections(true);
    }

    pub fn collapse_all(&self) {
        self.shared.state.lock().set_all_sections(false);
    }

    pub fn is_expanded(&self, section: &str) -> bool {
        self.shared.state.lock().is_expanded(section)
    }

    pub fn view(&self) -> FormView {
        project(&self.shared.state.lock(), &self.shared.registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::form::host::{MockFormHost, NotificationLevel};
    use async_trait::async_trait;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingHost {
        changes: Mutex<Vec<(String, ParameterValue)>>,
        validations: Mutex<Vec<(String, ValidationResult)>>,
        applied: Mutex<Vec<(Configuration, ApplyMetadata)>>,
        notifications: Mutex<Vec<Notification>>,
        fail_save: bool,
    }

    impl RecordingHost {
        fn failing() -> Self {
            Self {
                fail_save: true,
                ..Default::default()
            }
        }

        fn last_notification(&self) -> Option<Notification> {
            self.notifications.lock().last().cloned()
        }
    }

    #[async_trait]
    impl FormHost for RecordingHost {
        fn on_field_change(&self, field: &str, value: &ParameterValue) {
            self.changes.lock().push((field.to_string(), value.clone()));
        }

        fn on_validate(&self, field: &str, result: &ValidationResult) {
            self.validations
                .lock()
                .push((field.to_string(), result.clone()));
        }

        async fn on_apply(
            &self,
            config: &Configuration,
            metadata: &ApplyMetadata,
        ) -> Result<(), HostSaveError> {
            if self.fail_save {
                return Err(HostSaveError::new("disk full"));
            }
            self.applied.lock().push((config.clone(), metadata.clone()));
            Ok(())
        }

        fn confirm(&self, _prompt: &str) -> bool {
            true
        }

        fn notify(&self, notification: Notification) {
            self.notifications.lock().push(notification);
        }
    }

    fn registry() -> Arc<ParameterRegistry> {
        Arc::new(ParameterRegistry::llama_cpp().unwrap())
    }

    fn controller(host: Arc<RecordingHost>, options: FormOptions) -> FormController {
        FormController::new(registry(), host, options)
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_edits_validate_once_with_last_value() {
        let host = Arc::new(RecordingHost::default());
        let form = controller(host.clone(), FormOptions::default());

        form.change_field("temp", 0.5);
        tokio::time::sleep(Duration::from_millis(100)).await;
        form.change_field("temp", 3.0);
        tokio::time::sleep(Duration::from_millis(100)).await;
        form.change_field("temp", 1.2);

        assert_eq!(host.changes.lock().len(), 3);
        assert!(host.validations.lock().is_empty());

        tokio::time::sleep(Duration::from_millis(301)).await;

        let validations = host.validations.lock();
        assert_eq!(validations.len(), 1);
        assert_eq!(validations[0].0, "temp");
        assert!(validations[0].1.valid);
        assert_eq!(form.config().get("temp"), Some(&ParameterValue::from(1.2)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_validation_records_errors() {
        let host = Arc::new(RecordingHost::default());
        let form = controller(host.clone(), FormOptions::default());

        form.change_field("top-k", 0);
        assert_eq!(form.pending_validations(), 1);

        tokio::time::sleep(Duration::from_millis(301)).await;

        assert_eq!(form.pending_validations(), 0);
        assert_eq!(
            form.errors().get("top-k"),
            Some(&vec!["Must be at least 1".to_string()])
        );
        assert!(!form.summary().unwrap().is_valid);
        assert_eq!(
            form.view().field("top-k").unwrap().message,
            "Must be at least 1"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_only_field_rejects_edit() {
        let host = Arc::new(RecordingHost::default());
        let form = controller(
            host.clone(),
            FormOptions::default().with_editable_fields(["temp"]),
        );

        assert!(!form.change_field("threads", 4));
        assert!(form.changed_fields().is_empty());
        assert!(host.changes.lock().is_empty());
        assert_eq!(form.pending_validations(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_validate_field_now_cancels_pending() {
        let host = Arc::new(RecordingHost::default());
        let form = controller(host.clone(), FormOptions::default());

        form.change_field("seed", -5);
        let result = form.validate_field_now("seed");

        assert!(!result.valid);
        assert_eq!(form.pending_validations(), 0);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(host.validations.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_apply_blocked_by_errors() {
        let host = Arc::new(RecordingHost::default());
        let form = controller(host.clone(), FormOptions::default());

        form.change_field("temp", 5);
        let outcome = form.handle_apply().await;

        let ApplyOutcome::Blocked(summary) = outcome else {
            panic!("expected apply to be blocked");
        };
        assert_eq!(summary.error_fields, vec!["temp"]);
        assert!(host.applied.lock().is_empty());
        assert_eq!(
            host.last_notification(),
            Some(Notification::warning(APPLY_BLOCKED_MESSAGE))
        );
        assert!(form.view().banner.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_apply_sends_config_and_changed_fields() {
        let host = Arc::new(RecordingHost::default());
        let options =
            FormOptions::default().with_config(Configuration::new().with("model", "/m.gguf"));
        let form = controller(host.clone(), options);

        form.change_field("ctx-size", 4096);
        form.change_field("temp", 0.2);

        assert_eq!(form.handle_apply().await, ApplyOutcome::Applied);

        let applied = host.applied.lock();
        let (config, metadata) = &applied[0];
        assert_eq!(config.get("ctx-size"), Some(&ParameterValue::from(4096)));
        assert_eq!(metadata.changed, vec!["ctx-size", "temp"]);
        assert!(metadata.validation.valid);
        assert_eq!(
            host.last_notification().map(|n| n.level),
            Some(NotificationLevel::Success)
        );
        assert!(form.changed_fields().is_empty());
        assert_eq!(form.pending_validations(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_apply_surfaces_save_failure() {
        let host = Arc::new(RecordingHost::failing());
        let form = controller(host.clone(), FormOptions::default());

        form.change_field("temp", 0.2);
        let outcome = form.handle_apply().await;

        assert_eq!(outcome, ApplyOutcome::SaveFailed(HostSaveError::new("disk full")));
        assert_eq!(form.changed_fields(), vec!["temp"]);
        assert_eq!(
            host.last_notification(),
            Some(Notification::error("Failed to save settings: disk full"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_all_restores_declared_defaults() {
        let host = Arc::new(RecordingHost::default());
        let form = controller(host.clone(), FormOptions::default());

        form.change_field("temp", 9);
        form.handle_apply().await;
        assert_eq!(form.handle_reset_all().await, ResetOutcome::Reset);

        let registry = registry();
        assert_eq!(form.config(), registry.defaults());
        assert!(form.errors().is_empty());
        assert!(form.summary().is_none());

        let applied = host.applied.lock();
        let (config, metadata) = applied.last().unwrap();
        assert_eq!(config, &registry.defaults());
        assert!(metadata.changed.is_empty());
        assert!(metadata.validation.valid);
        assert_eq!(
            host.last_notification(),
            Some(Notification::info(RESET_SUCCESS_MESSAGE))
        );
    }

    #[tokio::test]
    async fn test_reset_all_cancelled_leaves_state() {
        let mut host = MockFormHost::new();
        host.expect_on_field_change().times(1).return_const(());
        host.expect_confirm()
            .withf(|prompt| prompt == RESET_CONFIRMATION)
            .times(1)
            .return_const(false);
        host.expect_on_apply().times(0);
        host.expect_notify().times(0);

        let form = FormController::new(registry(), Arc::new(host), FormOptions::default());
        form.change_field("threads", 8);

        assert_eq!(form.handle_reset_all().await, ResetOutcome::Cancelled);
        assert_eq!(form.config().get("threads"), Some(&ParameterValue::from(8)));
        assert_eq!(form.changed_fields(), vec!["threads"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_returns_to_initial_config() {
        let host = Arc::new(RecordingHost::default());
        let initial = Configuration::new().with("threads", 4);
        let form = controller(host.clone(), FormOptions::default().with_config(initial.clone()));

        form.change_field("threads", 16);
        form.reset();

        assert_eq!(form.config(), initial);
        assert!(form.changed_fields().is_empty());
        assert_eq!(form.pending_validations(), 0);
    }

    #[tokio::test]
    async fn test_sections_and_filter() {
        let host = Arc::new(RecordingHost::default());
        let form = controller(host, FormOptions::default());

        assert!(form.is_expanded("modelSettings"));
        assert!(form.toggle_section("sampling"));
        form.collapse_all();
        assert!(!form.is_expanded("sampling"));
        form.expand_all();
        assert!(form.is_expanded("advanced"));

        form.set_filter("penalty");
        let ids: Vec<_> = form.filtered_categories().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["advanced"]);
        assert_eq!(form.view().count_label(), "3 of 30 parameters");
    }

    #[tokio::test]
    async fn test_filter_is_trimmed_and_lower_cased() {
        let host = Arc::new(RecordingHost::default());
        let form = controller(host, FormOptions::default());

        form.set_filter("  Batch ");
        assert_eq!(form.filter(), "batch");

        let ids: Vec<_> = form
            .filtered_categories()
            .iter()
            .flat_map(|c| c.parameters.iter().map(|p| p.id.as_str()))
            .collect();
        assert_eq!(ids, vec!["batch", "ubatch"]);
    }

    #[tokio::test]
    async fn test_toggle_validation_summary() {
        let host = Arc::new(RecordingHost::default());
        let form = controller(host, FormOptions::default());

        form.validate();
        assert!(form.view().banner.is_none());
        assert!(form.toggle_validation_summary());
        assert!(form.view().banner.unwrap().is_valid);
    }
}
