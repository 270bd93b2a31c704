use tokio::sync::watch;
use tracing::debug;

use crate::models::{BookingForm, CostEstimate, FormAction};

/// Owns an in-progress booking form and republishes its cost estimate
/// whenever an action changes it.
pub struct FormSession {
    form: BookingForm,
    estimate_tx: watch::Sender<CostEstimate>,
}

impl FormSession {
    pub fn new(form: BookingForm) -> Self {
        let (estimate_tx, _) = watch::channel(form.estimate());
        Self { form, estimate_tx }
    }

    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    /// Latest published estimate
    pub fn estimate(&self) -> CostEstimate {
        self.estimate_tx.borrow().clone()
    }

    /// Receiver that observes every republished estimate
    pub fn subscribe(&self) -> watch::Receiver<CostEstimate> {
        self.estimate_tx.subscribe()
    }

    /// Reduce the form and republish the estimate if it changed.
    /// Returns whether a new estimate was published.
    pub fn apply(&mut self, action: FormAction) -> bool {
        self.form = self.form.apply(action);
        let next = self.form.estimate();

        let published = self.estimate_tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });

        if published {
            debug!(total = %self.estimate().total, "Cost estimate republished");
        }
        published
    }
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new(BookingForm::default())
    }
}
