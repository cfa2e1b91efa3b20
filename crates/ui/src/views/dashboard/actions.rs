use dioxus::prelude::*;
use grades_core::model::{Snapshot, StudentId, SubjectId};

use crate::context::AppContext;
use crate::dispatch::{Command, DispatchError, Dispatcher};
use crate::notify::{NotifierHandle, Severity};
use crate::store::DashboardState;

/// What the caller needs to know after a command ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Outcome {
    Applied,
    Rejected,
    Invalid,
}

/// The grade input that failed the last save attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct FlaggedGrade {
    pub student_id: StudentId,
    pub subject_id: SubjectId,
}

/// Runs commands against the backend and feeds results back into the
/// store, the flagged grade input and the notification banner.
#[derive(Clone)]
pub(super) struct DashboardActions {
    dispatcher: Dispatcher,
    state: Signal<DashboardState>,
    flagged: Signal<Option<FlaggedGrade>>,
    notifier: NotifierHandle,
}

/// Creates the dashboard store on first render and provides it, the flagged
/// grade and the actions to every descendant.
///
/// Expects an `AppContext` and a `NotifierHandle` in context.
pub(super) fn use_dashboard(initial: Snapshot) -> (Signal<DashboardState>, DashboardActions) {
    let ctx = use_context::<AppContext>();
    let notifier = use_context::<NotifierHandle>();
    let state = use_signal(|| DashboardState::initial(initial));
    let flagged = use_signal(|| None::<FlaggedGrade>);
    use_context_provider(|| state);
    use_context_provider(|| flagged);
    let actions = use_context_provider(|| DashboardActions {
        dispatcher: ctx.dispatcher(),
        state,
        flagged,
        notifier,
    });
    (state, actions)
}

impl DashboardActions {
    pub(super) async fn run(mut self, command: Command) -> Outcome {
        let saving = match &command {
            Command::SaveGrades { student_id, .. } => Some(*student_id),
            _ => None,
        };
        if saving.is_some() {
            self.flagged.set(None);
        }

        match self.dispatcher.dispatch(command).await {
            Ok(envelope) => {
                self.notifier
                    .notify(envelope.message.clone(), envelope.status.into());
                if self.state.write().apply(&envelope) {
                    Outcome::Applied
                } else {
                    Outcome::Rejected
                }
            }
            Err(DispatchError::Validation(err)) => {
                if let (Some(student_id), Some(subject_id)) = (saving, err.flagged_subject()) {
                    self.flagged.set(Some(FlaggedGrade {
                        student_id,
                        subject_id,
                    }));
                }
                self.notifier.notify(err.to_string(), Severity::Error);
                Outcome::Invalid
            }
        }
    }

    /// Fire and forget, for commands whose outcome only shows up in the store.
    pub(super) fn spawn(&self, command: Command) {
        let actions = self.clone();
        spawn(async move {
            actions.run(command).await;
        });
    }
}
