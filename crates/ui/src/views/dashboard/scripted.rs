//! A dashboard host that replays user steps through the real actions.

use std::time::Duration;

use dioxus::prelude::*;
use grades_core::model::Snapshot;

use crate::dispatch::Command;
use crate::store::SubTab;

use super::actions::use_dashboard;
use super::components::NotificationBanner;
use super::view::DashboardBody;

#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    SelectSubTab(SubTab),
    Run(Command),
    Pause(Duration),
}

/// Expects an `AppContext` and a `NotifierHandle` in context.
#[component]
pub fn ScriptedDashboard(initial: Snapshot, steps: Vec<Step>) -> Element {
    let (mut state, actions) = use_dashboard(initial);
    use_hook(move || {
        spawn(async move {
            for step in steps {
                match step {
                    Step::SelectSubTab(tab) => state.write().select_sub_tab(tab),
                    Step::Run(command) => {
                        actions.clone().run(command).await;
                    }
                    Step::Pause(duration) => tokio::time::sleep(duration).await,
                }
            }
        })
    });

    rsx! {
        NotificationBanner {}
        DashboardBody {}
    }
}
