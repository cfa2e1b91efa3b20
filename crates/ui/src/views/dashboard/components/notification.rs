use dioxus::prelude::*;

use crate::notify::NotifierHandle;

#[component]
pub fn NotificationBanner() -> Element {
    let notifier = use_context::<NotifierHandle>();

    match notifier.current() {
        Some(notification) => {
            let class = format!("notification {} show", notification.severity.class());
            rsx! {
                div { class, role: "status", "{notification.message}" }
            }
        }
        None => rsx! {
            div { class: "notification", role: "status" }
        },
    }
}
