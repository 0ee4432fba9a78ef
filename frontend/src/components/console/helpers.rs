//! Helpers shared by the console's update and view logic.

use gloo_timers::future::TimeoutFuture;
use yew::platform::spawn_local;
use yew::prelude::*;

use super::messages::Msg;
use super::state::{ConsoleComponent, Notification, Severity};

/// How long a toast stays visible before dismissing itself.
const NOTIFICATION_MILLIS: u32 = 6_000;

/// Replaces the visible toast and schedules its auto-dismissal.
///
/// Each notification gets a fresh id, so a timer firing late can never
/// dismiss a newer message.
pub fn show_notification(
    component: &mut ConsoleComponent,
    ctx: &Context<ConsoleComponent>,
    message: &str,
    severity: Severity,
) {
    component.next_notification_id += 1;
    let id = component.next_notification_id;
    component.notification = Some(Notification {
        id,
        message: message.to_string(),
        severity,
    });

    let link = ctx.link().clone();
    spawn_local(async move {
        TimeoutFuture::new(NOTIFICATION_MILLIS).await;
        link.send_message(Msg::Dismiss(id));
    });
}

/// Refetches everything whose cached results are auth/tenant-scoped: the
/// definitions list, and the selected key's value when there is one.
pub fn reload_scoped_queries(component: &ConsoleComponent, ctx: &Context<ConsoleComponent>) {
    ctx.link().send_message(Msg::LoadDefinitions);
    if let Some(key) = component.console.selected() {
        ctx.link().send_message(Msg::Select(key));
    }
}
