//! Update function for the configuration console.
//!
//! Elm-style: receives the current state, the `Context`, and a `Msg`,
//! mutates the state, and returns whether the view should re-render. All
//! network work goes through the shared `Console` handle on spawned local
//! tasks that report back as messages, so every state mutation stays inside
//! the single event-processing sequence.

use std::rc::Rc;

use client::{validate, SaveOutcome, SelectOutcome};
use gloo_console::debug;
use yew::platform::spawn_local;
use yew::prelude::*;

use super::helpers::{reload_scoped_queries, show_notification};
use super::messages::Msg;
use super::state::{ConsoleComponent, Severity};

pub fn update(component: &mut ConsoleComponent, ctx: &Context<ConsoleComponent>, msg: Msg) -> bool {
    match msg {
        Msg::LoadDefinitions => {
            component.loading_definitions = true;
            let console = Rc::clone(&component.console);
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(Msg::DefinitionsLoaded(console.load_definitions().await));
            });
            true
        }
        Msg::DefinitionsLoaded(result) => {
            component.loading_definitions = false;
            match result {
                Ok(view) => {
                    component.definitions = view.definitions;
                    if let Some(key) = view.auto_selected {
                        ctx.link().send_message(Msg::Select(key));
                    }
                }
                Err(error) => {
                    show_notification(
                        component,
                        ctx,
                        &format!("Failed to load definitions: {error}"),
                        Severity::Error,
                    );
                }
            }
            true
        }
        Msg::Select(key) => {
            component.loading_value = true;
            component.stored = None;
            component.field_errors.clear();
            let console = Rc::clone(&component.console);
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(Msg::ValueResolved(console.select(&key).await));
            });
            true
        }
        Msg::ValueResolved(outcome) => match outcome {
            SelectOutcome::Loaded { stored, .. } => {
                component.loading_value = false;
                component.stored = stored;
                true
            }
            // a newer selection owns the editor now
            SelectOutcome::Superseded => false,
            SelectOutcome::Failed { key, error } => {
                component.loading_value = false;
                show_notification(
                    component,
                    ctx,
                    &format!("Failed to load value for {key}: {error}"),
                    Severity::Error,
                );
                true
            }
        },
        Msg::Edit(value) => {
            component.console.edit(value);
            component.field_errors.clear();
            true
        }
        Msg::Save => {
            let Some(key) = component.console.selected() else {
                return false;
            };
            if !component.console.is_dirty() || component.console.is_saving() {
                debug!("save ignored: nothing to persist");
                return false;
            }
            // schema validation gates the submission; nothing invalid is
            // ever sent to the service
            if let Some(definition) = component.definitions.iter().find(|def| def.key == key) {
                if let Err(errors) = validate(&definition.schema, &component.console.draft()) {
                    component.field_errors = errors;
                    show_notification(
                        component,
                        ctx,
                        "Fix the highlighted fields before saving",
                        Severity::Error,
                    );
                    return true;
                }
            }
            let console = Rc::clone(&component.console);
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(Msg::SaveResolved(console.save().await));
            });
            true
        }
        Msg::SaveResolved(outcome) => match outcome {
            SaveOutcome::Saved { stored, .. } => {
                component.stored = Some(stored);
                show_notification(
                    component,
                    ctx,
                    "Configuration saved successfully!",
                    Severity::Success,
                );
                // the list was invalidated by the save; refresh it
                ctx.link().send_message(Msg::LoadDefinitions);
                true
            }
            SaveOutcome::NotDirty => false,
            SaveOutcome::Failed { error, .. } => {
                show_notification(
                    component,
                    ctx,
                    &format!("Failed to save configuration. Please try again. ({error})"),
                    Severity::Error,
                );
                true
            }
        },
        Msg::TokenInput(value) => {
            component.token_input = value;
            true
        }
        Msg::UsernameInput(value) => {
            component.username = value;
            true
        }
        Msg::PasswordInput(value) => {
            component.password = value;
            true
        }
        Msg::TenantInput(value) => {
            component.tenant = value;
            true
        }
        Msg::ApplyToken => {
            if component.token_input.is_empty() {
                show_notification(component, ctx, "Provide a token first", Severity::Error);
                return true;
            }
            component.console.adopt_token(&component.token_input);
            show_notification(component, ctx, "Token set successfully", Severity::Success);
            reload_scoped_queries(component, ctx);
            true
        }
        Msg::Login => {
            let console = Rc::clone(&component.console);
            let link = ctx.link().clone();
            let username = component.username.clone();
            let password = component.password.clone();
            let tenant = (!component.tenant.is_empty()).then(|| component.tenant.clone());
            spawn_local(async move {
                link.send_message(Msg::LoginResolved(
                    console
                        .login(&username, &password, tenant.as_deref())
                        .await,
                ));
            });
            true
        }
        Msg::LoginResolved(Ok(())) => {
            component.token_input = component.console.session().token().unwrap_or_default();
            show_notification(component, ctx, "Logged in successfully", Severity::Success);
            reload_scoped_queries(component, ctx);
            true
        }
        Msg::LoginResolved(Err(error)) => {
            show_notification(
                component,
                ctx,
                &format!("Login failed: {error}"),
                Severity::Error,
            );
            true
        }
        Msg::Logout => {
            component.console.logout();
            component.definitions.clear();
            component.stored = None;
            component.field_errors.clear();
            component.token_input.clear();
            component.tenant.clear();
            show_notification(component, ctx, "Logged out", Severity::Success);
            // auth-scoped queries are gone; refetch to surface the
            // unauthenticated state
            ctx.link().send_message(Msg::LoadDefinitions);
            true
        }
        Msg::Refresh => {
            component.console.refresh();
            reload_scoped_queries(component, ctx);
            true
        }
        Msg::Reset => {
            component.console.reset();
            component.definitions.clear();
            component.stored = None;
            component.field_errors.clear();
            component.loading_definitions = false;
            component.loading_value = false;
            ctx.link().send_message(Msg::LoadDefinitions);
            true
        }
        Msg::Dismiss(id) => {
            if component
                .notification
                .as_ref()
                .is_some_and(|notification| notification.id == id)
            {
                component.notification = None;
                return true;
            }
            false
        }
    }
}
