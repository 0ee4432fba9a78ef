//! View rendering for the configuration console.
//!
//! Layout: a header bar with auth controls and the refresh/reset actions, a
//! sidebar listing the definitions in service order, and the editor pane
//! with the selected definition's description, value metadata, and the
//! schema-driven form. A single toast at the bottom carries transient
//! notifications.

use common::model::ConfigDefinition;
use web_sys::HtmlInputElement;
use yew::html::Scope;
use yew::prelude::*;

use crate::components::schema_form::SchemaForm;

use super::messages::Msg;
use super::state::{ConsoleComponent, Severity};
use super::styles;

pub fn view(component: &ConsoleComponent, ctx: &Context<ConsoleComponent>) -> Html {
    let link = ctx.link();
    html! {
        <div class="config-console">
            <style>{ styles::STYLESHEET }</style>
            { build_header(component, link) }
            <div class="console-body">
                { build_sidebar(component, link) }
                { build_editor(component, link) }
            </div>
            { build_notification(component, link) }
        </div>
    }
}

/// Header bar: title, token entry, login credentials, session status, and
/// the refresh/reset actions.
fn build_header(component: &ConsoleComponent, link: &Scope<ConsoleComponent>) -> Html {
    let authenticated = component.console.is_authenticated();
    let status = if authenticated {
        match component.console.session().tenant() {
            Some(tenant) => format!("Authenticated (Tenant: {tenant})"),
            None => "Authenticated".to_string(),
        }
    } else {
        "Not authenticated".to_string()
    };
    let loading = component.loading_definitions || component.loading_value;

    html! {
        <header class="console-header">
            <h1>{"Configuration Manager"}</h1>

            <div class="auth-controls">
                <input
                    placeholder="Paste Bearer token"
                    value={component.token_input.clone()}
                    oninput={input_callback(link, Msg::TokenInput)}
                />
                <button onclick={link.callback(|_| Msg::ApplyToken)}>{"Set Token"}</button>
            </div>

            <div class="auth-controls">
                <input
                    placeholder="Tenant"
                    value={component.tenant.clone()}
                    oninput={input_callback(link, Msg::TenantInput)}
                />
                <input
                    placeholder="Username"
                    value={component.username.clone()}
                    oninput={input_callback(link, Msg::UsernameInput)}
                />
                <input
                    type="password"
                    placeholder="Password"
                    value={component.password.clone()}
                    oninput={input_callback(link, Msg::PasswordInput)}
                />
                <button class="primary" onclick={link.callback(|_| Msg::Login)}>{"Login"}</button>
                <button onclick={link.callback(|_| Msg::Logout)} title="Ctrl+L">{"Logout"}</button>
                <span class={classes!("session-status", authenticated.then_some("authenticated"))}>
                    { status }
                </span>
            </div>

            { icon_button("refresh", "Refresh", link.callback(|_| Msg::Refresh), loading) }
            { icon_button("restart_alt", "Reset", link.callback(|_| Msg::Reset), false) }
        </header>
    }
}

/// Sidebar with the definitions list. Order is exactly what the service
/// returned.
fn build_sidebar(component: &ConsoleComponent, link: &Scope<ConsoleComponent>) -> Html {
    let selected = component.console.selected();
    html! {
        <nav class="sidebar">
            <h2>{"Configurations"}</h2>
            {
                if component.loading_definitions {
                    html! { <div class="spinner" /> }
                } else {
                    component
                        .definitions
                        .iter()
                        .map(|def| build_sidebar_entry(def, selected.as_deref(), link))
                        .collect::<Html>()
                }
            }
        </nav>
    }
}

fn build_sidebar_entry(
    definition: &ConfigDefinition,
    selected: Option<&str>,
    link: &Scope<ConsoleComponent>,
) -> Html {
    let key = definition.key.clone();
    let active = selected == Some(definition.key.as_str());
    html! {
        <button
            class={classes!("sidebar-entry", active.then_some("active"))}
            onclick={link.callback(move |_| Msg::Select(key.clone()))}
        >
            { &definition.title }
        </button>
    }
}

/// Editor pane: description, value metadata, the schema form, and the save
/// action.
fn build_editor(component: &ConsoleComponent, link: &Scope<ConsoleComponent>) -> Html {
    let Some(definition) = component.selected_definition() else {
        return html! {
            <main class="editor">
                <p class="placeholder">{"Select a configuration to edit"}</p>
            </main>
        };
    };

    if component.loading_value {
        return html! {
            <main class="editor">
                <div class="spinner" />
            </main>
        };
    }

    let dirty = component.console.is_dirty();
    let saving = component.console.is_saving();
    html! {
        <main class="editor">
            <div class="editor-heading">
                <div>
                    <h2>{ &definition.title }</h2>
                    <p class="description">{ &definition.description }</p>
                </div>
                <button
                    class="primary save-button"
                    disabled={!dirty || saving}
                    onclick={link.callback(|_| Msg::Save)}
                >
                    <i class="material-icons">{"save"}</i>
                    { if saving { "Saving…" } else { "Save" } }
                </button>
            </div>

            { build_metadata(component) }

            <SchemaForm
                schema={definition.schema.clone()}
                value={component.console.draft()}
                errors={component.field_errors.clone()}
                on_change={link.callback(Msg::Edit)}
                on_submit={link.callback(|_| Msg::Save)}
            />
        </main>
    }
}

/// Version and last-updated panel, shown when the service sent them.
fn build_metadata(component: &ConsoleComponent) -> Html {
    let Some(stored) = &component.stored else {
        return html! {};
    };
    html! {
        <div class="value-metadata">
            {
                stored.version.map(|version| html! {
                    <span><strong>{"Version"}</strong>{" "}{ version }</span>
                }).unwrap_or_default()
            }
            {
                stored.updated_at.as_ref().map(|updated_at| html! {
                    <span><strong>{"Last Updated"}</strong>{" "}{ updated_at.clone() }</span>
                }).unwrap_or_default()
            }
        </div>
    }
}

fn build_notification(component: &ConsoleComponent, link: &Scope<ConsoleComponent>) -> Html {
    let Some(notification) = &component.notification else {
        return html! {};
    };
    let id = notification.id;
    let class = match notification.severity {
        Severity::Success => "toast success",
        Severity::Error => "toast error",
    };
    html! {
        <div class={class}>
            <span>{ &notification.message }</span>
            <button class="dismiss" onclick={link.callback(move |_| Msg::Dismiss(id))}>
                {"×"}
            </button>
        </div>
    }
}

/// Renders a header button with a Material icon and a label.
fn icon_button(
    icon_name: &str,
    label: &str,
    on_click: Callback<MouseEvent>,
    disabled: bool,
) -> Html {
    html! {
        <button class="icon-btn" onclick={on_click} {disabled}>
            <i class="material-icons">{ icon_name }</i>
            <span class="icon-label">{ label }</span>
        </button>
    }
}

/// Creates an oninput callback forwarding the input's current text.
fn input_callback(
    link: &Scope<ConsoleComponent>,
    to_msg: fn(String) -> Msg,
) -> Callback<InputEvent> {
    link.callback(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        to_msg(input.value())
    })
}
