//! Configuration console: root module wiring the Yew `Component`
//! implementation with submodules for state, update logic, view rendering,
//! and helpers.
//!
//! Responsibilities
//! - Re-export selected types (`Msg`, `ConsoleComponent`).
//! - Provide the `Component` implementation that delegates to
//!   `update::update` and `view::view`.
//! - On first render, kick off the definitions load and install the Ctrl+L
//!   logout shortcut.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use yew::prelude::*;

mod helpers;
mod messages;
mod state;
mod styles;
mod update;
mod view;

pub use messages::Msg;
pub use state::ConsoleComponent;

/// Base URL of the configuration-store service.
pub const CONFIG_SERVICE_URL: &str = "https://function.chatporter.com/function/config-store";
/// Base URL of the auth service issuing bearer tokens.
pub const AUTH_SERVICE_URL: &str = "https://function.chatporter.com/function/config-store";

impl Component for ConsoleComponent {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        ConsoleComponent::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            ctx.link().send_message(Msg::LoadDefinitions);

            let link = ctx.link().clone();
            let listener = Closure::wrap(Box::new(move |event: web_sys::KeyboardEvent| {
                if event.ctrl_key() && event.key().eq_ignore_ascii_case("l") {
                    event.prevent_default();
                    link.send_message(Msg::Logout);
                }
            }) as Box<dyn FnMut(web_sys::KeyboardEvent)>);
            if let Some(window) = web_sys::window() {
                let _ = window
                    .add_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref());
            }
            // keep the closure alive for the lifetime of the component
            self.keydown_listener = Some(listener);
        }
    }
}
