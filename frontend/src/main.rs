use crate::app::App;

mod app;
mod components;
mod net;
mod storage;

fn main() {
    std::panic::set_hook(Box::new(|info| {
        gloo_console::error!(format!("unrecoverable failure: {info}"));
    }));
    yew::Renderer::<App>::new().render();
}
