//! Workload Admin Frontend Entry Point

mod app;
mod components;
mod context;
mod logging;
mod markdown;
mod storage;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Debug);
    mount_to_body(App);
}
