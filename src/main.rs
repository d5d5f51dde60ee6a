mod api;
mod app;
mod calendar;
mod collection;
mod components;
mod config;
mod controller;
mod error;
mod forms;
mod import;
mod model;
mod notifications;
mod pages;
mod session;
#[cfg(test)]
mod testing;
mod theme;
mod transport;

use app::App;

fn main() {
    leptos::mount::mount_to_body(App);
}
