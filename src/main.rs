mod app;
mod audio;
mod config;
mod import;
mod logging;
mod runtime;
mod store;
mod track;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
