mod config;
mod dynamic;
mod module;
mod mpris;
mod player;
mod present;
mod render;
mod runtime;
mod width;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Stdout carries the bar protocol; logs go to stderr.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    runtime::run()
}
