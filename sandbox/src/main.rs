use clap::Parser;

use env_logger::Env;

mod app;
mod args;
mod config;
mod scene;

use app::App;
use args::ArgsSandbox;
use config::Config;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = <ArgsSandbox as Parser>::parse();

    let mut config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => {
                log::info!("Read config from {:?}", path);
                config
            }
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    if let Some(width) = args.width {
        config.window.width = width;
    }
    if let Some(height) = args.height {
        config.window.height = height;
    }

    let menu = scene::default_menu();
    let initial = args.scene.and_then(|s| {
        let index = menu.position(s.scene_name());
        if index.is_none() {
            log::warn!("Scene '{}' is not registered", s.scene_name());
        }
        index
    });

    let app = match App::new(&config, menu) {
        Ok(app) => app,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    app.run(initial);
}
