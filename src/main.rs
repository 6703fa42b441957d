use env_logger::{Builder, Env, Target};
use log::{error, warn};
use perk_fetcher::script::emit;
use perk_fetcher::run::interrupted;
use perk_fetcher::{run, Cli, Settings, Source};
use std::process;

#[tokio::main]
async fn main() {
    // Init logging
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.target(Target::Stdout);
    builder.init();

    // Parse Args
    let args = Cli::new();

    // Parse Settings
    let settings = match Settings::new(&args.config_file) {
        Ok(s) => s.with_overrides(args.output_directory.clone(), args.delay_ms),
        Err(e) => {
            error!("Configuration error: {}", e);
            process::exit(1);
        }
    };
    let source = Source::from(args.source);

    // Run
    let work = async {
        match &args.emit_script {
            Some(path) => emit(&settings, source, path, args.script_format)
                .await
                .map(|_| ()),
            None => run(&settings, source).await.map(|_| ()),
        }
    };

    tokio::select! {
        result = work => {
            if let Err(e) = result {
                error!("Application error: {:?}", e);
                process::exit(1);
            }
        }
        _ = interrupted(tokio::signal::ctrl_c()) => {
            warn!("Download cancelled by user");
        }
    }
}
