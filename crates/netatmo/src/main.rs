mod cli;
mod error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use netatmo_core::{Hub, NetatmoContext, setup};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let path = cli
        .global
        .config
        .unwrap_or_else(netatmo_config::config_path);
    let config =
        netatmo_config::load_config(&path).map_err(|e| CliError::from_config(&path, e))?;

    let hub = Hub::new();
    let mut discovery = hub.subscribe_discovery();
    if !setup(&hub, &config).await {
        return Err(CliError::SetupFailed);
    }
    let ctx = NetatmoContext::from_hub(&hub).ok_or(CliError::SetupFailed)?;

    tracing::debug!(command = ?cli.command, "dispatching command");
    match cli.command {
        Command::Check => {
            println!("authenticated as {}", config.netatmo.username);
            println!("scope: {}", ctx.auth.scope().join(" "));
            while let Ok(request) = discovery.try_recv() {
                println!("platform: {}", request.platform);
            }
        }
        Command::Cameras(args) => {
            let mut data = ctx.camera_data.lock().await;
            for name in data.get_camera_names(args.home.as_deref()).await? {
                println!("{name}");
            }
        }
        Command::Modules(args) => {
            let mut data = ctx.camera_data.lock().await;
            let names = data
                .get_module_names(&args.camera, args.home.home.as_deref())
                .await?;
            for name in names {
                println!("{name}");
            }
        }
        Command::Events(args) => {
            let home = args.home.home.as_deref();
            let mut data = ctx.camera_data.lock().await;
            data.update().await?;
            if data.get_camera_type(args.camera.as_deref(), home)?.is_none() {
                return Err(CliError::NotFound {
                    resource_type: "camera",
                    identifier: args
                        .camera
                        .or(args.home.home)
                        .unwrap_or_else(|| "<default>".into()),
                });
            }
            data.update_event().await?;
            print_last_events(&data);
        }
    }
    Ok(())
}

fn print_last_events(data: &netatmo_core::CameraData) {
    let (Some(listing), Some(events)) = (data.home_data(), data.events()) else {
        return;
    };
    for (camera_id, event) in events.last_events() {
        let camera = listing
            .camera_by_id(camera_id)
            .map_or(camera_id, |c| c.name.as_str());
        let when = chrono::DateTime::from_timestamp(event.time, 0)
            .map_or_else(|| event.time.to_string(), |t| t.to_rfc3339());
        println!("{camera}\t{when}\t{}", event.event_type);
    }
}
