use std::process::ExitCode;
use std::sync::Arc;

mod client;
mod config;
mod error;
mod handler;
mod http;
mod logger;
mod server;

use error::ServerError;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let result = match args.first().map(String::as_str) {
        Some("fetch") => fetch(&args[1..]),
        Some(config_path) => run(config_path),
        None => run(config::DEFAULT_CONFIG_PATH),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: &str) -> Result<(), ServerError> {
    let cfg = config::Config::load_from(config_path)?;
    logger::init(&cfg)?;

    // Create Tokio runtime, sized by the workers setting when present
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), ServerError> {
    logger::log_config(&cfg);

    let handle = server::Server::new(&cfg).start()?;
    let url = handle.url();
    logger::log_server_start(&url);

    let signal = server::signal::shutdown_signal().await;

    match signal {
        Ok(name) => logger::log_signal(name),
        Err(ref e) => logger::log_error(&format!("Failed to listen for shutdown signals: {e}")),
    }

    let remaining = handle.active_connections();
    if remaining > 0 {
        logger::log_warning(&format!(
            "Closing {remaining} active connection(s)"
        ));
    }
    let state = Arc::clone(handle.state());
    handle.stop().await?;
    logger::log_server_stopped(&url, state.requests_served());

    signal.map(|_| ()).map_err(ServerError::from)
}

/// `fetch <host> <port> [path] [body]`: GET a page, or POST `body` to it,
/// and print the parsed response
fn fetch(args: &[String]) -> Result<(), ServerError> {
    let [host, port, rest @ ..] = args else {
        return Err(ServerError::InvalidAddress(
            "usage: fetch <host> <port> [path] [body]".to_string(),
        ));
    };
    let port: u16 = port
        .parse()
        .map_err(|e| ServerError::InvalidAddress(format!("invalid port {port:?}: {e}")))?;
    let path = rest.first().map_or("/", String::as_str);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let client = client::HttpClient::new(host.as_str(), port);
    let response = runtime.block_on(async {
        match rest.get(1) {
            Some(body) => client.post(path, &[], body.clone()).await,
            None => client.get(path, &[], &[]).await,
        }
    })?;

    println!("\nResponse:\n{response}");
    Ok(())
}
