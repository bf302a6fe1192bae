use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use log::error;

use freelanced::{params::Params, repo, server};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(thiserror::Error, Debug)]
enum StartupError {
    #[error("unable to connect to the database :: {0}")]
    Repository(#[from] repo::Error),
    #[error("server error :: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let params = Params::parse();

    match run(params).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(params: Params) -> Result<(), StartupError> {
    let repository = repo::Repository::try_new(&params.database_url, params.max_connections).await?;
    let facade = repo::FacadeMarketplace::new(std::sync::Arc::new(repository));
    let router = server::router(facade, params.router_options());

    print_banner(&params);

    server::serve(params.socket_addr(), router).await?;
    Ok(())
}

fn print_banner(params: &Params) {
    let port = params.port;

    println!(
        "{} {}",
        "freelanced".bold().green(),
        env!("CARGO_PKG_VERSION").dimmed()
    );

    if params.host.is_unspecified() {
        println!("  {} http://localhost:{port}", "local:".bold());
        if let Ok(ifaces) = if_addrs::get_if_addrs() {
            for iface in ifaces.iter().filter(|i| !i.is_loopback() && i.ip().is_ipv4()) {
                println!("  {} http://{}:{port}", "network:".bold(), iface.ip());
            }
        }
    } else {
        println!("  {} http://{}", "address:".bold(), params.socket_addr());
    }

    println!("  {} http://localhost:{port}/tablas", "all tables:".bold());
    println!("  {} http://localhost:{port}/schema", "schema:".bold());
    println!();
}
