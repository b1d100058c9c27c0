use clap::Parser;
use log::info;

fn main() {
    env_logger::init();

    let args = mdview::cli::Args::parse();
    info!("Starting mdview v{}", env!("CARGO_PKG_VERSION"));

    match mdview::cli::run(args) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("mdview: {err:#}");
            std::process::exit(1);
        }
    }
}
