use clap::Parser;
use wortschatz_cli::{CliArgs, WortschatzApp};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let app = match WortschatzApp::from_args(&args) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = app.run(args).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
