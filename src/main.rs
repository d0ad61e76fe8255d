use clap::Parser;
use leaftext::cli::{self, Options};

fn main() {
    env_logger::init();

    let options = Options::parse();

    match cli::run(&options) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
