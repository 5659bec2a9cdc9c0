use anyhow::{Context, Result};
use clap::{Arg, Command};

use extract_snippets::{extract_all, render_summary, write_index, AppConfig};
use load_snippet_config::load_config;

fn main() -> Result<()> {
    let matches = Command::new("extract_snippets")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extracts marker-delimited CSS snippets from the theme files listed in .env")
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Exit with a non-zero status if any source fails")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");
    let strict = matches.get_flag("strict");

    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    let config_path = AppConfig::default_config_path();
    let loaded = load_config(&config_path).context("Failed to load snippet configuration")?;
    let app = AppConfig::compose(verbose, strict, &loaded)
        .context("Failed to load snippet configuration")?;
    log::debug!("Runtime configuration: {:?}", app);

    println!("--------------------------------------------------");
    println!("Configuration: {}", app.config_path.display());
    println!("Sources configured: {}", loaded.groups.len());

    let report = extract_all(&loaded);

    if let Some(index_path) = &app.index_path {
        match write_index(index_path, &report) {
            Ok(index) => println!(
                "Index: {} block(s) recorded in {}",
                index.len(),
                index_path.display()
            ),
            Err(err) => eprintln!("Error writing index: {}", err),
        }
    }

    print!("{}", render_summary(&report));

    if app.strict && !report.is_clean() {
        eprintln!(
            "{} source(s) failed and strict mode is enabled. Exiting.",
            report.failed.len()
        );
        std::process::exit(1);
    }

    Ok(())
}
