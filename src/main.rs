use clap::Parser;
use osmos::cli::Cli;
use osmos::core::{Context, Engine};
use tracing_subscriber::EnvFilter;

const BANNER: &str = r#"
 ██████╗ ███████╗███╗   ███╗ ██████╗ ███████╗
██╔═══██╗██╔════╝████╗ ████║██╔═══██╗██╔════╝
██║   ██║███████╗██╔████╔██║██║   ██║███████╗
██║   ██║╚════██║██║╚██╔╝██║██║   ██║╚════██║
╚██████╔╝███████║██║ ╚═╝ ██║╚██████╔╝███████║
 ╚═════╝ ╚══════╝╚═╝     ╚═╝ ╚═════╝ ╚══════╝

Disclaimer:
Usage of osmos for fuzzing targets without prior mutual consent is illegal.
It is the end user's responsibility to obey all applicable local, state and
federal laws. Developers assume no liability and are not responsible for any
misuse or damage caused by this program.
"#;

fn print_banner() {
    println!("\x1b[36m{}\x1b[0m", BANNER); // Cyan color
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        "osmos=debug"
    } else if cli.quiet {
        "osmos=warn"
    } else {
        "osmos=info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // a JSON report on stdout must stay parseable
    let json_on_stdout = cli.format == "json" && cli.output.is_none();
    if !cli.no_banner && !cli.quiet && !json_on_stdout {
        print_banner();
    }

    init_logging(&cli);

    let ctx = Context::from_cli(cli)?;
    let engine = Engine::new(ctx)?;
    engine.run().await?;

    Ok(())
}
