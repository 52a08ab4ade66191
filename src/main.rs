use clap::Parser;
use miette::Result;
use plat::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => plat::cli::commands::init::run(args),
        Commands::Deal(cmd) => plat::cli::commands::deal::run(cmd, &cli.global),
        Commands::Pro(cmd) => plat::cli::commands::pro::run(cmd, &cli.global),
        Commands::Task(cmd) => plat::cli::commands::task::run(cmd, &cli.global),
        Commands::Contact(cmd) => plat::cli::commands::contact::run(cmd, &cli.global),
        Commands::Timeline(cmd) => plat::cli::commands::timeline::run(cmd, &cli.global),
        Commands::Dash(args) => plat::cli::commands::dash::run(args, &cli.global),
        Commands::Health(args) => plat::cli::commands::health::run(args, &cli.global),
        Commands::Export(args) => plat::cli::commands::export::run(args, &cli.global),
        Commands::Validate(args) => plat::cli::commands::validate::run(args, &cli.global),
        Commands::Completions(args) => plat::cli::commands::completions::run(args),
    }
}
