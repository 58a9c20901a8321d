use cbench::cli::commands::run::RunArgs;
use cbench::cli::{Cli, Commands};
use clap::Parser;
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
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
    let global = cli.global;
    cbench::cli::logging::init(&global);

    match cli.command {
        None => cbench::cli::commands::run::run(RunArgs::default(), &global).await,
        Some(Commands::Run(args)) => cbench::cli::commands::run::run(args, &global).await,
        Some(Commands::Sample) => cbench::cli::commands::sample::run(),
        Some(Commands::Config(cmd)) => cbench::cli::commands::config::run(cmd),
        Some(Commands::Completions(args)) => cbench::cli::commands::completions::run(args),
    }
}
