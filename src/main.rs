use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paylens::cli::{self, AdvanceCommands, Cli, Commands, Context, ReportCommands};
use paylens::validation::AdvanceDraft;

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let ctx = Context::new(cli.data_dir.as_deref());

    let result = match cli.command {
        Commands::Init { company } => cli::init::run(ctx, company),
        Commands::Demo => cli::demo::run(&ctx),
        Commands::Status => cli::status::run(&ctx),
        Commands::Report { command } => match command {
            ReportCommands::Departments { search, output } => {
                cli::report::departments(&ctx, search, output)
            }
            ReportCommands::Positions { top, output } => cli::report::positions(&ctx, top, output),
            ReportCommands::Variance { output } => cli::report::variance(&ctx, output),
            ReportCommands::Dispersion { field, output } => {
                cli::report::dispersion(&ctx, &field, output)
            }
            ReportCommands::Remittances { output } => cli::report::remittances(&ctx, output),
        },
        Commands::Search { kind, term } => cli::search::run(&ctx, &kind, &term),
        Commands::Calendar { month, prev, next } => cli::calendar::run(&ctx, month, prev, next),
        Commands::Advance { command } => match command {
            AdvanceCommands::Submit {
                employee,
                amount,
                amortization,
                start,
                kind,
                notes,
            } => cli::advance::parse_kind(&kind).and_then(|kind| {
                cli::advance::submit(
                    &ctx,
                    AdvanceDraft {
                        kind,
                        employee_number: employee,
                        amount,
                        amortization,
                        start_date: start,
                        notes,
                    },
                )
            }),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
