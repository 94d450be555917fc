use clap::Parser;
use latexlint::{init_tracing, run, Cli};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    if let Err(e) = run(&cli, &mut stdout.lock(), &mut stderr.lock()) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
