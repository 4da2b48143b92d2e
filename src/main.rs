use clap::Parser;
use img_optimize::cli::Args;
use img_optimize::logger;
use img_optimize::{NativeCodec, Optimizer, RunConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    logger::set_verbosity(logger::Verbosity::from_flags(args.quiet, args.verbose));

    let optimizer = match Optimizer::new(RunConfig::from(&args), NativeCodec) {
        Ok(optimizer) => optimizer,
        Err(e) => {
            img_optimize::error!("{}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    let report = optimizer.run();
    ExitCode::from(report.exit_code())
}
