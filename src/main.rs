use std::process;

fn main() -> miette::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let code = sample_check::cli::run()?;
    if code != 0 {
        process::exit(code);
    }
    Ok(())
}
