fn main() -> anyhow::Result<()> {
    breathe_cli::run_cli()
}
