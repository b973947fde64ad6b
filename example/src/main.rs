use clap::Parser;

fn main() -> anyhow::Result<()> {
    example::run(example::Cli::parse())
}
