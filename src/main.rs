use anyhow::Result;

fn main() -> Result<()> {
    config_cache::cli::run()
}
