use clap::Parser;
use snobuilder::config::BuildRequest;
use snobuilder::pipeline::Builder;
use snobuilder::tool_runner::ShellToolRunner;
use snobuilder::{cli, logging};

fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = cli::Cli::parse();
    let dry_run = cli.dry_run;

    let request = BuildRequest::validate(cli.into_params())?;
    let runner = ShellToolRunner::default();
    let builder = Builder::new(request, &runner)?;

    if dry_run {
        for line in builder.plan() {
            println!("{line}");
        }
        return Ok(());
    }

    let artifacts = builder.run()?;

    println!();
    println!("Without a DNS server, add these entries to /etc/hosts (replace the IP with the node's address):");
    for entry in &artifacts.dns_entries {
        println!("{}  {}", entry.ip, entry.hostname);
    }
    println!();
    println!("Bootable ISO: {}", artifacts.iso.display());
    println!("Cluster credentials: {}", artifacts.credentials_dir.display());
    Ok(())
}
