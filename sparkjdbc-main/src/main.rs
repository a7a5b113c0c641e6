use std::process;

use clap::Parser;
use serde::Serialize;
use sparkjdbc_config::{diagnostic::ConfigParseError, ConfigLoader};
use sparkjdbc_core::{
    config::AppConfig,
    err::{Context, Result},
};
use sparkjdbc_hook::{ConnectionResolver, MemoryConnectionStore, SparkJdbcHook};
use sparkjdbc_logging::{info, MaskedArgs};

use crate::args::{Command, JobArgs};

mod args;

fn main() {
    if let Err(err) = sparkjdbc_logging::init_logging() {
        eprintln!("Failed to init logging: {}", err);
    }

    if let Err(err) = run(Command::parse()) {
        match err.downcast_ref::<ConfigParseError>() {
            Some(parse_err) => parse_err.print(),
            None => eprintln!("Error: {:#}", err),
        }
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    let conf = ConfigLoader::new()
        .load(command.config_path())
        .context("Failed to load configuration")?;
    let store = MemoryConnectionStore::from_config(&conf);

    match command {
        Command::Resolve(args) => {
            let conn = ConnectionResolver::new(&store).resolve(&args.conn)?;
            print_json(&conn.masked())
        }
        Command::Args(args) => {
            let jdbc_args = init_hook(&conf, &store, &args)?.jdbc_arguments()?;
            print_args(&jdbc_args, args.unmasked)
        }
        Command::Command(args) => {
            let cmd = init_hook(&conf, &store, &args)?.submit_command()?;
            print_args(&cmd, args.unmasked)
        }
        Command::Submit(args) => {
            init_hook(&conf, &store, &args)?.submit_jdbc_job()?;
            info!("Submission complete");
            Ok(())
        }
    }
}

fn init_hook(conf: &AppConfig, store: &MemoryConnectionStore, args: &JobArgs) -> Result<SparkJdbcHook> {
    let job = conf
        .job(&args.job)
        .with_context(|| format!("Job \"{}\" does not exist", args.job))?;

    SparkJdbcHook::new(job.clone(), store)
}

fn print_args(args: &[String], unmasked: bool) -> Result<()> {
    if unmasked {
        print_json(&args)
    } else {
        print_json(&MaskedArgs::new(args).to_vec())
    }
}

fn print_json(val: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(val).context("Failed to serialise output")?;
    println!("{}", json);
    Ok(())
}
