use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use dmgboy::{GbsOptions, RunOptions};

const USAGE: &str = "\
usage:
  dmgboy run <rom> [--frames N] [--save FILE] [--snapshot-in FILE] [--snapshot-out FILE]
  dmgboy gbs <file> [--song N] [--seconds S]
  dmgboy debug <rom>";

fn value<'a>(args: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<&'a String> {
    args.next().with_context(|| format!("{flag} needs a value"))
}

fn number<T: std::str::FromStr>(text: &str, flag: &str) -> Result<T> {
    text.parse()
        .ok()
        .with_context(|| format!("{flag}: '{text}' is not a number"))
}

fn run_command(args: &[String]) -> Result<()> {
    let Some((command, rest)) = args.split_first() else {
        bail!(USAGE);
    };
    let Some((path, flags)) = rest.split_first() else {
        bail!(USAGE);
    };
    let mut flags = flags.iter();

    match command.as_str() {
        "run" => {
            let mut options = RunOptions::builder().rom(PathBuf::from(path)).build();
            while let Some(flag) = flags.next() {
                match flag.as_str() {
                    "--frames" => options.frames = number(value(&mut flags, flag)?, flag)?,
                    "--save" => options.save = Some(value(&mut flags, flag)?.into()),
                    "--snapshot-in" => options.snapshot_in = Some(value(&mut flags, flag)?.into()),
                    "--snapshot-out" => {
                        options.snapshot_out = Some(value(&mut flags, flag)?.into())
                    }
                    other => bail!("unknown option '{other}'\n{USAGE}"),
                }
            }
            dmgboy::run(&options)
        }
        "gbs" => {
            let mut options = GbsOptions::builder().file(PathBuf::from(path)).build();
            while let Some(flag) = flags.next() {
                match flag.as_str() {
                    "--song" => options.song = Some(number(value(&mut flags, flag)?, flag)?),
                    "--seconds" => options.seconds = number(value(&mut flags, flag)?, flag)?,
                    other => bail!("unknown option '{other}'\n{USAGE}"),
                }
            }
            dmgboy::run_gbs(&options)
        }
        "debug" => dmgboy::run_debugger(path.as_ref()),
        other => bail!("unknown command '{other}'\n{USAGE}"),
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = run_command(&args) {
        log::error!("{err:#}");
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}
