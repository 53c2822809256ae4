//! Thin binary: evaluate a notebook from a file or stdin and print
//! each line's result.

use std::io::Read;

use anyhow::Context;
use tally_drv::Calculator;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let document = match args.next() {
        Some(path) if path != "-" => {
            std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?
        }
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("reading stdin")?;
            buffer
        }
    };

    let calculator = Calculator::new();
    let output = calculator.calculate(&document);
    for result in &output.results {
        match &result.rendered {
            Some(rendered) => println!("{rendered}"),
            None => println!(),
        }
    }
    Ok(())
}
