/*
ENSnano, a 3d graphical application for DNA nanostructures.
    Copyright (C) 2021  Nicolas Levy <nicolaspierrelevy@gmail.com> and Nicolas Schabanel <nicolas.schabanel@ens-lyon.fr>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
//! Command line front-end.
//!
//! Import a design saved in the legacy JSON format, optionally apply a sequence to its scaffold,
//! and print a summary of the design followed by the list of its staples.

#[macro_use]
extern crate serde_derive;
extern crate serde;

mod report;

use nanostrand_design::{Document, ErrOperation, ParametersError, PartParameters};
use nanostrand_legacy::{LegacyDesign, LegacyImportError};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

const USAGE: &str =
    "usage: nanostrand <design.json> [--parameters <file>] [--scaffold-sequence <file>] [--json]";

#[derive(Debug, Default, PartialEq)]
struct Options {
    design: PathBuf,
    parameters: Option<PathBuf>,
    scaffold_sequence: Option<PathBuf>,
    /// Print the staples as JSON instead of tab separated values.
    json: bool,
}

impl Options {
    fn from_args<I: Iterator<Item = String>>(mut args: I) -> Result<Self, CliError> {
        let mut design = None;
        let mut ret = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--parameters" => ret.parameters = Some(Self::path_value(&arg, args.next())?),
                "--scaffold-sequence" => {
                    ret.scaffold_sequence = Some(Self::path_value(&arg, args.next())?)
                }
                "--json" => ret.json = true,
                _ if arg.starts_with("--") => {
                    return Err(CliError::Usage(format!("unknown option {}", arg)))
                }
                _ if design.is_none() => design = Some(PathBuf::from(arg)),
                _ => return Err(CliError::Usage(format!("unexpected argument {}", arg))),
            }
        }
        ret.design = design.ok_or_else(|| CliError::Usage("missing design file".to_string()))?;
        Ok(ret)
    }

    fn path_value(option: &str, value: Option<String>) -> Result<PathBuf, CliError> {
        value
            .map(PathBuf::from)
            .ok_or_else(|| CliError::Usage(format!("missing value for {}", option)))
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}\n{}", USAGE)]
    Usage(String),
    #[error(transparent)]
    Parameters(#[from] ParametersError),
    #[error(transparent)]
    Import(#[from] LegacyImportError),
    #[error(transparent)]
    Operation(#[from] ErrOperation),
    #[error("could not read scaffold sequence: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn main() {
    pretty_env_logger::init();
    let result = Options::from_args(env::args().skip(1)).and_then(|options| run(&options));
    if let Err(e) = result {
        log::error!("{}", e);
        let code = if matches!(e, CliError::Usage(_)) { 2 } else { 1 };
        std::process::exit(code);
    }
}

fn run(options: &Options) -> Result<(), CliError> {
    let parameters = match &options.parameters {
        Some(path) => PartParameters::from_json_file(path)?,
        None => PartParameters::DEFAULT,
    };
    let design = LegacyDesign::from_json_file(&options.design)?;
    log::info!(
        "Importing {} helices from {}",
        design.vstrands.len(),
        options.design.display()
    );
    let part = nanostrand_legacy::import(&design, parameters)?;
    let mut document = Document::from_part(part);

    if let Some(path) = &options.scaffold_sequence {
        let text = std::fs::read_to_string(path)?;
        let sequence: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        apply_scaffold_sequence(&mut document, &sequence)?;
    }

    print!("{}", document.part().formated_summary());
    let staples = report::staple_reports(document.part());
    if options.json {
        println!("{}", serde_json::to_string_pretty(&staples)?);
    } else {
        print!("{}", report::formated_staples(&staples));
    }
    Ok(())
}

/// Apply `sequence` to the longest scaffold oligo of the document.
///
/// Return false if the document has no scaffold.
fn apply_scaffold_sequence(document: &mut Document, sequence: &str) -> Result<bool, CliError> {
    let part = document.part();
    let scaffold = part
        .oligos()
        .filter(|o| {
            part.strand(o.strand5p)
                .map(|s| s.strand_type().is_scaffold())
                .unwrap_or(false)
        })
        .max_by_key(|o| o.length)
        .map(|o| (o.strand5p, o.length));
    if let Some((strand, length)) = scaffold {
        if sequence.chars().count() < length {
            log::warn!(
                "The sequence has {} bases, the scaffold has {}",
                sequence.chars().count(),
                length
            );
        }
        document.apply_sequence(strand, Some(sequence))?;
        Ok(true)
    } else {
        log::warn!("There is no scaffold to apply the sequence to");
        Ok(false)
    }
}
