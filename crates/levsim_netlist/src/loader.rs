//! Loads the files describing one circuit from disk.
//!
//! A circuit named `c17` lives in `c17.lev`, with an optional delay table in
//! `c17.dly` and an optional fault list in `c17.eqf`.

use crate::delay::{read_dly, DelayTable};
use crate::error::NetlistError;
use crate::fault_list::{read_eqf, FaultRecord};
use crate::lev::read_lev;
use crate::netlist::Netlist;
use crate::vector::VectorReader;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

/// Which optional files to read alongside the netlist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Read `<name>.dly`.
    pub delays: bool,
    /// Read `<name>.eqf`.
    pub faults: bool,
}

/// Everything read for one circuit.
#[derive(Clone, Debug)]
pub struct CircuitFiles {
    /// The validated gate list.
    pub netlist: Netlist,
    /// Delay table, when requested.
    pub delays: Option<DelayTable>,
    /// Fault list, when requested.
    pub faults: Option<Vec<FaultRecord>>,
}

/// Appends an extension to a circuit base name without replacing any dot
/// already in it.
pub fn circuit_path(base: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Reads `<base>.lev` and the optional files selected by `options`.
pub fn load_circuit(base: &Path, options: LoadOptions) -> Result<CircuitFiles, NetlistError> {
    let netlist = read_lev(open(&circuit_path(base, "lev"))?)?;
    let delays = if options.delays {
        Some(read_dly(open(&circuit_path(base, "dly"))?)?)
    } else {
        None
    };
    let faults = if options.faults {
        Some(read_eqf(open(&circuit_path(base, "eqf"))?)?)
    } else {
        None
    };
    Ok(CircuitFiles {
        netlist,
        delays,
        faults,
    })
}

/// Opens a vector file for streaming.
pub fn open_vectors(path: &Path) -> Result<VectorReader<BufReader<File>>, NetlistError> {
    Ok(VectorReader::new(open(path)?))
}

fn open(path: &Path) -> Result<BufReader<File>, NetlistError> {
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(NetlistError::MissingFile(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}
