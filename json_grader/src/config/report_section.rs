use log::debug;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::PathBuf,
};

/// Where the report is written.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone)]
#[serde(rename_all = "lowercase")]
pub enum ReportOutput {
    #[default]
    Stdout,
    /// Path of the results file. Missing parent directories are created.
    File(PathBuf),
}

impl ReportOutput {
    pub fn open(&self) -> io::Result<Box<dyn Write>> {
        match self {
            ReportOutput::Stdout => Ok(Box::new(io::stdout())),
            ReportOutput::File(path) => {
                if let Some(parent) = path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    fs::create_dir_all(parent)?;
                }
                debug!("Writing report to '{}'", path.display());
                Ok(Box::new(BufWriter::new(File::create(path)?)))
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields, default)]
struct ReportSectionUnchecked {
    output: ReportOutput,
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone)]
#[serde(try_from = "ReportSectionUnchecked")]
pub struct ReportSection {
    output: ReportOutput,
}

impl ReportSection {
    pub fn build(output: ReportOutput) -> Result<Self, &'static str> {
        if let ReportOutput::File(path) = &output
            && path.as_os_str().is_empty()
        {
            return Err("report file path must not be empty");
        }
        Ok(Self { output })
    }

    pub fn output(&self) -> &ReportOutput {
        &self.output
    }
}

impl TryFrom<ReportSectionUnchecked> for ReportSection {
    type Error = &'static str;

    fn try_from(value: ReportSectionUnchecked) -> Result<Self, Self::Error> {
        ReportSection::build(value.output)
    }
}
