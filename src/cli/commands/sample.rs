//! `cbench sample` command - print the built-in batch as an editable YAML file

use miette::{IntoDiagnostic, Result};

use crate::entities::batch::Batch;

pub fn run() -> Result<()> {
    let batch = Batch::sample()?;
    let yaml = serde_yml::to_string(&batch).into_diagnostic()?;
    print!("{}", yaml);
    Ok(())
}
