//! Glue between a raw transaction JSON stream and the interpretation core,
//! kept inside the library so the integration tests can drive the exact
//! code path the binary uses.

use std::io::{Read, Write};

use anyhow::{Context, Result};

use crate::balance_changes::BalanceChanges;
use crate::meta::extract_metadata;

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub compute_fees: bool,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(self) -> Result<()> {
        let transaction: serde_json::Value =
            serde_json::from_reader(self.input).context("Input is not valid JSON")?;
        let meta = extract_metadata(&transaction)
            .context("Transaction JSON carries no metadata object")?;

        let changes = BalanceChanges::from_metadata(meta, self.compute_fees)?;

        serde_json::to_writer_pretty(&mut *self.output, &changes)
            .context("Failed to write the result")?;
        writeln!(self.output)?;
        Ok(())
    }
}
