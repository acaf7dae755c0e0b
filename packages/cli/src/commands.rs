use std::io::{Read, Write};
use std::sync::Arc;

use anyhow::{bail, Context as _};

use pathkv_core::{Bytes, Context, Error, Reader, Store, SubStore};
use pathkv_http::HttpReader;

use crate::cli::{Cli, Command};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let ctx = cli.context();

    // Remote reads never touch the local backend.
    if let Command::Get {
        key,
        remote: Some(url),
    } = &cli.command
    {
        let reader = HttpReader::new(url).with_context(|| format!("invalid remote '{}'", url))?;
        let reader = SubStore::new(reader, cli.prefix.as_str());
        return get(&reader, &ctx, key, &mut std::io::stdout().lock());
    }

    let backend = cli.backend();
    tracing::debug!(?backend, prefix = %cli.prefix, "opening store");
    let mut store = backend.open().context("failed to open store")?;
    if !cli.prefix.is_empty() {
        store = Box::new(SubStore::new(store, cli.prefix.clone()));
    }

    match cli.command {
        Command::Serve { addr } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(pathkv_http::serve(addr, Arc::new(store)))?;
            Ok(())
        }
        command => execute(
            store.as_ref(),
            &ctx,
            command,
            &mut std::io::stdin().lock(),
            &mut std::io::stdout().lock(),
        ),
    }
}

/// Run a one-shot store command, writing results to `out`.
pub fn execute(
    store: &dyn Store,
    ctx: &Context,
    command: Command,
    input: &mut dyn Read,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match command {
        Command::Ls { key } => ls(store, ctx, &key, out),
        Command::Get { key, .. } => get(store, ctx, &key, out),
        Command::Put { key, value } => {
            let value = match value {
                Some(value) => Bytes::from(value),
                None => {
                    let mut buf = Vec::new();
                    input.read_to_end(&mut buf)?;
                    Bytes::from(buf)
                }
            };
            store
                .write(ctx, &key, value)
                .with_context(|| format!("failed to write '{}'", key))
        }
        Command::Rm { key } => store
            .delete(ctx, &key)
            .with_context(|| format!("failed to delete '{}'", key)),
        Command::Serve { .. } => bail!("serve cannot run as a one-shot command"),
    }
}

fn ls(store: &dyn Store, ctx: &Context, key: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    let listing = match store.list(ctx, key) {
        Ok(listing) => listing,
        // No children.
        Err(Error::KeyNotFound) => return Ok(()),
        Err(e) => return Err(e).with_context(|| format!("failed to list '{}'", key)),
    };

    for dir in &listing.dirs {
        writeln!(out, "{}/", dir)?;
    }
    for blob in &listing.blobs {
        writeln!(out, "{}", blob)?;
    }
    Ok(())
}

fn get<R: Reader + ?Sized>(
    reader: &R,
    ctx: &Context,
    key: &str,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match reader.read(ctx, key) {
        Ok(data) => {
            out.write_all(&data)?;
            out.flush()?;
            Ok(())
        }
        Err(Error::KeyNotFound) => bail!("key not found: {}", key),
        Err(e) => Err(e).with_context(|| format!("failed to read '{}'", key)),
    }
}
