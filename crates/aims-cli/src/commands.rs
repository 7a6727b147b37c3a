//! Command handlers
//!
//! Handlers write their report to `out` and return whether the command
//! succeeded; hard failures are errors.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use aims_core::{Did, Manifest, TrustState, UnverifiedSignatures};
use aims_store::{ManifestStore, RegistryTransport, StoreResolver, StoresFile};
use anyhow::{Context, bail};
use tracing::debug;

use crate::cli::{Cli, DEFAULT_STORE_URL, KeySource};

/// Stores to consult, from `--store`, then `--config`, then the default
pub fn build_resolver(cli: &Cli) -> anyhow::Result<StoreResolver> {
    let timeout = Duration::from_secs(cli.timeout);

    if let Some(url) = &cli.store {
        let store = ManifestStore::new(url.clone(), timeout)?;
        return Ok(StoreResolver::new().with_store("cli", 0, store));
    }

    if let Some(path) = &cli.config {
        let file = StoresFile::load(path)?;
        return Ok(StoreResolver::from_config(&file)?);
    }

    debug!(url = DEFAULT_STORE_URL, "No store configured, using default");
    let store = ManifestStore::new(DEFAULT_STORE_URL, timeout)?;
    Ok(StoreResolver::new().with_store("default", 0, store))
}

fn read_manifest(path: &Path) -> anyhow::Result<Manifest> {
    let content =
        std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_slice(&content).with_context(|| format!("{} is not a manifest", path.display()))
}

fn write_manifest(manifest: &Manifest, path: Option<&Path>, out: &mut impl Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(manifest)?;
    match path {
        Some(path) => std::fs::write(path, json + "\n")
            .with_context(|| format!("cannot write {}", path.display()))?,
        None => writeln!(out, "{json}")?,
    }
    Ok(())
}

fn read_key(key: &KeySource) -> anyhow::Result<Vec<u8>> {
    match (&key.key, &key.key_file) {
        (Some(inline), _) => Ok(inline.as_bytes().to_vec()),
        (None, Some(path)) => {
            std::fs::read(path).with_context(|| format!("cannot read key file {}", path.display()))
        }
        (None, None) => bail!("no signing key given"),
    }
}

pub fn did_parse(did: &str, out: &mut impl Write) -> anyhow::Result<bool> {
    let did = Did::parse(did)?;
    writeln!(out, "method:       {}", did.method())?;
    writeln!(out, "organization: {}", did.organization())?;
    writeln!(out, "system_id:    {}", did.system_id())?;
    match did.resolve_url() {
        Some(url) => writeln!(out, "resolve_url:  {url}")?,
        None => writeln!(out, "resolve_url:  (none for method '{}')", did.method())?,
    }
    Ok(true)
}

pub fn manifest_init(did: &str, output: Option<&Path>, out: &mut impl Write) -> anyhow::Result<bool> {
    let did = Did::parse(did)?;
    let manifest = Manifest::new(did.to_string());
    write_manifest(&manifest, output, out)?;
    if let Some(path) = output {
        writeln!(out, "Wrote {}", path.display())?;
    }
    Ok(true)
}

pub fn manifest_sign(path: &Path, key: &KeySource, out: &mut impl Write) -> anyhow::Result<bool> {
    let mut manifest = read_manifest(path)?;
    manifest.validate()?;
    manifest.sign(&read_key(key)?)?;
    write_manifest(&manifest, Some(path), out)?;
    writeln!(out, "Signed {} at {}", manifest.did, manifest.updated_at())?;
    Ok(true)
}

pub fn manifest_verify(path: &Path, out: &mut impl Write) -> anyhow::Result<bool> {
    let manifest = read_manifest(path)?;

    if let Err(e) = manifest.parsed_did() {
        writeln!(out, "warning: {e}")?;
    }
    if let Err(e) = manifest.validate() {
        writeln!(out, "invalid: {e}")?;
        return Ok(false);
    }

    report_trust(&manifest, out)
}

fn report_trust(manifest: &Manifest, out: &mut impl Write) -> anyhow::Result<bool> {
    let state = manifest.trust_state(&UnverifiedSignatures, &[]);
    writeln!(out, "{}: {}", manifest.did, state)?;
    if state == TrustState::Unverified {
        writeln!(out, "note: signature present but no authoritative verifier is configured")?;
    }
    Ok(state.is_valid())
}

pub async fn publish<T: RegistryTransport>(
    resolver: &StoreResolver<T>,
    path: &Path,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    let manifest = read_manifest(path)?;
    manifest.validate()?;

    let Some(target) = resolver.stores().first() else {
        bail!("no stores configured");
    };
    let did = target.store.publish(&manifest).await?;
    writeln!(out, "Published {did} to {} ({})", target.name, target.store.base_url())?;
    Ok(true)
}

pub async fn resolve<T: RegistryTransport>(
    resolver: &StoreResolver<T>,
    did: &str,
    output: Option<&Path>,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    match resolver.resolve(did).await? {
        Some(manifest) => {
            write_manifest(&manifest, output, out)?;
            Ok(true)
        }
        None => {
            writeln!(out, "No manifest found for {did}")?;
            Ok(false)
        }
    }
}

pub async fn verify<T: RegistryTransport>(
    resolver: &StoreResolver<T>,
    did: &str,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    match resolver.resolve(did).await? {
        Some(manifest) => report_trust(&manifest, out),
        None => {
            writeln!(out, "No manifest found for {did}")?;
            Ok(false)
        }
    }
}
