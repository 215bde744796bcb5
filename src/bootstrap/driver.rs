//! geckodriver provisioning.
//!
//! Known platforms get a pinned release downloaded once into the system temp
//! directory; everything else falls back to whatever `geckodriver` is on
//! `PATH`. A cached binary is trusted as-is, so it only ever appears at its
//! final path once it is complete and executable.

use super::BootstrapError;
use crate::config;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Where the WebDriver server comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverBinary {
    /// A provisioned (or previously cached) executable.
    Local(PathBuf),
    /// Let process spawning resolve `geckodriver` from `PATH`.
    SystemDefault,
}

impl DriverBinary {
    /// Program to execute.
    pub fn program(&self) -> &Path {
        match self {
            DriverBinary::Local(path) => path,
            DriverBinary::SystemDefault => Path::new(leaf_name()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    Zip,
}

impl ArchiveKind {
    fn extension(self) -> &'static str {
        match self {
            ArchiveKind::TarGz => "tar.gz",
            ArchiveKind::Zip => "zip",
        }
    }
}

/// A release asset for one host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub os: &'static str,
    pub arch: &'static str,
    pub platform: &'static str,
    pub archive: ArchiveKind,
}

impl ReleaseAsset {
    pub fn download_url(&self) -> String {
        let version = config::GECKODRIVER_VERSION;
        format!(
            "{}/{version}/geckodriver-{version}-{}.{}",
            config::GECKODRIVER_RELEASES,
            self.platform,
            self.archive.extension()
        )
    }
}

/// Hosts with a published geckodriver build, keyed by
/// `std::env::consts::{OS, ARCH}`.
pub static RELEASE_ASSETS: &[ReleaseAsset] = &[
    ReleaseAsset { os: "linux", arch: "x86_64", platform: "linux64", archive: ArchiveKind::TarGz },
    ReleaseAsset { os: "linux", arch: "aarch64", platform: "linux-aarch64", archive: ArchiveKind::TarGz },
    ReleaseAsset { os: "macos", arch: "x86_64", platform: "macos", archive: ArchiveKind::TarGz },
    ReleaseAsset { os: "macos", arch: "aarch64", platform: "macos-aarch64", archive: ArchiveKind::TarGz },
    ReleaseAsset { os: "windows", arch: "x86_64", platform: "win64", archive: ArchiveKind::Zip },
];

pub fn release_asset(os: &str, arch: &str) -> Option<&'static ReleaseAsset> {
    RELEASE_ASSETS
        .iter()
        .find(|asset| asset.os == os && asset.arch == arch)
}

fn leaf_name() -> &'static str {
    if cfg!(windows) {
        "geckodriver.exe"
    } else {
        "geckodriver"
    }
}

/// Locate a usable geckodriver for this host, downloading it if needed.
///
/// # Errors
///
/// Any download, extraction or filesystem failure. There is no retry.
pub async fn resolve_driver_binary() -> Result<DriverBinary, BootstrapError> {
    resolve_in(
        &std::env::temp_dir(),
        std::env::consts::OS,
        std::env::consts::ARCH,
    )
    .await
}

#[instrument(level = "info", skip(dir), fields(dir = %dir.display()))]
async fn resolve_in(dir: &Path, os: &str, arch: &str) -> Result<DriverBinary, BootstrapError> {
    let Some(asset) = release_asset(os, arch) else {
        info!("No bundled geckodriver for this platform; using PATH");
        return Ok(DriverBinary::SystemDefault);
    };

    let target = dir.join(leaf_name());
    if target.exists() {
        info!(path = %target.display(), "Using cached geckodriver");
        return Ok(DriverBinary::Local(target));
    }

    let url = asset.download_url();
    info!(%url, "Downloading geckodriver");
    let archive = reqwest::get(&url)
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    info!(bytes = archive.len(), "Downloaded geckodriver archive");

    let kind = asset.archive;
    let out = target.clone();
    tokio::task::spawn_blocking(move || extract_binary(&archive, kind, &out, leaf_name()))
        .await
        .map_err(|e| BootstrapError::Io(std::io::Error::other(e)))??;

    info!(path = %target.display(), "Installed geckodriver");
    Ok(DriverBinary::Local(target))
}

fn matches_leaf(path: &Path, leaf: &str) -> bool {
    path.file_name().and_then(|n| n.to_str()) == Some(leaf)
}

/// Install the archive entry named `leaf` as an executable at `target`.
///
/// The entry is unpacked next to `target` under a `.part` name and renamed
/// into place only after it is fully written and marked executable. On
/// failure the partial file is removed and `target` is left untouched.
pub fn extract_binary(
    archive: &[u8],
    kind: ArchiveKind,
    target: &Path,
    leaf: &str,
) -> Result<(), BootstrapError> {
    let partial = partial_path(target);
    let installed = unpack_entry(archive, kind, &partial, leaf)
        .and_then(|()| set_executable(&partial))
        .and_then(|()| Ok(fs::rename(&partial, target)?));
    if installed.is_err() {
        let _ = fs::remove_file(&partial);
    }
    installed
}

fn partial_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from(leaf_name()));
    name.push(".part");
    target.with_file_name(name)
}

fn unpack_entry(
    archive: &[u8],
    kind: ArchiveKind,
    target: &Path,
    leaf: &str,
) -> Result<(), BootstrapError> {
    match kind {
        ArchiveKind::TarGz => {
            let gz = flate2::read::GzDecoder::new(Cursor::new(archive));
            let mut tar = tar::Archive::new(gz);
            for entry in tar.entries()? {
                let mut entry = entry?;
                if matches_leaf(&entry.path()?, leaf) {
                    return write_entry(&mut entry, target);
                }
            }
        }
        ArchiveKind::Zip => {
            let mut zip = zip::ZipArchive::new(Cursor::new(archive))?;
            for i in 0..zip.len() {
                let mut entry = zip.by_index(i)?;
                if matches_leaf(Path::new(entry.name()), leaf) {
                    return write_entry(&mut entry, target);
                }
            }
        }
    }
    Err(BootstrapError::MissingEntry(leaf.to_string()))
}

fn write_entry(entry: &mut impl Read, target: &Path) -> Result<(), BootstrapError> {
    let mut out = File::create(target)?;
    std::io::copy(entry, &mut out)?;
    Ok(())
}

fn set_executable(path: &Path) -> Result<(), BootstrapError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms)?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
