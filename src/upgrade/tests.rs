#[cfg(test)]
#[allow(clippy::module_inception)]
mod tests {
    use super::super::*;
    use semver::Version;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    /// Build an in-memory tar.gz archive from `(name, bytes)` entries.
    fn tar_gz(entries: &[(&str, &[u8])]) -> Vec<u8> {
        use flate2::{Compression, write::GzEncoder};

        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);

        for (name, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }

        builder.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn tag_prefix_is_stripped() {
        let descriptor = ReleaseDescriptor::from_tag("cli/v2.1.0").unwrap();
        assert_eq!(descriptor.version, v("2.1.0"));
        assert_eq!(descriptor.tag_name, "cli/v2.1.0");
    }

    #[test]
    fn tag_without_prefix_is_a_resolver_error() {
        let err = ReleaseDescriptor::from_tag("v2.1.0").unwrap_err();
        assert!(matches!(err, UpgradeError::TagConvention { .. }));

        let err = ReleaseDescriptor::from_tag("server/v2.1.0").unwrap_err();
        assert!(matches!(err, UpgradeError::TagConvention { .. }));
    }

    #[test]
    fn unparsable_version_is_a_resolver_error() {
        let err = ReleaseDescriptor::from_tag("cli/vnot-a-version").unwrap_err();
        assert!(matches!(err, UpgradeError::Version { .. }));
    }

    #[test]
    fn upgrade_requires_strictly_newer_version() {
        let current = v("1.2.3");

        assert_eq!(
            UpgradeCheck::from_versions(&current, &v("1.2.4")),
            UpgradeCheck::UpgradeAvailable(v("1.2.4"))
        );
        assert_eq!(
            UpgradeCheck::from_versions(&current, &v("2.0.0")),
            UpgradeCheck::UpgradeAvailable(v("2.0.0"))
        );

        // Equal and older versions never trigger an upgrade.
        assert_eq!(UpgradeCheck::from_versions(&current, &v("1.2.3")), UpgradeCheck::NoUpgrade);
        assert_eq!(UpgradeCheck::from_versions(&current, &v("1.2.2")), UpgradeCheck::NoUpgrade);
        assert_eq!(UpgradeCheck::from_versions(&current, &v("0.9.9")), UpgradeCheck::NoUpgrade);
    }

    #[test]
    fn download_url_is_deterministic() {
        let platform = Platform { os: "linux", arch: "x86_64" };
        let url = fetch::download_url(&v("1.2.3"), &platform, ArchiveFormat::TarGzip);

        assert_eq!(
            url,
            "https://github.com/datagram1/plandex/releases/download/cli%2Fv1.2.3/plandex_1.2.3_linux_x86_64.tar.gz"
        );
    }

    #[test]
    fn download_url_uses_zip_for_windows() {
        let platform = Platform { os: "windows", arch: "x86_64" };
        let format = ArchiveFormat::for_platform(&platform);
        assert_eq!(format, ArchiveFormat::Zip);

        let url = fetch::download_url(&v("1.0.0"), &platform, format);
        assert!(url.ends_with("plandex_1.0.0_windows_x86_64.zip"));
    }

    #[test]
    fn archive_format_follows_platform() {
        let linux = Platform { os: "linux", arch: "aarch64" };
        let macos = Platform { os: "macos", arch: "aarch64" };
        assert_eq!(ArchiveFormat::for_platform(&linux), ArchiveFormat::TarGzip);
        assert_eq!(ArchiveFormat::for_platform(&macos), ArchiveFormat::TarGzip);
    }

    #[test]
    fn session_temp_file_is_removed_on_drop() {
        let session = UpgradeSession::new(v("9.9.9")).unwrap();
        let path = session.archive_path().to_path_buf();
        assert!(path.exists());
        assert!(path.extension().is_some());

        drop(session);
        assert!(!path.exists(), "session teardown must remove the temp archive");
    }

    #[test]
    fn extract_applies_exactly_the_matching_entry() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("plandex");

        let payload = b"#!/bin/sh\necho new-version\n";
        let archive = tar_gz(&[
            ("README.md", b"docs, not a binary".as_slice()),
            ("plandex", payload.as_slice()),
            ("trailing-entry", b"never read".as_slice()),
        ]);

        extract::extract_binary(Cursor::new(archive), ArchiveFormat::TarGzip, "plandex", &target)
            .unwrap();

        let written = std::fs::read(&target).unwrap();
        assert_eq!(written, payload);
    }

    #[test]
    fn extract_requires_exact_entry_name() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("plandex");

        // `plandex.exe` and nested paths must not match the Unix name.
        let archive = tar_gz(&[
            ("plandex.exe", b"wrong platform".as_slice()),
            ("bin/plandex", b"nested".as_slice()),
        ]);

        let err = extract::extract_binary(
            Cursor::new(archive),
            ArchiveFormat::TarGzip,
            "plandex",
            &target,
        )
        .unwrap_err();

        assert!(matches!(err, UpgradeError::BinaryNotInArchive { .. }));
        assert!(!target.exists(), "applier must not run without a matching entry");
    }

    #[test]
    fn extract_surfaces_missing_entry_as_error() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("plandex");

        let archive = tar_gz(&[("README.md", b"no binary here".as_slice())]);

        let err = extract::extract_binary(
            Cursor::new(archive),
            ArchiveFormat::TarGzip,
            "plandex",
            &target,
        )
        .unwrap_err();

        assert!(
            matches!(err, UpgradeError::BinaryNotInArchive { ref name } if name.as_str() == "plandex")
        );
        assert!(!target.exists());
    }

    #[test]
    fn zip_extraction_is_an_explicit_unimplemented_error() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("plandex.exe");

        let err = extract::extract_binary(
            Cursor::new(Vec::new()),
            ArchiveFormat::Zip,
            "plandex.exe",
            &target,
        )
        .unwrap_err();

        assert!(matches!(err, UpgradeError::ZipUnsupported));
    }

    #[test]
    fn apply_replaces_the_whole_image() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("plandex");
        std::fs::write(&target, b"old image").unwrap();

        apply::apply_binary(Cursor::new(b"brand new image".to_vec()), &target).unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"brand new image");
    }

    #[cfg(unix)]
    #[test]
    fn apply_preserves_existing_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let target = temp.path().join("plandex");
        std::fs::write(&target, b"old image").unwrap();
        std::fs::set_permissions(&target, std::fs::Permissions::from_mode(0o700)).unwrap();

        apply::apply_binary(Cursor::new(b"new".to_vec()), &target).unwrap();

        let mode = std::fs::metadata(&target).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o700);
    }

    #[cfg(unix)]
    #[test]
    fn apply_marks_fresh_targets_executable() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let target = temp.path().join("plandex");

        apply::apply_binary(Cursor::new(b"new".to_vec()), &target).unwrap();

        let mode = std::fs::metadata(&target).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o755);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn relaunch_mirrors_child_exit_code() {
        use std::ffi::OsString;
        use std::path::Path;

        let args: Vec<OsString> = vec!["-c".into(), "exit 7".into()];
        let code = restart::relaunch(Path::new("sh"), &args).await.unwrap();
        assert_eq!(code, 7);

        let args: Vec<OsString> = vec!["-c".into(), "exit 0".into()];
        let code = restart::relaunch(Path::new("sh"), &args).await.unwrap();
        assert_eq!(code, 0);
    }
}
