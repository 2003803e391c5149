//! Every source file has a unit-test counterpart and every test file has tests

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::Path;

    // Entry points and module organisation files carry no behaviour of their own
    fn is_exempt(relative: &str) -> bool {
        let name = relative.rsplit('/').next().unwrap_or(relative);
        name == "main.rs" || name == "lib.rs" || name == "mod.rs"
    }

    fn rust_files(dir: &Path, base: &Path, out: &mut BTreeSet<String>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let relative = path
                .strip_prefix(base)
                .map_err(|_| io::Error::other("Failed to strip prefix"))?
                .to_string_lossy()
                .replace('\\', "/");

            if path.is_dir() {
                out.insert(relative);
                rust_files(&path, base, out)?;
            } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
                out.insert(relative);
            }
        }
        Ok(())
    }

    fn collect(dir: &str) -> BTreeSet<String> {
        let root = Path::new(dir);
        let mut paths = BTreeSet::new();
        if let Err(error) = rust_files(root, root, &mut paths) {
            assert!(!root.exists(), "Failed to read {dir}: {error}");
        }
        paths
    }

    #[test]
    fn test_every_source_file_has_unit_tests() {
        let src = collect("src");
        let unit = collect("tests/unit");

        let missing: Vec<_> = src
            .iter()
            .filter(|path| !is_exempt(path) && !unit.contains(*path))
            .map(|path| format!("  - src/{path} -> tests/unit/{path}"))
            .collect();

        assert!(
            missing.is_empty(),
            "Source files without unit tests:\n{}",
            missing.join("\n")
        );
    }

    #[test]
    fn test_every_unit_test_file_has_a_source() {
        let src = collect("src");
        let unit = collect("tests/unit");

        let orphaned: Vec<_> = unit
            .iter()
            .filter(|path| !is_exempt(path) && !src.contains(*path))
            .map(|path| format!("  - tests/unit/{path}"))
            .collect();

        assert!(
            orphaned.is_empty(),
            "Unit test files with no matching source:\n{}",
            orphaned.join("\n")
        );
    }

    #[test]
    fn test_every_test_file_contains_tests() {
        let mut without_tests = Vec::new();

        for relative in collect("tests").iter().filter(|path| path.ends_with(".rs")) {
            if is_exempt(relative) {
                continue;
            }
            let path = Path::new("tests").join(relative);
            let content = fs::read_to_string(&path).unwrap_or_default();
            if !content.contains("#[test]") {
                without_tests.push(format!("  - {}", path.display()));
            }
        }

        assert!(
            without_tests.is_empty(),
            "Test files without any #[test] functions:\n{}",
            without_tests.join("\n")
        );
    }
}
