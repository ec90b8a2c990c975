//! Integration tests for loading real configuration trees from disk.
//!
//! Tests cover:
//! - Full load of a file tree with nested includes
//! - Redefinition warnings across files
//! - Cycle and depth guards on real paths
//! - Layered sources over the real filesystem

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use kl_common::Error;
use kl_core::diag::CollectingSink;
use kl_core::loader::{load_file, FsSource, Loader};
use kl_core::resolve::{resolve_config_path, ConfigSources};

/// Write `content` to `name` inside `dir`, creating parent directories.
fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn loads_a_tree_with_nested_includes() {
    let dir = TempDir::new().unwrap();
    let main = write(
        &dir,
        "main.cfg",
        "use \"defaults/base.cfg\"\n\
         int WORKERS = 4\n",
    );
    write(
        &dir,
        "defaults/base.cfg",
        "use \"net.cfg\"\n\
         string APP = \"keyline\"\n",
    );
    write(&dir, "defaults/net.cfg", "int PORT = 8080\n");

    let table = load_file(&main).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.get_int("WORKERS").unwrap(), 4);
    assert_eq!(table.get_string("APP").unwrap(), "keyline");
    assert_eq!(table.get_int("PORT").unwrap(), 8080);
}

#[test]
fn include_redefinition_warns_and_included_value_wins() {
    let dir = TempDir::new().unwrap();
    let main = write(
        &dir,
        "main.cfg",
        "int LIMIT = 1\n\
         use \"site.cfg\"\n",
    );
    write(&dir, "site.cfg", "int LIMIT = 2\n");

    let mut sink = CollectingSink::default();
    let table = Loader::new(&FsSource, &mut sink).load(&main).unwrap();
    assert_eq!(table.get_int("LIMIT").unwrap(), 2);
    assert_eq!(sink.warnings.len(), 1);
    assert_eq!(sink.warnings[0].name, "LIMIT");
    assert_eq!(sink.warnings[0].line, Some(2));
}

#[test]
fn cycle_on_disk_is_reported_not_recursed() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.cfg", "use \"b.cfg\"\n");
    write(&dir, "b.cfg", "use \"a.cfg\"\n");

    match load_file(&a) {
        Err(Error::IncludeCycle { target, .. }) => {
            assert_eq!(target, dir.path().join("a.cfg"));
        }
        other => panic!("expected IncludeCycle, got {other:?}"),
    }
}

#[test]
fn deep_include_chain_hits_the_depth_cap() {
    let dir = TempDir::new().unwrap();
    // 0 includes 1, 1 includes 2, ... each file is distinct so no cycle
    // fires first.
    for i in 0..70 {
        write(
            &dir,
            &format!("f{i}.cfg"),
            &format!("use \"f{}.cfg\"\n", i + 1),
        );
    }
    write(&dir, "f70.cfg", "int END = 1\n");

    let result = load_file(dir.path().join("f0.cfg"));
    assert!(matches!(result, Err(Error::IncludeDepth { .. })));
}

#[test]
fn comment_heavy_file_parses_cleanly() {
    let dir = TempDir::new().unwrap();
    let main = write(
        &dir,
        "main.cfg",
        "# application settings\n\
         \n\
         int RETRIES = 3   # how often to retry\n\
         \t# indented comment after a tab\n\
         string MOTD = \"hello # not a comment\"\n",
    );
    let table = load_file(&main).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.get_int("RETRIES").unwrap(), 3);
    assert_eq!(table.get_string("MOTD").unwrap(), "hello # not a comment");
}

#[test]
fn expansion_works_across_included_files() {
    let dir = TempDir::new().unwrap();
    let main = write(
        &dir,
        "main.cfg",
        "use \"who.cfg\"\n\
         string GREETING = \"Hi, $NAME\"\n",
    );
    write(&dir, "who.cfg", "string NAME = \"Ann\"\n");

    let table = load_file(&main).unwrap();
    assert_eq!(table.get_string("GREETING").unwrap(), "Hi, Ann");
}

#[test]
fn syntax_error_names_the_included_file() {
    let dir = TempDir::new().unwrap();
    let main = write(&dir, "main.cfg", "use \"broken.cfg\"\n");
    let broken = write(&dir, "broken.cfg", "int N = 1\nnot a line\n");

    match load_file(&main) {
        Err(Error::UnexpectedLine { file, line }) => {
            assert_eq!(file, broken);
            assert_eq!(line, 2);
        }
        other => panic!("expected UnexpectedLine, got {other:?}"),
    }
}

mod layering {
    use super::*;
    use kl_core::diag::DiagnosticSink;

    #[test]
    fn sources_layer_base_extras_defines() {
        let dir = TempDir::new().unwrap();
        let base = write(&dir, "base.cfg", "int N = 1\nstring WHO = \"base\"\n");
        let site = write(&dir, "site.cfg", "int N = 2\n");

        let mut sources = ConfigSources::new(&base);
        sources.add_extra(&site);
        sources.add_define("N", "int", "3").unwrap();

        let mut sink = CollectingSink::default();
        let table = sources.load(&FsSource, &mut sink).unwrap();
        assert_eq!(table.get_int("N").unwrap(), 3);
        assert_eq!(table.get_string("WHO").unwrap(), "base");
        // One warning from the extra layer, one from the define layer.
        assert_eq!(sink.warnings.len(), 2);
    }

    #[test]
    fn load_default_reads_the_real_filesystem() {
        let dir = TempDir::new().unwrap();
        let base = write(&dir, "base.cfg", "bool READY = true\n");
        let table = ConfigSources::new(&base).load_default().unwrap();
        assert!(table.get_bool("READY").unwrap());
    }

    #[test]
    fn sink_is_shared_across_layers() {
        // The same sink observes warnings from the base file's own
        // duplicates and from layer merges.
        struct Counting(usize);
        impl DiagnosticSink for Counting {
            fn redefinition(&mut self, _: kl_core::diag::Redefinition) {
                self.0 += 1;
            }
        }

        let dir = TempDir::new().unwrap();
        let base = write(&dir, "base.cfg", "int A = 1\nint A = 2\n");
        let site = write(&dir, "site.cfg", "int A = 3\n");

        let mut sources = ConfigSources::new(&base);
        sources.add_extra(&site);
        let mut sink = Counting(0);
        let table = sources.load(&FsSource, &mut sink).unwrap();
        assert_eq!(table.get_int("A").unwrap(), 3);
        assert_eq!(sink.0, 2);
    }
}

mod path_resolution {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let explicit = PathBuf::from("/tmp/explicit.cfg");
        assert_eq!(resolve_config_path(Some(explicit.clone())), explicit);
    }

    #[test]
    fn fallback_is_the_local_file() {
        // With no explicit path and no environment override, resolution
        // lands on the current-directory fallback (or the user config dir
        // when one exists there).
        let resolved = resolve_config_path(None);
        assert!(resolved.ends_with(Path::new("keyline.cfg")));
    }
}
