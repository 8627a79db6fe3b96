// tests/name_policy.rs

use std::path::{Path, PathBuf};

use proptest::prelude::*;
use venvman::platform::Platform;
use venvman::policy::{
    environment_exists, environment_path, installer_path, interpreter_path, validate_name,
};

fn forbidden_char() -> impl Strategy<Value = char> {
    prop::sample::select(vec![
        ' ', '.', '/', '\\', '@', '#', '!', '?', '$', '%', '*', '+', '=', ':', ';', ',', '\'',
        '"', '~', '\t', '(', ')', '[', ']',
    ])
}

proptest! {
    #[test]
    fn names_from_allowed_set_are_valid(name in "[A-Za-z0-9_-]{1,32}") {
        prop_assert!(validate_name(&name));
    }

    #[test]
    fn any_forbidden_char_invalidates(
        prefix in "[A-Za-z0-9_-]{0,12}",
        bad in forbidden_char(),
        suffix in "[A-Za-z0-9_-]{0,12}",
    ) {
        let name = format!("{prefix}{bad}{suffix}");
        prop_assert!(!validate_name(&name));
    }

    #[test]
    fn environment_path_is_root_project_venvs_env(
        project in "[a-z0-9_-]{1,16}",
        env in "[a-z0-9_-]{1,16}",
    ) {
        let root = Path::new("/srv/projects");
        let expected: PathBuf = [root, Path::new(&project), Path::new("venvs"), Path::new(&env)]
            .iter()
            .collect();
        prop_assert_eq!(environment_path(root, &project, &env), expected);
    }
}

#[test]
fn environment_path_matches_exact_layout() {
    assert_eq!(
        environment_path(Path::new("root"), "p", "e"),
        PathBuf::from("root").join("p").join("venvs").join("e")
    );
}

#[test]
fn executable_paths_do_not_touch_the_filesystem() {
    let env = Path::new("/does/not/exist");
    assert_eq!(interpreter_path(env, Platform::Unix), env.join("bin").join("python"));
    assert_eq!(installer_path(env, Platform::Windows), env.join("Scripts").join("pip.exe"));
}

#[test]
fn environment_exists_requires_marker_file() {
    let dir = tempfile::tempdir().unwrap();
    let env = dir.path().join("demo").join("venvs").join("dev");
    std::fs::create_dir_all(&env).unwrap();

    assert!(!environment_exists(&env), "directory without pyvenv.cfg");

    std::fs::write(env.join("pyvenv.cfg"), "home = /usr/bin\n").unwrap();
    assert!(environment_exists(&env));

    assert!(!environment_exists(&dir.path().join("missing")));
}
