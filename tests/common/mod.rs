#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub use venvman_test_utils::{init_tracing, with_timeout};

/// Stand-in for `python`: handles `-m venv <path>` by creating the marker
/// file and a fake `pip` that answers `install`, `list` and `freeze`.
pub const FAKE_PYTHON: &str = r#"#!/bin/sh
set -e
if [ "$1" != "-m" ] || [ "$2" != "venv" ]; then
  echo "unsupported: $*" >&2
  exit 2
fi
env_dir="$3"
mkdir -p "$env_dir/bin"
echo "home = /usr/bin" > "$env_dir/pyvenv.cfg"
cat > "$env_dir/bin/pip" <<'PIP'
#!/bin/sh
case "$1" in
  install) echo "Collecting $2"; echo "Successfully installed $2" ;;
  list) echo "Package  Version"; echo "requests 2.32.3" ;;
  freeze) echo "requests==2.32.3"; echo "six==1.16.0" ;;
  *) echo "unknown command $1" >&2; exit 2 ;;
esac
PIP
chmod +x "$env_dir/bin/pip"
echo "created virtual environment in $env_dir"
"#;

/// Write an executable script and return its path.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, body).expect("write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("chmod script");
    path
}
