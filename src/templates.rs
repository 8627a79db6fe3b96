// src/templates.rs

//! Text files generated for a new project, and the per-environment
//! activation script used to open a terminal.

use std::path::Path;

use crate::platform::Platform;

/// Entries written to every project's `.gitignore`.
const GITIGNORE_ENTRIES: &[&str] = &[
    "venvs/",
    "__pycache__/",
    "*.pyc",
    "*.pyo",
    "*.pyd",
    ".env",
    ".venv",
    "dist/",
    "build/",
    "*.egg-info/",
    ".pytest_cache/",
    ".coverage",
    "htmlcov/",
    ".tox/",
    ".cache",
    "nosetests.xml",
    "coverage.xml",
    "*.cover",
    ".hypothesis/",
    ".DS_Store",
    ".vscode/",
    ".idea/",
];

pub fn gitignore(extra: &[String]) -> String {
    let mut out = String::new();
    for line in GITIGNORE_ENTRIES
        .iter()
        .copied()
        .chain(extra.iter().map(String::as_str))
    {
        out.push_str(line);
        out.push('\n');
    }
    out
}

pub fn readme(project: &str) -> String {
    format!(
        r#"# {project}

Python project created with venvman.

## Layout

```
{project}/
├── src/          # Source code
├── venvs/        # Virtual environments
├── README.md     # This file
└── .gitignore    # Files ignored by git
```

## Usage

1. Activate the virtual environment you need
2. Install dependencies with pip
3. Develop your application in `src/`

## Managing dependencies

- Install packages: `venvman install {project} <env> <package>` or `pip install <package>`
- Save dependencies: `pip freeze > requirements.txt`
- Install from requirements: `pip install -r requirements.txt`
"#
    )
}

/// File name and contents of the script that opens a shell in `project_dir`
/// with the environment at `env_dir` activated.
pub fn activation_script(
    platform: Platform,
    project: &str,
    env: &str,
    project_dir: &Path,
    env_dir: &Path,
) -> (&'static str, String) {
    if platform.is_windows() {
        let body = format!(
            "@echo off\r\n\
             cd /d \"{}\"\r\n\
             call \"{}\\Scripts\\activate.bat\"\r\n\
             echo Environment {env} activated in {project}\r\n\
             echo Use \"deactivate\" to leave the environment\r\n",
            project_dir.display(),
            env_dir.display(),
        );
        ("activate_terminal.bat", body)
    } else {
        let body = format!(
            "#!/bin/bash\n\
             cd \"{}\"\n\
             source \"{}/bin/activate\"\n\
             echo \"Environment {env} activated in {project}\"\n\
             echo \"Use 'deactivate' to leave the environment\"\n\
             bash\n",
            project_dir.display(),
            env_dir.display(),
        );
        ("activate_terminal.sh", body)
    }
}
