//! Shell detection and activation script rendering for dev shells.

use std::env;
use std::path::PathBuf;

use crate::output::ShellSpec;

/// Supported shell types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
  Bash,
  Zsh,
  Fish,
  PowerShell,
  Sh,
}

impl Shell {
  /// Detect the current shell from environment
  ///
  /// Checks `$SHELL`, falls back to the platform default.
  pub fn detect() -> Self {
    if let Ok(shell) = env::var("SHELL") {
      let shell_name = PathBuf::from(&shell)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_lowercase();

      return Self::parse(&shell_name).unwrap_or_else(|| {
        if shell_name.contains("zsh") {
          Shell::Zsh
        } else if shell_name.contains("bash") {
          Shell::Bash
        } else if shell_name.contains("fish") {
          Shell::Fish
        } else {
          Shell::Sh
        }
      });
    }

    #[cfg(target_os = "windows")]
    return Shell::PowerShell;

    #[cfg(not(target_os = "windows"))]
    Shell::Sh
  }

  /// Parse a shell name as accepted on the command line
  pub fn parse(name: &str) -> Option<Self> {
    match name.to_lowercase().as_str() {
      "bash" => Some(Shell::Bash),
      "zsh" => Some(Shell::Zsh),
      "fish" => Some(Shell::Fish),
      "sh" => Some(Shell::Sh),
      "powershell" | "pwsh" => Some(Shell::PowerShell),
      _ => None,
    }
  }

  /// Get the shell name as a string
  pub fn as_str(&self) -> &'static str {
    match self {
      Shell::Bash => "bash",
      Shell::Zsh => "zsh",
      Shell::Fish => "fish",
      Shell::PowerShell => "powershell",
      Shell::Sh => "sh",
    }
  }

  /// Separator between entries of a PATH-like variable
  pub fn path_separator(&self) -> &'static str {
    match self {
      Shell::PowerShell => ";",
      Shell::Bash | Shell::Zsh | Shell::Fish | Shell::Sh => ":",
    }
  }

  /// Quote a value so the shell takes it literally.
  pub fn quote(&self, value: &str) -> String {
    match self {
      Shell::Fish => format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'")),
      Shell::PowerShell => format!("'{}'", value.replace('\'', "''")),
      Shell::Bash | Shell::Zsh | Shell::Sh => format!("'{}'", value.replace('\'', "'\\''")),
    }
  }

  /// Generate an export statement for setting an environment variable
  pub fn export_var(&self, name: &str, value: &str) -> String {
    let value = self.quote(value);
    match self {
      Shell::Fish => format!("set -gx {} {}", name, value),
      Shell::PowerShell => format!("$env:{} = {}", name, value),
      Shell::Bash | Shell::Zsh | Shell::Sh => format!("export {}={}", name, value),
    }
  }

  /// Generate a prepend statement for a PATH-like variable
  pub fn prepend_path(&self, name: &str, value: &str) -> String {
    let value = self.quote(value);
    match self {
      Shell::Fish => format!("set -gx {} {} ${}", name, value, name),
      Shell::PowerShell => format!(
        "$env:{} = {} + [IO.Path]::PathSeparator + $env:{}",
        name, value, name
      ),
      Shell::Bash | Shell::Zsh | Shell::Sh => {
        format!("export {}={}:\"${}\"", name, value, name)
      }
    }
  }

  /// Generate the script header/shebang
  pub fn header(&self) -> &'static str {
    match self {
      Shell::Bash => "#!/usr/bin/env bash",
      Shell::Zsh => "#!/usr/bin/env zsh",
      Shell::Fish => "# Fish shell environment",
      Shell::PowerShell => "# PowerShell environment",
      Shell::Sh => "#!/bin/sh",
    }
  }

  /// Render an activation script for a dev shell.
  ///
  /// Plain variables are exported first, then every search path is
  /// prepended with its entries in composition order.
  pub fn render(&self, spec: &ShellSpec) -> String {
    let mut lines = vec![self.header().to_string()];

    for (name, value) in &spec.env {
      lines.push(self.export_var(name, value));
    }

    for (name, entries) in &spec.search_paths {
      if entries.is_empty() {
        continue;
      }
      lines.push(self.prepend_path(name, &entries.join(self.path_separator())));
    }

    let mut script = lines.join("\n");
    script.push('\n');
    script
  }
}

impl std::fmt::Display for Shell {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  fn spec() -> ShellSpec {
    let mut spec = ShellSpec::default();
    spec.env.insert("RUST_BACKTRACE".to_string(), "1".to_string());
    spec.push_path("PATH", "/store/x86_64-linux/glib/bin");
    spec.push_path("PATH", "/store/x86_64-linux/cargo/bin");
    spec
  }

  #[test]
  fn test_shell_parse() {
    assert_eq!(Shell::parse("BASH"), Some(Shell::Bash));
    assert_eq!(Shell::parse("pwsh"), Some(Shell::PowerShell));
    assert_eq!(Shell::parse("tcsh"), None);
  }

  #[test]
  fn test_bash_export() {
    let export = Shell::Bash.export_var("EDITOR", "nvim");
    assert_eq!(export, "export EDITOR='nvim'");
  }

  #[test]
  fn test_fish_export() {
    let export = Shell::Fish.export_var("EDITOR", "nvim");
    assert_eq!(export, "set -gx EDITOR 'nvim'");
  }

  #[test]
  fn test_powershell_prepend_path() {
    let prepend = Shell::PowerShell.prepend_path("PATH", "C:\\tools");
    assert_eq!(prepend, r#"$env:PATH = 'C:\tools' + [IO.Path]::PathSeparator + $env:PATH"#);
  }

  #[test]
  fn render_bash_script() {
    let script = Shell::Bash.render(&spec());
    assert_eq!(
      script,
      "#!/usr/bin/env bash\n\
       export RUST_BACKTRACE='1'\n\
       export PATH='/store/x86_64-linux/glib/bin:/store/x86_64-linux/cargo/bin':\"$PATH\"\n"
    );
  }

  #[test]
  fn render_fish_script() {
    let script = Shell::Fish.render(&spec());
    assert!(script.starts_with("# Fish shell environment\n"));
    assert!(script.contains("set -gx PATH '/store/x86_64-linux/glib/bin:/store/x86_64-linux/cargo/bin' $PATH"));
  }

  #[test]
  fn values_are_not_expanded() {
    assert_eq!(Shell::Bash.export_var("PS1", "$(id) `x`"), "export PS1='$(id) `x`'");
    assert_eq!(Shell::Sh.quote("it's"), r#"'it'\''s'"#);
    assert_eq!(Shell::Fish.quote(r"a\b'c"), r"'a\\b\'c'");
    assert_eq!(Shell::PowerShell.quote("$HOME it's"), "'$HOME it''s'");
  }

  #[test]
  fn render_skips_empty_search_paths() {
    let mut spec = ShellSpec::default();
    spec.search_paths.insert("PKG_CONFIG_PATH".to_string(), Vec::new());
    assert_eq!(Shell::Sh.render(&spec), "#!/bin/sh\n");
  }

  #[test]
  #[serial]
  fn detect_reads_shell_variable() {
    temp_env::with_var("SHELL", Some("/usr/bin/zsh"), || {
      assert_eq!(Shell::detect(), Shell::Zsh);
    });
    temp_env::with_var("SHELL", Some("/opt/bin/bash5"), || {
      assert_eq!(Shell::detect(), Shell::Bash);
    });
  }
}
