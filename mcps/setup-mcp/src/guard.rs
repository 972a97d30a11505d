//! Command guard - input validation for command execution
//!
//! Rejects empty commands, known-destructive shell idioms and out-of-range
//! timeouts before anything is spawned.
//!
//! The denylist matches the literal command text. It stops the obvious
//! foot-guns and nothing more: `sudo`, quoting tricks, variables or `eval`
//! all get around it. It is not a sandbox.

use regex::{Regex, RegexBuilder};

use crate::types::{Config, ExecError, TimeoutConfig};

/// Patterns for commands that are never executed (matched case-insensitively)
const DENY_PATTERNS: &[&str] = &[
    // rm -rf /, rm -fr /*, rm -Rf --no-preserve-root /
    r"\brm\s+(-[a-z-]*\s+)*-[a-z]*(r[a-z]*f|f[a-z]*r)[a-z]*\s+(-[a-z-]*\s+)*/\*?(\s|;|&|\||$)",
    // rm -r -f /, rm --recursive --force /
    r"\brm\s+(-[a-z-]*\s+)*(-[a-z]*r[a-z]*|--recursive)\s+(-[a-z-]*\s+)*(-[a-z]*f[a-z]*|--force)\s+(-[a-z-]*\s+)*/\*?(\s|;|&|\||$)",
    // rm -f -r /, rm --force --recursive /
    r"\brm\s+(-[a-z-]*\s+)*(-[a-z]*f[a-z]*|--force)\s+(-[a-z-]*\s+)*(-[a-z]*r[a-z]*|--recursive)\s+(-[a-z-]*\s+)*/\*?(\s|;|&|\||$)",
    // :(){ :|:& };: and named variants
    r"(\w+|:)\s*\(\)\s*\{\s*(\w+|:)\s*\|\s*(\w+|:)\s*&\s*\}",
    // > /dev/sda
    r">\s*/dev/(sd[a-z]|hd[a-z]|vd[a-z]|xvd[a-z]|nvme\d|mmcblk\d|disk\d)",
    // dd ... of=/dev/...
    r"\bdd\b.*\bof=/dev/",
    // mkfs, mkfs.ext4, mkfs.vfat
    r"\bmkfs(\.\w+)?\b",
    // fdisk /dev/sda, parted /dev/nvme0n1
    r"\b(fdisk|sfdisk|cfdisk|gdisk|sgdisk|parted)\b.*\s/dev/",
];

/// Validates command requests against the denylist and timeout bounds
#[derive(Clone)]
pub struct CommandGuard {
    deny_patterns: Vec<Regex>,
    max_timeout_secs: u64,
    shell: String,
}

impl CommandGuard {
    /// Create a new CommandGuard from config
    ///
    /// Fails unless `1 <= timeouts.default_secs <= timeouts.max_secs`.
    pub fn new(config: &Config) -> Result<Self, ExecError> {
        let TimeoutConfig {
            default_secs,
            max_secs,
        } = config.timeouts;
        if default_secs == 0 || default_secs > max_secs {
            return Err(ExecError::ConfigError(format!(
                "timeouts.default_secs must be between 1 and timeouts.max_secs ({}), got {}",
                max_secs, default_secs
            )));
        }

        let deny_patterns = DENY_PATTERNS
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        ExecError::ConfigError(format!("Invalid deny pattern '{}': {}", p, e))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            deny_patterns,
            max_timeout_secs: config.timeouts.max_secs,
            shell: config.commands.shell.clone(),
        })
    }

    /// Validate a request, in order: empty command, denylist, timeout range
    ///
    /// Returns the requested timeout unchanged; `None` stays `None` so the
    /// caller decides the default.
    pub fn validate(&self, command: &str, timeout: Option<i64>) -> Result<Option<u64>, ExecError> {
        if command.trim().is_empty() {
            return Err(ExecError::EmptyCommand);
        }

        self.check_command(command)?;

        match timeout {
            None => Ok(None),
            Some(secs) => self.check_timeout(secs).map(Some),
        }
    }

    /// Check a command against the denylist
    pub fn check_command(&self, command: &str) -> Result<(), ExecError> {
        match self.deny_patterns.iter().find(|p| p.is_match(command)) {
            Some(pattern) => Err(ExecError::CommandDenied {
                pattern: pattern.as_str().to_string(),
            }),
            None => Ok(()),
        }
    }

    fn check_timeout(&self, secs: i64) -> Result<u64, ExecError> {
        match u64::try_from(secs) {
            Ok(value) if value > 0 && value <= self.max_timeout_secs => Ok(value),
            _ => Err(ExecError::InvalidTimeout {
                value: secs,
                max: self.max_timeout_secs,
            }),
        }
    }

    /// Get the configured shell path
    pub fn shell(&self) -> &str {
        &self.shell
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> CommandGuard {
        CommandGuard::new(&Config::default()).unwrap()
    }

    #[test]
    fn test_deny_patterns_block_dangerous() {
        let guard = guard();

        for command in [
            "rm -rf /",
            "rm -fr /",
            "rm -Rf /*",
            "RM -RF /",
            "rm -rf --no-preserve-root /",
            "rm -r -f /",
            "rm -f -R /*",
            "rm --recursive --force /",
            "rm --force --recursive /",
            "rm -v -r --force /",
            "echo bye; rm -rf / ; echo",
            ":(){ :|:& };:",
            "bomb(){ bomb|bomb& };bomb",
            "cat /dev/urandom > /dev/sda",
            "echo x >/dev/nvme0n1",
            "dd if=/dev/zero of=/dev/sda",
            "sudo dd if=image.iso of=/dev/sdb bs=4M",
            "mkfs.ext4 /dev/sda1",
            "MKFS -t ext4 /dev/sdb",
            "fdisk /dev/sda",
            "parted /dev/nvme0n1 mklabel gpt",
        ] {
            assert!(
                matches!(
                    guard.check_command(command),
                    Err(ExecError::CommandDenied { .. })
                ),
                "expected {:?} to be blocked",
                command
            );
        }
    }

    #[test]
    fn test_safe_commands_allowed() {
        let guard = guard();

        for command in [
            "ls -la",
            "echo hello",
            "rm -rf /tmp/build",
            "rm -rf ./target",
            "rm -r -f /tmp/cache",
            "rm --recursive --force build/",
            "rm -r /",
            "echo done > /dev/null",
            "dd if=/dev/zero of=./disk.img bs=1M count=1",
            "fdisk --help",
            "git status",
            "cargo build",
        ] {
            assert!(
                guard.check_command(command).is_ok(),
                "expected {:?} to be allowed",
                command
            );
        }
    }

    #[test]
    fn test_validate_empty_command() {
        let guard = guard();
        assert!(matches!(
            guard.validate("", None),
            Err(ExecError::EmptyCommand)
        ));
        assert!(matches!(
            guard.validate("  \t\n ", Some(10)),
            Err(ExecError::EmptyCommand)
        ));
    }

    #[test]
    fn test_validate_timeout_range() {
        let guard = guard();

        assert_eq!(guard.validate("echo hi", None).unwrap(), None);
        assert_eq!(guard.validate("echo hi", Some(1)).unwrap(), Some(1));
        assert_eq!(guard.validate("echo hi", Some(300)).unwrap(), Some(300));

        for bad in [0, -5, 301, i64::MIN] {
            assert!(
                matches!(
                    guard.validate("echo hi", Some(bad)),
                    Err(ExecError::InvalidTimeout { max: 300, .. })
                ),
                "expected timeout {} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_validation_order() {
        let guard = guard();

        // Denylist is checked before the timeout
        assert!(matches!(
            guard.validate("rm -rf /", Some(0)),
            Err(ExecError::CommandDenied { .. })
        ));
        // Empty is checked before everything
        assert!(matches!(
            guard.validate(" ", Some(999)),
            Err(ExecError::EmptyCommand)
        ));
    }

    #[test]
    fn test_invalid_timeout_config_rejected() {
        for (default_secs, max_secs) in [(0, 300), (400, 300), (0, 0), (10, 5)] {
            let mut config = Config::default();
            config.timeouts = TimeoutConfig {
                default_secs,
                max_secs,
            };
            assert!(
                matches!(CommandGuard::new(&config), Err(ExecError::ConfigError(_))),
                "expected default={} max={} to be rejected",
                default_secs,
                max_secs
            );
        }

        let mut config = Config::default();
        config.timeouts = TimeoutConfig {
            default_secs: 60,
            max_secs: 60,
        };
        assert!(CommandGuard::new(&config).is_ok());
    }

    #[test]
    fn test_configured_max_timeout() {
        let mut config = Config::default();
        config.timeouts.max_secs = 60;
        let guard = CommandGuard::new(&config).unwrap();

        assert!(guard.validate("echo hi", Some(60)).is_ok());
        let err = guard.validate("echo hi", Some(61)).unwrap_err();
        assert_eq!(err.to_string(), "Timeout must be between 1 and 60 seconds.");
    }
}
