//! Test utilities
//!
//! A [`RecordingRunner`] standing in for the system process runner, and
//! proptest generators.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::CommandError;
use crate::infra::process::{CommandOutput, CommandRunner, Invocation};

/// Records every invocation instead of running it
///
/// Every program exits with status zero unless registered with
/// [`RecordingRunner::fail_on`].
#[derive(Debug, Default)]
pub struct RecordingRunner {
    invocations: RefCell<Vec<Invocation>>,
    failures: HashMap<String, i32>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every invocation of `program` exit with `code`
    #[must_use]
    pub fn fail_on(mut self, program: &str, code: i32) -> Self {
        self.failures.insert(program.to_string(), code);
        self
    }

    /// Invocations seen so far, in order
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    /// Rendered command lines seen so far, in order
    pub fn command_lines(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Whether any recorded command line contains `needle`
    pub fn ran(&self, needle: &str) -> bool {
        self.command_lines().iter().any(|line| line.contains(needle))
    }
}

impl CommandRunner for RecordingRunner {
    fn execute(&self, invocation: &Invocation) -> Result<CommandOutput, CommandError> {
        self.invocations.borrow_mut().push(invocation.clone());
        let code = self
            .failures
            .get(invocation.program())
            .copied()
            .unwrap_or(0);
        Ok(CommandOutput {
            code: Some(code),
            stdout: String::new(),
            stderr: if code == 0 {
                String::new()
            } else {
                format!("{} failed", invocation.program())
            },
        })
    }
}

pub mod generators {
    use proptest::prelude::*;

    /// Generate a package file stem (lowercase alphanumeric with hyphens and dots)
    pub fn package_stem() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9.-]{0,30}"
    }

    /// Generate a file extension that is neither deb nor rpm
    pub fn other_extension() -> impl Strategy<Value = String> {
        "[a-z]{1,4}".prop_filter("Must not be a package suffix", |s| s != "deb" && s != "rpm")
    }

    /// Generate a distribution major version
    pub fn major_version() -> impl Strategy<Value = String> {
        (1u32..40).prop_map(|major| major.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_recording_runner_records_in_order() {
        let runner = RecordingRunner::new();
        runner.run(&Invocation::new("cmake").arg("/src")).unwrap();
        runner.run(&Invocation::new("make").arg("-j2")).unwrap();
        assert_eq!(runner.command_lines(), vec!["cmake /src", "make -j2"]);
        assert!(runner.ran("-j2"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_other_extension_generator(ext in other_extension()) {
            prop_assert!(ext != "deb" && ext != "rpm");
        }

        #[test]
        fn test_major_version_generator(major in major_version()) {
            prop_assert!(major.parse::<u32>().is_ok());
        }
    }
}
