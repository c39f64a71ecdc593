//! Build orchestration logic
//!
//! Configures, compiles and packages the icommands in a fresh temporary
//! directory. Steps run in order; the first failure aborts the build.

use std::path::{Path, PathBuf};

use crate::config::defaults::{BUILD_DIR_PREFIX, CMAKE_LOG, MAKE_LOG};
use crate::config::BuildType;
use crate::error::BuildError;
use crate::infra::process::{CommandRunner, Invocation};

/// Runs cmake, make and packaging for one build
pub struct BuildRunner<'a> {
    runner: &'a dyn CommandRunner,
    source_dir: PathBuf,
    toolchain_bin_dir: Option<PathBuf>,
    temp_root: Option<PathBuf>,
    jobs: usize,
}

impl<'a> BuildRunner<'a> {
    /// Create a build runner for the sources in `source_dir`
    pub fn new(runner: &'a dyn CommandRunner, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            source_dir: source_dir.into(),
            toolchain_bin_dir: None,
            temp_root: None,
            jobs: num_cpus::get(),
        }
    }

    /// Search `dir` first in every build step
    #[must_use]
    pub fn with_toolchain(mut self, dir: impl Into<PathBuf>) -> Self {
        self.toolchain_bin_dir = Some(dir.into());
        self
    }

    /// Create build directories under `dir` instead of the system temp dir
    #[must_use]
    pub fn with_temp_root(mut self, dir: Option<&Path>) -> Self {
        self.temp_root = dir.map(Path::to_path_buf);
        self
    }

    /// Set the number of parallel compile jobs
    #[must_use]
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Number of parallel compile jobs
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Configure, compile and package; returns the build directory
    ///
    /// The directory is kept after the run so logs and packages can be
    /// inspected or collected.
    pub fn build(&self, build_type: BuildType) -> Result<PathBuf, BuildError> {
        let build_dir = self.create_build_dir()?;
        tracing::info!("Using iRODS build directory: {}", build_dir.display());

        self.run_step("configure", self.configure_invocation(&build_dir, build_type))?;
        self.run_step("compile", self.compile_invocation(&build_dir))?;
        self.run_step("package", self.package_invocation(&build_dir))?;

        tracing::info!("Build finished in {}", build_dir.display());
        Ok(build_dir)
    }

    /// `cmake <source> -DCMAKE_BUILD_TYPE=<type> > cmake.output`
    pub fn configure_invocation(&self, build_dir: &Path, build_type: BuildType) -> Invocation {
        self.step(build_dir, "cmake")
            .arg(self.source_dir.display().to_string())
            .arg(format!("-DCMAKE_BUILD_TYPE={build_type}"))
            .stdout_to(build_dir.join(CMAKE_LOG))
    }

    /// `make -j<jobs> > make.output`
    pub fn compile_invocation(&self, build_dir: &Path) -> Invocation {
        self.step(build_dir, "make")
            .arg(format!("-j{}", self.jobs))
            .stdout_to(build_dir.join(MAKE_LOG))
    }

    /// `fakeroot make package >> make.output`
    pub fn package_invocation(&self, build_dir: &Path) -> Invocation {
        self.step(build_dir, "fakeroot")
            .args(["make", "package"])
            .stdout_append(build_dir.join(MAKE_LOG))
    }

    fn step(&self, build_dir: &Path, program: &str) -> Invocation {
        let invocation = Invocation::new(program).current_dir(build_dir);
        match &self.toolchain_bin_dir {
            Some(dir) => invocation.path_prefix(dir),
            None => invocation,
        }
    }

    fn run_step(&self, step: &'static str, invocation: Invocation) -> Result<(), BuildError> {
        tracing::info!("Running {step} step");
        self.runner
            .run(&invocation)
            .map_err(|source| BuildError::StepFailed { step, source })?;
        Ok(())
    }

    fn create_build_dir(&self) -> Result<PathBuf, BuildError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(BUILD_DIR_PREFIX);
        let dir = match &self.temp_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|e| BuildError::BuildDirectory {
            error: e.to_string(),
        })?;
        Ok(dir.keep())
    }
}
