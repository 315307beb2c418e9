use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Canned generator report used by the stub binary.
pub const STUB_REPORT: &str = "\
Running 10s test @ http://localhost:8080/
  2 threads and 100 connections
  Thread Stats   Avg      Stdev     Max   +/- Stdev
    Latency     1.91ms  520.00us  31.20ms   87.41%
    Req/Sec     18.10k     1.20k   21.00k    71.50%
  Latency Distribution
     50%    1.20ms
     75%    2.40ms
     90%    4.10ms
     99%    9.80ms
  361210 requests in 10.02s, 55.31MB read
Requests/sec:  36048.54
Transfer/sec:      5.52MB
";

/// Writes an executable shell script that mimics a successful generator
/// run by printing a canned report.
///
/// # Errors
///
/// Returns an error when the script cannot be written or made executable.
#[cfg(unix)]
pub fn write_stub_generator(dir: &Path) -> Result<PathBuf, String> {
    write_script(
        dir,
        "fake-wrk",
        &format!("#!/bin/sh\ncat <<'EOF'\n{STUB_REPORT}EOF\n"),
    )
}

/// Writes an executable shell script that exits non-zero with an error on
/// stderr and no report.
///
/// # Errors
///
/// Returns an error when the script cannot be written or made executable.
#[cfg(unix)]
pub fn write_broken_generator(dir: &Path) -> Result<PathBuf, String> {
    write_script(
        dir,
        "broken-wrk",
        "#!/bin/sh\necho 'unable to connect to server' >&2\nexit 1\n",
    )
}

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, content: &str) -> Result<PathBuf, String> {
    use std::os::unix::fs::PermissionsExt as _;

    let path = dir.join(name);
    std::fs::write(&path, content).map_err(|err| format!("write script failed: {}", err))?;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .map_err(|err| format!("chmod script failed: {}", err))?;
    Ok(path)
}

/// Runs the `wrkbench` binary and captures its output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_wrkbench<I, S>(args: I, cwd: &Path) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = wrkbench_bin()?;
    Command::new(bin)
        .args(args)
        .current_dir(cwd)
        .env("RUST_LOG", "error")
        .output()
        .map_err(|err| format!("run wrkbench failed: {}", err))
}

fn wrkbench_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_wrkbench").map_or_else(
        || Err("CARGO_BIN_EXE_wrkbench missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
