use std::{env, io::Write};

use eyre::{eyre, Result};

/// build a standardized output directory for the given `--output` value:
/// - if `output` is the default value (`output`), return `{cwd}/output`
/// - otherwise `output` is used as is
pub(crate) fn build_output_dir(output: &str) -> Result<String> {
    if output == "output" {
        let cwd = env::current_dir()?
            .into_os_string()
            .into_string()
            .map_err(|_| eyre!("Unable to get current working directory"))?;

        return Ok(format!("{}/output", cwd));
    }

    Ok(output.trim_end_matches('/').to_string())
}

/// build a standardized output path for `filename` inside the directory chosen by
/// [`build_output_dir`].
pub(crate) fn build_output_path(output: &str, filename: &str) -> Result<String> {
    Ok(format!("{}/{}", build_output_dir(output)?, filename))
}

/// pass the input to the `less` command
pub(crate) async fn print_with_less(input: &str) -> Result<()> {
    let mut child =
        std::process::Command::new("less").stdin(std::process::Stdio::piped()).spawn()?;

    let stdin = child.stdin.as_mut().ok_or_else(|| eyre!("unable to get stdin for less"))?;
    stdin.write_all(input.as_bytes())?;

    child.wait()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_default() {
        let path =
            build_output_path("output", "analysis.txt").expect("failed to build output path");
        assert!(path.ends_with("/output/analysis.txt"));
    }

    #[test]
    fn test_output_specified() {
        let path =
            build_output_path("/some_dir/", "analysis.txt").expect("failed to build output path");
        assert_eq!(path, "/some_dir/analysis.txt");

        let dir = build_output_dir("/some_dir").expect("failed to build output dir");
        assert_eq!(dir, "/some_dir");
    }
}
