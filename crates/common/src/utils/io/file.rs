use std::{
    env,
    fs::File,
    io::{Read, Write},
    path::Path,
};

use eyre::{eyre, Result};

/// Convert a long path to a short path, relative to the current working directory.
///
/// ```no_run
/// use evmaot_common::utils::io::file::short_path;
///
/// let path = "/some/long/path/that/is/cwd/libevmaot.so";
/// let short_path = short_path(path);
/// assert_eq!(short_path, "./libevmaot.so");
/// ```
pub fn short_path(path: &str) -> String {
    match env::current_dir() {
        Ok(dir) => match dir.to_str() {
            Some(dir) if !dir.is_empty() => path.replace(dir, "."),
            _ => path.to_owned(),
        },
        Err(_) => path.to_owned(),
    }
}

/// Write contents to a file on the disc, creating parent directories as needed.
///
/// ```no_run
/// use evmaot_common::utils::io::file::write_file;
///
/// let path = "/tmp/out/instrexe.hpp";
/// let contents = "#pragma once";
/// let result = write_file(path, contents);
/// ```
pub fn write_file(path_str: &str, contents: &str) -> Result<()> {
    let path = Path::new(path_str);

    // Create the directory if it doesn't exist
    std::fs::create_dir_all(path.parent().ok_or_else(|| eyre!("unable to create directory"))?)?;

    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())?;

    Ok(())
}

/// Write contents to a file and mark it executable (mode `0755` on unix).
pub fn write_executable(path_str: &str, contents: &str) -> Result<()> {
    write_file(path_str, contents)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path_str, std::fs::Permissions::from_mode(0o755))?;
    }

    Ok(())
}

/// Read contents from a file on the disc
///
/// ```no_run
/// use evmaot_common::utils::io::file::read_file;
///
/// let path = "/tmp/test.txt";
/// let contents = read_file(path);
/// ```
pub fn read_file(path: &str) -> Result<String> {
    let path = Path::new(path);
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Delete a file from the disc. Returns true if the file no longer exists.
///
/// ```no_run
/// use evmaot_common::utils::io::file::delete_path;
///
/// let path = "/tmp/test.txt";
/// let result = delete_path(path);
/// ```
pub fn delete_path(path: &str) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => true,
        Err(e) => e.kind() == std::io::ErrorKind::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        env::temp_dir().join("evmaot-file-tests").join(name).to_string_lossy().into_owned()
    }

    #[test]
    fn test_write_file_successful() {
        let path = temp_path("nested/dir/test.txt");
        let result = write_file(&path, "Hello, World!");
        assert!(result.is_ok());
    }

    #[test]
    fn test_write_file_failure() {
        let result = write_file("/", "Hello, World!");
        assert!(result.is_err());
    }

    #[test]
    fn test_read_file_successful() {
        let path = temp_path("read.txt");
        write_file(&path, "Hello, World!").expect("unable to write file");

        let result = read_file(&path).expect("unable to read file");
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_read_file_failure() {
        let result = read_file("/nonexistent/evmaot/test.txt");
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_write_executable_sets_mode() {
        use std::os::unix::fs::PermissionsExt;

        let path = temp_path("compile.sh");
        write_executable(&path, "#!/bin/sh\n").expect("unable to write file");

        let mode = std::fs::metadata(&path).expect("missing file").permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_delete_path() {
        let path = temp_path("delete.txt");
        write_file(&path, "Hello, World!").expect("unable to write file");

        assert!(delete_path(&path));
        assert!(read_file(&path).is_err());
        // deleting a missing file still succeeds
        assert!(delete_path(&path));
    }
}
