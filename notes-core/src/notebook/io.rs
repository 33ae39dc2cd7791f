use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Whole-file access used by [`Notebook`](super::Notebook).
pub trait NotebookIo {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()>;
}

/// [`NotebookIo`] backed by the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsNotebookIo;

impl NotebookIo for FsNotebookIo {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    /// Replaces the file by writing a sibling temp file and renaming it over
    /// the target. Missing parent directories are created.
    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut temp_name = path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = Path::new(&temp_name);

        let result = write_and_rename(temp_path, path, data);
        if result.is_err() {
            let _ = fs::remove_file(temp_path);
        }
        result
    }
}

fn write_and_rename(temp_path: &Path, path: &Path, data: &[u8]) -> io::Result<()> {
    {
        let mut file = fs::File::create(temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
    }
    fs::rename(temp_path, path)
}
