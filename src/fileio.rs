//! Code regarding file input (reading source `.jack` files)
//! and output (writing generated `.vm` files).
//!
//! Each `.vm` file is placed next to its source with the extension
//! replaced, so a linker stage can pick up the whole directory.

pub mod input {
    use std::{
        fs,
        path::{Path, PathBuf},
    };

    use crate::common::error::{CompileError, CompileResult};

    /// A loaded source file. The compilation unit owns this buffer for the
    /// whole pipeline; tokens borrow directly from `content`.
    #[derive(Debug)]
    pub struct SourceFile {
        path: PathBuf,
        class_name: String,
        content: String,
    }

    impl SourceFile {
        /// Read a source file, enforcing the `.jack` extension.
        pub fn load(path: &Path) -> CompileResult<Self> {
            if path.extension().and_then(|extension| extension.to_str()) != Some("jack") {
                return Err(CompileError::Io {
                    path: path.to_path_buf(),
                    error: std::io::Error::other(
                        "Invalid file extension. Expected a .jack file",
                    ),
                });
            }

            let content = fs::read_to_string(path).map_err(|error| CompileError::Io {
                path: path.to_path_buf(),
                error,
            })?;

            Ok(Self::from_content(path, content))
        }

        /// Build a source file from an in-memory buffer; the class name is
        /// still derived from the path's base name.
        pub fn from_content(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
            let path = path.into();
            let class_name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or_default()
                .to_string();

            Self {
                path,
                class_name,
                content: content.into(),
            }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        pub fn display_path(&self) -> String {
            self.path.display().to_string()
        }

        /// Base name of the file; the declared class must match it.
        pub fn class_name(&self) -> &str {
            &self.class_name
        }

        pub fn content(&self) -> &str {
            &self.content
        }
    }
}

pub mod output {
    use std::{fs, io, path::Path};

    /// Write the VM translation next to its source, extension replaced.
    pub fn write_beside(source_path: &Path, content: &str) -> io::Result<()> {
        let output_path = source_path.with_extension("vm");
        fs::write(output_path, content)
    }
}
