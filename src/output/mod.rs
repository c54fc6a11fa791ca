pub mod printer;

use crate::codegen::ast::Module;
use crate::errors::Result;
use std::io::Write;
use std::path::Path;

/// Print `module` to `output_file` (relative to `working_dir`), or to stdout
/// when there is no output file.
pub fn emit(module: &Module, output_file: Option<&Path>, working_dir: &Path) -> Result<()> {
    match output_file {
        Some(path) => {
            let path = working_dir.join(path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut file = std::fs::File::create(&path)?;
            printer::write_module(&mut file, module)?;
            tracing::info!(path = %path.display(), "wrote generated module");
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            printer::write_module(&mut handle, module)?;
            handle.flush()?;
        }
    }
    Ok(())
}
