use std::fs;
use std::io::{self, Read};
use std::path::Path;

use rolemeta_core::{RawCatalog, parse_catalog};

/// Read and deserialize a catalog from a file, or from stdin for `-`.
pub fn load_catalog(path: &Path) -> Result<RawCatalog, String> {
    let (name, content) = if path.as_os_str() == "-" {
        ("<stdin>".to_string(), load_stdin()?)
    } else {
        (path.display().to_string(), read_file(path)?)
    };

    let catalog = parse_catalog(&content)
        .map_err(|e| format!("invalid catalog '{}': {}", name, e))?;
    tracing::debug!(catalog = %name, types = catalog.types.len(), "loaded catalog");
    Ok(catalog)
}

pub fn read_file(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("failed to read '{}': {}", path.display(), e))
}

fn load_stdin() -> Result<String, String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| format!("failed to read stdin: {}", e))?;
    Ok(buf)
}
