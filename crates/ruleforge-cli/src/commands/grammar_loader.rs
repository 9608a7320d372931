use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use ruleforge_lib::SourceMap;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("grammar is required: use a positional argument, - for stdin, or -g/--grammar")]
    NoInput,

    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),

    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no .g4 files found in '{}'", .0.display())]
    EmptyDirectory(PathBuf),
}

/// Builds the source map for a command: inline text, stdin (`-`), a single
/// file, or every `.g4` file of a directory in name order.
pub fn load_grammar_source(
    grammar_path: Option<&Path>,
    grammar_text: Option<&str>,
) -> Result<SourceMap, LoadError> {
    if let Some(text) = grammar_text {
        return Ok(SourceMap::one_liner(text));
    }

    let Some(path) = grammar_path else {
        return Err(LoadError::NoInput);
    };
    if path.as_os_str() == "-" {
        return load_stdin();
    }
    if path.is_dir() {
        return load_directory(path);
    }
    load_file(path)
}

fn load_stdin() -> Result<SourceMap, LoadError> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(LoadError::Stdin)?;
    let mut map = SourceMap::new();
    map.add_stdin(&buf);
    Ok(map)
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_owned(),
        source,
    })
}

fn load_file(path: &Path) -> Result<SourceMap, LoadError> {
    let content = read(path)?;
    let mut map = SourceMap::new();
    map.add_file(&path.to_string_lossy(), &content);
    Ok(map)
}

fn load_directory(dir: &Path) -> Result<SourceMap, LoadError> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|source| LoadError::Read {
            path: dir.to_owned(),
            source,
        })?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "g4"))
        .collect();

    if paths.is_empty() {
        return Err(LoadError::EmptyDirectory(dir.to_owned()));
    }
    paths.sort();

    let mut map = SourceMap::new();
    for path in paths {
        let content = read(&path)?;
        map.add_file(&path.to_string_lossy(), &content);
    }
    Ok(map)
}
