use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::{LoadError, Program};

pub const PRIORITIES_FILE_NAME: &str = "priorities.txt";

fn open(path: &Path) -> Result<BufReader<File>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::MissingResource {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(BufReader::new(file))
}

/// Reads non-blank lines, numbering them from 1 as they appear in the file.
fn read_lines(path: &Path) -> Result<Vec<(usize, String)>, LoadError> {
    let reader = open(path)?;
    let mut lines = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| LoadError::malformed(path, idx + 1, err.to_string()))?;
        let line = line.trim();

        if !line.is_empty() {
            lines.push((idx + 1, line.to_string()));
        }
    }

    Ok(lines)
}

/// One positive priority per line, in load order.
pub fn read_priorities(path: &Path) -> Result<Vec<u32>, LoadError> {
    let mut priorities = Vec::new();

    for (line_num, line) in read_lines(path)? {
        match line.parse::<u32>() {
            Ok(priority) if priority > 0 => priorities.push(priority),
            _ => {
                return Err(LoadError::malformed(
                    path,
                    line_num,
                    format!("priority is not a positive integer: {:?}", line),
                ))
            }
        }
    }

    Ok(priorities)
}

pub fn read_quantum(path: &Path) -> Result<NonZeroUsize, LoadError> {
    let contents = fs::read_to_string(path).map_err(|source| LoadError::MissingResource {
        path: path.to_path_buf(),
        source,
    })?;
    let contents = contents.trim();

    contents
        .parse::<usize>()
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or_else(|| {
            let reason = format!("quantum is not a positive integer: {:?}", contents);
            LoadError::malformed(path, 1, reason)
        })
}

/// The first line names the process; every other non-blank line is one instruction.
pub fn read_program(path: &Path, priority: u32) -> Result<Program, LoadError> {
    let mut lines = read_lines(path)?.into_iter();

    let name = match lines.next() {
        Some((1, name)) => name,
        _ => return Err(LoadError::malformed(path, 1, "missing process name")),
    };

    Ok(Program {
        name,
        priority,
        instructions: lines.map(|(_, line)| line).collect(),
    })
}

/// Program files are numbered from 01 in priority-list order.
pub fn program_path(programs_dir: &Path, index: usize) -> PathBuf {
    programs_dir.join(format!("{:02}.txt", index + 1))
}

/// Reads one program per priority. Missing program files are skipped with a
/// warning; anything malformed aborts the load.
pub fn load_programs(programs_dir: &Path, priorities: &[u32]) -> Result<Vec<Program>, LoadError> {
    let mut programs = Vec::with_capacity(priorities.len());
    let mut names = HashSet::new();

    for (index, &priority) in priorities.iter().enumerate() {
        let path = program_path(programs_dir, index);

        match read_program(&path, priority) {
            Ok(program) => {
                if !names.insert(program.name.clone()) {
                    return Err(LoadError::malformed(
                        &path,
                        1,
                        format!("duplicate process name {}", program.name),
                    ));
                }
                programs.push(program);
            }
            Err(err) if err.is_missing() => warn!("Skipping program {}: {}", index + 1, err),
            Err(err) => return Err(err),
        }
    }

    info!(
        "Loaded {} of {} programs from {}.",
        programs.len(),
        priorities.len(),
        programs_dir.display()
    );

    Ok(programs)
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    #[test]
    fn test_read_priorities() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(PRIORITIES_FILE_NAME);
        fs::write(&path, "3\n1\n\n 4 \n").unwrap();

        assert_eq!(read_priorities(&path).unwrap(), vec![3, 1, 4]);
    }

    #[test]
    fn test_read_priorities_rejects_zero_and_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(PRIORITIES_FILE_NAME);

        fs::write(&path, "3\n0\n").unwrap();
        match read_priorities(&path) {
            Err(LoadError::MalformedInput { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed input, got {:?}", other),
        }

        fs::write(&path, "high\n").unwrap();
        assert!(matches!(read_priorities(&path), Err(LoadError::MalformedInput { line: 1, .. })));
    }

    #[test]
    fn test_read_priorities_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_priorities(&dir.path().join("nope.txt")).unwrap_err();
        assert!(err.is_missing());
    }

    #[test]
    fn test_read_quantum() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quantum.txt");

        fs::write(&path, "3\n").unwrap();
        assert_eq!(read_quantum(&path).unwrap().get(), 3);

        fs::write(&path, "0").unwrap();
        assert!(matches!(read_quantum(&path), Err(LoadError::MalformedInput { .. })));
    }

    #[test]
    fn test_read_program() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("01.txt");
        fs::write(&path, "TESTE-1\nX=5\r\nCOM\n\nE/S\nSAIDA\n").unwrap();

        let program = read_program(&path, 2).unwrap();

        assert_eq!(program.name, "TESTE-1");
        assert_eq!(program.priority, 2);
        assert_eq!(program.instructions, vec!["X=5", "COM", "E/S", "SAIDA"]);
    }

    #[test]
    fn test_read_program_without_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("01.txt");

        fs::write(&path, "").unwrap();
        assert!(matches!(read_program(&path, 1), Err(LoadError::MalformedInput { .. })));

        fs::write(&path, "\nCOM\n").unwrap();
        assert!(matches!(read_program(&path, 1), Err(LoadError::MalformedInput { .. })));
    }

    #[test]
    fn test_load_programs_skips_missing_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("01.txt"), "A\nCOM\n").unwrap();
        fs::write(dir.path().join("03.txt"), "C\nSAIDA\n").unwrap();

        let programs = load_programs(dir.path(), &[4, 2, 1]).unwrap();

        let names: Vec<&str> = programs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert_eq!(programs[1].priority, 1);
    }

    #[test]
    fn test_load_programs_rejects_duplicate_names() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("01.txt"), "A\nCOM\n").unwrap();
        fs::write(dir.path().join("02.txt"), "A\nCOM\n").unwrap();

        let err = load_programs(dir.path(), &[1, 1]).unwrap_err();
        assert!(err.to_string().contains("duplicate process name A"));
    }

    #[test]
    fn test_program_path_is_two_digits() {
        assert_eq!(program_path(Path::new("programs"), 0), Path::new("programs/01.txt"));
        assert_eq!(program_path(Path::new("programs"), 9), Path::new("programs/10.txt"));
    }
}
