//! Line-oriented text format for saving and restoring automata.
//!
//! # File Format
//!
//! UTF-8, one record per line, fields separated by single spaces:
//!
//! ```text
//! startstate <x> <y> <accept>
//! state <x> <y> <accept>
//! #
//! transition <from> <to> <tangent> [<rules>]
//! ```
//!
//! - The start state is always first and has index 0; every `state` record
//!   takes the next index in order.
//! - `from` and `to` are indices into that order.
//! - `rules` is every rule character concatenated with no separator
//!   (epsilon included) and is omitted for a transition without rules.
//!
//! # Atomicity
//!
//! Loading parses into a staged builder and only yields an automaton once
//! the whole input has been validated. Saving writes to `<path>.tmp` and
//! renames it over `<path>`, so readers see either the old or new file.

mod error;

pub use error::{FormatError, FormatErrorKind, PersistError};

use crate::automaton::{Automaton, AutomatonBuilder};
use crate::core::{Position, RuleSet};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const START_STATE: &str = "startstate";
const STATE: &str = "state";
const SEPARATOR: &str = "#";
const TRANSITION: &str = "transition";

/// Encode an automaton in the text format.
///
/// Transitions are written grouped by source state in state order.
pub fn encode(automaton: &Automaton) -> String {
    let mut out = String::new();

    for (index, state) in automaton.states().iter().enumerate() {
        let keyword = if index == 0 { START_STATE } else { STATE };
        let position = state.position();
        out.push_str(&format!(
            "{keyword} {} {} {}\n",
            position.x,
            position.y,
            state.is_accepting()
        ));
    }

    out.push_str(SEPARATOR);
    out.push('\n');

    for (from_index, state) in automaton.states().iter().enumerate() {
        for t in automaton.transitions_out(state.id()) {
            let Some(to_index) = automaton.index_of(t.to()) else {
                continue;
            };
            out.push_str(&format!(
                "{TRANSITION} {from_index} {to_index} {}",
                t.is_tangent()
            ));
            if !t.rules().is_empty() {
                out.push(' ');
                out.push_str(&t.rules().to_compact());
            }
            out.push('\n');
        }
    }

    out
}

/// A non-blank input line split into fields.
struct Record<'a> {
    number: usize,
    content: &'a str,
    fields: Vec<&'a str>,
}

impl<'a> Record<'a> {
    fn new(number: usize, content: &'a str) -> Self {
        Self {
            number,
            content,
            fields: content.split(' ').collect(),
        }
    }

    fn error(&self, kind: FormatErrorKind) -> FormatError {
        FormatError {
            line: self.number,
            content: self.content.to_string(),
            kind,
        }
    }

    fn expect_keyword(&self, expected: &'static str) -> Result<(), FormatError> {
        if self.fields[0] == expected {
            Ok(())
        } else {
            Err(self.error(FormatErrorKind::UnexpectedKeyword {
                expected,
                found: self.fields[0].to_string(),
            }))
        }
    }

    fn integer(&self, index: usize, field: &'static str) -> Result<i32, FormatError> {
        let value = self.fields[index];
        value.parse().map_err(|_| {
            self.error(FormatErrorKind::InvalidInteger {
                field,
                value: value.to_string(),
            })
        })
    }

    fn boolean(&self, index: usize, field: &'static str) -> Result<bool, FormatError> {
        let value = self.fields[index];
        if value.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if value.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(self.error(FormatErrorKind::InvalidBoolean {
                field,
                value: value.to_string(),
            }))
        }
    }

    fn state_index(
        &self,
        index: usize,
        field: &'static str,
        states: usize,
    ) -> Result<usize, FormatError> {
        let value = self.fields[index];
        let parsed: i64 = value.parse().map_err(|_| {
            self.error(FormatErrorKind::InvalidInteger {
                field,
                value: value.to_string(),
            })
        })?;
        usize::try_from(parsed)
            .ok()
            .filter(|i| *i < states)
            .ok_or_else(|| {
                self.error(FormatErrorKind::IndexOutOfRange {
                    field,
                    index: parsed,
                    states,
                })
            })
    }

    /// Parse `<keyword> <x> <y> <accept>`.
    fn state(&self, keyword: &'static str) -> Result<(Position, bool), FormatError> {
        self.expect_keyword(keyword)?;
        if self.fields.len() != 4 {
            return Err(self.error(FormatErrorKind::WrongFieldCount {
                expected: "4",
                found: self.fields.len(),
            }));
        }
        let x = self.integer(1, "x")?;
        let y = self.integer(2, "y")?;
        let accepting = self.boolean(3, "accept")?;
        Ok((Position::new(x, y), accepting))
    }
}

/// Decode an automaton from the text format.
///
/// Parsing stops at the first invalid line. Nothing is returned unless the
/// whole input is valid.
///
/// # Example
///
/// ```rust
/// use nfakit::persist::decode;
///
/// let nfa = decode("startstate 0 0 false\nstate 90 0 true\n#\ntransition 0 1 false ab\n").unwrap();
/// assert_eq!(nfa.state_count(), 2);
/// assert!(nfa.run("b"));
/// ```
pub fn decode(text: &str) -> Result<Automaton, FormatError> {
    let mut records = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches(['\r', ' '])))
        .filter(|(_, line)| !line.is_empty())
        .map(|(number, line)| Record::new(number, line));

    let first = records.next().ok_or(FormatError {
        line: 1,
        content: String::new(),
        kind: FormatErrorKind::MissingStartState,
    })?;
    let (position, accepting) = first.state(START_STATE)?;
    let mut builder = AutomatonBuilder::new().start(position, accepting);

    let mut last_line = first.number;
    let mut in_transitions = false;
    for record in records {
        last_line = record.number;
        if !in_transitions {
            if record.content == SEPARATOR {
                in_transitions = true;
                continue;
            }
            let (position, accepting) = record.state(STATE)?;
            builder = builder.state(position, accepting);
            continue;
        }

        record.expect_keyword(TRANSITION)?;
        if record.fields.len() != 4 && record.fields.len() != 5 {
            return Err(record.error(FormatErrorKind::WrongFieldCount {
                expected: "4 or 5",
                found: record.fields.len(),
            }));
        }
        let states = builder.state_count();
        let from = record.state_index(1, "from", states)?;
        let to = record.state_index(2, "to", states)?;
        let tangent = record.boolean(3, "tangent")?;
        let rules = record
            .fields
            .get(4)
            .map(|r| RuleSet::from_text(r))
            .unwrap_or_default();

        builder = builder.transition(from, to, tangent, rules);
    }

    // Indices were range-checked line by line, so the builder only rejects
    // what a line check missed; report that against the end of the input.
    builder.build().map_err(|e| FormatError {
        line: last_line,
        content: String::new(),
        kind: FormatErrorKind::Build(e),
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Save an automaton to `path`, replacing any existing file atomically.
///
/// The temporary file is removed again if any step fails.
pub fn save(automaton: &Automaton, path: &Path) -> Result<(), PersistError> {
    let text = encode(automaton);
    let tmp_path = temp_path(path);

    if let Err(source) = write_and_rename(&tmp_path, path, text.as_bytes()) {
        if let Err(e) = fs::remove_file(&tmp_path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(
                    path = %tmp_path.display(),
                    error = %e,
                    "could not remove temporary file"
                );
            }
        }
        return Err(PersistError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    info!(
        path = %path.display(),
        states = automaton.state_count(),
        transitions = automaton.transition_count(),
        "saved automaton"
    );
    Ok(())
}

fn write_and_rename(tmp_path: &Path, path: &Path, bytes: &[u8]) -> io::Result<()> {
    {
        let mut file = File::create(tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }
    fs::rename(tmp_path, path)?;

    // fsync the directory so the rename itself is durable
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fsync_dir(parent)
}

fn fsync_dir(dir: &Path) -> io::Result<()> {
    OpenOptions::new().read(true).open(dir)?.sync_all()
}

/// Load an automaton from `path`.
pub fn load(path: &Path) -> Result<Automaton, PersistError> {
    let text = fs::read_to_string(path).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "read automaton file");

    match decode(&text) {
        Ok(automaton) => {
            info!(
                path = %path.display(),
                states = automaton.state_count(),
                transitions = automaton.transition_count(),
                "loaded automaton"
            );
            Ok(automaton)
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                line = e.line,
                error = %e.kind,
                "rejected automaton file"
            );
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Rule, EPSILON};
    use tempfile::tempdir;

    fn sample() -> Automaton {
        let mut nfa = Automaton::new(Position::new(10, 20), false);
        let s = nfa.start();
        let a = nfa.add_state(Position::new(-5, 7), false);
        let f = nfa.add_state(Position::new(100, 0), true);
        nfa.add_transition(s, a, RuleSet::from_text("a, b")).unwrap();
        nfa.add_transition(a, f, RuleSet::from_text(&EPSILON.to_string()))
            .unwrap();
        let empty = nfa.connect(f, s).unwrap();
        nfa.set_tangent(empty, true).unwrap();
        nfa
    }

    fn kind_of(text: &str) -> FormatErrorKind {
        decode(text).unwrap_err().kind
    }

    #[test]
    fn encode_writes_expected_lines() {
        let text = encode(&sample());
        let expected = format!(
            "startstate 10 20 false\n\
             state -5 7 false\n\
             state 100 0 true\n\
             #\n\
             transition 0 1 false ab\n\
             transition 1 2 false {EPSILON}\n\
             transition 2 0 true\n"
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn decode_restores_encoded_graph() {
        let original = sample();
        let restored = decode(&encode(&original)).unwrap();

        assert_eq!(restored.state_count(), original.state_count());
        for (a, b) in original.states().iter().zip(restored.states()) {
            assert_eq!(a.position(), b.position());
            assert_eq!(a.is_accepting(), b.is_accepting());
        }
        assert_eq!(encode(&restored), encode(&original));
    }

    #[test]
    fn decode_accepts_missing_separator() {
        let nfa = decode("startstate 0 0 true\nstate 1 1 false\n").unwrap();
        assert_eq!(nfa.state_count(), 2);
        assert_eq!(nfa.transition_count(), 0);
    }

    #[test]
    fn decode_tolerates_trailing_space_and_crlf() {
        let nfa = decode("startstate 0 0 false\r\n#\r\ntransition 0 0 false \r\n").unwrap();
        assert_eq!(nfa.transition_count(), 1);
        assert!(nfa.transitions()[0].rules().is_empty());
    }

    #[test]
    fn decode_rejects_missing_start_record() {
        let err = decode("state 0 0 true\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.content, "state 0 0 true");
        assert_eq!(
            err.kind,
            FormatErrorKind::UnexpectedKeyword {
                expected: "startstate",
                found: "state".to_string(),
            }
        );
    }

    #[test]
    fn decode_rejects_empty_input() {
        assert_eq!(kind_of(""), FormatErrorKind::MissingStartState);
        assert_eq!(kind_of("\n\n"), FormatErrorKind::MissingStartState);
    }

    #[test]
    fn decode_rejects_wrong_field_count() {
        assert_eq!(
            kind_of("startstate 0 0\n"),
            FormatErrorKind::WrongFieldCount {
                expected: "4",
                found: 3,
            }
        );
        assert_eq!(
            kind_of("startstate 0 0 false\n#\ntransition 0 0 false ab extra\n"),
            FormatErrorKind::WrongFieldCount {
                expected: "4 or 5",
                found: 6,
            }
        );
    }

    #[test]
    fn decode_rejects_non_integer_fields() {
        assert_eq!(
            kind_of("startstate 0 zero false\n"),
            FormatErrorKind::InvalidInteger {
                field: "y",
                value: "zero".to_string(),
            }
        );
        assert_eq!(
            kind_of("startstate 0 0 false\n#\ntransition a 0 false\n"),
            FormatErrorKind::InvalidInteger {
                field: "from",
                value: "a".to_string(),
            }
        );
    }

    #[test]
    fn decode_rejects_bad_boolean() {
        assert_eq!(
            kind_of("startstate 0 0 yes\n"),
            FormatErrorKind::InvalidBoolean {
                field: "accept",
                value: "yes".to_string(),
            }
        );
    }

    #[test]
    fn decode_accepts_any_case_boolean() {
        let nfa = decode("startstate 0 0 TRUE\n").unwrap();
        assert!(nfa.start_state().is_accepting());
    }

    #[test]
    fn decode_rejects_out_of_range_index() {
        let err = decode("startstate 0 0 false\nstate 0 0 true\n#\ntransition 0 2 false a\n")
            .unwrap_err();
        assert_eq!(err.line, 4);
        assert_eq!(
            err.kind,
            FormatErrorKind::IndexOutOfRange {
                field: "to",
                index: 2,
                states: 2,
            }
        );
        assert_eq!(
            kind_of("startstate 0 0 false\n#\ntransition -1 0 false a\n"),
            FormatErrorKind::IndexOutOfRange {
                field: "from",
                index: -1,
                states: 1,
            }
        );
    }

    #[test]
    fn decode_rejects_records_in_wrong_section() {
        assert_eq!(
            kind_of("startstate 0 0 false\ntransition 0 0 false a\n"),
            FormatErrorKind::UnexpectedKeyword {
                expected: "state",
                found: "transition".to_string(),
            }
        );
        assert_eq!(
            kind_of("startstate 0 0 false\n#\nstate 0 0 false\n"),
            FormatErrorKind::UnexpectedKeyword {
                expected: "transition",
                found: "state".to_string(),
            }
        );
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("machine.nfa");
        let original = sample();

        save(&original, &path).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(encode(&loaded), encode(&original));
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn save_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("machine.nfa");
        fs::write(&path, "garbage").unwrap();

        save(&sample(), &path).unwrap();
        assert!(load(&path).is_ok());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result = load(&dir.path().join("absent.nfa"));
        assert!(matches!(result, Err(PersistError::Io { .. })));
    }

    #[test]
    fn failed_rename_removes_temporary_file() {
        let dir = tempdir().unwrap();
        // A non-empty directory cannot be replaced by a file.
        let path = dir.path().join("occupied");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let result = save(&sample(), &path);
        assert!(matches!(result, Err(PersistError::Io { .. })));
        assert!(!temp_path(&path).exists());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn reserved_symbols_never_reach_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("symbols.nfa");

        let mut nfa = Automaton::new(Position::new(0, 0), false);
        let s = nfa.start();
        let f = nfa.add_state(Position::new(1, 0), true);
        let rules: RuleSet = [Rule::Symbol('a'), Rule::Symbol(' '), Rule::Symbol(',')]
            .into_iter()
            .collect();
        let t = nfa.add_transition(s, f, rules).unwrap();
        let mut loop_rules = RuleSet::new();
        loop_rules.insert(Rule::Symbol('\n'));
        loop_rules.insert(Rule::Symbol('b'));
        nfa.add_transition(f, f, loop_rules).unwrap();

        assert_eq!(nfa.transition(t).unwrap().rules().to_compact(), "a");
        assert!(!nfa.run(","));

        save(&nfa, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("#\ntransition 0 1 false a\ntransition 1 1 false b\n"));

        let loaded = load(&path).unwrap();
        assert_eq!(encode(&loaded), text);
        for input in ["a", "ab", "abb", ",", " "] {
            assert_eq!(loaded.run(input), nfa.run(input), "input {input:?}");
        }
    }

    #[test]
    fn save_into_missing_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("dir.nfa");
        let result = save(&sample(), &path);
        assert!(matches!(result, Err(PersistError::Io { .. })));
    }
}
